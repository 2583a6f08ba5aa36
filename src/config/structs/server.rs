//! HTTP server and GitHub OAuth configuration structures.

use serde::{Deserialize, Serialize};

use crate::error::{OpenHubError, Result};

/// HTTP server configuration.
///
/// # Example
/// ```toml
/// [server]
/// host = "0.0.0.0"
/// port = 5001
/// frontend_url = "http://localhost:3000"
/// cors_origins = ["http://localhost:3000"]
/// production = false
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Listen address.
    #[serde(default = "default_host")]
    pub host: String,

    /// Listen port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Frontend base URL; used for the OAuth redirect and always allowed by CORS.
    #[serde(default = "default_frontend_url")]
    pub frontend_url: String,

    /// Additional origins allowed to call the API with credentials.
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Production mode marks the session cookie `Secure`.
    #[serde(default)]
    pub production: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            frontend_url: default_frontend_url(),
            cors_origins: default_cors_origins(),
            production: false,
        }
    }
}

impl ServerConfig {
    /// `host:port` string for binding.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Redirect URI registered with the GitHub OAuth app.
    pub fn oauth_redirect_uri(&self) -> String {
        format!("{}/auth/callback", self.frontend_url.trim_end_matches('/'))
    }

    /// CORS origins plus the frontend URL, without duplicates.
    pub fn allowed_origins(&self) -> Vec<String> {
        let mut origins: Vec<String> = Vec::new();
        let frontend = self.frontend_url.trim_end_matches('/').to_string();
        for origin in self.cors_origins.iter().cloned().chain(Some(frontend)) {
            if !origin.is_empty() && !origins.contains(&origin) {
                origins.push(origin);
            }
        }
        origins
    }

    /// Validates server configuration.
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(OpenHubError::Config("server.port cannot be 0".into()));
        }
        if self.host.trim().is_empty() {
            return Err(OpenHubError::Config("server.host cannot be empty".into()));
        }
        Ok(())
    }
}

/// GitHub OAuth app and API endpoints.
///
/// `api_base` / `oauth_base` exist so GitHub Enterprise or a local mock can
/// stand in for github.com.
#[derive(Clone, Deserialize, Serialize)]
pub struct GitHubConfig {
    /// OAuth app client id.
    #[serde(default)]
    pub client_id: Option<String>,

    /// OAuth app client secret.
    #[serde(default, skip_serializing)]
    pub client_secret: Option<String>,

    /// REST API base URL.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// OAuth base URL (authorize + access_token).
    #[serde(default = "default_oauth_base")]
    pub oauth_base: String,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            api_base: default_api_base(),
            oauth_base: default_oauth_base(),
        }
    }
}

impl std::fmt::Debug for GitHubConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use crate::llm::provider::utils::mask_api_key;
        f.debug_struct("GitHubConfig")
            .field("client_id", &self.client_id)
            .field(
                "client_secret",
                &self.client_secret.as_deref().map(mask_api_key),
            )
            .field("api_base", &self.api_base)
            .field("oauth_base", &self.oauth_base)
            .finish()
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5001
}

fn default_frontend_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "http://localhost:3001".to_string(),
        "http://localhost:5001".to_string(),
    ]
}

fn default_api_base() -> String {
    "https://api.github.com".to_string()
}

fn default_oauth_base() -> String {
    "https://github.com".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_oauth_redirect_uri_trims_slash() {
        let config = ServerConfig {
            frontend_url: "https://app.example.com/".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.oauth_redirect_uri(),
            "https://app.example.com/auth/callback"
        );
    }

    #[test]
    fn test_allowed_origins_dedup() {
        let config = ServerConfig::default();
        assert_eq!(
            config.allowed_origins(),
            vec![
                "http://localhost:3000",
                "http://localhost:3001",
                "http://localhost:5001",
            ]
        );

        let config = ServerConfig {
            frontend_url: "https://openhub.example".to_string(),
            ..Default::default()
        };
        assert_eq!(config.allowed_origins().len(), 4);
        assert_eq!(config.allowed_origins()[3], "https://openhub.example");
    }

    #[test]
    fn test_validate_port() {
        let config = ServerConfig {
            port: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
        assert!(ServerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_github_debug_masks_secret() {
        let config = GitHubConfig {
            client_secret: Some("0123456789abcdef".to_string()),
            ..Default::default()
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("0123456789abcdef"));
    }
}
