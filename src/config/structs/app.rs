//! Top-level application configuration.

use serde::{Deserialize, Serialize};

use crate::error::{OpenHubError, Result};

use super::learn::LearnConfig;
use super::llm::LLMConfig;
use super::network::NetworkConfig;
use super::server::{GitHubConfig, ServerConfig};

/// Application configuration.
///
/// Effective configuration is merged from multiple sources (low to high):
/// 1. Rust defaults (`Default` + `serde(default)`)
/// 2. Config file (platform config dir, or `--config <file>`)
/// 3. `OPENHUB__*` environment variables
/// 4. Deployment variables (`PORT`, `FRONTEND_URL`, `GITHUB_CLIENT_ID`, ...)
///
/// # Configuration File Locations
/// - Linux: `~/.config/openhub/config.toml`
/// - macOS: `~/Library/Application Support/openhub/config.toml`
/// - Windows: `%APPDATA%\openhub\config\config.toml`
///
/// # Example
/// ```toml
/// [server]
/// port = 5001
/// frontend_url = "http://localhost:3000"
///
/// [github]
/// client_id = "Iv1.0123456789"
///
/// [llm]
/// default_provider = "openrouter"
///
/// [learn]
/// rate_limit_max = 30
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct AppConfig {
    /// HTTP listener, CORS and cookie settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// GitHub OAuth app and API endpoints.
    #[serde(default)]
    pub github: GitHubConfig,

    /// LLM provider settings.
    #[serde(default)]
    pub llm: LLMConfig,

    /// HTTP timeout and retry settings.
    #[serde(default)]
    pub network: NetworkConfig,

    /// Learning tools (local tree, change stream, resources).
    #[serde(default)]
    pub learn: LearnConfig,
}

impl AppConfig {
    /// Validates configuration consistency.
    pub fn validate(&self) -> Result<()> {
        self.server.validate()?;

        if !self.llm.providers.is_empty()
            && !self.llm.providers.contains_key(&self.llm.default_provider)
        {
            return Err(OpenHubError::Config(format!(
                "default_provider '{}' not found in [llm.providers]",
                self.llm.default_provider
            )));
        }

        for name in &self.llm.fallback_providers {
            if !self.llm.providers.contains_key(name) {
                return Err(OpenHubError::Config(format!(
                    "fallback_providers: '{}' not found in [llm.providers]",
                    name
                )));
            }
        }

        for (name, provider) in &self.llm.providers {
            provider.validate(name)?;
        }
        self.network.validate()?;
        self.learn.validate()?;
        Ok(())
    }
}
