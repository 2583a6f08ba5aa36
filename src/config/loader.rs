// Configuration loading
//
// Loads configuration from file, `OPENHUB__*` variables and the plain
// deployment variables hosting platforms set (PORT, FRONTEND_URL, ...).

use config::{Config, Environment, File};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

use super::structs::{AppConfig, DEFAULT_PROVIDER_NAME, ProviderConfig};
use crate::error::{OpenHubError, Result};

/// Loads application configuration from the default config file location.
pub fn load_config() -> Result<AppConfig> {
    load_config_from(None)
}

/// Loads application configuration.
///
/// Priority (high to low):
/// 1. Deployment variables (`PORT`, `HOST`, `FRONTEND_URL`, `GITHUB_CLIENT_ID`,
///    `GITHUB_CLIENT_SECRET`, `OPENROUTER_API_KEY`, `YOUTUBE_API_KEY`, `NODE_ENV`)
/// 2. `OPENHUB__*` variables, double underscore for nesting
///    - e.g. `OPENHUB__SERVER__PORT=8080`
///    - e.g. `OPENHUB__LEARN__RATE_LIMIT_MAX=100`
/// 3. Config file (`path`, or the platform config dir)
/// 4. Defaults (`Default` impls and `serde(default)` attributes)
///
/// An explicit `path` must exist; the default location is optional.
pub fn load_config_from(path: Option<&Path>) -> Result<AppConfig> {
    let mut builder = Config::builder();

    match path {
        Some(path) => {
            if !path.exists() {
                return Err(OpenHubError::Config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            builder = builder.add_source(File::from(path.to_path_buf()));
        }
        None => {
            if let Some(config_path) = get_config_path()
                && config_path.exists()
            {
                builder = builder.add_source(File::from(config_path));
            }
        }
    }

    builder = builder.add_source(
        Environment::with_prefix("OPENHUB")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let mut app_config: AppConfig = config.try_deserialize()?;

    apply_env_overrides(&mut app_config)?;
    app_config.validate()?;

    Ok(app_config)
}

/// Applies plain deployment environment variables on top of the loaded config.
///
/// `OPENROUTER_API_KEY` goes to the `openrouter` provider entry, which is
/// recreated from the built-in defaults when the config file removed it.
fn apply_env_overrides(config: &mut AppConfig) -> Result<()> {
    if let Some(port) = non_empty_var("PORT") {
        config.server.port = port
            .parse()
            .map_err(|_| OpenHubError::Config(format!("PORT '{}' is not a valid port", port)))?;
    }
    if let Some(host) = non_empty_var("HOST") {
        config.server.host = host;
    }
    if let Some(url) = non_empty_var("FRONTEND_URL") {
        config.server.frontend_url = url;
    }
    if non_empty_var("NODE_ENV").as_deref() == Some("production") {
        config.server.production = true;
    }

    if let Some(id) = non_empty_var("GITHUB_CLIENT_ID") {
        config.github.client_id = Some(id);
    }
    if let Some(secret) = non_empty_var("GITHUB_CLIENT_SECRET") {
        config.github.client_secret = Some(secret);
    }

    if let Some(key) = non_empty_var("OPENROUTER_API_KEY") {
        config
            .llm
            .providers
            .entry(DEFAULT_PROVIDER_NAME.to_string())
            .or_insert_with(ProviderConfig::openrouter)
            .api_key = Some(key);
        tracing::debug!("OPENROUTER_API_KEY applied to provider '{}'", DEFAULT_PROVIDER_NAME);
    }

    if let Some(key) = non_empty_var("YOUTUBE_API_KEY") {
        config.learn.youtube_api_key = Some(key);
    }

    Ok(())
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Returns `<config dir>/config.toml`.
fn get_config_path() -> Option<PathBuf> {
    get_config_dir().map(|dir| dir.join("config.toml"))
}

/// Platform config directory for openhub.
pub fn get_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "openhub").map(|dirs| dirs.config_dir().to_path_buf())
}
