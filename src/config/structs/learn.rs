//! Learning-tools configuration structures.

use serde::{Deserialize, Serialize};

use crate::error::{OpenHubError, Result};

/// Configuration for the `/api/learn` routes.
///
/// # Example
/// ```toml
/// [learn]
/// poll_interval_ms = 2000
/// rate_limit_window_secs = 60
/// rate_limit_max = 30
/// youtube_api_key = "AIza..."
/// ```
#[derive(Clone, Deserialize, Serialize)]
pub struct LearnConfig {
    /// HEAD polling interval for the change stream.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Fixed rate-limit window for contextual resource lookups.
    #[serde(default = "default_rate_limit_window_secs")]
    pub rate_limit_window_secs: u64,

    /// Requests allowed per client per window.
    #[serde(default = "default_rate_limit_max")]
    pub rate_limit_max: u32,

    /// YouTube Data API key; videos are only searched when set.
    #[serde(default, skip_serializing)]
    pub youtube_api_key: Option<String>,

    /// YouTube Data API base URL.
    #[serde(default = "default_youtube_api_base")]
    pub youtube_api_base: String,

    /// Directory names skipped when walking a local repository.
    #[serde(default = "default_ignore_dirs")]
    pub ignore_dirs: Vec<String>,
}

impl Default for LearnConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            rate_limit_window_secs: default_rate_limit_window_secs(),
            rate_limit_max: default_rate_limit_max(),
            youtube_api_key: None,
            youtube_api_base: default_youtube_api_base(),
            ignore_dirs: default_ignore_dirs(),
        }
    }
}

impl LearnConfig {
    /// Validates learn configuration.
    pub fn validate(&self) -> Result<()> {
        if self.poll_interval_ms == 0 {
            return Err(OpenHubError::Config(
                "learn.poll_interval_ms cannot be 0".into(),
            ));
        }
        if self.rate_limit_window_secs == 0 {
            return Err(OpenHubError::Config(
                "learn.rate_limit_window_secs cannot be 0".into(),
            ));
        }
        Ok(())
    }
}

impl std::fmt::Debug for LearnConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use crate::llm::provider::utils::mask_api_key;
        f.debug_struct("LearnConfig")
            .field("poll_interval_ms", &self.poll_interval_ms)
            .field("rate_limit_window_secs", &self.rate_limit_window_secs)
            .field("rate_limit_max", &self.rate_limit_max)
            .field(
                "youtube_api_key",
                &self.youtube_api_key.as_deref().map(mask_api_key),
            )
            .field("youtube_api_base", &self.youtube_api_base)
            .field("ignore_dirs", &self.ignore_dirs)
            .finish()
    }
}

fn default_poll_interval_ms() -> u64 {
    2000
}

fn default_rate_limit_window_secs() -> u64 {
    60
}

fn default_rate_limit_max() -> u32 {
    30
}

fn default_youtube_api_base() -> String {
    "https://www.googleapis.com".to_string()
}

fn default_ignore_dirs() -> Vec<String> {
    ["node_modules", ".next", ".git", "dist", "build"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
