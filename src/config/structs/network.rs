//! Outbound HTTP settings.

use serde::{Deserialize, Serialize};

use crate::error::{OpenHubError, Result};

/// Settings of the shared outbound client used for GitHub, the LLM
/// endpoint and YouTube.
///
/// Retries only apply to LLM calls; GitHub and YouTube failures are
/// reported to the caller as they are.
///
/// # Example
/// ```toml
/// [network]
/// request_timeout = 30
/// connect_timeout = 5
/// max_retries = 0
/// proxy = "socks5://127.0.0.1:1080"
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NetworkConfig {
    /// Whole-request timeout, seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,

    /// TCP/TLS connect timeout, seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,

    /// Extra attempts for a failed LLM request before falling back.
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,

    /// First LLM retry delay, milliseconds. Doubles per attempt.
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Cap for the LLM retry delay, milliseconds.
    #[serde(default = "default_max_retry_delay_ms")]
    pub max_retry_delay_ms: u64,

    /// Proxy URL for every outbound request (`http://`, `https://` or
    /// `socks5://`). Unset means the system proxy settings apply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<String>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            request_timeout: default_request_timeout(),
            connect_timeout: default_connect_timeout(),
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
            max_retry_delay_ms: default_max_retry_delay_ms(),
            proxy: None,
        }
    }
}

impl NetworkConfig {
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("request_timeout", self.request_timeout),
            ("connect_timeout", self.connect_timeout),
        ] {
            if value == 0 {
                return Err(OpenHubError::Config(format!(
                    "network.{} cannot be 0",
                    name
                )));
            }
        }

        if self.max_retry_delay_ms < self.retry_delay_ms {
            return Err(OpenHubError::Config(format!(
                "network.max_retry_delay_ms ({}) is lower than network.retry_delay_ms ({})",
                self.max_retry_delay_ms, self.retry_delay_ms
            )));
        }

        if let Some(proxy) = self.proxy.as_deref()
            && !["http://", "https://", "socks5://", "socks5h://"]
                .iter()
                .any(|scheme| proxy.starts_with(scheme))
        {
            return Err(OpenHubError::Config(format!(
                "network.proxy '{}' must start with http://, https:// or socks5://",
                proxy
            )));
        }
        Ok(())
    }
}

fn default_request_timeout() -> u64 {
    60
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_max_retries() -> usize {
    1
}

fn default_retry_delay_ms() -> u64 {
    1000
}

fn default_max_retry_delay_ms() -> u64 {
    10_000
}
