//! Shared outbound HTTP client.

use std::sync::OnceLock;
use std::time::Duration;

use reqwest::Client;

use crate::config::NetworkConfig;
use crate::error::{OpenHubError, Result};

/// Global HTTP client (shared connection pool)
static HTTP_CLIENT: OnceLock<Client> = OnceLock::new();

/// Initialization error from the first failed build, kept so later calls
/// fail fast instead of retrying the build.
static HTTP_CLIENT_ERROR: OnceLock<String> = OnceLock::new();

/// Get or create the global HTTP client.
///
/// GitHub, the LLM providers and YouTube share one pool. The `NetworkConfig`
/// of the first call decides the timeouts.
pub fn shared_client(network_config: &NetworkConfig) -> Result<Client> {
    if let Some(client) = HTTP_CLIENT.get() {
        return Ok(client.clone());
    }

    if let Some(err_msg) = HTTP_CLIENT_ERROR.get() {
        return Err(OpenHubError::Other(format!(
            "HTTP client initialization failed earlier: {}",
            err_msg
        )));
    }

    match build_client(network_config) {
        Ok(client) => {
            let _ = HTTP_CLIENT.set(client.clone());
            Ok(client)
        }
        Err(e) => {
            let err_msg = e.to_string();
            let _ = HTTP_CLIENT_ERROR.set(err_msg.clone());
            Err(OpenHubError::Other(format!(
                "Failed to create HTTP client: {}",
                err_msg
            )))
        }
    }
}

fn build_client(network_config: &NetworkConfig) -> reqwest::Result<Client> {
    let mut builder = Client::builder()
        .user_agent(user_agent())
        .timeout(Duration::from_secs(network_config.request_timeout))
        .connect_timeout(Duration::from_secs(network_config.connect_timeout));

    if let Some(proxy) = network_config.proxy.as_deref() {
        tracing::debug!("Routing outbound requests through {}", proxy);
        builder = builder.proxy(reqwest::Proxy::all(proxy)?);
    }

    builder.build()
}

/// `openhub/<version> (<os>)`; GitHub rejects requests without a User-Agent.
pub fn user_agent() -> String {
    format!(
        "{}/{} ({})",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS
    )
}
