//! Test utilities for provider tests
//!
//! Shared builders for the unit tests and the `tests/` integration suites
//! (enabled there through the `test-utils` feature).

use crate::config::{NetworkConfig, ProviderConfig};
use std::collections::HashMap;

/// Installs the rustls crypto provider.
///
/// reqwest 0.13 + rustls-no-provider needs a process-wide provider; `main`
/// installs it for the server. Calling this repeatedly is fine.
pub fn ensure_crypto_provider() {
    let _ = rustls::crypto::ring::default_provider().install_default();
}

/// `NetworkConfig` with retries disabled.
pub fn test_network_config_no_retry() -> NetworkConfig {
    NetworkConfig {
        max_retries: 0,
        ..Default::default()
    }
}

/// `ProviderConfig` pointing at a mock server.
pub fn test_provider_config(
    base_url: String,
    api_key: Option<String>,
    model: String,
) -> ProviderConfig {
    ProviderConfig {
        endpoint: Some(base_url),
        api_key,
        model,
        max_tokens: None,
        temperature: None,
        headers: HashMap::new(),
        extra: HashMap::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_config_with_api_key() {
        let config = test_provider_config(
            "http://test.com".to_string(),
            Some("sk-test".to_string()),
            "test-model".to_string(),
        );

        assert_eq!(config.endpoint, Some("http://test.com".to_string()));
        assert_eq!(config.api_key, Some("sk-test".to_string()));
        assert_eq!(config.model, "test-model");
    }
}
