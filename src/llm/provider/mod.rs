pub mod base;
pub mod fallback;
pub mod openai;
pub mod utils;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

use std::sync::Arc;

use crate::config::{AppConfig, NetworkConfig, ProviderConfig};
use crate::error::{OpenHubError, Result};
use crate::llm::LLMProvider;

/// Creates the configured LLM provider.
///
/// With `fallback_providers` configured this returns a `FallbackProvider`
/// wrapping every provider that could be built; the primary provider is
/// tried first.
pub fn create_provider(config: &AppConfig) -> Result<Arc<dyn LLMProvider>> {
    fallback::FallbackProvider::from_config(config)
}

/// Creates a single named provider.
pub fn create_single_provider(config: &AppConfig, name: &str) -> Result<Arc<dyn LLMProvider>> {
    let provider_config = config.llm.providers.get(name).ok_or_else(|| {
        OpenHubError::Config(format!(
            "Provider '{}' not found in [llm.providers]",
            name
        ))
    })?;

    create_provider_from_config(provider_config, name, &config.network)
}

fn create_provider_from_config(
    provider_config: &ProviderConfig,
    name: &str,
    network_config: &NetworkConfig,
) -> Result<Arc<dyn LLMProvider>> {
    let provider = openai::OpenAIProvider::new(provider_config, name, network_config)?;
    Ok(Arc::new(provider))
}
