//! LLM provider configuration structures.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Name of the provider entry created by default.
pub const DEFAULT_PROVIDER_NAME: &str = "openrouter";

/// Provider configuration.
///
/// Settings for one entry under `[llm.providers.<name>]`. Every provider
/// speaks the OpenAI-compatible chat-completions protocol.
///
/// # Fields
/// - `endpoint`: API base or full chat-completions URL
/// - `api_key`: bearer credential; the provider is disabled without one
/// - `model`: model name
/// - `max_tokens`: default completion limit (per-request limits take precedence)
/// - `temperature`: sampling temperature in `0.0..=2.0` (optional)
/// - `headers`: extra HTTP headers sent with every request
/// - `extra`: additional provider-specific parameters
///
/// # Example
/// ```toml
/// [llm.providers.openrouter]
/// endpoint = "https://openrouter.ai/api"
/// api_key = "sk-or-..."
/// model = "openai/gpt-4o"
///
/// [llm.providers.openrouter.headers]
/// "HTTP-Referer" = "https://openhub.ai"
/// "X-Title" = "OpenHub AI"
/// ```
#[derive(Clone, Deserialize, Serialize)]
pub struct ProviderConfig {
    /// API endpoint.
    pub endpoint: Option<String>,

    /// API key.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Model name.
    pub model: String,

    /// Maximum generated token count.
    pub max_tokens: Option<u32>,

    /// Sampling temperature in `0.0..=2.0`.
    pub temperature: Option<f32>,

    /// Extra request headers.
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Additional provider-specific parameters.
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl ProviderConfig {
    /// The built-in OpenRouter entry (no key).
    pub fn openrouter() -> Self {
        let mut headers = HashMap::new();
        headers.insert("HTTP-Referer".to_string(), "https://openhub.ai".to_string());
        headers.insert("X-Title".to_string(), "OpenHub AI".to_string());
        Self {
            endpoint: Some("https://openrouter.ai/api".to_string()),
            api_key: None,
            model: "openai/gpt-4o".to_string(),
            max_tokens: None,
            temperature: None,
            headers,
            extra: HashMap::new(),
        }
    }

    /// Validates provider configuration.
    pub fn validate(&self, name: &str) -> Result<()> {
        use crate::error::OpenHubError;
        if let Some(temp) = self.temperature
            && !(0.0..=2.0).contains(&temp)
        {
            return Err(OpenHubError::Config(format!(
                "Provider '{}': temperature {} out of range [0.0, 2.0]",
                name, temp
            )));
        }
        if let Some(ref key) = self.api_key
            && key.trim().is_empty()
        {
            return Err(OpenHubError::Config(format!(
                "Provider '{}': api_key is empty",
                name
            )));
        }
        if self.model.trim().is_empty() {
            return Err(OpenHubError::Config(format!(
                "Provider '{}': model is empty",
                name
            )));
        }
        Ok(())
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use crate::llm::provider::utils::mask_api_key;
        let masked_key = self.api_key.as_deref().map(mask_api_key);
        f.debug_struct("ProviderConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &masked_key)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("headers", &self.headers)
            .finish()
    }
}

/// LLM configuration.
///
/// # Fields
/// - `default_provider`: provider name, matching a key under `[llm.providers.<name>]`
/// - `fallback_providers`: providers to try in order if the primary provider fails
/// - `providers`: per-provider settings map (defaults to a single `openrouter` entry)
///
/// When every provider fails, summaries are produced by the built-in heuristics.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LLMConfig {
    /// Provider name used by default.
    #[serde(default = "default_provider_name")]
    pub default_provider: String,

    /// Providers tried in order when `default_provider` fails.
    #[serde(default)]
    pub fallback_providers: Vec<String>,

    /// Provider settings keyed by provider name.
    #[serde(default = "default_providers")]
    pub providers: HashMap<String, ProviderConfig>,
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            default_provider: default_provider_name(),
            fallback_providers: Vec::new(),
            providers: default_providers(),
        }
    }
}

fn default_provider_name() -> String {
    DEFAULT_PROVIDER_NAME.to_string()
}

fn default_providers() -> HashMap<String, ProviderConfig> {
    let mut providers = HashMap::new();
    providers.insert(DEFAULT_PROVIDER_NAME.to_string(), ProviderConfig::openrouter());
    providers
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_llm_config_has_openrouter() {
        let config = LLMConfig::default();
        assert_eq!(config.default_provider, "openrouter");
        let provider = &config.providers["openrouter"];
        assert_eq!(provider.model, "openai/gpt-4o");
        assert_eq!(provider.api_key, None);
        assert_eq!(provider.headers["X-Title"], "OpenHub AI");
    }

    #[test]
    fn test_debug_masks_api_key() {
        let mut provider = ProviderConfig::openrouter();
        provider.api_key = Some("sk-or-v1-abcdefghijkl".to_string());
        let debug = format!("{:?}", provider);
        assert!(!debug.contains("abcdefghijkl"));
        assert!(debug.contains("sk-o...ijkl"));
    }

    #[test]
    fn test_validate_temperature_range() {
        let mut provider = ProviderConfig::openrouter();
        provider.temperature = Some(2.5);
        assert!(provider.validate("openrouter").is_err());
        provider.temperature = Some(0.3);
        assert!(provider.validate("openrouter").is_ok());
    }

    #[test]
    fn test_validate_empty_key() {
        let mut provider = ProviderConfig::openrouter();
        provider.api_key = Some("  ".to_string());
        let err = provider.validate("openrouter").unwrap_err();
        assert!(err.to_string().contains("api_key is empty"));
    }

    #[test]
    fn test_api_key_not_serialized() {
        let mut provider = ProviderConfig::openrouter();
        provider.api_key = Some("secret-key-value".to_string());
        let toml = toml::to_string(&provider).unwrap();
        assert!(!toml.contains("secret-key-value"));
    }
}
