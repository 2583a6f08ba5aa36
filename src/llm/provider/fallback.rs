use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::config::AppConfig;
use crate::error::{OpenHubError, Result};
use crate::llm::{CompletionOptions, LLMProvider};

use super::create_single_provider;

/// Fallback Provider - wraps multiple providers and switches on failure
pub struct FallbackProvider {
    providers: Vec<Arc<dyn LLMProvider>>,
}

impl FallbackProvider {
    /// Creates a fallback wrapper from a prepared provider chain.
    pub fn new(providers: Vec<Arc<dyn LLMProvider>>) -> Self {
        Self { providers }
    }

    /// Create FallbackProvider from configuration
    ///
    /// Providers that fail to build (typically: no API key) are skipped with
    /// a debug log. A single surviving provider is returned unwrapped.
    pub fn from_config(config: &AppConfig) -> Result<Arc<dyn LLMProvider>> {
        let main_name = config.llm.default_provider.as_str();

        let mut provider_names: Vec<&str> = vec![main_name];
        provider_names.extend(config.llm.fallback_providers.iter().map(String::as_str));

        if provider_names.len() == 1 {
            return create_single_provider(config, provider_names[0]);
        }

        let mut providers: Vec<Arc<dyn LLMProvider>> = Vec::new();
        let mut last_error = None;

        for (i, &name) in provider_names.iter().enumerate() {
            match create_single_provider(config, name) {
                Ok(p) => providers.push(p),
                Err(e) => {
                    if i == 0 {
                        debug!("Primary provider '{}' failed to create: {}", name, e);
                    } else {
                        debug!("Fallback provider '{}' failed to create: {}", name, e);
                    }
                    last_error = Some(e);
                }
            }
        }

        match providers.len() {
            0 => Err(last_error.unwrap_or_else(|| {
                OpenHubError::Config("No valid LLM providers could be created".to_string())
            })),
            1 => providers.pop().ok_or_else(|| {
                OpenHubError::Config("No valid LLM providers could be created".to_string())
            }),
            _ => Ok(Arc::new(Self::new(providers))),
        }
    }
}

#[async_trait]
impl LLMProvider for FallbackProvider {
    fn name(&self) -> &str {
        "fallback"
    }

    async fn validate(&self) -> Result<()> {
        if self.providers.is_empty() {
            return Err(OpenHubError::Config(
                "No LLM providers configured".to_string(),
            ));
        }

        let mut all_failed = true;
        for provider in &self.providers {
            match provider.validate().await {
                Ok(_) => {
                    all_failed = false;
                    debug!("Provider '{}' validated successfully", provider.name());
                }
                Err(e) => {
                    debug!("Provider '{}' validation failed: {}", provider.name(), e);
                }
            }
        }

        if all_failed {
            return Err(OpenHubError::Config(format!(
                "All {} providers failed validation",
                self.providers.len()
            )));
        }

        Ok(())
    }

    async fn send_prompt(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        options: &CompletionOptions,
    ) -> Result<String> {
        let mut last_error = None;

        for (i, provider) in self.providers.iter().enumerate() {
            match provider
                .send_prompt(system_prompt, user_prompt, options)
                .await
            {
                Ok(text) => {
                    if i > 0 {
                        debug!("Fallback provider '{}' answered", provider.name());
                    }
                    return Ok(text);
                }
                Err(e) => {
                    if i < self.providers.len() - 1 {
                        tracing::warn!(
                            "Provider '{}' failed, trying next provider: {}",
                            provider.name(),
                            e
                        );
                    }
                    last_error = Some(e);
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| OpenHubError::Llm("No LLM providers available".to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Simple Mock Provider for testing
    struct TestProvider {
        name: String,
        should_fail: bool,
        calls: AtomicUsize,
    }

    impl TestProvider {
        fn new(name: &str) -> Self {
            Self {
                name: name.to_string(),
                should_fail: false,
                calls: AtomicUsize::new(0),
            }
        }

        fn with_failure(mut self) -> Self {
            self.should_fail = true;
            self
        }
    }

    #[async_trait]
    impl LLMProvider for TestProvider {
        fn name(&self) -> &str {
            &self.name
        }

        async fn validate(&self) -> Result<()> {
            if self.should_fail {
                Err(OpenHubError::Config("validation failed".to_string()))
            } else {
                Ok(())
            }
        }

        async fn send_prompt(
            &self,
            _system_prompt: &str,
            _user_prompt: &str,
            _options: &CompletionOptions,
        ) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.should_fail {
                Err(OpenHubError::Llm(format!("{} failed", self.name)))
            } else {
                Ok(format!("answer from {}", self.name))
            }
        }
    }

    #[tokio::test]
    async fn test_validate_empty_providers() {
        let fallback = FallbackProvider::new(vec![]);
        assert!(fallback.validate().await.is_err());
    }

    #[tokio::test]
    async fn test_validate_partial_success() {
        let fallback = FallbackProvider::new(vec![
            Arc::new(TestProvider::new("p1").with_failure()),
            Arc::new(TestProvider::new("p2")),
        ]);
        assert!(fallback.validate().await.is_ok());
    }

    #[tokio::test]
    async fn test_validate_all_fail() {
        let fallback = FallbackProvider::new(vec![
            Arc::new(TestProvider::new("p1").with_failure()),
            Arc::new(TestProvider::new("p2").with_failure()),
        ]);
        assert!(fallback.validate().await.is_err());
    }

    #[tokio::test]
    async fn test_send_prompt_primary_success_skips_fallback() {
        let secondary = Arc::new(TestProvider::new("secondary"));
        let fallback = FallbackProvider::new(vec![
            Arc::new(TestProvider::new("primary")),
            secondary.clone(),
        ]);
        let text = fallback
            .send_prompt("s", "u", &CompletionOptions::default())
            .await
            .unwrap();
        assert_eq!(text, "answer from primary");
        assert_eq!(secondary.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_send_prompt_falls_back_on_failure() {
        let fallback = FallbackProvider::new(vec![
            Arc::new(TestProvider::new("primary").with_failure()),
            Arc::new(TestProvider::new("secondary")),
        ]);
        let text = fallback
            .send_prompt("s", "u", &CompletionOptions::default())
            .await
            .unwrap();
        assert_eq!(text, "answer from secondary");
    }

    #[tokio::test]
    async fn test_send_prompt_all_fail_returns_last_error() {
        let fallback = FallbackProvider::new(vec![
            Arc::new(TestProvider::new("primary").with_failure()),
            Arc::new(TestProvider::new("secondary").with_failure()),
        ]);
        let err = fallback
            .send_prompt("s", "u", &CompletionOptions::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("secondary failed"));
    }

    #[test]
    fn test_from_config_no_keys_is_error() {
        crate::llm::provider::test_utils::ensure_crypto_provider();
        let mut config = AppConfig::default();
        let mut backup = crate::config::ProviderConfig::openrouter();
        backup.model = "anthropic/claude-3.5-sonnet".to_string();
        config.llm.providers.insert("backup".to_string(), backup);
        config.llm.fallback_providers = vec!["backup".to_string()];

        let err = FallbackProvider::from_config(&config).err().unwrap();
        assert!(err.to_string().contains("API key not found"));
    }

    #[test]
    fn test_from_config_single_survivor_unwrapped() {
        crate::llm::provider::test_utils::ensure_crypto_provider();
        let mut config = AppConfig::default();
        let mut backup = crate::config::ProviderConfig::openrouter();
        backup.api_key = Some("sk-or-backup-key".to_string());
        config.llm.providers.insert("backup".to_string(), backup);
        config.llm.fallback_providers = vec!["backup".to_string()];

        let provider = FallbackProvider::from_config(&config).unwrap();
        assert_eq!(provider.name(), "backup");
    }
}
