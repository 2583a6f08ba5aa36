//! Shared provider plumbing.
//!
//! - `config` - provider configuration extraction
//! - `response` - JSON extraction from model answers
//! - `retry` - HTTP sending with retry
//! - `ApiBackend` trait - a backend implements only the API call; the
//!   blanket impl supplies `LLMProvider`

pub mod config;
pub mod response;
pub mod retry;

pub use config::*;
pub use response::*;
pub use retry::{RetryPolicy, send_llm_request};

use async_trait::async_trait;

use crate::error::{OpenHubError, Result};
use crate::llm::{CompletionOptions, LLMProvider};

/// Internal trait: each backend implements its API call.
///
/// `FallbackProvider` does not implement this; it implements `LLMProvider`
/// directly.
#[async_trait]
pub(crate) trait ApiBackend: Send + Sync {
    /// Provider name
    fn name(&self) -> &str;

    /// Non-streaming API call
    async fn call_api(
        &self,
        system: &str,
        user_message: &str,
        options: &CompletionOptions,
    ) -> Result<String>;

    /// Credential used for the call; empty keys are rejected by `validate`.
    fn api_key(&self) -> &str;
}

#[async_trait]
impl<T: ApiBackend> LLMProvider for T {
    async fn send_prompt(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        options: &CompletionOptions,
    ) -> Result<String> {
        tracing::debug!(
            "{} prompt - system ({} chars), user ({} chars)",
            ApiBackend::name(self),
            system_prompt.len(),
            user_prompt.len()
        );
        self.call_api(system_prompt, user_prompt, options).await
    }

    fn name(&self) -> &str {
        ApiBackend::name(self)
    }

    async fn validate(&self) -> Result<()> {
        if self.api_key().is_empty() {
            return Err(OpenHubError::Config(format!(
                "Provider '{}': api_key is empty",
                ApiBackend::name(self)
            )));
        }
        Ok(())
    }
}
