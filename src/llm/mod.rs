//! LLM abstractions and provider traits.
//!
//! This module defines the provider interface used by the summary service.
//! Summaries never depend on the LLM being reachable: callers treat every
//! error from this layer as "use the heuristics instead".

/// Prompt builders for file, folder, issue and repository summaries.
pub mod prompt;
/// Built-in provider implementations and factory helpers.
pub mod provider;

use async_trait::async_trait;

use crate::error::Result;

/// Per-request completion limits.
///
/// Values set here take precedence over the provider configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CompletionOptions {
    /// Maximum generated token count.
    pub max_tokens: Option<u32>,
    /// Sampling temperature.
    pub temperature: Option<f32>,
}

impl CompletionOptions {
    /// Options with a token limit and temperature.
    pub fn new(max_tokens: u32, temperature: f32) -> Self {
        Self {
            max_tokens: Some(max_tokens),
            temperature: Some(temperature),
        }
    }
}

/// Unified interface implemented by all LLM providers.
///
/// The only required call is [`send_prompt`](Self::send_prompt): a
/// pre-built `(system, user)` prompt pair in, the raw model text out.
/// Prompt construction lives in [`prompt`]; response interpretation lives
/// with the caller.
///
/// # Built-In Implementations
/// - [`OpenAIProvider`](provider::openai::OpenAIProvider) - OpenAI-compatible API (OpenRouter by default)
/// - [`FallbackProvider`](provider::fallback::FallbackProvider) - ordered chain of providers
///
/// # Custom Provider Example
/// ```no_run
/// use async_trait::async_trait;
/// use openhub::llm::{CompletionOptions, LLMProvider};
/// use openhub::error::Result;
///
/// struct EchoProvider;
///
/// #[async_trait]
/// impl LLMProvider for EchoProvider {
///     async fn send_prompt(
///         &self,
///         _system_prompt: &str,
///         user_prompt: &str,
///         _options: &CompletionOptions,
///     ) -> Result<String> {
///         Ok(user_prompt.to_string())
///     }
///
///     fn name(&self) -> &str {
///         "echo"
///     }
///
///     async fn validate(&self) -> Result<()> {
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Sends a pre-built prompt pair to the LLM and returns the answer text.
    async fn send_prompt(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        options: &CompletionOptions,
    ) -> Result<String>;

    /// Provider name (used for logs and error messages).
    fn name(&self) -> &str;

    /// Validates provider configuration without calling the API.
    async fn validate(&self) -> Result<()>;
}
