use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::base::{
    ApiBackend, RetryPolicy, build_endpoint, extract_api_key, get_max_tokens_optional,
    get_temperature, send_llm_request,
};
use super::utils::{DEFAULT_OPENROUTER_BASE, OPENAI_API_SUFFIX};
use crate::config::{NetworkConfig, ProviderConfig};
use crate::error::{OpenHubError, Result};
use crate::llm::CompletionOptions;

/// OpenAI-compatible chat-completions provider.
///
/// The default entry targets OpenRouter; any OpenAI-compatible service works
/// by setting `endpoint`.
///
/// # Configuration example
/// ```toml
/// [llm]
/// default_provider = "openrouter"
///
/// [llm.providers.openrouter]
/// api_key = "sk-or-..."
/// model = "openai/gpt-4o"
/// endpoint = "https://openrouter.ai/api" # optional
/// temperature = 0.3 # optional
///
/// [llm.providers.openrouter.headers]
/// "HTTP-Referer" = "https://openhub.ai"
/// "X-Title" = "OpenHub AI"
/// ```
///
/// The key can also come from `OPENROUTER_API_KEY`.
pub struct OpenAIProvider {
    name: String,
    client: Client,
    api_key: String,
    endpoint: String,
    model: String,
    max_tokens: Option<u32>,
    temperature: f32,
    headers: Vec<(String, String)>,
    retry: RetryPolicy,
}

#[derive(Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<MessagePayload>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Serialize, Deserialize)]
struct MessagePayload {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct OpenAIResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: MessageContent,
}

#[derive(Deserialize)]
struct MessageContent {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAIProvider {
    /// Builds an OpenAI-compatible provider from runtime configuration.
    pub fn new(
        config: &ProviderConfig,
        provider_name: &str,
        network_config: &NetworkConfig,
    ) -> Result<Self> {
        let api_key = extract_api_key(config, provider_name)?;
        let endpoint = build_endpoint(config, DEFAULT_OPENROUTER_BASE, OPENAI_API_SUFFIX);

        let mut headers: Vec<(String, String)> = config
            .headers
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        headers.sort();

        Ok(Self {
            name: provider_name.to_string(),
            client: crate::http::shared_client(network_config)?,
            api_key,
            endpoint,
            model: config.model.clone(),
            max_tokens: get_max_tokens_optional(config),
            temperature: get_temperature(config),
            headers,
            retry: RetryPolicy::from(network_config),
        })
    }

    /// Resolved chat-completions URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ApiBackend for OpenAIProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn api_key(&self) -> &str {
        &self.api_key
    }

    async fn call_api(
        &self,
        system: &str,
        user_message: &str,
        options: &CompletionOptions,
    ) -> Result<String> {
        let temperature = options.temperature.unwrap_or(self.temperature);
        let max_tokens = options.max_tokens.or(self.max_tokens);

        let request = OpenAIRequest {
            model: self.model.clone(),
            messages: vec![
                MessagePayload {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                MessagePayload {
                    role: "user".to_string(),
                    content: user_message.to_string(),
                },
            ],
            temperature,
            max_tokens,
        };

        tracing::debug!(
            "{} API request: model={}, temperature={}, max_tokens={:?}",
            self.name,
            self.model,
            temperature,
            max_tokens
        );

        let auth_header = format!("Bearer {}", self.api_key);
        let mut headers: Vec<(&str, &str)> = vec![("Authorization", auth_header.as_str())];
        headers.extend(self.headers.iter().map(|(k, v)| (k.as_str(), v.as_str())));

        let response: OpenAIResponse = send_llm_request(
            &self.client,
            &self.endpoint,
            &headers,
            &request,
            &self.name,
            self.retry,
        )
        .await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                OpenHubError::Llm(format!("{} returned no choices in response", self.name))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LLMProvider;
    use crate::llm::provider::test_utils::{
        ensure_crypto_provider, test_network_config_no_retry, test_provider_config,
    };

    #[test]
    fn test_endpoint_completion() {
        ensure_crypto_provider();
        let config = test_provider_config(
            "https://openrouter.ai/api".to_string(),
            Some("sk-or-test".to_string()),
            "openai/gpt-4o".to_string(),
        );
        let provider =
            OpenAIProvider::new(&config, "openrouter", &test_network_config_no_retry()).unwrap();
        assert_eq!(
            provider.endpoint(),
            "https://openrouter.ai/api/v1/chat/completions"
        );
    }

    #[tokio::test]
    async fn test_send_prompt_success() {
        ensure_crypto_provider();
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer sk-or-test")
            .match_header("x-title", "OpenHub AI")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "model": "openai/gpt-4o",
                "max_tokens": 600
            })))
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"role":"assistant","content":"- Does things"}}]}"#)
            .create_async()
            .await;

        let mut config = test_provider_config(
            server.url(),
            Some("sk-or-test".to_string()),
            "openai/gpt-4o".to_string(),
        );
        config
            .headers
            .insert("X-Title".to_string(), "OpenHub AI".to_string());
        let provider =
            OpenAIProvider::new(&config, "openrouter", &test_network_config_no_retry()).unwrap();

        let text = provider
            .send_prompt("sys", "hello", &CompletionOptions::new(600, 0.3))
            .await
            .unwrap();
        assert_eq!(text, "- Does things");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_send_prompt_api_error() {
        ensure_crypto_provider();
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(401)
            .with_body(r#"{"error":{"message":"No auth credentials found"}}"#)
            .create_async()
            .await;

        let config = test_provider_config(
            server.url(),
            Some("sk-or-bad".to_string()),
            "openai/gpt-4o".to_string(),
        );
        let provider =
            OpenAIProvider::new(&config, "openrouter", &test_network_config_no_retry()).unwrap();

        let err = provider
            .send_prompt("sys", "hello", &CompletionOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, OpenHubError::LlmApi { status: 401, .. }));
    }

    #[tokio::test]
    async fn test_send_prompt_empty_choices() {
        ensure_crypto_provider();
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices":[]}"#)
            .create_async()
            .await;

        let config = test_provider_config(
            server.url(),
            Some("sk-or-test".to_string()),
            "openai/gpt-4o".to_string(),
        );
        let provider =
            OpenAIProvider::new(&config, "openrouter", &test_network_config_no_retry()).unwrap();

        let err = provider
            .send_prompt("sys", "hello", &CompletionOptions::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no choices"));
    }
}
