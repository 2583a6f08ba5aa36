//! HTTP request sending with retry
//!
//! Sends LLM API requests with retry on connection failure, 429
//! `Retry-After` handling and exponential backoff.

use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::{Duration, SystemTime};

use crate::config::NetworkConfig;
use crate::error::{OpenHubError, Result};

/// Retry budget for one request.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: usize,
    /// Initial backoff delay.
    pub retry_delay_ms: u64,
    /// Backoff ceiling; a longer `Retry-After` aborts instead of waiting.
    pub max_retry_delay_ms: u64,
}

impl From<&NetworkConfig> for RetryPolicy {
    fn from(config: &NetworkConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            retry_delay_ms: config.retry_delay_ms,
            max_retry_delay_ms: config.max_retry_delay_ms,
        }
    }
}

/// Only connection failures are retried.
fn is_retryable_error(error: &OpenHubError) -> bool {
    match error {
        OpenHubError::Llm(msg) => msg.to_lowercase().contains("connection failed"),
        _ => false,
    }
}

/// Parses a `Retry-After` header value.
///
/// Accepts delay seconds (`120`) or an HTTP date
/// (`Wed, 21 Oct 2015 07:28:00 GMT`). Dates in the past yield `0`.
fn parse_retry_after(value: &str) -> Option<u64> {
    if let Ok(secs) = value.parse::<u64>() {
        return Some(secs);
    }

    if let Ok(date) = httpdate::parse_http_date(value) {
        let now = SystemTime::now();
        return Some(date.duration_since(now).map(|d| d.as_secs()).unwrap_or(0));
    }

    None
}

/// One attempt; only network-layer errors are handled here.
async fn try_send_request<Req: Serialize>(
    client: &Client,
    endpoint: &str,
    headers: &[(&str, &str)],
    request_body: &Req,
    provider_name: &str,
) -> Result<reqwest::Response> {
    let mut req = client
        .post(endpoint)
        .header("Content-Type", "application/json");

    for (key, value) in headers {
        req = req.header(*key, *value);
    }

    tracing::debug!("Sending request to: {}", endpoint);

    req.json(request_body).send().await.map_err(|e| {
        tracing::debug!("{} API request failed: {}", provider_name, e);

        if e.is_timeout() {
            OpenHubError::Llm(format!("{} API request timeout: {}", provider_name, e))
        } else if e.is_connect() {
            OpenHubError::Llm(format!("{} API connection failed: {}", provider_name, e))
        } else {
            OpenHubError::Network(e)
        }
    })
}

/// Sends an LLM API request and deserializes the JSON response.
///
/// # Arguments
/// * `client` - HTTP client
/// * `endpoint` - API endpoint
/// * `headers` - extra request headers
/// * `request_body` - request body
/// * `provider_name` - provider name (logs and error messages)
/// * `policy` - retry budget
pub async fn send_llm_request<Req, Resp>(
    client: &Client,
    endpoint: &str,
    headers: &[(&str, &str)],
    request_body: &Req,
    provider_name: &str,
    policy: RetryPolicy,
) -> Result<Resp>
where
    Req: Serialize,
    Resp: DeserializeOwned,
{
    let mut attempt = 0;

    loop {
        attempt += 1;

        let response =
            match try_send_request(client, endpoint, headers, request_body, provider_name).await {
                Ok(resp) => resp,
                Err(e) => {
                    if !is_retryable_error(&e) || attempt > policy.max_retries {
                        return Err(e);
                    }

                    let delay = calculate_exponential_backoff(
                        attempt,
                        policy.retry_delay_ms,
                        policy.max_retry_delay_ms,
                    );
                    tracing::warn!(
                        "{} API network error (attempt {}/{}): {}. Retrying in {:.1}s...",
                        provider_name,
                        attempt,
                        policy.max_retries + 1,
                        e,
                        delay.as_secs_f64()
                    );
                    tokio::time::sleep(delay).await;
                    continue;
                }
            };

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| {
                    let result = parse_retry_after(v);
                    if result.is_none() {
                        tracing::warn!("Ignoring invalid Retry-After header: {}", v);
                    }
                    result
                });

            let body = response.text().await.unwrap_or_else(|e| {
                tracing::warn!("Failed to read 429 response body: {}", e);
                format!("<body read error: {}>", e)
            });

            tracing::debug!(
                "{} API rate limited (429), Retry-After: {:?}",
                provider_name,
                retry_after
            );

            if attempt > policy.max_retries {
                return Err(OpenHubError::LlmApi {
                    status: 429,
                    message: format!("{}: {}", provider_name, body),
                });
            }

            let delay = if let Some(secs) = retry_after {
                let retry_after_ms = secs.saturating_mul(1000);
                if retry_after_ms > policy.max_retry_delay_ms {
                    return Err(OpenHubError::Llm(format!(
                        "{} rate limited, Retry-After {}s exceeds the {}ms retry limit",
                        provider_name, secs, policy.max_retry_delay_ms
                    )));
                }
                Duration::from_secs(secs)
            } else {
                calculate_exponential_backoff(
                    attempt,
                    policy.retry_delay_ms,
                    policy.max_retry_delay_ms,
                )
            };

            tracing::warn!(
                "{} API rate limited (attempt {}/{}). Retrying in {:.1}s...",
                provider_name,
                attempt,
                policy.max_retries + 1,
                delay.as_secs_f64()
            );
            tokio::time::sleep(delay).await;
            continue;
        }

        let response_text = response.text().await?;

        tracing::debug!("{} API response status: {}", provider_name, status);
        tracing::debug!("{} API response body: {}", provider_name, response_text);

        if !status.is_success() {
            return Err(OpenHubError::LlmApi {
                status: status.as_u16(),
                message: format!("{}: {}", provider_name, response_text),
            });
        }

        if attempt > 1 {
            tracing::debug!(
                "{} API request succeeded after {} attempts",
                provider_name,
                attempt
            );
        }

        return serde_json::from_str(&response_text).map_err(|e| {
            OpenHubError::Llm(format!(
                "Failed to parse {} response: {}. Raw response: {}",
                provider_name,
                e,
                super::response::truncate_for_preview(&response_text)
            ))
        });
    }
}

fn calculate_exponential_backoff(
    attempt: usize,
    retry_delay_ms: u64,
    max_retry_delay_ms: u64,
) -> Duration {
    const MIN_RETRY_DELAY_MS: u64 = 100;
    let multiplier = 1u64
        .checked_shl(attempt.saturating_sub(1) as u32)
        .unwrap_or(u64::MAX);
    let delay_ms = retry_delay_ms
        .saturating_mul(multiplier)
        .min(max_retry_delay_ms)
        .max(MIN_RETRY_DELAY_MS);
    Duration::from_millis(delay_ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_retryable_connection_failed() {
        let err = OpenHubError::Llm("OpenRouter API connection failed: refused".to_string());
        assert!(is_retryable_error(&err));
    }

    #[test]
    fn test_is_retryable_other_errors() {
        let err = OpenHubError::Llm("API error (500): Internal server error".to_string());
        assert!(!is_retryable_error(&err));

        let err = OpenHubError::Config("Missing API key".to_string());
        assert!(!is_retryable_error(&err));
    }

    #[test]
    fn test_parse_retry_after_seconds() {
        assert_eq!(parse_retry_after("120"), Some(120));
        assert_eq!(parse_retry_after("0"), Some(0));
    }

    #[test]
    fn test_parse_retry_after_past_date() {
        assert_eq!(parse_retry_after("Wed, 21 Oct 2015 07:28:00 GMT"), Some(0));
    }

    #[test]
    fn test_parse_retry_after_invalid() {
        assert_eq!(parse_retry_after("soon"), None);
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        assert_eq!(
            calculate_exponential_backoff(1, 1000, 10_000),
            Duration::from_millis(1000)
        );
        assert_eq!(
            calculate_exponential_backoff(2, 1000, 10_000),
            Duration::from_millis(2000)
        );
        assert_eq!(
            calculate_exponential_backoff(10, 1000, 10_000),
            Duration::from_millis(10_000)
        );
        // floor
        assert_eq!(
            calculate_exponential_backoff(1, 0, 10_000),
            Duration::from_millis(100)
        );
    }

    #[test]
    fn test_retry_policy_from_network_config() {
        let policy = RetryPolicy::from(&NetworkConfig::default());
        assert_eq!(policy.max_retries, 1);
        assert_eq!(policy.retry_delay_ms, 1000);
    }
}
