//! Provider configuration extraction tool
//!
//! Provides helper functions to extract various parameters from ProviderConfig

use crate::config::ProviderConfig;
use crate::error::{OpenHubError, Result};

use super::super::utils::complete_endpoint;

/// Default temperature
const DEFAULT_TEMPERATURE: f32 = 0.3;

/// Extract API key
///
/// A provider without a key is not built; summaries then use the heuristics.
pub fn extract_api_key(config: &ProviderConfig, provider_name: &str) -> Result<String> {
    config
        .api_key
        .clone()
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| {
            OpenHubError::Config(format!(
                "API key not found for provider '{}'",
                provider_name
            ))
        })
}

/// Build a complete endpoint, using `default_base` when none is configured.
pub fn build_endpoint(config: &ProviderConfig, default_base: &str, suffix: &str) -> String {
    let base = config.endpoint.as_deref().unwrap_or(default_base);
    complete_endpoint(base, suffix)
}

/// Extract u32 value from extra configuration
pub fn extract_extra_u32(config: &ProviderConfig, key: &str) -> Option<u32> {
    config
        .extra
        .get(key)
        .and_then(|v| v.as_u64())
        .map(|v| v as u32)
}

/// Extract f32 value in extra configuration
pub fn extract_extra_f32(config: &ProviderConfig, key: &str) -> Option<f32> {
    config
        .extra
        .get(key)
        .and_then(|v| v.as_f64())
        .map(|v| v as f32)
}

/// max_tokens from configuration (explicit field first, then extra)
pub fn get_max_tokens_optional(config: &ProviderConfig) -> Option<u32> {
    config
        .max_tokens
        .or_else(|| extract_extra_u32(config, "max_tokens"))
}

/// temperature from configuration (explicit field first, then extra, then default)
pub fn get_temperature(config: &ProviderConfig) -> f32 {
    config
        .temperature
        .or_else(|| extract_extra_f32(config, "temperature"))
        .unwrap_or(DEFAULT_TEMPERATURE)
}
