//! Response handling and JSON cleaning
//!
//! Handle LLM API responses, including JSON cleaning, parsing, and previewing

use serde::de::DeserializeOwned;

use crate::error::{OpenHubError, Result};

/// Error preview maximum length
const ERROR_PREVIEW_LENGTH: usize = 500;

/// Extracts the JSON object from a model answer.
///
/// Returns the span from the first `{` to the last `}`; without one, strips
/// markdown code fences.
pub fn clean_json_response(response: &str) -> &str {
    let trimmed = response.trim();

    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}'))
        && start < end
    {
        return &trimmed[start..=end];
    }

    let without_prefix = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```JSON"))
        .or_else(|| trimmed.strip_prefix("```"))
        .map(|s| s.trim_start())
        .unwrap_or(trimmed);

    without_prefix
        .strip_suffix("```")
        .map(|s| s.trim_end())
        .unwrap_or(without_prefix)
        .trim()
}

/// Truncate string for error preview (safe handling of multibyte characters)
pub fn truncate_for_preview(s: &str) -> String {
    if s.len() <= ERROR_PREVIEW_LENGTH {
        return s.to_string();
    }
    let boundary = s
        .char_indices()
        .map(|(i, _)| i)
        .take_while(|&i| i <= ERROR_PREVIEW_LENGTH)
        .last()
        .unwrap_or(0);
    format!("{}...", &s[..boundary])
}

/// Parses the JSON object embedded in a model answer.
pub fn parse_json_response<T: DeserializeOwned>(response: &str) -> Result<T> {
    let cleaned = clean_json_response(response);
    serde_json::from_str(cleaned).map_err(|e| {
        OpenHubError::Llm(format!(
            "Failed to parse JSON from model answer: {}. Preview: {}",
            e,
            truncate_for_preview(response)
        ))
    })
}
