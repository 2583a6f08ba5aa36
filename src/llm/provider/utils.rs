//! Endpoint and key helpers shared by the provider layer.

/// OpenAI-compatible chat-completions endpoint suffix
pub const OPENAI_API_SUFFIX: &str = "/v1/chat/completions";

/// OpenRouter default base URL
pub const DEFAULT_OPENROUTER_BASE: &str = "https://openrouter.ai/api";

/// Completes a configured base URL into the full chat-completions URL.
///
/// Trailing path segments that already match the start of `expected_suffix`
/// are not repeated (`.../v1` only gets `chat/completions`). A URL with two
/// or more path segments that matches none of it is taken as a complete
/// custom endpoint.
///
/// # Example
/// ```
/// use openhub::llm::provider::utils::complete_endpoint;
///
/// assert_eq!(
///     complete_endpoint("https://openrouter.ai/api", "/v1/chat/completions"),
///     "https://openrouter.ai/api/v1/chat/completions"
/// );
///
/// assert_eq!(
///     complete_endpoint("https://openrouter.ai/api/v1/chat/completions", "/v1/chat/completions"),
///     "https://openrouter.ai/api/v1/chat/completions"
/// );
///
/// assert_eq!(
///     complete_endpoint("https://api.openai.com/", "/v1/chat/completions"),
///     "https://api.openai.com/v1/chat/completions"
/// );
/// ```
pub fn complete_endpoint(base_url: &str, expected_suffix: &str) -> String {
    let url = base_url.trim_end_matches('/');
    let suffix: Vec<&str> = expected_suffix.split('/').filter(|s| !s.is_empty()).collect();
    let path = path_segments(url);

    for matched in (1..=suffix.len()).rev() {
        if path.ends_with(&suffix[..matched]) {
            let rest = suffix[matched..].join("/");
            return if rest.is_empty() {
                url.to_string()
            } else {
                format!("{}/{}", url, rest)
            };
        }
    }

    if is_complete_api_path(url) {
        return url.to_string();
    }

    format!("{}/{}", url, suffix.join("/"))
}

/// Non-empty path segments of an `http(s)://` URL.
fn path_segments(url: &str) -> Vec<&str> {
    url.strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"))
        .and_then(|rest| rest.split_once('/'))
        .map(|(_, path)| path.split('/').filter(|s| !s.is_empty()).collect())
        .unwrap_or_default()
}

/// `https://openrouter.ai/api` (one segment) still gets the suffix.
fn is_complete_api_path(url: &str) -> bool {
    path_segments(url).len() >= 2
}

/// Mask API key to prevent log leaks
///
/// # rule
/// - length > 8: display first 4 characters + `...` + last 4 characters
/// - length <= 8: display `****`
///
/// # Example
/// ```
/// use openhub::llm::provider::utils::mask_api_key;
///
/// assert_eq!(mask_api_key("sk-or-v1-abcdefgh"), "sk-o...efgh");
/// assert_eq!(mask_api_key("short"), "****");
/// assert_eq!(mask_api_key(""), "****");
/// ```
pub fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() > 8 {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    } else {
        "****".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_api_key() {
        assert_eq!(mask_api_key("sk-or-v1-abcdefgh"), "sk-o...efgh");
        assert_eq!(mask_api_key("AIzaSyD-1234567890abcdef"), "AIza...cdef");
        assert_eq!(mask_api_key("12345678"), "****");
        assert_eq!(mask_api_key(""), "****");
        assert_eq!(mask_api_key("123456789"), "1234...6789");
    }

    #[test]
    fn test_mask_api_key_multibyte() {
        // must not split a char
        assert_eq!(mask_api_key("ключ-ключ-ключ"), "ключ...ключ");
    }

    #[test]
    fn test_complete_endpoint_openrouter_base() {
        assert_eq!(
            complete_endpoint(DEFAULT_OPENROUTER_BASE, OPENAI_API_SUFFIX),
            "https://openrouter.ai/api/v1/chat/completions"
        );
    }

    #[test]
    fn test_complete_endpoint_with_version_only() {
        assert_eq!(
            complete_endpoint("https://openrouter.ai/api/v1", OPENAI_API_SUFFIX),
            "https://openrouter.ai/api/v1/chat/completions"
        );
    }

    #[test]
    fn test_complete_endpoint_mock_server() {
        assert_eq!(
            complete_endpoint("http://127.0.0.1:1234", OPENAI_API_SUFFIX),
            "http://127.0.0.1:1234/v1/chat/completions"
        );
    }

    #[test]
    fn test_complete_endpoint_custom_path() {
        assert_eq!(
            complete_endpoint("https://custom.com/my/custom/path", OPENAI_API_SUFFIX),
            "https://custom.com/my/custom/path"
        );
    }

    #[test]
    fn test_is_complete_api_path() {
        assert!(is_complete_api_path("https://api.com/v1/chat"));
        assert!(!is_complete_api_path("https://api.com"));
        assert!(!is_complete_api_path("https://openrouter.ai/api"));
    }
}
