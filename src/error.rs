use thiserror::Error;

pub type Result<T> = std::result::Result<T, OpenHubError>;

#[derive(Error, Debug)]
pub enum OpenHubError {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration parsing error: {0}")]
    ConfigParse(#[from] config::ConfigError),

    #[error("LLM provider error: {0}")]
    Llm(String),

    /// 上游 LLM API 返回的非 2xx 响应
    #[error("LLM API error ({status}): {message}")]
    LlmApi { status: u16, message: String },

    /// GitHub REST / OAuth 返回的非 2xx 响应，`message` 为 GitHub 给出的说明
    #[error("GitHub API error ({status}): {message}")]
    GitHub { status: u16, message: String },

    #[error("Failed to resolve repository tree SHA")]
    MissingTreeSha,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// 通用错误类型，用于不适合其他分类的错误
    #[error("{0}")]
    Other(String),
}

impl OpenHubError {
    /// HTTP status reported by an upstream service, if any.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            OpenHubError::GitHub { status, .. } | OpenHubError::LlmApi { status, .. } => {
                Some(*status)
            }
            OpenHubError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Short detail text for API error bodies.
    ///
    /// Upstream errors expose the upstream message verbatim; everything else
    /// uses the display form.
    pub fn details(&self) -> String {
        match self {
            OpenHubError::GitHub { message, .. } | OpenHubError::LlmApi { message, .. } => {
                message.clone()
            }
            other => other.to_string(),
        }
    }

    /// 获取错误的解决建议
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            OpenHubError::Config(msg) if msg.contains("client_id") => Some(
                "Set GITHUB_CLIENT_ID / GITHUB_CLIENT_SECRET, or [github] client_id in config.toml",
            ),
            OpenHubError::Config(msg) if msg.contains("API key not found") => Some(
                "Set OPENROUTER_API_KEY, or api_key under [llm.providers.openrouter] in config.toml",
            ),
            OpenHubError::Config(msg) if msg.contains("not found in [llm.providers]") => Some(
                "Check [llm] default_provider / fallback_providers against the [llm.providers.*] tables",
            ),
            OpenHubError::Network(_) => {
                Some("Check your network connection, proxy settings, or API endpoint configuration")
            }
            OpenHubError::GitHub { status: 401, .. } => {
                Some("The GitHub token is missing or expired. Sign in again")
            }
            OpenHubError::GitHub { status: 403, .. } => {
                Some("GitHub denied access. Check token scopes or the API rate limit")
            }
            OpenHubError::GitHub { status: 404, .. } => {
                Some("Repository or path not found, or not visible to this token")
            }
            OpenHubError::Llm(msg) if msg.contains("timeout") => {
                Some("The API request timed out. Check network or try again later")
            }
            OpenHubError::Llm(msg) if msg.contains("connection failed") => {
                Some("Cannot connect to API server. Check endpoint URL, network, or DNS settings")
            }
            OpenHubError::LlmApi { status: 401, .. } => {
                Some("Check if your API key is valid and has not expired")
            }
            OpenHubError::LlmApi { status: 429, .. } => {
                Some("Rate limit exceeded. Wait a moment and try again, or upgrade your API plan")
            }
            OpenHubError::LlmApi { status, .. } if *status == 500 || *status == 503 => {
                Some("API service is temporarily unavailable. Try again in a few moments")
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_upstream_status_github() {
        let err = OpenHubError::GitHub {
            status: 404,
            message: "Not Found".to_string(),
        };
        assert_eq!(err.upstream_status(), Some(404));
        assert_eq!(err.details(), "Not Found");
    }

    #[test]
    fn test_upstream_status_none_for_local_errors() {
        let err = OpenHubError::InvalidInput("bad".to_string());
        assert_eq!(err.upstream_status(), None);
        assert_eq!(err.details(), "Invalid input: bad");
    }

    #[test]
    fn test_missing_tree_sha_message() {
        assert_eq!(
            OpenHubError::MissingTreeSha.to_string(),
            "Failed to resolve repository tree SHA"
        );
    }

    // === suggestion() ===

    #[test]
    fn test_suggestion_github_client_id() {
        let err = OpenHubError::Config("github.client_id is not configured".to_string());
        assert!(err.suggestion().unwrap().contains("GITHUB_CLIENT_ID"));
    }

    #[test]
    fn test_suggestion_api_key() {
        let err = OpenHubError::Config("API key not found for provider 'openrouter'".to_string());
        assert!(err.suggestion().unwrap().contains("OPENROUTER_API_KEY"));
    }

    #[test]
    fn test_suggestion_github_statuses() {
        let cases = [
            (401, "expired"),
            (403, "scopes"),
            (404, "not found"),
        ];
        for (status, needle) in cases {
            let err = OpenHubError::GitHub {
                status,
                message: String::new(),
            };
            let suggestion = err.suggestion().unwrap();
            assert!(
                suggestion.contains(needle),
                "status {} -> {}",
                status,
                suggestion
            );
        }
    }

    #[test]
    fn test_suggestion_llm_api() {
        let err = OpenHubError::LlmApi {
            status: 429,
            message: "slow down".to_string(),
        };
        assert!(err.suggestion().unwrap().contains("Rate limit"));

        let err = OpenHubError::LlmApi {
            status: 503,
            message: String::new(),
        };
        assert!(err.suggestion().unwrap().contains("temporarily unavailable"));
    }

    #[test]
    fn test_suggestion_llm_connection() {
        let err = OpenHubError::Llm("OpenRouter API connection failed: dns".to_string());
        assert!(err.suggestion().unwrap().contains("endpoint URL"));
    }

    #[test]
    fn test_suggestion_returns_none_for_other_errors() {
        let cases = vec![
            OpenHubError::InvalidInput("bad input".to_string()),
            OpenHubError::Other("random error".to_string()),
            OpenHubError::MissingTreeSha,
            OpenHubError::Config("some random config error".to_string()),
            OpenHubError::Llm("some random llm error".to_string()),
            OpenHubError::GitHub {
                status: 422,
                message: "Reference already exists".to_string(),
            },
        ];

        for err in cases {
            assert!(
                err.suggestion().is_none(),
                "Expected None for {:?}, got {:?}",
                err,
                err.suggestion()
            );
        }
    }
}
