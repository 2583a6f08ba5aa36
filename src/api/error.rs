//! HTTP error responses.
//!
//! Every failure is answered with `{error, details?}`. Upstream GitHub and
//! LLM failures keep the upstream status code; everything else maps to a
//! fixed status.

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::error::OpenHubError;

/// JSON body of an error response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Too many requests, please try again later.")]
    TooManyRequests,

    /// A failed operation reported under an endpoint label such as
    /// `Failed to fetch repository tree`.
    #[error("{label}: {source}")]
    Upstream {
        label: String,
        #[source]
        source: OpenHubError,
    },

    /// Fixed message and status, for labels that replace the upstream text.
    #[error("{error}")]
    Custom {
        status: StatusCode,
        error: String,
        details: Option<String>,
    },

    /// OAuth callback failure; the body carries `success: false`.
    #[error("Authentication failed: {0}")]
    AuthFailed(#[source] OpenHubError),
}

impl ApiError {
    pub fn upstream(label: impl Into<String>, source: OpenHubError) -> Self {
        ApiError::Upstream {
            label: label.into(),
            source,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Upstream { source, .. } => upstream_status(source),
            ApiError::Custom { status, .. } => *status,
            ApiError::AuthFailed(OpenHubError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            ApiError::AuthFailed(source) => upstream_status(source),
        }
    }

    pub fn body(&self) -> ErrorBody {
        match self {
            ApiError::Upstream {
                source: OpenHubError::MissingTreeSha,
                ..
            } => ErrorBody {
                success: None,
                error: OpenHubError::MissingTreeSha.to_string(),
                details: None,
            },
            ApiError::Upstream { label, source } => ErrorBody {
                success: None,
                error: label.clone(),
                details: Some(source.details()),
            },
            ApiError::Custom { error, details, .. } => ErrorBody {
                success: None,
                error: error.clone(),
                details: details.clone(),
            },
            ApiError::AuthFailed(source) => ErrorBody {
                success: Some(false),
                error: "Authentication failed".to_string(),
                details: Some(source.details()),
            },
            other => ErrorBody {
                success: None,
                error: other.to_string(),
                details: None,
            },
        }
    }
}

/// Upstream status when it is a valid HTTP error code, else 500.
fn upstream_status(source: &OpenHubError) -> StatusCode {
    source
        .upstream_status()
        .and_then(|code| StatusCode::from_u16(code).ok())
        .filter(|status| status.is_client_error() || status.is_server_error())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

impl From<OpenHubError> for ApiError {
    fn from(err: OpenHubError) -> Self {
        ApiError::upstream("Internal server error", err)
    }
}

/// Malformed request bodies get the JSON error body instead of axum's
/// plain-text rejection.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("Rejected request body: {}", rejection.body_text());
        ApiError::Custom {
            status: StatusCode::BAD_REQUEST,
            error: "Invalid request body".to_string(),
            details: Some(rejection.body_text()),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Custom {
            status: StatusCode::BAD_REQUEST,
            error: "Invalid query string".to_string(),
            details: Some(rejection.body_text()),
        }
    }
}

/// Attaches an endpoint label to a failed operation.
pub trait WithLabel<T> {
    fn labelled(self, label: &str) -> ApiResult<T>;
}

impl<T> WithLabel<T> for crate::error::Result<T> {
    fn labelled(self, label: &str) -> ApiResult<T> {
        self.map_err(|e| ApiError::upstream(label, e))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = self.body();

        if status.is_server_error() {
            tracing::error!("{}", self);
            if let Some(source) = std::error::Error::source(&self)
                && let Some(err) = source.downcast_ref::<OpenHubError>()
                && let Some(hint) = err.suggestion()
            {
                tracing::error!("Hint: {}", hint);
            }
        } else {
            tracing::debug!("{} {}", status.as_u16(), self);
        }

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn github(status: u16, message: &str) -> OpenHubError {
        OpenHubError::GitHub {
            status,
            message: message.to_string(),
        }
    }

    #[test]
    fn test_upstream_keeps_github_status() {
        let err = ApiError::upstream("Failed to fetch user", github(401, "Bad credentials"));
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            err.body(),
            ErrorBody {
                success: None,
                error: "Failed to fetch user".to_string(),
                details: Some("Bad credentials".to_string()),
            }
        );
    }

    #[test]
    fn test_upstream_without_status_is_500() {
        let err = ApiError::upstream(
            "Failed to fetch repository tree",
            OpenHubError::Other("boom".to_string()),
        );
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.body().details.as_deref(), Some("boom"));
    }

    #[test]
    fn test_missing_tree_sha_body() {
        let err = ApiError::upstream("Failed to fetch repository tree", OpenHubError::MissingTreeSha);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = serde_json::to_value(err.body()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"error": "Failed to resolve repository tree SHA"})
        );
    }

    #[test]
    fn test_auth_failed_body() {
        let err = ApiError::AuthFailed(OpenHubError::Other(
            "The code passed is incorrect or expired.".to_string(),
        ));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = serde_json::to_value(err.body()).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Authentication failed");
    }

    #[test]
    fn test_simple_variants() {
        let err = ApiError::BadRequest("path query param required".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            serde_json::to_value(err.body()).unwrap(),
            serde_json::json!({"error": "path query param required"})
        );

        assert_eq!(
            ApiError::TooManyRequests.body().error,
            "Too many requests, please try again later."
        );
        assert_eq!(
            ApiError::TooManyRequests.status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
    }

    #[test]
    fn test_labelled_result() {
        let result: crate::error::Result<()> = Err(github(404, "Not Found"));
        let err = result.labelled("Failed to fetch file content").unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }
}
