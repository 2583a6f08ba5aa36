//! GitHub OAuth endpoints

use axum::{
    Json,
    extract::{Query, State},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::api::error::{ApiError, ApiResult};
use crate::api::routes::AppState;
use crate::error::OpenHubError;

/// Name of the session cookie holding the GitHub access token.
pub const TOKEN_COOKIE: &str = "github_token";

const TOKEN_MAX_AGE_DAYS: i64 = 7;

/// Token from the session cookie, if present and non-empty.
pub fn token_from(jar: &CookieJar) -> Option<String> {
    jar.get(TOKEN_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

/// Token from the session cookie, or 401.
pub fn require_token(jar: &CookieJar) -> ApiResult<String> {
    token_from(jar).ok_or_else(|| {
        ApiError::Unauthorized("Not authenticated: missing token cookie".to_string())
    })
}

fn client_id(state: &AppState) -> crate::error::Result<&str> {
    state
        .config
        .github
        .client_id
        .as_deref()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| OpenHubError::Config("github.client_id is not set".to_string()))
}

/// GET /auth/github
pub async fn github_login(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let client_id = client_id(&state)
        .map_err(|e| ApiError::upstream("GitHub OAuth is not configured", e))?;
    let redirect_uri = state.config.server.oauth_redirect_uri();
    let url = state.github.authorize_url(client_id, &redirect_uri);
    Ok(Json(json!({ "url": url })))
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
}

/// GET /auth/github/callback
pub async fn github_callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<CallbackQuery>,
) -> ApiResult<(CookieJar, Json<Value>)> {
    tracing::info!(
        "GitHub callback received (code present: {})",
        query.code.is_some()
    );
    let code = query
        .code
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ApiError::AuthFailed(OpenHubError::InvalidInput("Missing OAuth code".into())))?;

    let client_id = client_id(&state).map_err(ApiError::AuthFailed)?;
    let secret = state
        .config
        .github
        .client_secret
        .clone()
        .unwrap_or_default();
    let redirect_uri = state.config.server.oauth_redirect_uri();

    let token = state
        .github
        .exchange_code(client_id, &secret, &code, &redirect_uri)
        .await
        .map_err(ApiError::AuthFailed)?;

    let cookie = Cookie::build((TOKEN_COOKIE, token.clone()))
        .path("/")
        .http_only(true)
        .secure(state.config.server.production)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::days(TOKEN_MAX_AGE_DAYS));

    let user = state
        .github
        .user(&token)
        .await
        .map_err(ApiError::AuthFailed)?;

    Ok((
        jar.add(cookie),
        Json(json!({
            "success": true,
            "user": user,
            "message": "Authentication successful",
        })),
    ))
}
