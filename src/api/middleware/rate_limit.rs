use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::api::error::ApiError;
use crate::learn::RateLimiter;

/// Rejects clients over the learn rate limit with 429.
///
/// Clients are keyed by peer address; requests without connection info
/// share the `unknown` bucket.
pub async fn limit_requests(
    State(limiter): State<RateLimiter>,
    request: Request,
    next: Next,
) -> Response {
    let client = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    if !limiter.check(&client) {
        tracing::warn!("Rate limit exceeded for {}", client);
        return ApiError::TooManyRequests.into_response();
    }

    next.run(request).await
}
