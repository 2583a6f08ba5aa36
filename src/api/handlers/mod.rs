//! Request handlers, grouped by route prefix.

pub mod auth;
pub mod github;
pub mod health;
pub mod learn;

use axum::{Json, extract::Query};
use axum_extra::extract::WithRejection;

use super::error::ApiError;

/// JSON body whose rejection is answered with the JSON error body.
pub type ApiJson<T> = WithRejection<Json<T>, ApiError>;

/// Query string whose rejection is answered with the JSON error body.
pub type ApiQuery<T> = WithRejection<Query<T>, ApiError>;
