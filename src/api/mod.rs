//! HTTP API
//!
//! - [`routes`] - the router and shared [`AppState`]
//! - [`handlers`] - `/auth`, `/api/github`, `/api/learn` and `/test`
//! - [`middleware`] - CORS, request tracing, rate limiting
//! - [`error`] - `{error, details}` responses
//! - [`server`] - listener and graceful shutdown

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;

pub use error::{ApiError, ApiResult};
pub use routes::{AppState, create_router};
pub use server::serve;
