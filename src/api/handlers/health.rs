//! Health check endpoint

use axum::{Json, extract::State};
use serde::Serialize;

use crate::api::routes::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub message: &'static str,
    pub timestamp: String,
    pub ai_status: String,
}

/// Handler for GET /test
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let ai_status = if state.summary.ai_enabled() {
        format!(
            "AI summaries active ({})",
            state.config.llm.default_provider
        )
    } else {
        "AI provider not configured, using heuristic summaries".to_string()
    };

    Json(HealthResponse {
        message: "Backend is working!",
        timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        ai_status,
    })
}
