//! Health check handler

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;

#[derive(serde::Serialize)]
struct HealthCheckResponse {
    status: &'static str,
    storage: String,
    environment: String,
}

/// Liveness plus the active storage backend; no dependency is called.
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthCheckResponse {
            status: "healthy",
            storage: state.media.storage.backend_type().to_string(),
            environment: state.config.environment().to_string(),
        }),
    )
}
