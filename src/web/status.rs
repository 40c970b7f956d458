//! Health handler.

use axum::response::Json;
use serde::Serialize;
use tracing::trace;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    commit: &'static str,
    timestamp: String,
}

/// Health check endpoint
pub(super) async fn health() -> Json<HealthResponse> {
    trace!("health check requested");
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        commit: env!("GIT_COMMIT_HASH"),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
