//! Endpoint handlers.

use crate::DashboardState;
use axum::{
    extract::State,
    http::{StatusCode, Uri},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"`.
    pub status: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

/// Body returned for unknown paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message.
    pub error: String,
    /// Requested path.
    pub path: String,
}

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

/// Current metrics snapshot.
pub async fn metrics_handler(State(state): State<DashboardState>) -> impl IntoResponse {
    Json(state.metrics.snapshot())
}

/// Run history as reported by the runs accessor.
pub async fn runs_handler(State(state): State<DashboardState>) -> impl IntoResponse {
    let runs = (state.runs)();
    tracing::debug!(count = runs.len(), "Serving run history");
    Json(runs)
}

/// Fallback for unknown paths.
pub async fn not_found_handler(uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "not found".to_string(),
            path: uri.path().to_string(),
        }),
    )
}
