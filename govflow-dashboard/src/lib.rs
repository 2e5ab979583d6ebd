//! # Govflow Dashboard
//!
//! Read-only HTTP view over a govflow engine.
//!
//! ## Endpoints
//!
//! - `GET /health` - Fixed `{"status": "ok"}`
//! - `GET /metrics` - Metrics snapshot
//! - `GET /runs` - Run history from the runs accessor
//!
//! Any other path returns 404 with `{"error": "not found", "path": ...}`.
//!
//! ## Configuration (Environment Variables)
//!
//! - `GOVFLOW_DASHBOARD_HOST`: IP address to bind (default: `127.0.0.1`)
//! - `GOVFLOW_DASHBOARD_PORT`: port to bind (default: 0, ephemeral)

#![warn(missing_docs, rust_2018_idioms)]

mod config;
mod error;
mod handlers;
mod server;

pub use config::{DashboardConfig, HOST_ENV, PORT_ENV};
pub use error::DashboardError;
pub use handlers::{ErrorResponse, HealthResponse};
pub use server::DashboardServer;

use axum::{routing::get, Router};
use govflow::core::RunResult;
use govflow::metrics::MetricsCollector;
use govflow::pipeline::GovernanceEngine;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Supplies the runs served at `GET /runs`.
pub type RunsAccessor = Arc<dyn Fn() -> Vec<RunResult> + Send + Sync>;

/// Shared state for the dashboard handlers.
#[derive(Clone)]
pub struct DashboardState {
    /// Collector whose snapshot is served at `GET /metrics`.
    pub metrics: Arc<MetricsCollector>,
    /// Accessor for the run history.
    pub runs: RunsAccessor,
}

impl std::fmt::Debug for DashboardState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardState")
            .field("metrics", &self.metrics)
            .finish_non_exhaustive()
    }
}

impl DashboardState {
    /// Creates state from a collector and a runs accessor.
    pub fn new<F>(metrics: Arc<MetricsCollector>, runs: F) -> Self
    where
        F: Fn() -> Vec<RunResult> + Send + Sync + 'static,
    {
        Self {
            metrics,
            runs: Arc::new(runs),
        }
    }

    /// Serves an engine's metrics and history.
    #[must_use]
    pub fn from_engine(engine: Arc<GovernanceEngine>) -> Self {
        let metrics = Arc::clone(engine.metrics());
        Self::new(metrics, move || engine.history())
    }
}

/// Create the axum router with all endpoints and request tracing.
pub fn create_router(state: DashboardState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/metrics", get(handlers::metrics_handler))
        .route("/runs", get(handlers::runs_handler))
        .fallback(handlers::not_found_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
