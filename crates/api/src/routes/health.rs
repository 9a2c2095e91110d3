use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Number of attached workers.
    pub workers: usize,
    /// Work items waiting for delivery.
    pub queued: Option<usize>,
    /// Resolutions not yet taken by a request.
    pub pending_resolutions: Option<usize>,
}

/// GET /health -- returns service and store health.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let workers = state.workers.connection_count().await;
    let queued = state.store.queue_len().await.ok();
    let pending_resolutions = state.store.pending_resolutions().await.ok();

    let status = if queued.is_some() && pending_resolutions.is_some() {
        "ok"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        workers,
        queued,
        pending_resolutions,
    })
}

/// Mount health check routes.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
