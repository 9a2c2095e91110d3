pub mod health;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{extraction, submissions};
use crate::state::AppState;
use crate::ws;

/// Build the relay route tree.
///
/// ```text
/// POST /extract              extract entities (blocks until resolved)
/// POST /processed_message    worker reports output
/// POST /error_message        worker reports failure
/// GET  /ws/new_message       worker WebSocket
/// ```
pub fn relay_routes() -> Router<AppState> {
    Router::new()
        .route("/extract", post(extraction::extract))
        .route("/processed_message", post(submissions::processed_message))
        .route("/error_message", post(submissions::error_message))
        .route("/ws/new_message", get(ws::ws_handler))
}
