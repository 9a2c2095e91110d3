//! Handlers for worker result/error submissions.
//!
//! Workers call these after running an extraction. Submissions are
//! validated before they reach the store; rejected ones are logged.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use relay_core::messages::{ErrorMessage, ProcessedMessage, WorkerSubmission};
use relay_core::types::CorrelationKey;
use relay_store::PendingWorkStore;
use serde::Serialize;

use crate::error::AppResult;
use crate::state::AppState;

/// Acknowledgement body for accepted submissions.
#[derive(Debug, Serialize)]
pub struct AckResponse {
    pub message: &'static str,
}

/// Validate a submission and record it as the resolution of its key.
///
/// Shared by the HTTP endpoints and the worker WebSocket.
pub async fn store_submission(
    store: &PendingWorkStore,
    submission: WorkerSubmission,
) -> AppResult<CorrelationKey> {
    if let Err(e) = submission.validate() {
        tracing::warn!(key = %submission.key(), error = %e, "Invalid worker submission");
        return Err(e.into());
    }

    let (key, resolution) = submission.into_resolution();
    store.resolve(key.clone(), resolution).await?;
    Ok(key)
}

// ---------------------------------------------------------------------------
// POST /processed_message
// ---------------------------------------------------------------------------

/// Record a successful extraction reported by a worker.
pub async fn processed_message(
    State(state): State<AppState>,
    payload: Result<Json<ProcessedMessage>, JsonRejection>,
) -> AppResult<Json<AckResponse>> {
    let Json(input) = payload?;
    let key = store_submission(&state.store, input.into()).await?;
    tracing::info!(key = %key, "Processed message stored");

    Ok(Json(AckResponse {
        message: "Processed data stored successfully.",
    }))
}

// ---------------------------------------------------------------------------
// POST /error_message
// ---------------------------------------------------------------------------

/// Record a failed extraction reported by a worker.
pub async fn error_message(
    State(state): State<AppState>,
    payload: Result<Json<ErrorMessage>, JsonRejection>,
) -> AppResult<Json<AckResponse>> {
    let Json(input) = payload?;
    let key = store_submission(&state.store, input.into()).await?;
    tracing::info!(key = %key, "Error message stored");

    Ok(Json(AckResponse {
        message: "Error stored.",
    }))
}
