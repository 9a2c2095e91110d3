//! Handler for the `/extract` endpoint.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use relay_core::entities::{parse_named_entities, NamedEntity};
use relay_core::error::CoreError;
use serde::{Deserialize, Serialize};

use crate::engine::ExtractionOutcome;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    pub input_text: String,
}

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub named_entities: Vec<NamedEntity>,
}

// ---------------------------------------------------------------------------
// POST /extract
// ---------------------------------------------------------------------------

/// Queue the text for a worker and block until its entities come back.
///
/// Responds 200 with the grounded entities, 400 for a missing or malformed
/// body, 500 when the worker reported a failure or unusable output, and 504
/// when nothing arrived in time.
pub async fn extract(
    State(state): State<AppState>,
    payload: Result<Json<ExtractRequest>, JsonRejection>,
) -> AppResult<Json<ExtractResponse>> {
    let Json(input) = payload?;
    if input.input_text.trim().is_empty() {
        return Err(AppError::BadRequest("input_text must not be empty".into()));
    }

    match state.coordinator.run(input.input_text).await? {
        ExtractionOutcome::Delivered(payload) => {
            let named_entities = parse_named_entities(&payload)?;
            tracing::debug!(count = named_entities.len(), "Returning named entities");
            Ok(Json(ExtractResponse { named_entities }))
        }
        ExtractionOutcome::Errored(message) => Err(CoreError::ExtractionFailed(message).into()),
        ExtractionOutcome::TimedOut => Err(CoreError::Timeout {
            secs: state.coordinator.timeout().as_secs(),
        }
        .into()),
    }
}
