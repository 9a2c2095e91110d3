//! Turning one work frame into one worker submission.

use relay_core::extractor::ExternalExtractor;
use relay_core::messages::{ErrorMessage, ProcessedMessage, WorkFrame, WorkerSubmission};
use relay_core::types::ResultPayload;
use serde_json::Value;

/// Error reported when the extractor prints nothing or fails silently.
pub const EMPTY_OUTPUT_ERROR: &str = "Extraction output was empty or failed.";

/// Run the extractor on `frame` and build the report for its key.
///
/// Returns `None` for frames with no text; those are not reported.
pub async fn process_frame(
    extractor: &dyn ExternalExtractor,
    frame: &WorkFrame,
) -> Option<WorkerSubmission> {
    if frame.message.trim().is_empty() {
        tracing::warn!(key = %frame.key, "Received empty message");
        return None;
    }

    let output = extractor.invoke(&frame.message).await;

    if !output.success || output.raw_output.is_empty() {
        tracing::warn!(
            key = %frame.key,
            success = output.success,
            diagnostic = %output.diagnostic,
            "Extraction failed, reporting error",
        );
        return Some(
            ErrorMessage {
                key: frame.key.clone(),
                error: failure_message(output.success, output.diagnostic),
            }
            .into(),
        );
    }

    Some(
        ProcessedMessage {
            key: frame.key.clone(),
            output: to_payload(output.raw_output),
        }
        .into(),
    )
}

/// Error text for a failed run: the extractor's diagnostic when it gave one.
fn failure_message(success: bool, diagnostic: String) -> String {
    if success || diagnostic.trim().is_empty() {
        EMPTY_OUTPUT_ERROR.to_string()
    } else {
        diagnostic
    }
}

/// Parse stdout as JSON, keeping it as raw text when it is not.
fn to_payload(raw: String) -> ResultPayload {
    match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Null) | Err(_) => ResultPayload::Raw(raw),
        Ok(value) => ResultPayload::Structured(value),
    }
}
