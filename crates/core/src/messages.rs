//! Messages exchanged between the relay server and extraction workers.
//!
//! The server pushes [`WorkFrame`]s over the worker WebSocket. Workers
//! report back either over HTTP (`/processed_message`, `/error_message`)
//! with [`ProcessedMessage`] / [`ErrorMessage`] bodies, or over the same
//! socket with a tagged [`WorkerSubmission`] frame.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{CorrelationKey, Resolution, ResultPayload, WorkItem};

/// Upper bound on correlation key length accepted from workers.
pub const MAX_KEY_LEN: usize = 128;

/// Work pushed from the server to a worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkFrame {
    pub key: CorrelationKey,
    /// Text to run the extraction on.
    pub message: String,
}

impl From<WorkItem> for WorkFrame {
    fn from(item: WorkItem) -> Self {
        Self {
            key: item.key,
            message: item.text,
        }
    }
}

/// Successful extraction reported by a worker.
///
/// `output` is usually a list of extraction records, but any non-null JSON
/// value is accepted: an object, or a string holding the tool's YAML or
/// JSON text. Shape errors surface later, when `/extract` parses the
/// entities, as an extraction failure for the waiting caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedMessage {
    pub key: CorrelationKey,
    pub output: ResultPayload,
}

/// Failed extraction reported by a worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub key: CorrelationKey,
    pub error: String,
}

/// A worker report in either form, tagged by `type` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorkerSubmission {
    Result(ProcessedMessage),
    Error(ErrorMessage),
}

impl WorkerSubmission {
    pub fn key(&self) -> &str {
        match self {
            WorkerSubmission::Result(m) => &m.key,
            WorkerSubmission::Error(m) => &m.key,
        }
    }

    /// Reject submissions that must not reach the store.
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_key(self.key())?;
        if let WorkerSubmission::Result(m) = self {
            if m.output == ResultPayload::Structured(serde_json::Value::Null) {
                return Err(CoreError::Validation("output must not be null".into()));
            }
        }
        Ok(())
    }

    /// Split into the store's key and resolution.
    pub fn into_resolution(self) -> (CorrelationKey, Resolution) {
        match self {
            WorkerSubmission::Result(m) => (m.key, Resolution::Processed(m.output)),
            WorkerSubmission::Error(m) => (m.key, Resolution::Failed(m.error)),
        }
    }
}

impl From<ProcessedMessage> for WorkerSubmission {
    fn from(m: ProcessedMessage) -> Self {
        WorkerSubmission::Result(m)
    }
}

impl From<ErrorMessage> for WorkerSubmission {
    fn from(m: ErrorMessage) -> Self {
        WorkerSubmission::Error(m)
    }
}

/// Validate a correlation key supplied by a worker.
pub fn validate_key(key: &str) -> Result<(), CoreError> {
    if key.trim().is_empty() {
        return Err(CoreError::Validation("key must not be empty".into()));
    }
    if key.len() > MAX_KEY_LEN {
        return Err(CoreError::Validation(format!(
            "key must be at most {MAX_KEY_LEN} characters"
        )));
    }
    Ok(())
}
