use serde::{Deserialize, Serialize};

/// Identifier linking an enqueued request to its eventual resolution.
pub type CorrelationKey = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Generate a fresh correlation key (UUID v4).
///
/// Keys never depend on the request text, so two identical concurrent
/// requests get separate slots.
pub fn new_correlation_key() -> CorrelationKey {
    uuid::Uuid::new_v4().to_string()
}

/// A unit of work waiting to be delivered to a worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    pub key: CorrelationKey,
    pub text: String,
}

impl WorkItem {
    /// Create a work item under a freshly generated key.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            key: new_correlation_key(),
            text: text.into(),
        }
    }

    /// Create a work item under a caller-chosen key.
    pub fn with_key(key: impl Into<CorrelationKey>, text: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            text: text.into(),
        }
    }
}

/// Output reported by a worker for a successful extraction.
///
/// A JSON string is kept as raw text; anything else is structured output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResultPayload {
    Raw(String),
    Structured(serde_json::Value),
}

impl From<serde_json::Value> for ResultPayload {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(s) => ResultPayload::Raw(s),
            other => ResultPayload::Structured(other),
        }
    }
}

/// What a worker reported for a key. A key holds at most one of these.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Extraction succeeded.
    Processed(ResultPayload),
    /// Extraction failed with a diagnostic message.
    Failed(String),
}

impl Resolution {
    pub fn kind(&self) -> &'static str {
        match self {
            Resolution::Processed(_) => "processed",
            Resolution::Failed(_) => "failed",
        }
    }
}
