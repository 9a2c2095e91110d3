#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("No result within {secs}s")]
    Timeout { secs: u64 },
}
