//! Posting worker submissions back to the relay HTTP API.
//!
//! Results go to `POST /processed_message`, failures to
//! `POST /error_message`. Each report is a single attempt.

use std::time::Duration;

use relay_core::messages::WorkerSubmission;

/// HTTP request timeout for a single report.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The relay answered with a non-2xx status code.
    #[error("Relay returned HTTP {0}")]
    HttpStatus(u16),
}

// ---------------------------------------------------------------------------
// Reporter
// ---------------------------------------------------------------------------

pub struct Reporter {
    client: reqwest::Client,
    processed_url: String,
    error_url: String,
}

impl Reporter {
    /// Build a reporter for the relay at `api_url`, e.g. `http://host:8000`.
    pub fn new(api_url: &str) -> Result<Self, ReportError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        let base = api_url.trim_end_matches('/');

        Ok(Self {
            client,
            processed_url: format!("{base}/processed_message"),
            error_url: format!("{base}/error_message"),
        })
    }

    /// Endpoint a submission of this kind is posted to.
    pub fn endpoint_for(&self, submission: &WorkerSubmission) -> &str {
        match submission {
            WorkerSubmission::Result(_) => &self.processed_url,
            WorkerSubmission::Error(_) => &self.error_url,
        }
    }

    /// Post one submission.
    pub async fn report(&self, submission: &WorkerSubmission) -> Result<(), ReportError> {
        let url = self.endpoint_for(submission);
        let request = match submission {
            WorkerSubmission::Result(message) => self.client.post(url).json(message),
            WorkerSubmission::Error(message) => self.client.post(url).json(message),
        };

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(ReportError::HttpStatus(response.status().as_u16()));
        }

        tracing::info!(key = %submission.key(), url, "Submission reported");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
