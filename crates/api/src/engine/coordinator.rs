//! Correlation of one `/extract` request with its worker resolution.
//!
//! Each request moves `SUBMITTED -> WAITING -> {DELIVERED | ERRORED | TIMED_OUT}`.
//! The coordinator enqueues the work under a fresh correlation key, then
//! waits for a resolution, waking on every store notification and at
//! least once per poll interval, until the timeout budget runs out.

use std::sync::Arc;
use std::time::Duration;

use relay_core::types::{CorrelationKey, Resolution, ResultPayload, WorkItem};
use relay_store::{PendingWorkStore, StoreResult};
use tokio::time::Instant;

/// Terminal state of one request.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionOutcome {
    /// A worker reported output for the key.
    Delivered(ResultPayload),
    /// A worker reported a failure for the key.
    Errored(String),
    /// Nothing arrived within the wait budget.
    TimedOut,
}

pub struct RequestCoordinator {
    store: Arc<PendingWorkStore>,
    timeout: Duration,
    poll_interval: Duration,
}

impl RequestCoordinator {
    pub fn new(store: Arc<PendingWorkStore>, timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            store,
            timeout,
            poll_interval,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Enqueue `text` under a new correlation key and return the key.
    pub async fn submit(&self, text: String) -> StoreResult<CorrelationKey> {
        let item = WorkItem::new(text);
        let key = item.key.clone();
        self.store.enqueue(item).await?;
        tracing::info!(key = %key, "Extraction request submitted");
        Ok(key)
    }

    /// Wait for the resolution of `key`, taking it from the store.
    ///
    /// Returns exactly one outcome and never waits past the timeout. On
    /// timeout the work item is left in the queue; a late resolution stays
    /// in the store until the orphan sweeper purges it.
    ///
    /// Dropping the returned future abandons the wait without touching the
    /// store.
    pub async fn await_resolution(&self, key: &str) -> StoreResult<ExtractionOutcome> {
        let deadline = Instant::now() + self.timeout;

        loop {
            let notified = self.store.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if let Some(resolution) = self.store.take(key).await? {
                return Ok(match resolution {
                    Resolution::Failed(message) => {
                        tracing::warn!(key = %key, error = %message, "Extraction errored");
                        ExtractionOutcome::Errored(message)
                    }
                    Resolution::Processed(payload) => {
                        tracing::info!(key = %key, "Extraction delivered");
                        ExtractionOutcome::Delivered(payload)
                    }
                });
            }

            let now = Instant::now();
            if now >= deadline {
                tracing::warn!(
                    key = %key,
                    timeout_secs = self.timeout.as_secs(),
                    "Extraction timed out",
                );
                return Ok(ExtractionOutcome::TimedOut);
            }

            let wait = self.poll_interval.min(deadline - now);
            tokio::select! {
                _ = &mut notified => {}
                _ = tokio::time::sleep(wait) => {}
            }
        }
    }

    /// Submit `text` and wait for its outcome.
    pub async fn run(&self, text: String) -> StoreResult<ExtractionOutcome> {
        let key = self.submit(text).await?;
        self.await_resolution(&key).await
    }
}
