use std::sync::Arc;

use chrono::Utc;
use relay_core::types::{CorrelationKey, Resolution, Timestamp, WorkItem};
use tokio::sync::futures::Notified;
use tokio::sync::Notify;

use crate::backend::{PendingBackend, StoreResult};
use crate::memory::InMemoryBackend;

/// Queue of undelivered work plus worker resolutions awaiting pickup.
///
/// Producers [`enqueue`](Self::enqueue), worker channels
/// [`dequeue`](Self::dequeue), workers [`resolve`](Self::resolve), and the
/// waiting request [`take`](Self::take)s its resolution exactly once.
/// Designed to be wrapped in `Arc` and shared across the application.
pub struct PendingWorkStore {
    backend: Arc<dyn PendingBackend>,
    resolved: Notify,
}

impl PendingWorkStore {
    pub fn new(backend: Arc<dyn PendingBackend>) -> Self {
        Self {
            backend,
            resolved: Notify::new(),
        }
    }

    /// Store backed by process memory.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryBackend::new()))
    }

    /// Append a work item for delivery to a worker.
    pub async fn enqueue(&self, item: WorkItem) -> StoreResult<()> {
        tracing::debug!(key = %item.key, "Work item enqueued");
        self.backend.push_back(item).await
    }

    /// Pop the oldest undelivered item, if any. Never blocks on an empty queue.
    pub async fn dequeue(&self) -> StoreResult<Option<WorkItem>> {
        self.backend.pop_front().await
    }

    /// Record a worker's resolution for `key` and wake waiting requests.
    ///
    /// Replaces any earlier resolution for the same key, whichever kind it
    /// was (last write wins).
    pub async fn resolve(&self, key: CorrelationKey, resolution: Resolution) -> StoreResult<()> {
        tracing::debug!(key = %key, kind = resolution.kind(), "Resolution stored");
        self.backend.put(key, resolution, Utc::now()).await?;
        self.resolved.notify_waiters();
        Ok(())
    }

    /// Remove and return the resolution for `key`.
    pub async fn take(&self, key: &str) -> StoreResult<Option<Resolution>> {
        self.backend.remove(key).await
    }

    /// Future completing on the next [`resolve`](Self::resolve).
    ///
    /// Call `enable()` on the pinned future before checking the store so a
    /// resolve landing in between is not missed.
    pub fn notified(&self) -> Notified<'_> {
        self.resolved.notified()
    }

    pub async fn queue_len(&self) -> StoreResult<usize> {
        self.backend.queue_len().await
    }

    /// Number of resolutions not yet taken.
    pub async fn pending_resolutions(&self) -> StoreResult<usize> {
        self.backend.resolved_len().await
    }

    /// Drop resolutions nobody took before `cutoff`.
    pub async fn purge_resolved_before(&self, cutoff: Timestamp) -> StoreResult<usize> {
        self.backend.purge_before(cutoff).await
    }
}

impl Default for PendingWorkStore {
    fn default() -> Self {
        Self::in_memory()
    }
}
