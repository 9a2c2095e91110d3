use async_trait::async_trait;
use relay_core::types::{CorrelationKey, Resolution, Timestamp, WorkItem};

/// Errors reported by a storage backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backend could not be reached or refused the operation.
    #[error("Store backend unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage operations behind [`PendingWorkStore`](crate::PendingWorkStore).
///
/// Every method must be atomic with respect to the others: two concurrent
/// `pop_front` calls never return the same item, and `put` replaces any
/// previous resolution for the key in one step.
#[async_trait]
pub trait PendingBackend: Send + Sync {
    /// Append an item to the tail of the queue.
    async fn push_back(&self, item: WorkItem) -> StoreResult<()>;

    /// Remove and return the oldest queued item.
    async fn pop_front(&self) -> StoreResult<Option<WorkItem>>;

    /// Store a resolution, replacing any existing one for the key.
    async fn put(
        &self,
        key: CorrelationKey,
        resolution: Resolution,
        resolved_at: Timestamp,
    ) -> StoreResult<()>;

    /// Remove and return the resolution for a key.
    async fn remove(&self, key: &str) -> StoreResult<Option<Resolution>>;

    async fn queue_len(&self) -> StoreResult<usize>;

    async fn resolved_len(&self) -> StoreResult<usize>;

    /// Drop resolutions stored before `cutoff`, returning how many went.
    async fn purge_before(&self, cutoff: Timestamp) -> StoreResult<usize>;
}
