use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use relay_core::types::{CorrelationKey, Resolution, Timestamp, WorkItem};
use tokio::sync::Mutex;

use crate::backend::{PendingBackend, StoreResult};

struct StoredResolution {
    resolution: Resolution,
    resolved_at: Timestamp,
}

#[derive(Default)]
struct Inner {
    queue: VecDeque<WorkItem>,
    resolved: HashMap<CorrelationKey, StoredResolution>,
}

/// Process-local backend: one lock over the queue and the resolution map.
#[derive(Default)]
pub struct InMemoryBackend {
    inner: Mutex<Inner>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PendingBackend for InMemoryBackend {
    async fn push_back(&self, item: WorkItem) -> StoreResult<()> {
        self.inner.lock().await.queue.push_back(item);
        Ok(())
    }

    async fn pop_front(&self) -> StoreResult<Option<WorkItem>> {
        Ok(self.inner.lock().await.queue.pop_front())
    }

    async fn put(
        &self,
        key: CorrelationKey,
        resolution: Resolution,
        resolved_at: Timestamp,
    ) -> StoreResult<()> {
        self.inner.lock().await.resolved.insert(
            key,
            StoredResolution {
                resolution,
                resolved_at,
            },
        );
        Ok(())
    }

    async fn remove(&self, key: &str) -> StoreResult<Option<Resolution>> {
        Ok(self
            .inner
            .lock()
            .await
            .resolved
            .remove(key)
            .map(|stored| stored.resolution))
    }

    async fn queue_len(&self) -> StoreResult<usize> {
        Ok(self.inner.lock().await.queue.len())
    }

    async fn resolved_len(&self) -> StoreResult<usize> {
        Ok(self.inner.lock().await.resolved.len())
    }

    async fn purge_before(&self, cutoff: Timestamp) -> StoreResult<usize> {
        let mut inner = self.inner.lock().await;
        let before = inner.resolved.len();
        inner.resolved.retain(|_, stored| stored.resolved_at >= cutoff);
        Ok(before - inner.resolved.len())
    }
}
