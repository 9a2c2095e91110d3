//! Delivery of queued work to one attached worker.
//!
//! A [`WorkerChannel`] pairs a connection's outbound sender with the shared
//! [`PendingWorkStore`]. Its delivery loop dequeues at most one item per
//! tick and pushes it as a [`WorkFrame`]. An item that fails to send after
//! being dequeued is not re-queued; the loss is logged.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::Message;
use relay_core::messages::WorkFrame;
use relay_core::types::CorrelationKey;
use relay_store::{PendingWorkStore, StoreError};
use tokio_util::sync::CancellationToken;

use crate::ws::manager::{WorkerRegistry, WsSender};

/// Why a delivery attempt did not hand an item to the worker.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    /// The worker's writer task is gone; the connection is dead.
    #[error("worker channel closed")]
    Closed,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("failed to encode work frame: {0}")]
    Encode(#[from] serde_json::Error),
}

pub struct WorkerChannel {
    conn_id: String,
    outbound: WsSender,
    store: Arc<PendingWorkStore>,
}

impl WorkerChannel {
    pub fn new(conn_id: String, outbound: WsSender, store: Arc<PendingWorkStore>) -> Self {
        Self {
            conn_id,
            outbound,
            store,
        }
    }

    /// Deliver the oldest queued item, if any.
    ///
    /// Nothing is dequeued once the connection is closed, so a dead worker
    /// never claims further work.
    pub async fn deliver_once(&self) -> Result<Option<CorrelationKey>, DeliveryError> {
        if self.outbound.is_closed() {
            return Err(DeliveryError::Closed);
        }

        let Some(item) = self.store.dequeue().await? else {
            return Ok(None);
        };

        let key = item.key.clone();
        let frame = WorkFrame::from(item);
        let json = serde_json::to_string(&frame)?;

        if self.outbound.send(Message::Text(json.into())).is_err() {
            tracing::warn!(
                conn_id = %self.conn_id,
                key = %key,
                "Work item lost: worker channel closed during delivery",
            );
            return Err(DeliveryError::Closed);
        }

        tracing::debug!(conn_id = %self.conn_id, key = %key, "Work item delivered");
        Ok(Some(key))
    }

    /// Deliver queued work every `interval` until the connection closes or
    /// `cancel` fires, then drop this connection from the registry.
    pub async fn run_delivery(
        self,
        registry: Arc<WorkerRegistry>,
        interval: Duration,
        cancel: CancellationToken,
    ) {
        let mut ticker = tokio::time::interval(interval);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => match self.deliver_once().await {
                    Ok(_) => {}
                    Err(DeliveryError::Closed) => {
                        tracing::info!(conn_id = %self.conn_id, "Worker channel closed, stopping delivery");
                        break;
                    }
                    Err(e) => {
                        tracing::error!(conn_id = %self.conn_id, error = %e, "Delivery failed");
                    }
                },
            }
        }

        registry.remove(&self.conn_id).await;
    }
}
