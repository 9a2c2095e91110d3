//! Periodic cleanup of resolutions nobody is waiting for.
//!
//! A worker that answers after its request timed out leaves a resolution
//! that no coordinator will take. This task purges such entries once they
//! are older than the configured TTL.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use relay_store::PendingWorkStore;
use tokio_util::sync::CancellationToken;

/// Run the orphan sweep loop until `cancel` is triggered.
pub async fn run(
    store: Arc<PendingWorkStore>,
    ttl: Duration,
    interval: Duration,
    cancel: CancellationToken,
) {
    tracing::info!(
        ttl_secs = ttl.as_secs(),
        interval_secs = interval.as_secs(),
        "Orphan sweep job started"
    );

    let ttl = chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::days(365));
    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Orphan sweep job stopping");
                break;
            }
            _ = ticker.tick() => {
                let cutoff = Utc::now() - ttl;
                match store.purge_resolved_before(cutoff).await {
                    Ok(purged) if purged > 0 => {
                        tracing::info!(purged, "Orphan sweep: purged untaken resolutions");
                    }
                    Ok(_) => {
                        tracing::debug!("Orphan sweep: nothing to purge");
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Orphan sweep: cleanup failed");
                    }
                }
            }
        }
    }
}
