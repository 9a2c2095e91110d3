use std::sync::Arc;
use std::time::Duration;

use crate::ws::manager::WorkerRegistry;

/// Interval between heartbeat pings (in seconds).
const HEARTBEAT_INTERVAL_SECS: u64 = 30;

/// Spawn a background task that sends periodic Ping frames to all attached
/// workers.
///
/// The returned `JoinHandle` is aborted during shutdown.
pub fn start_heartbeat(workers: Arc<WorkerRegistry>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(HEARTBEAT_INTERVAL_SECS));

        loop {
            interval.tick().await;
            let count = workers.connection_count().await;
            tracing::debug!(count, "Worker heartbeat ping");
            workers.ping_all().await;
        }
    })
}
