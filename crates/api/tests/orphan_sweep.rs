//! Tests for the orphan sweep background task.

use std::sync::Arc;
use std::time::Duration;

use relay_api::background::orphan_sweep;
use relay_core::types::Resolution;
use relay_store::PendingWorkStore;
use tokio_util::sync::CancellationToken;

// ---------------------------------------------------------------------------
// Test: expired resolutions are purged, then the task stops on cancel
// ---------------------------------------------------------------------------

#[tokio::test]
async fn purges_expired_resolutions_until_cancelled() {
    let store = Arc::new(PendingWorkStore::in_memory());
    store
        .resolve("late".into(), Resolution::Failed("nobody waiting".into()))
        .await
        .unwrap();

    let cancel = CancellationToken::new();
    let task = tokio::spawn(orphan_sweep::run(
        Arc::clone(&store),
        Duration::ZERO,
        Duration::from_millis(10),
        cancel.clone(),
    ));

    let mut purged = false;
    for _ in 0..100 {
        if store.pending_resolutions().await.unwrap() == 0 {
            purged = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(purged, "expired resolution should be swept");

    cancel.cancel();
    tokio::time::timeout(Duration::from_secs(2), task)
        .await
        .expect("sweeper should stop on cancel")
        .unwrap();
}

// ---------------------------------------------------------------------------
// Test: fresh resolutions survive a sweep
// ---------------------------------------------------------------------------

#[tokio::test]
async fn keeps_resolutions_younger_than_ttl() {
    let store = Arc::new(PendingWorkStore::in_memory());
    store
        .resolve("fresh".into(), Resolution::Failed("still wanted".into()))
        .await
        .unwrap();

    let cancel = CancellationToken::new();
    let task = tokio::spawn(orphan_sweep::run(
        Arc::clone(&store),
        Duration::from_secs(600),
        Duration::from_millis(10),
        cancel.clone(),
    ));

    tokio::time::sleep(Duration::from_millis(50)).await;
    cancel.cancel();
    task.await.unwrap();

    assert_eq!(store.pending_resolutions().await.unwrap(), 1);
}
