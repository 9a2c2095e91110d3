//! Tests for `PendingWorkStore`.
//!
//! Exercise the store through its public operations only: FIFO delivery,
//! single-read resolutions, last-write-wins, notification, and atomic
//! dequeue under concurrent consumers.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use rand::distr::Alphanumeric;
use rand::Rng;
use relay_core::types::{Resolution, ResultPayload, WorkItem};
use relay_store::PendingWorkStore;

fn random_key() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(16)
        .map(char::from)
        .collect()
}

// ---------------------------------------------------------------------------
// Test: dequeue returns items in enqueue order, then None
// ---------------------------------------------------------------------------

#[tokio::test]
async fn dequeue_preserves_enqueue_order() {
    let store = PendingWorkStore::in_memory();

    for key in ["k1", "k2", "k3"] {
        store
            .enqueue(WorkItem::with_key(key, format!("text for {key}")))
            .await
            .unwrap();
    }

    assert_eq!(store.queue_len().await.unwrap(), 3);
    assert_eq!(store.dequeue().await.unwrap().unwrap().key, "k1");
    assert_eq!(store.dequeue().await.unwrap().unwrap().key, "k2");
    assert_eq!(store.dequeue().await.unwrap().unwrap().key, "k3");
    assert!(store.dequeue().await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Test: take returns the resolution once and removes it
// ---------------------------------------------------------------------------

#[tokio::test]
async fn take_consumes_resolution() {
    let store = PendingWorkStore::in_memory();
    let payload = ResultPayload::Structured(serde_json::json!({"named_entities": []}));

    store
        .resolve("abc".into(), Resolution::Processed(payload.clone()))
        .await
        .unwrap();

    assert_eq!(
        store.take("abc").await.unwrap(),
        Some(Resolution::Processed(payload))
    );
    assert!(store.take("abc").await.unwrap().is_none());
    assert_eq!(store.pending_resolutions().await.unwrap(), 0);
}

// ---------------------------------------------------------------------------
// Test: take on an unknown key is None
// ---------------------------------------------------------------------------

#[tokio::test]
async fn take_unknown_key_is_none() {
    let store = PendingWorkStore::in_memory();
    assert!(store.take("missing").await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Test: result then error for the same key -- only the error is observable
// ---------------------------------------------------------------------------

#[tokio::test]
async fn later_error_replaces_earlier_result() {
    let store = PendingWorkStore::in_memory();

    store
        .resolve("key".into(), Resolution::Processed(ResultPayload::Raw("A".into())))
        .await
        .unwrap();
    store
        .resolve("key".into(), Resolution::Failed("err".into()))
        .await
        .unwrap();

    assert_eq!(
        store.take("key").await.unwrap(),
        Some(Resolution::Failed("err".into()))
    );
    assert!(store.take("key").await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Test: error then result for the same key -- only the result is observable
// ---------------------------------------------------------------------------

#[tokio::test]
async fn later_result_replaces_earlier_error() {
    let store = PendingWorkStore::in_memory();

    store
        .resolve("key".into(), Resolution::Failed("err".into()))
        .await
        .unwrap();
    store
        .resolve("key".into(), Resolution::Processed(ResultPayload::Raw("A".into())))
        .await
        .unwrap();

    assert_eq!(
        store.take("key").await.unwrap(),
        Some(Resolution::Processed(ResultPayload::Raw("A".into())))
    );
}

// ---------------------------------------------------------------------------
// Test: resolve wakes an enabled waiter
// ---------------------------------------------------------------------------

#[tokio::test]
async fn resolve_notifies_waiters() {
    let store = Arc::new(PendingWorkStore::in_memory());

    let notified = store.notified();
    tokio::pin!(notified);
    notified.as_mut().enable();

    let resolver = Arc::clone(&store);
    tokio::spawn(async move {
        resolver
            .resolve("abc".into(), Resolution::Failed("boom".into()))
            .await
            .unwrap();
    });

    tokio::time::timeout(Duration::from_secs(5), notified)
        .await
        .expect("waiter should be woken by resolve");
    assert!(store.take("abc").await.unwrap().is_some());
}

// ---------------------------------------------------------------------------
// Test: 50 keys, 4 concurrent dequeuers -- each key delivered exactly once
// ---------------------------------------------------------------------------

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_dequeuers_deliver_each_key_once() {
    let store = Arc::new(PendingWorkStore::in_memory());
    let keys: Vec<String> = (0..50).map(|_| random_key()).collect();

    let producers: Vec<_> = keys
        .iter()
        .cloned()
        .map(|key| {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                store.enqueue(WorkItem::with_key(key, "text")).await.unwrap();
            })
        })
        .collect();
    for producer in futures::future::join_all(producers).await {
        producer.unwrap();
    }

    let consumers: Vec<_> = (0..4)
        .map(|_| {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                let mut taken = Vec::new();
                while let Some(item) = store.dequeue().await.unwrap() {
                    taken.push(item.key);
                    tokio::task::yield_now().await;
                }
                taken
            })
        })
        .collect();

    let mut delivered = Vec::new();
    for consumer in futures::future::join_all(consumers).await {
        delivered.extend(consumer.unwrap());
    }

    assert_eq!(delivered.len(), keys.len(), "no losses and no duplicates");
    let unique: HashSet<_> = delivered.iter().cloned().collect();
    assert_eq!(unique.len(), delivered.len(), "no key delivered twice");
    assert_eq!(unique, keys.into_iter().collect::<HashSet<_>>());
    assert_eq!(store.queue_len().await.unwrap(), 0);
}

// ---------------------------------------------------------------------------
// Test: purge removes stale resolutions only
// ---------------------------------------------------------------------------

#[tokio::test]
async fn purge_removes_resolutions_older_than_cutoff() {
    let store = PendingWorkStore::in_memory();
    store
        .resolve("orphan".into(), Resolution::Failed("late".into()))
        .await
        .unwrap();

    let purged = store
        .purge_resolved_before(chrono::Utc::now() - chrono::Duration::minutes(5))
        .await
        .unwrap();
    assert_eq!(purged, 0);

    let purged = store
        .purge_resolved_before(chrono::Utc::now() + chrono::Duration::seconds(1))
        .await
        .unwrap();
    assert_eq!(purged, 1);
    assert!(store.take("orphan").await.unwrap().is_none());
}
