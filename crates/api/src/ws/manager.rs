use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::ws::Message;
use tokio::sync::{mpsc, RwLock};

/// Channel sender half for pushing messages to a worker connection.
pub type WsSender = mpsc::UnboundedSender<Message>;

/// Bookkeeping for a single attached worker.
pub struct WorkerConnection {
    /// Channel sender for outbound messages to this connection.
    pub sender: WsSender,
}

/// Registry of currently attached worker connections.
///
/// Membership is added on connect and removed on disconnect. The registry
/// never owns work items; it only knows how to reach each worker.
/// Thread-safe via interior `RwLock`; designed to be wrapped in `Arc` and
/// shared across the application.
pub struct WorkerRegistry {
    connections: RwLock<HashMap<String, WorkerConnection>>,
}

impl WorkerRegistry {
    /// Create a new, empty registry.
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
        }
    }

    /// Register a new connection.
    ///
    /// Returns the sender used to push messages to the worker and the
    /// receiver the connection's writer task forwards to the socket. A
    /// duplicate `conn_id` replaces the previous registration.
    pub async fn add(&self, conn_id: String) -> (WsSender, mpsc::UnboundedReceiver<Message>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let conn = WorkerConnection { sender: tx.clone() };
        self.connections.write().await.insert(conn_id, conn);
        (tx, rx)
    }

    /// Remove a connection by its ID, returning its bookkeeping if present.
    pub async fn remove(&self, conn_id: &str) -> Option<WorkerConnection> {
        self.connections.write().await.remove(conn_id)
    }

    pub async fn contains(&self, conn_id: &str) -> bool {
        self.connections.read().await.contains_key(conn_id)
    }

    /// Return the current number of attached workers.
    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Send a Close frame to every connection, then clear the registry.
    ///
    /// Used during graceful shutdown to notify workers before the server
    /// stops accepting new connections.
    pub async fn shutdown_all(&self) {
        let mut conns = self.connections.write().await;
        let count = conns.len();
        for conn in conns.values() {
            let _ = conn.sender.send(Message::Close(None));
        }
        conns.clear();
        tracing::info!(count, "Closed all worker connections");
    }

    /// Send a Ping frame to every attached worker.
    ///
    /// Used by the heartbeat task to keep connections alive and detect
    /// stale ones.
    pub async fn ping_all(&self) {
        let conns = self.connections.read().await;
        for conn in conns.values() {
            let _ = conn.sender.send(Message::Ping(Bytes::new()));
        }
    }
}

impl Default for WorkerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
