use std::sync::Arc;

use relay_store::PendingWorkStore;

use crate::config::ServerConfig;
use crate::engine::RequestCoordinator;
use crate::ws::WorkerRegistry;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Queue of undelivered work and worker resolutions.
    pub store: Arc<PendingWorkStore>,
    /// Correlates `/extract` requests with worker resolutions.
    pub coordinator: Arc<RequestCoordinator>,
    /// Currently attached worker connections.
    pub workers: Arc<WorkerRegistry>,
}

impl AppState {
    /// Wire up state around an existing store.
    pub fn new(config: ServerConfig, store: Arc<PendingWorkStore>) -> Self {
        let coordinator = RequestCoordinator::new(
            Arc::clone(&store),
            config.extract_timeout(),
            config.poll_interval(),
        );

        Self {
            config: Arc::new(config),
            store,
            coordinator: Arc::new(coordinator),
            workers: Arc::new(WorkerRegistry::new()),
        }
    }
}
