//! WebSocket infrastructure for worker connections.
//!
//! Provides the worker registry, per-connection work delivery, heartbeat
//! pings, and the HTTP upgrade handler used by Axum routes.

pub mod channel;
mod handler;
mod heartbeat;
pub mod manager;

pub use channel::{DeliveryError, WorkerChannel};
pub use handler::ws_handler;
pub use heartbeat::start_heartbeat;
pub use manager::WorkerRegistry;
