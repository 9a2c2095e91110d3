//! Pending work storage shared by request handlers and worker channels.
//!
//! [`PendingWorkStore`] is the only shared mutable state of the relay: a
//! FIFO of undelivered [`WorkItem`](relay_core::types::WorkItem)s plus a
//! map of worker resolutions keyed by correlation key. Storage is
//! delegated to a [`PendingBackend`]; [`InMemoryBackend`] is the default.

pub mod backend;
pub mod memory;
pub mod pending;

pub use backend::{PendingBackend, StoreError, StoreResult};
pub use memory::InMemoryBackend;
pub use pending::PendingWorkStore;
