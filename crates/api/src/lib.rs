//! Extraction relay server library.
//!
//! Exposes the core building blocks (config, state, error handling, routes,
//! request coordination, worker WebSocket infrastructure) so integration
//! tests and the binary entrypoint can both access them.

pub mod background;
pub mod config;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod router;
pub mod routes;
pub mod state;
pub mod ws;
