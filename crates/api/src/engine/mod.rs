//! Request orchestration between HTTP callers and the pending work store.

pub mod coordinator;

pub use coordinator::{ExtractionOutcome, RequestCoordinator};
