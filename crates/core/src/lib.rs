//! Domain types shared by the relay server and the extraction worker.
//!
//! Holds the correlation model (work items, resolutions), the wire
//! messages exchanged with workers, entity parsing, and the
//! [`ExternalExtractor`](extractor::ExternalExtractor) seam used to call
//! the extraction binary.

pub mod entities;
pub mod error;
pub mod extractor;
pub mod messages;
pub mod types;
