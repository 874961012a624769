//! Streaming `multipart/form-data` ingestion.
//!
//! The pipeline runs in two stages. [`BoundarySniffer`] recovers the
//! boundary token from the leading bytes of a body whose content type did
//! not declare one, keeping every consumed byte replayable. [`ingest`] then
//! drives the multipart decoder over the (replayed) stream, accumulating
//! text fields and spooled file uploads into a [`FieldMap`](crate::FieldMap)
//! in strict arrival order.

mod ingest;
mod sniff;

pub use ingest::ingest;
pub use sniff::{BoundarySniffer, MAX_SNIFF_BYTES};
