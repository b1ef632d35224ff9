//! Durable scan history
//!
//! One row per `(file_checksum, scan_mode)`. A hit means the content was
//! already scanned in that mode and the stored entities stand in for a fresh
//! detection run.

pub mod codec;
pub mod store;

pub use codec::{decode_entities, encode_entities, ENTITY_CODEC_VERSION};
pub use store::{LookupOutcome, RecordFilter, ScanHistoryStore, SCHEMA_VERSION};
