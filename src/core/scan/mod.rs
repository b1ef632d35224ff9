//! Scan orchestration
//!
//! Per file: extension filter, checksum, history lookup, and for unseen
//! content extraction, chunking, detection and persistence. Files are
//! processed strictly one after another.

pub mod engine;
pub mod scanner;
pub mod summary;

pub use engine::ScanEngine;
pub use scanner::{
    format_signal, FileOutcome, Scanner, SignalSink, SignalWriter, EXPOSURE_SENTINEL,
    LABELS_PREFIX,
};
pub use summary::ScanSummary;
