//! Scan history record model

use super::entity::DetectedEntity;
use super::scan_mode::ScanMode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::UNIX_EPOCH;

/// File facts observed right before a scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMetadata {
    /// Size in bytes
    pub size: u64,
    /// Last modification time
    pub modified: DateTime<Utc>,
}

impl FileMetadata {
    /// Read size and modification time from the filesystem
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be stat'ed. Platforms without
    /// modification times report the Unix epoch instead of failing.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let metadata = fs::metadata(path)?;
        let modified = metadata
            .modified()
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|_| DateTime::<Utc>::from(UNIX_EPOCH));

        Ok(Self {
            size: metadata.len(),
            modified,
        })
    }
}

/// One row of the scan history ledger
///
/// Identified by `(file_checksum, scan_mode)`: a renamed or copied file with
/// identical content is recognized as already scanned in that mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRecord {
    /// Surrogate row id
    pub id: i64,
    /// Path the content was last recorded under
    pub file_path: String,
    /// When the record was written
    pub scan_time: DateTime<Utc>,
    /// File size in bytes at scan time
    pub file_size: u64,
    /// File modification time at scan time
    pub file_modified: DateTime<Utc>,
    /// SHA-256 hex digest (whole file or lite prefix)
    pub file_checksum: String,
    /// Mode the scan ran in
    pub scan_mode: ScanMode,
    /// Entities found, in chunk order
    pub pii_entities: Vec<DetectedEntity>,
}

impl ScanRecord {
    /// Check whether the scan flagged any PII
    pub fn has_pii(&self) -> bool {
        !self.pii_entities.is_empty()
    }
}
