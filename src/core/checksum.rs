//! Content fingerprinting for change detection
//!
//! A SHA-256 digest of the file decides whether a file needs scanning: the
//! history store is keyed by it, so a digest mismatch is the sole trigger for
//! a re-scan. Lite mode only hashes the first [`LITE_SCAN_LIMIT`] bytes.

use crate::domain::{Result, ScanError, ScanMode, LITE_SCAN_LIMIT};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Read block size for streaming hashes
const BLOCK_SIZE: usize = 64 * 1024;

/// Calculate the SHA-256 fingerprint of a file for a scan mode
///
/// Full mode streams the whole file in fixed-size blocks; lite mode stops
/// after [`LITE_SCAN_LIMIT`] bytes, so a file no larger than the cap has the
/// same digest in both modes.
///
/// # Returns
///
/// A hex-encoded SHA-256 checksum string (64 characters).
///
/// # Errors
///
/// Returns [`ScanError::Checksum`] if the file is missing or unreadable.
///
/// # Examples
///
/// ```no_run
/// use pii_scanner::core::checksum::calculate_checksum;
/// use pii_scanner::domain::ScanMode;
/// use std::path::Path;
///
/// let checksum = calculate_checksum(Path::new("notes.txt"), ScanMode::Lite).unwrap();
/// assert_eq!(checksum.len(), 64);
/// ```
pub fn calculate_checksum(path: &Path, mode: ScanMode) -> Result<String> {
    let to_error = |e: io::Error| ScanError::Checksum {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    let file = File::open(path).map_err(to_error)?;
    match mode {
        ScanMode::Full => hash_reader(file),
        ScanMode::Lite => hash_reader(file.take(LITE_SCAN_LIMIT as u64)),
    }
    .map_err(to_error)
}

fn hash_reader(mut reader: impl Read) -> io::Result<String> {
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; BLOCK_SIZE];

    loop {
        let read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buffer[..read]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Calculate SHA-256 checksum of raw bytes
///
/// # Returns
///
/// Returns a hex-encoded SHA-256 checksum string (64 characters).
pub fn calculate_checksum_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}
