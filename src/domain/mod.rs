//! Domain models and types for the scanner.
//!
//! The domain layer provides:
//! - **Scan vocabulary** ([`ScanMode`], [`DocumentFormat`])
//! - **Results** ([`DetectedEntity`], [`ScanRecord`], [`FileMetadata`])
//! - **Error types** ([`ScanError`], [`StorageError`]) and the [`Result`] alias
//! - **Exit codes** ([`ScanExitCode`]), the stable contract with invoking pipelines
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, ScanError>`]; every error maps
//! onto one exit code:
//!
//! ```rust
//! use pii_scanner::domain::{ScanError, ScanExitCode, ScanMode};
//!
//! let err = "quick".parse::<ScanMode>().unwrap_err();
//! assert_eq!(err.exit_code(), ScanExitCode::InvalidScanType);
//! ```

pub mod entity;
pub mod errors;
pub mod exit_code;
pub mod format;
pub mod record;
pub mod result;
pub mod scan_mode;

// Re-export commonly used types for convenience
pub use entity::{distinct_labels, DetectedEntity};
pub use errors::{ScanError, StorageError};
pub use exit_code::ScanExitCode;
pub use format::DocumentFormat;
pub use record::{FileMetadata, ScanRecord};
pub use result::Result;
pub use scan_mode::{ScanMode, LITE_SCAN_LIMIT};
