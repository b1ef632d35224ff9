//! Domain error types
//!
//! This module defines the error hierarchy for the scanner. All errors are
//! domain-specific and don't expose third-party types: SQLite, zip and XML
//! failures are converted into these variants at the module boundary.

use super::exit_code::ScanExitCode;
use std::path::PathBuf;
use thiserror::Error;

/// Main scanner error type
///
/// This is the primary error type used throughout the application. Each
/// variant maps onto exactly one process exit code (see [`ScanError::exit_code`]).
#[derive(Debug, Error)]
pub enum ScanError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Scan history store errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The tokenizer backing the chunker could not be built
    #[error("Tokenizer initialization failed: {0}")]
    TokenizerInit(String),

    /// The entity classification model could not be loaded
    #[error("Model initialization failed: {0}")]
    ModelInit(String),

    /// Content fingerprinting failed
    #[error("Checksum failed for {path}: {message}")]
    Checksum { path: PathBuf, message: String },

    /// Text could not be extracted from a document
    #[error("Text extraction failed for {path}: {message}")]
    Extraction { path: PathBuf, message: String },

    /// Text could not be split into model-sized chunks
    #[error("Text chunking failed: {0}")]
    Chunking(String),

    /// Entity detection failed
    #[error("PII detection failed: {0}")]
    Detection(String),

    /// Scan mode other than `lite` or `full`
    #[error("Invalid scan type '{0}'. Must be one of: lite, full")]
    InvalidScanType(String),

    /// No target path was given
    #[error("Missing target path argument")]
    MissingPath,

    /// Target path does not exist
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// Target file has an extension outside the allow-list
    #[error("Unsupported file type: {0}")]
    UnsupportedFile(PathBuf),

    /// A file's pipeline failed in a way that must not be downgraded
    #[error("Failed to process {path}: {source}")]
    FileProcessing {
        path: PathBuf,
        #[source]
        source: Box<ScanError>,
    },

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl ScanError {
    /// Wrap an error as the failure of one file's pipeline
    pub fn for_file(path: impl Into<PathBuf>, source: ScanError) -> Self {
        ScanError::FileProcessing {
            path: path.into(),
            source: Box::new(source),
        }
    }

    /// Exit code reported to the invoking pipeline for this error
    pub fn exit_code(&self) -> ScanExitCode {
        match self {
            ScanError::Configuration(_) => ScanExitCode::GeneralError,
            ScanError::Storage(_) => ScanExitCode::StorageError,
            ScanError::TokenizerInit(_) => ScanExitCode::TokenizerInitError,
            ScanError::ModelInit(_) => ScanExitCode::ModelInitError,
            ScanError::Checksum { .. } => ScanExitCode::ChecksumError,
            ScanError::Extraction { .. } => ScanExitCode::TextExtractionError,
            ScanError::Chunking(_) => ScanExitCode::TextChunkingError,
            ScanError::Detection(_) => ScanExitCode::PiiDetectionError,
            ScanError::InvalidScanType(_) => ScanExitCode::InvalidScanType,
            ScanError::MissingPath => ScanExitCode::MissingPath,
            ScanError::PathNotFound(_) => ScanExitCode::FileNotFound,
            ScanError::UnsupportedFile(_) => ScanExitCode::UnsupportedFile,
            ScanError::FileProcessing { .. } => ScanExitCode::GeneralError,
            ScanError::Io(_) | ScanError::Serialization(_) => ScanExitCode::GeneralError,
        }
    }
}

/// Scan history store errors
///
/// Errors that occur when opening, migrating, reading or writing the
/// SQLite history file. These errors don't expose `rusqlite` types.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The database file could not be opened
    #[error("Failed to open history store {path}: {message}")]
    Open { path: PathBuf, message: String },

    /// Schema creation or repair failed
    #[error("Schema initialization failed: {0}")]
    Schema(String),

    /// A read query failed
    #[error("Query failed: {0}")]
    Query(String),

    /// A write failed
    #[error("Write failed: {0}")]
    Write(String),

    /// A stored value could not be decoded
    #[error("Stored value is corrupt: {0}")]
    Corrupt(String),

    /// Integrity verification failed
    #[error("Integrity check failed: {0}")]
    Integrity(String),
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        StorageError::Query(err.to_string())
    }
}

impl From<rusqlite::Error> for ScanError {
    fn from(err: rusqlite::Error) -> Self {
        ScanError::Storage(StorageError::from(err))
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for ScanError {
    fn from(err: std::io::Error) -> Self {
        ScanError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for ScanError {
    fn from(err: serde_json::Error) -> Self {
        ScanError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for ScanError {
    fn from(err: toml::de::Error) -> Self {
        ScanError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_error_display() {
        let err = ScanError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_storage_error_conversion() {
        let storage_err = StorageError::Write("disk full".to_string());
        let scan_err: ScanError = storage_err.into();
        assert!(matches!(scan_err, ScanError::Storage(_)));
        assert_eq!(scan_err.exit_code(), ScanExitCode::StorageError);
    }

    #[test]
    fn test_rusqlite_error_conversion() {
        let sqlite_err = rusqlite::Error::QueryReturnedNoRows;
        let storage_err: StorageError = sqlite_err.into();
        assert!(matches!(storage_err, StorageError::Query(_)));
    }

    #[test]
    fn test_file_processing_wraps_source() {
        let inner = ScanError::Storage(StorageError::Write("locked".to_string()));
        let err = ScanError::for_file("/data/a.txt", inner);
        assert!(err.to_string().contains("/data/a.txt"));
        assert!(err.to_string().contains("locked"));
        assert_eq!(err.exit_code(), ScanExitCode::GeneralError);
    }

    #[test]
    fn test_invocation_errors_have_dedicated_codes() {
        assert_eq!(
            ScanError::InvalidScanType("quick".to_string()).exit_code(),
            ScanExitCode::InvalidScanType
        );
        assert_eq!(ScanError::MissingPath.exit_code(), ScanExitCode::MissingPath);
        assert_eq!(
            ScanError::PathNotFound(PathBuf::from("/nope")).exit_code(),
            ScanExitCode::FileNotFound
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let scan_err: ScanError = io_err.into();
        assert!(matches!(scan_err, ScanError::Io(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let scan_err: ScanError = toml_err.into();
        assert!(matches!(scan_err, ScanError::Configuration(_)));
        assert!(scan_err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_scan_error_implements_std_error() {
        let err = ScanError::Detection("model crashed".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
