//! Process exit codes
//!
//! The numeric values are a stable contract with the automation that invokes
//! the scanner: callers branch on them without parsing console output.

use std::fmt;

/// Exit code reported by the `pii-scanner` binary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ScanExitCode {
    /// Scan finished and no PII was found
    Success = 0,
    /// Scan finished and at least one file carried PII
    PiiFound = 1,
    /// Target path does not exist
    FileNotFound = 2,
    /// Target file type is not supported
    UnsupportedFile = 3,
    /// History store could not be initialized or written
    StorageError = 4,
    /// Tokenizer could not be initialized
    TokenizerInitError = 5,
    /// Detection model could not be initialized
    ModelInitError = 6,
    /// Checksum calculation failed
    ChecksumError = 8,
    /// Text extraction failed
    TextExtractionError = 9,
    /// Text chunking failed
    TextChunkingError = 10,
    /// PII detection failed
    PiiDetectionError = 11,
    /// Scan type other than lite/full
    InvalidScanType = 12,
    /// No target path given
    MissingPath = 13,
    /// Anything else
    GeneralError = 99,
}

impl ScanExitCode {
    /// Numeric process exit code
    pub fn code(self) -> i32 {
        self as i32
    }
}

impl From<ScanExitCode> for i32 {
    fn from(code: ScanExitCode) -> Self {
        code.code()
    }
}

impl fmt::Display for ScanExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} ({})", self, self.code())
    }
}
