//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Configurable log levels (`RUST_LOG` overrides the configured level)
//! - Console output on stderr
//! - Local JSON file logging
//!
//! # Example
//!
//! ```no_run
//! use pii_scanner::logging::init_logging;
//! use pii_scanner::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Scanner started");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};

/// Log a failed pipeline stage for one file
///
/// # Example
///
/// ```no_run
/// use pii_scanner::log_stage_failure;
///
/// let path = std::path::Path::new("/data/report.docx");
/// log_stage_failure!(path, "extract", "zip archive is truncated");
/// ```
#[macro_export]
macro_rules! log_stage_failure {
    ($path:expr, $stage:expr, $error:expr) => {
        tracing::error!(
            path = %$path.display(),
            stage = $stage,
            error = %$error,
            "Pipeline stage failed"
        );
    };
}

/// Log a file the orchestrator did not run through the model
///
/// # Example
///
/// ```no_run
/// use pii_scanner::log_file_skipped;
///
/// let path = std::path::Path::new("/data/notes.txt");
/// log_file_skipped!(path, "already scanned");
/// ```
#[macro_export]
macro_rules! log_file_skipped {
    ($path:expr, $reason:expr) => {
        tracing::debug!(
            path = %$path.display(),
            reason = $reason,
            "Skipping file"
        );
    };
}
