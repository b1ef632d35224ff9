//! Scan command implementation
//!
//! The default command: walks `PATH` and reports PII through the console
//! signal and the exit code.

use crate::config::ScannerConfig;
use crate::core::scan::{ScanEngine, Scanner};
use crate::domain::{ScanError, ScanExitCode, ScanMode};
use clap::Args;
use std::path::PathBuf;

/// Arguments for scanning
#[derive(Args, Debug, Default)]
pub struct ScanArgs {
    /// Directory (or single file) to scan
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Scan type: lite (first 1 MiB, basic labels) or full [default: full]
    #[arg(long = "scan-type", value_name = "TYPE")]
    pub scan_type: Option<String>,
}

impl ScanArgs {
    /// Resolve the scan mode, falling back to the configured default
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::InvalidScanType`] for anything but `lite`/`full`.
    pub fn mode(&self, config: &ScannerConfig) -> Result<ScanMode, ScanError> {
        match &self.scan_type {
            Some(value) => value.parse(),
            None => Ok(config.scan.default_mode),
        }
    }

    /// Execute the scan
    ///
    /// Invocation errors are reported before any resource is touched.
    /// Returns the process exit code.
    pub fn execute(&self, config: &ScannerConfig) -> anyhow::Result<i32> {
        let Some(path) = &self.path else {
            return Ok(fail(&ScanError::MissingPath));
        };

        let mode = match self.mode(config) {
            Ok(mode) => mode,
            Err(e) => return Ok(fail(&e)),
        };

        let engine = match ScanEngine::from_config(config) {
            Ok(engine) => engine,
            Err(e) => return Ok(fail(&e)),
        };

        let mut scanner = Scanner::new(engine);
        match scanner.scan_directory(path, mode) {
            Ok(summary) => {
                eprintln!("{summary}");
                Ok(summary.exit_code().code())
            }
            Err(e) => Ok(fail(&e)),
        }
    }
}

/// Log and print an error, returning its exit code
fn fail(error: &ScanError) -> i32 {
    let code = error.exit_code();
    tracing::error!(error = %error, exit_code = code.code(), "Scan aborted");
    eprintln!("Error: {error}");
    if code == ScanExitCode::MissingPath {
        eprintln!("Usage: pii-scanner [OPTIONS] <PATH>");
    }
    code.code()
}
