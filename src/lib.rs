// PII Scanner - Incremental PII detection for document trees
// Copyright (c) 2025 PII Scanner Contributors
// Licensed under the MIT License

//! # PII Scanner
//!
//! An incremental scanner that walks a directory tree, extracts text from
//! plain-text and Office Open XML documents, and detects personally
//! identifiable information in it.
//!
//! ## Overview
//!
//! Every scanned file is fingerprinted by a SHA-256 checksum of its content
//! and recorded in a local SQLite history store together with the entities
//! found. A later run skips any file whose `(checksum, scan type)` pair is
//! already recorded, so unchanged content is never sent through the model
//! twice. Renaming or copying a flagged file still re-emits the console
//! signal for the new path.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Scan pipeline (checksum, extract, chunk, detect, history)
//! - [`domain`] - Core domain types, errors, and exit codes
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pii_scanner::config::ScannerConfig;
//! use pii_scanner::core::scan::{ScanEngine, Scanner};
//! use pii_scanner::domain::ScanMode;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ScannerConfig::default();
//! let engine = ScanEngine::from_config(&config)?;
//!
//! let mut scanner = Scanner::new(engine);
//! let summary = scanner.scan_directory(Path::new("/srv/share"), ScanMode::Lite)?;
//!
//! eprintln!("{summary}");
//! std::process::exit(summary.exit_code().code());
//! # }
//! ```
//!
//! ## Console Signal
//!
//! For each file containing PII the scanner writes two fixed-format lines
//! to stdout:
//!
//! ```text
//! PII data potentially exposed
//! PII labels found: email, person
//! ```
//!
//! Logs and the run summary go to stderr, so stdout carries nothing else.
//!
//! ## Error Handling
//!
//! Library errors are [`domain::ScanError`]; each variant maps onto a
//! documented process exit code through [`domain::ScanExitCode`]:
//!
//! ```rust
//! use pii_scanner::domain::{ScanError, ScanMode};
//!
//! let err = "deep".parse::<ScanMode>().unwrap_err();
//! assert!(matches!(err, ScanError::InvalidScanType(_)));
//! assert_eq!(err.exit_code().code(), 12);
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
