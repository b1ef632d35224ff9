//! Core scan pipeline.
//!
//! # Modules
//!
//! - [`checksum`] - SHA-256 content fingerprints, whole file or lite prefix
//! - [`extract`] - Text extraction per document format
//! - [`chunker`] - Token-budgeted chunking for the detection model
//! - [`detector`] - PII detection through an entity classifier
//! - [`history`] - SQLite scan history keyed by checksum and mode
//! - [`scan`] - Directory walk and per-file orchestration
//!
//! # Scan Workflow
//!
//! For each supported file:
//!
//! 1. **Checksum**: fingerprint the content for the scan mode
//! 2. **Lookup**: ask the history store whether this content was scanned
//! 3. **Extract**: turn the document into plain text (unseen content only)
//! 4. **Chunk**: split the text to fit the model's input limit
//! 5. **Detect**: classify spans against the mode's label set
//! 6. **Persist**: record the result under `(checksum, mode)`
//!
//! Flagged files, fresh or previously recorded, emit the console signal.
//!
//! # Example
//!
//! ```rust,no_run
//! use pii_scanner::config::load_config_or_default;
//! use pii_scanner::core::scan::{ScanEngine, Scanner};
//! use pii_scanner::domain::ScanMode;
//! use std::path::Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config_or_default("pii-scanner.toml")?;
//! let engine = ScanEngine::from_config(&config)?;
//!
//! let mut scanner = Scanner::new(engine);
//! let summary = scanner.scan_directory(Path::new("/srv/share"), ScanMode::Lite)?;
//!
//! println!("Files with PII: {}", summary.files_with_pii());
//! # Ok(())
//! # }
//! ```

pub mod checksum;
pub mod chunker;
pub mod detector;
pub mod extract;
pub mod history;
pub mod scan;
