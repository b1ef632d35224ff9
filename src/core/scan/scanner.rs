//! Per-file scan pipeline and directory walk

use super::engine::ScanEngine;
use super::summary::ScanSummary;
use crate::core::checksum::calculate_checksum;
use crate::core::extract::extract_text;
use crate::core::history::LookupOutcome;
use crate::domain::{
    distinct_labels, DetectedEntity, DocumentFormat, FileMetadata, Result, ScanError, ScanMode,
};
use crate::{log_file_skipped, log_stage_failure};
use std::collections::BTreeSet;
use std::io::{self, Write};
use std::path::Path;
use std::time::Instant;
use walkdir::WalkDir;

/// Line printed for every file carrying PII
pub const EXPOSURE_SENTINEL: &str = "PII data potentially exposed";

/// Prefix of the line listing the labels found in that file
pub const LABELS_PREFIX: &str = "PII labels found: ";

/// Render the console signal for one file: sentinel line plus label line
pub fn format_signal(labels: &BTreeSet<String>) -> String {
    let joined = labels
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    format!("{EXPOSURE_SENTINEL}\n{LABELS_PREFIX}{joined}\n")
}

/// Receiver of the machine-readable exposure signal
pub trait SignalSink {
    /// Report that `path` carries entities with these labels
    ///
    /// # Errors
    ///
    /// Returns an I/O error when the signal cannot be delivered.
    fn pii_exposed(&mut self, path: &Path, labels: &BTreeSet<String>) -> io::Result<()>;
}

/// Writes the signal to any [`Write`], stdout by default
#[derive(Debug)]
pub struct SignalWriter<W: Write> {
    out: W,
}

impl<W: Write> SignalWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl Default for SignalWriter<io::Stdout> {
    fn default() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> SignalSink for SignalWriter<W> {
    fn pii_exposed(&mut self, _path: &Path, labels: &BTreeSet<String>) -> io::Result<()> {
        self.out.write_all(format_signal(labels).as_bytes())?;
        self.out.flush()
    }
}

/// Terminal state of one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Extension outside the allow-list
    Filtered,
    /// The file could not be read for fingerprinting
    ChecksumFailed,
    /// Content previously scanned in this mode, nothing found
    AlreadyClean,
    /// Content previously scanned in this mode and flagged; re-reported
    AlreadyFlagged(Vec<DetectedEntity>),
    /// No text could be extracted; nothing recorded, retried next run
    ExtractionFailed,
    /// Scanned and recorded
    Scanned(Vec<DetectedEntity>),
}

impl FileOutcome {
    /// Entities carried by this outcome, fresh or recorded
    pub fn entities(&self) -> &[DetectedEntity] {
        match self {
            FileOutcome::AlreadyFlagged(entities) | FileOutcome::Scanned(entities) => entities,
            _ => &[],
        }
    }

    pub fn pii_found(&self) -> bool {
        !self.entities().is_empty()
    }
}

/// Drives files through checksum, history lookup, extraction, chunking,
/// detection and persistence, one file at a time
pub struct Scanner<S: SignalSink = SignalWriter<io::Stdout>> {
    engine: ScanEngine,
    sink: S,
}

impl Scanner {
    /// Scanner signalling on stdout
    pub fn new(engine: ScanEngine) -> Self {
        Self::with_sink(engine, SignalWriter::default())
    }
}

impl<S: SignalSink> Scanner<S> {
    pub fn with_sink(engine: ScanEngine, sink: S) -> Self {
        Self { engine, sink }
    }

    pub fn engine(&self) -> &ScanEngine {
        &self.engine
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Scan every supported file under `root`
    ///
    /// The walk is sorted by file name and does not follow symlinks. A
    /// `root` that is itself a file is scanned alone.
    ///
    /// # Errors
    ///
    /// - [`ScanError::PathNotFound`] if `root` does not exist
    /// - [`ScanError::UnsupportedFile`] if `root` is a file with an
    ///   unsupported extension
    /// - [`ScanError::FileProcessing`] if a scan result cannot be recorded,
    ///   which stops the run
    pub fn scan_directory(&mut self, root: &Path, mode: ScanMode) -> Result<ScanSummary> {
        if !root.exists() {
            return Err(ScanError::PathNotFound(root.to_path_buf()));
        }

        let started = Instant::now();
        let mut summary = ScanSummary::new(mode);

        tracing::info!(root = %root.display(), mode = %mode, "Starting scan");

        if root.is_file() {
            if !DocumentFormat::from_path(root).is_supported() {
                return Err(ScanError::UnsupportedFile(root.to_path_buf()));
            }
            let outcome = self.process_file(root, mode)?;
            summary.record(&outcome);
        } else {
            for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to read directory entry");
                        summary.walk_errors += 1;
                        continue;
                    }
                };
                if !entry.file_type().is_file() {
                    continue;
                }
                let outcome = self.process_file(entry.path(), mode)?;
                summary.record(&outcome);
            }
        }

        summary.finish(started.elapsed());
        tracing::info!(
            files = summary.files_seen,
            scanned = summary.scanned(),
            skipped = summary.already_scanned(),
            pii_found = summary.pii_found(),
            duration_ms = summary.duration.as_millis() as u64,
            "Scan complete"
        );
        Ok(summary)
    }

    /// Run one file through the pipeline
    ///
    /// Checksum and extraction failures skip the file. Classifier failures
    /// degrade to no entities for the affected chunk.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::FileProcessing`] when the result cannot be
    /// recorded or the exposure signal cannot be written.
    pub fn process_file(&mut self, path: &Path, mode: ScanMode) -> Result<FileOutcome> {
        let format = DocumentFormat::from_path(path);
        if !format.is_supported() {
            log_file_skipped!(path, "unsupported file type");
            return Ok(FileOutcome::Filtered);
        }

        let checksum = match calculate_checksum(path, mode) {
            Ok(checksum) => checksum,
            Err(e) => {
                log_stage_failure!(path, "checksum", e);
                return Ok(FileOutcome::ChecksumFailed);
            }
        };
        let metadata = match FileMetadata::from_path(path) {
            Ok(metadata) => metadata,
            Err(e) => {
                log_stage_failure!(path, "metadata", e);
                return Ok(FileOutcome::ChecksumFailed);
            }
        };

        match self.engine.history().lookup(&checksum, mode) {
            LookupOutcome::Clean => {
                log_file_skipped!(path, "already scanned");
                return Ok(FileOutcome::AlreadyClean);
            }
            LookupOutcome::Flagged(entities) => {
                log_file_skipped!(path, "already scanned, previously flagged");
                self.signal(path, &entities)?;
                return Ok(FileOutcome::AlreadyFlagged(entities));
            }
            LookupOutcome::NotFound => {}
        }

        tracing::info!(path = %path.display(), mode = %mode, "Scanning file");

        let Some(text) = extract_text(path, &format, mode) else {
            return Ok(FileOutcome::ExtractionFailed);
        };

        let chunks = self.engine.chunker().chunk(&text);
        let entities = self.engine.detector().detect_chunks(&chunks, mode);

        if entities.is_empty() {
            tracing::info!(path = %path.display(), mode = %mode, "No PII found");
        } else {
            tracing::info!(
                path = %path.display(),
                mode = %mode,
                entities = entities.len(),
                "PII found"
            );
            self.signal(path, &entities)?;
        }

        self.engine
            .history()
            .record(path, &entities, &metadata, &checksum, mode)
            .map_err(|e| {
                log_stage_failure!(path, "persist", e);
                ScanError::for_file(path, e)
            })?;

        Ok(FileOutcome::Scanned(entities))
    }

    fn signal(&mut self, path: &Path, entities: &[DetectedEntity]) -> Result<()> {
        let labels = distinct_labels(entities);
        self.sink.pii_exposed(path, &labels).map_err(|e| {
            log_stage_failure!(path, "signal", e);
            ScanError::for_file(path, e.into())
        })
    }
}
