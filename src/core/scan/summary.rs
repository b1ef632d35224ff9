//! Aggregate result of a scan run

use super::scanner::FileOutcome;
use crate::domain::{ScanExitCode, ScanMode};
use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

/// Counters per file outcome plus the overall PII verdict
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub mode: ScanMode,
    /// Regular files encountered by the walk
    pub files_seen: usize,
    pub filtered: usize,
    pub checksum_failed: usize,
    pub extraction_failed: usize,
    pub already_clean: usize,
    pub already_flagged: usize,
    pub scanned_clean: usize,
    pub scanned_flagged: usize,
    /// Directory entries the walk could not read
    pub walk_errors: usize,
    /// Distinct labels across flagged files, fresh and recorded
    pub labels: BTreeSet<String>,
    pub duration: Duration,
}

impl ScanSummary {
    pub fn new(mode: ScanMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Fold one file's outcome into the totals
    pub fn record(&mut self, outcome: &FileOutcome) {
        self.files_seen += 1;
        match outcome {
            FileOutcome::Filtered => self.filtered += 1,
            FileOutcome::ChecksumFailed => self.checksum_failed += 1,
            FileOutcome::ExtractionFailed => self.extraction_failed += 1,
            FileOutcome::AlreadyClean => self.already_clean += 1,
            FileOutcome::AlreadyFlagged(_) => self.already_flagged += 1,
            FileOutcome::Scanned(entities) if entities.is_empty() => self.scanned_clean += 1,
            FileOutcome::Scanned(_) => self.scanned_flagged += 1,
        }
        self.labels
            .extend(outcome.entities().iter().map(|e| e.label.clone()));
    }

    pub(crate) fn finish(&mut self, duration: Duration) {
        self.duration = duration;
    }

    /// Files run through the model this time
    pub fn scanned(&self) -> usize {
        self.scanned_clean + self.scanned_flagged
    }

    /// Files answered from history
    pub fn already_scanned(&self) -> usize {
        self.already_clean + self.already_flagged
    }

    /// Files skipped because a pipeline stage failed
    pub fn failed(&self) -> usize {
        self.checksum_failed + self.extraction_failed
    }

    /// Files carrying PII, fresh or recorded
    pub fn files_with_pii(&self) -> usize {
        self.already_flagged + self.scanned_flagged
    }

    pub fn pii_found(&self) -> bool {
        self.files_with_pii() > 0
    }

    /// `PiiFound` when any file carried PII, otherwise `Success`
    pub fn exit_code(&self) -> ScanExitCode {
        if self.pii_found() {
            ScanExitCode::PiiFound
        } else {
            ScanExitCode::Success
        }
    }
}

impl fmt::Display for ScanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Scan summary ({} mode)", self.mode)?;
        writeln!(f, "  Files seen:        {}", self.files_seen)?;
        writeln!(f, "  Scanned:           {}", self.scanned())?;
        writeln!(f, "  Already scanned:   {}", self.already_scanned())?;
        writeln!(f, "  Unsupported:       {}", self.filtered)?;
        writeln!(f, "  Failed:            {}", self.failed())?;
        writeln!(f, "  Files with PII:    {}", self.files_with_pii())?;
        if !self.labels.is_empty() {
            let labels: Vec<&str> = self.labels.iter().map(String::as_str).collect();
            writeln!(f, "  Labels:            {}", labels.join(", "))?;
        }
        write!(f, "  Duration:          {:.2}s", self.duration.as_secs_f64())
    }
}
