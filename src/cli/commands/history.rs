//! History command implementation
//!
//! Lists the scan ledger: what was scanned, when, in which mode, and what
//! was found.

use crate::config::ScannerConfig;
use crate::core::history::{RecordFilter, ScanHistoryStore};
use crate::domain::{distinct_labels, ScanExitCode, ScanMode, ScanRecord};
use clap::Args;

/// Arguments for the history command
#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Only records of this scan type (lite or full)
    #[arg(long = "scan-type", value_name = "TYPE")]
    pub scan_type: Option<String>,

    /// Only records where PII was found
    #[arg(long)]
    pub flagged: bool,

    /// Maximum number of records to show
    #[arg(short = 'n', long, default_value_t = 50)]
    pub limit: usize,

    /// Output records as JSON
    #[arg(long)]
    pub json: bool,
}

impl HistoryArgs {
    /// Execute the history command
    pub fn execute(&self, config: &ScannerConfig) -> anyhow::Result<i32> {
        let mode = match self.scan_type.as_deref().map(str::parse::<ScanMode>) {
            Some(Err(e)) => {
                eprintln!("Error: {e}");
                return Ok(e.exit_code().code());
            }
            Some(Ok(mode)) => Some(mode),
            None => None,
        };

        let db_file = &config.storage.db_file;
        if !db_file.exists() {
            println!("No scan history at {}", db_file.display());
            return Ok(ScanExitCode::Success.code());
        }

        let store = ScanHistoryStore::new(db_file);
        let filter = RecordFilter {
            mode,
            flagged_only: self.flagged,
            limit: Some(self.limit),
        };

        let records = match store.list_records(&filter) {
            Ok(records) => records,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read scan history");
                eprintln!("Error: {e}");
                return Ok(e.exit_code().code());
            }
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&records)?);
        } else {
            print_table(&records);
        }

        Ok(ScanExitCode::Success.code())
    }
}

fn print_table(records: &[ScanRecord]) {
    if records.is_empty() {
        println!("No matching records");
        return;
    }

    println!("📋 Scan history ({} records)", records.len());
    println!();
    for record in records {
        let marker = if record.has_pii() { "⚠️ " } else { "✅" };
        println!("{} {}", marker, record.file_path);
        println!(
            "   {} | {} | {} bytes | {}",
            record.scan_mode,
            record.scan_time.format("%Y-%m-%d %H:%M:%S UTC"),
            record.file_size,
            record.file_checksum.chars().take(12).collect::<String>()
        );
        if record.has_pii() {
            let labels: Vec<String> = distinct_labels(&record.pii_entities).into_iter().collect();
            println!(
                "   {} entities: {}",
                record.pii_entities.len(),
                labels.join(", ")
            );
        }
    }
}
