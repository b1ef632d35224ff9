//! Validate config command implementation
//!
//! Prints the effective configuration, builds the tokenizer and model, and
//! verifies the history store if one exists. Nothing is created.

use crate::config::ScannerConfig;
use crate::core::chunker::build_tokenizer;
use crate::core::detector::build_classifier;
use crate::core::history::ScanHistoryStore;
use crate::domain::ScanExitCode;
use clap::Args;
use std::path::Path;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    ///
    /// `config` has already been loaded and validated; `source` names where
    /// it came from.
    pub fn execute(&self, source: &Path, config: &ScannerConfig) -> anyhow::Result<i32> {
        tracing::info!(config_path = %source.display(), "Validating configuration");

        println!("🔍 Validating configuration: {}", source.display());
        println!();
        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  History Store: {}", config.storage.db_file.display());
        println!("  Model: {}", config.model.name);
        match &config.model.pattern_library {
            Some(path) => println!("  Pattern Library: {}", path.display()),
            None => println!("  Pattern Library: built-in"),
        }
        println!("  Tokenizer: {}", config.model.tokenizer);
        println!("  Default Scan Type: {}", config.scan.default_mode);
        println!(
            "  Max Chunk Length: {} ({} reserved)",
            config.scan.max_chunk_length, config.scan.reserved_tokens
        );
        println!("  Basic Labels: {}", config.labels.basic.join(", "));
        println!("  Full Labels: {}", config.labels.full.join(", "));
        println!("  Log Level: {}", config.logging.level);
        println!();

        if let Err(e) = build_tokenizer(&config.model) {
            println!("❌ {e}");
            return Ok(e.exit_code().code());
        }
        println!("✅ Tokenizer ready");

        if let Err(e) = build_classifier(&config.model) {
            println!("❌ {e}");
            return Ok(e.exit_code().code());
        }
        println!("✅ Model ready");

        let store = ScanHistoryStore::new(&config.storage.db_file);
        if !store.path().exists() {
            println!("ℹ️  History store will be created on first scan");
            return Ok(ScanExitCode::Success.code());
        }

        match store.verify() {
            Ok(()) => {
                let count = store.count().unwrap_or_default();
                println!("✅ History store is healthy ({count} records)");
                Ok(ScanExitCode::Success.code())
            }
            Err(e) => {
                println!("❌ History store check failed");
                println!("   Error: {e}");
                Ok(e.exit_code().code())
            }
        }
    }
}
