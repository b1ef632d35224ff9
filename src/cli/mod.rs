//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for the scanner using
//! clap. Without a subcommand the scanner scans `PATH`.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Configuration file read when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "pii-scanner.toml";

/// PII Scanner - incremental PII detection for document trees
#[derive(Parser, Debug)]
#[command(name = "pii-scanner")]
#[command(version, about, long_about = None)]
#[command(author = "PII Scanner Contributors")]
pub struct Cli {
    #[command(flatten)]
    pub scan: commands::scan::ScanArgs,

    /// Path to configuration file [default: pii-scanner.toml, optional]
    #[arg(short, long, env = "PII_SCANNER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Verbose output (debug logging)
    #[arg(short, long)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Effective log level: `--verbose`, then `--log-level`, then the config
    pub fn effective_log_level<'a>(&'a self, configured: &'a str) -> &'a str {
        if self.verbose {
            "debug"
        } else {
            self.log_level.as_deref().unwrap_or(configured)
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List recorded scans from the history store
    History(commands::history::HistoryArgs),

    /// Validate configuration and check the history store
    ValidateConfig(commands::validate::ValidateArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_scan() {
        let cli = Cli::parse_from(["pii-scanner", "/srv/share"]);
        assert_eq!(cli.scan.path, Some(PathBuf::from("/srv/share")));
        assert_eq!(cli.scan.scan_type, None);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_parse_scan_type() {
        let cli = Cli::parse_from(["pii-scanner", "--scan-type", "lite", "/srv/share"]);
        assert_eq!(cli.scan.scan_type.as_deref(), Some("lite"));
    }

    #[test]
    fn test_cli_accepts_unknown_scan_type_for_in_process_validation() {
        let cli = Cli::parse_from(["pii-scanner", "--scan-type", "deep", "/srv/share"]);
        assert_eq!(cli.scan.scan_type.as_deref(), Some("deep"));
    }

    #[test]
    fn test_cli_parse_without_path() {
        let cli = Cli::parse_from(["pii-scanner"]);
        assert!(cli.scan.path.is_none());
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["pii-scanner", "--config", "custom.toml", "/data"]);
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
    }

    #[test]
    fn test_verbose_overrides_log_level() {
        let cli = Cli::parse_from(["pii-scanner", "--verbose", "--log-level", "warn", "/data"]);
        assert_eq!(cli.effective_log_level("info"), "debug");

        let cli = Cli::parse_from(["pii-scanner", "--log-level", "warn", "/data"]);
        assert_eq!(cli.effective_log_level("info"), "warn");

        let cli = Cli::parse_from(["pii-scanner", "/data"]);
        assert_eq!(cli.effective_log_level("error"), "error");
    }

    #[test]
    fn test_cli_parse_history() {
        let cli = Cli::parse_from(["pii-scanner", "history", "--flagged"]);
        assert!(matches!(cli.command, Some(Commands::History(ref a)) if a.flagged));
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["pii-scanner", "validate-config"]);
        assert!(matches!(cli.command, Some(Commands::ValidateConfig(_))));
    }
}
