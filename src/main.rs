// PII Scanner - Incremental PII detection for document trees
// Copyright (c) 2025 PII Scanner Contributors
// Licensed under the MIT License

use clap::Parser;
use pii_scanner::cli::{Cli, Commands, DEFAULT_CONFIG_FILE};
use pii_scanner::config::{load_config, load_config_or_default, ScannerConfig};
use pii_scanner::domain::ScanExitCode;
use pii_scanner::logging::init_logging;
use std::path::{Path, PathBuf};
use std::process;

fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

    let config = match load(&cli, &config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            process::exit(e.exit_code().code());
        }
    };

    let guard = match init_logging(cli.effective_log_level(&config.logging.level), &config.logging)
    {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(e.exit_code().code());
        }
    };

    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        config = %config_path.display(),
        "PII Scanner starting"
    );

    let exit_code = match execute_command(&cli, &config_path, &config) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            ScanExitCode::GeneralError.code()
        }
    };

    // Flush the file writer before exiting
    drop(guard);
    process::exit(exit_code);
}

/// An explicit `--config` must exist; the default file is optional
fn load(cli: &Cli, path: &Path) -> pii_scanner::domain::Result<ScannerConfig> {
    if cli.config.is_some() {
        load_config(path)
    } else {
        load_config_or_default(path)
    }
}

/// Execute the CLI command
fn execute_command(cli: &Cli, config_path: &Path, config: &ScannerConfig) -> anyhow::Result<i32> {
    match &cli.command {
        None => cli.scan.execute(config),
        Some(Commands::History(args)) => args.execute(config),
        Some(Commands::ValidateConfig(args)) => args.execute(config_path, config),
    }
}
