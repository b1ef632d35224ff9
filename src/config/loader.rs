//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::ScannerConfig;
use crate::domain::errors::ScanError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// Prefix shared by every environment override
pub const ENV_PREFIX: &str = "PII_SCANNER_";

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into ScannerConfig
/// 4. Applies environment variable overrides (PII_SCANNER_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if the file cannot be read, TOML parsing fails, a
/// referenced environment variable is missing, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use pii_scanner::config::loader::load_config;
///
/// let config = load_config("pii-scanner.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<ScannerConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ScanError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        ScanError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let config: ScannerConfig = toml::from_str(&contents)
        .map_err(|e| ScanError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    finalize(config)
}

/// Loads configuration, falling back to defaults when the file is absent
///
/// Environment overrides and validation apply either way, so a deployment
/// driven purely by `PII_SCANNER_*` variables needs no file at all.
pub fn load_config_or_default(path: impl AsRef<Path>) -> Result<ScannerConfig> {
    let path = path.as_ref();
    if path.exists() {
        load_config(path)
    } else {
        tracing::debug!(path = %path.display(), "No configuration file, using defaults");
        finalize(ScannerConfig::default())
    }
}

fn finalize(mut config: ScannerConfig) -> Result<ScannerConfig> {
    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        ScanError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| ScanError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut lines = Vec::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        // Comments are passed through untouched
        if line.trim_start().starts_with('#') {
            lines.push(line.to_string());
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        lines.push(processed_line);
    }

    if !missing_vars.is_empty() {
        return Err(ScanError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(lines.join("\n"))
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(format!("{ENV_PREFIX}{key}")).ok()
}

fn parse_label_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

/// Applies environment variable overrides using the PII_SCANNER_* prefix
///
/// Numeric and boolean values that fail to parse are rejected rather than
/// silently ignored.
fn apply_env_overrides(config: &mut ScannerConfig) -> Result<()> {
    // Storage overrides
    if let Some(val) = env_var("DB_FILE") {
        config.storage.db_file = PathBuf::from(val);
    }

    // Model overrides
    if let Some(val) = env_var("MODEL_NAME") {
        config.model.name = val;
    }
    if let Some(val) = env_var("PATTERN_LIBRARY") {
        config.model.pattern_library = Some(PathBuf::from(val));
    }

    // Scan overrides
    if let Some(val) = env_var("MAX_CHUNK_LENGTH") {
        config.scan.max_chunk_length = val.trim().parse().map_err(|_| {
            ScanError::Configuration(format!("Invalid {ENV_PREFIX}MAX_CHUNK_LENGTH: {val}"))
        })?;
    }

    // Label overrides
    if let Some(val) = env_var("BASIC_LABELS") {
        config.labels.basic = parse_label_list(&val);
    }
    if let Some(val) = env_var("FULL_LABELS") {
        config.labels.full = parse_label_list(&val);
    }

    // Logging overrides
    if let Some(val) = env_var("LOG_LEVEL") {
        config.logging.level = val;
    }
    if let Some(val) = env_var("LOG_FILE") {
        config.logging.local_path = PathBuf::from(val);
        config.logging.local_enabled = true;
    }
    if let Some(val) = env_var("LOG_FILE_ENABLED") {
        config.logging.local_enabled = val.trim().parse().map_err(|_| {
            ScanError::Configuration(format!("Invalid {ENV_PREFIX}LOG_FILE_ENABLED: {val}"))
        })?;
    }

    Ok(())
}
