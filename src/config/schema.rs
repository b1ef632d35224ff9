//! Configuration schema types
//!
//! This module defines the configuration structure for the scanner. Every
//! field carries a serde default so an empty (or absent) file yields a
//! complete, valid configuration.

use crate::domain::ScanMode;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Identifier of the built-in pattern-based entity classifier
pub const BUILTIN_MODEL: &str = "builtin-patterns";

/// Identifier of the built-in word tokenizer
pub const WORD_TOKENIZER: &str = "word";

/// Main scanner configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// Scan history store settings
    #[serde(default)]
    pub storage: StorageConfig,

    /// Detection model and tokenizer settings
    #[serde(default)]
    pub model: ModelConfig,

    /// Scan pipeline settings
    #[serde(default)]
    pub scan: ScanConfig,

    /// Label vocabularies per scan mode
    #[serde(default)]
    pub labels: LabelConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ScannerConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.storage.validate()?;
        self.model.validate()?;
        self.scan.validate()?;
        self.labels.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Scan history store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// SQLite file holding the scan history
    #[serde(default = "default_db_file")]
    pub db_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_file: default_db_file(),
        }
    }
}

impl StorageConfig {
    fn validate(&self) -> Result<(), String> {
        if self.db_file.as_os_str().is_empty() {
            return Err("storage.db_file cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Detection model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Entity classifier identifier
    #[serde(default = "default_model_name")]
    pub name: String,

    /// Optional TOML pattern library replacing the embedded one
    #[serde(default)]
    pub pattern_library: Option<PathBuf>,

    /// Tokenizer used to size chunks
    #[serde(default = "default_tokenizer")]
    pub tokenizer: String,

    /// Longest token the word tokenizer emits before splitting into pieces
    #[serde(default = "default_max_token_chars")]
    pub max_token_chars: usize,

    /// Patterns below this confidence are not run
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: default_model_name(),
            pattern_library: None,
            tokenizer: default_tokenizer(),
            max_token_chars: default_max_token_chars(),
            min_confidence: default_min_confidence(),
        }
    }
}

impl ModelConfig {
    fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("model.name cannot be empty".to_string());
        }

        if let Some(ref path) = self.pattern_library {
            if !path.exists() {
                return Err(format!(
                    "Pattern library file not found: {}",
                    path.display()
                ));
            }
            if path.extension().and_then(|s| s.to_str()) != Some("toml") {
                return Err(format!(
                    "Pattern library must be a TOML file: {}",
                    path.display()
                ));
            }
        }

        if self.max_token_chars == 0 {
            return Err("model.max_token_chars must be greater than 0".to_string());
        }

        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(format!(
                "model.min_confidence must be between 0.0 and 1.0, got {}",
                self.min_confidence
            ));
        }

        Ok(())
    }
}

/// Scan pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Mode used when the CLI doesn't name one
    #[serde(default)]
    pub default_mode: ScanMode,

    /// Token budget per chunk, including reserved headroom
    #[serde(default = "default_max_chunk_length")]
    pub max_chunk_length: usize,

    /// Token slots kept free for the model's boundary tokens
    #[serde(default = "default_reserved_tokens")]
    pub reserved_tokens: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            default_mode: ScanMode::default(),
            max_chunk_length: default_max_chunk_length(),
            reserved_tokens: default_reserved_tokens(),
        }
    }
}

impl ScanConfig {
    fn validate(&self) -> Result<(), String> {
        if self.reserved_tokens < 2 {
            return Err(format!(
                "scan.reserved_tokens must be at least 2, got {}",
                self.reserved_tokens
            ));
        }
        if self.max_chunk_length <= self.reserved_tokens {
            return Err(format!(
                "scan.max_chunk_length ({}) must exceed scan.reserved_tokens ({})",
                self.max_chunk_length, self.reserved_tokens
            ));
        }
        Ok(())
    }
}

/// Label vocabularies
///
/// Full scans classify against `full`; lite scans against the narrower `basic`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelConfig {
    /// Labels used by lite scans
    #[serde(default = "default_basic_labels")]
    pub basic: Vec<String>,

    /// Labels used by full scans
    #[serde(default = "default_full_labels")]
    pub full: Vec<String>,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            basic: default_basic_labels(),
            full: default_full_labels(),
        }
    }
}

impl LabelConfig {
    fn validate(&self) -> Result<(), String> {
        if self.basic.iter().all(|l| l.trim().is_empty()) {
            return Err("labels.basic cannot be empty".to_string());
        }
        if self.full.iter().all(|l| l.trim().is_empty()) {
            return Err("labels.full cannot be empty".to_string());
        }
        Ok(())
    }

    /// Label set for a scan mode
    pub fn for_mode(&self, mode: ScanMode) -> &[String] {
        match mode {
            ScanMode::Lite => &self.basic,
            ScanMode::Full => &self.full,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Enable JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Log file location
    #[serde(default = "default_local_path")]
    pub local_path: PathBuf,

    /// Log rotation strategy (never, hourly, daily)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.level.to_lowercase().as_str()) {
            return Err(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.level,
                valid_levels.join(", ")
            ));
        }

        let valid_rotations = ["never", "hourly", "daily"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.file_name().is_none() {
            return Err(format!(
                "logging.local_path must name a file: {}",
                self.local_path.display()
            ));
        }

        Ok(())
    }
}

fn default_db_file() -> PathBuf {
    PathBuf::from("pii_scan_history.db")
}

fn default_model_name() -> String {
    BUILTIN_MODEL.to_string()
}

fn default_tokenizer() -> String {
    WORD_TOKENIZER.to_string()
}

fn default_max_token_chars() -> usize {
    64
}

fn default_min_confidence() -> f32 {
    0.5
}

fn default_max_chunk_length() -> usize {
    400
}

fn default_reserved_tokens() -> usize {
    2
}

fn default_basic_labels() -> Vec<String> {
    [
        "person",
        "email",
        "phone number",
        "Social Security Number",
        "credit card number",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_full_labels() -> Vec<String> {
    [
        "person",
        "email",
        "phone number",
        "address",
        "Social Security Number",
        "credit card number",
        "passport number",
        "driver licence",
        "company",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_local_path() -> PathBuf {
    PathBuf::from("logs/pii-scanner.log")
}

fn default_local_rotation() -> String {
    "never".to_string()
}
