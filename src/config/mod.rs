//! Configuration management for the scanner.
//!
//! Configuration comes from three layers, later ones winning:
//!
//! 1. Built-in defaults (every field has one)
//! 2. An optional TOML file, with `${VAR_NAME}` substitution
//! 3. `PII_SCANNER_*` environment variables (a `.env` file is honoured)
//!
//! # Example Configuration
//!
//! ```toml
//! [storage]
//! db_file = "/var/lib/pii-scanner/history.db"
//!
//! [model]
//! name = "builtin-patterns"
//! # pattern_library = "/etc/pii-scanner/patterns.toml"
//!
//! [scan]
//! max_chunk_length = 400
//!
//! [labels]
//! basic = ["person", "email", "phone number"]
//!
//! [logging]
//! level = "info"
//! local_enabled = true
//! local_path = "/var/log/pii-scanner/scanner.log"
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Setting |
//! |---|---|
//! | `PII_SCANNER_DB_FILE` | `storage.db_file` |
//! | `PII_SCANNER_MODEL_NAME` | `model.name` |
//! | `PII_SCANNER_PATTERN_LIBRARY` | `model.pattern_library` |
//! | `PII_SCANNER_MAX_CHUNK_LENGTH` | `scan.max_chunk_length` |
//! | `PII_SCANNER_BASIC_LABELS` | `labels.basic` (comma separated) |
//! | `PII_SCANNER_FULL_LABELS` | `labels.full` (comma separated) |
//! | `PII_SCANNER_LOG_LEVEL` | `logging.level` |
//! | `PII_SCANNER_LOG_FILE` | `logging.local_path` (enables file logging) |
//! | `PII_SCANNER_LOG_FILE_ENABLED` | `logging.local_enabled` |

pub mod loader;
pub mod schema;

// Re-export commonly used types
pub use loader::{load_config, load_config_or_default, ENV_PREFIX};
pub use schema::{
    LabelConfig, LoggingConfig, ModelConfig, ScanConfig, ScannerConfig, StorageConfig,
    BUILTIN_MODEL, WORD_TOKENIZER,
};
