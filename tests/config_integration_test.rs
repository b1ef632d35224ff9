//! Integration tests for configuration loading and validation
//!
//! Tests that modify environment variables hold `ENV_MUTEX` so they don't
//! interfere with each other.

use pii_scanner::config::{load_config, load_config_or_default, ScannerConfig};
use pii_scanner::domain::{ScanError, ScanMode};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;
use tempfile::NamedTempFile;

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Helper function to clean up environment variables
fn cleanup_env_vars() {
    for key in [
        "PII_SCANNER_DB_FILE",
        "PII_SCANNER_MODEL_NAME",
        "PII_SCANNER_MAX_CHUNK_LENGTH",
        "PII_SCANNER_BASIC_LABELS",
        "PII_SCANNER_FULL_LABELS",
        "PII_SCANNER_LOG_LEVEL",
        "PII_SCANNER_LOG_FILE",
        "PII_SCANNER_LOG_FILE_ENABLED",
        "TEST_SCAN_DB_PATH",
    ] {
        std::env::remove_var(key);
    }
}

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_complete_config() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let file = write_config(
        r#"
[storage]
db_file = "/var/lib/pii-scanner/history.db"

[model]
name = "builtin-patterns"
tokenizer = "word"
max_token_chars = 32
min_confidence = 0.7

[scan]
default_mode = "lite"
max_chunk_length = 256
reserved_tokens = 4

[labels]
basic = ["email", "phone number"]
full = ["email", "phone number", "person", "address"]

[logging]
level = "debug"
local_enabled = true
local_path = "/var/log/pii-scanner/scan.log"
local_rotation = "daily"
"#,
    );

    let config = load_config(file.path()).unwrap();

    assert_eq!(
        config.storage.db_file,
        PathBuf::from("/var/lib/pii-scanner/history.db")
    );
    assert_eq!(config.model.max_token_chars, 32);
    assert!((config.model.min_confidence - 0.7).abs() < f32::EPSILON);
    assert_eq!(config.scan.default_mode, ScanMode::Lite);
    assert_eq!(config.scan.max_chunk_length, 256);
    assert_eq!(config.scan.reserved_tokens, 4);
    assert_eq!(config.labels.for_mode(ScanMode::Lite).len(), 2);
    assert_eq!(config.labels.for_mode(ScanMode::Full).len(), 4);
    assert_eq!(config.logging.level, "debug");
    assert!(config.logging.local_enabled);
    assert_eq!(config.logging.local_rotation, "daily");
}

#[test]
fn test_empty_config_uses_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let file = write_config("");
    let config = load_config(file.path()).unwrap();
    let defaults = ScannerConfig::default();

    assert_eq!(config.storage.db_file, defaults.storage.db_file);
    assert_eq!(config.scan.default_mode, ScanMode::Full);
    assert_eq!(config.scan.max_chunk_length, 400);
    assert_eq!(config.logging.local_rotation, "never");
    assert!(!config.logging.local_enabled);
}

#[test]
fn test_missing_default_file_falls_back_to_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let config = load_config_or_default("does-not-exist/pii-scanner.toml").unwrap();
    assert_eq!(config.scan.default_mode, ScanMode::Full);
}

#[test]
fn test_explicit_missing_file_is_an_error() {
    let result = load_config("does-not-exist/pii-scanner.toml");
    assert!(matches!(result, Err(ScanError::Configuration(_))));
}

#[test]
fn test_env_var_substitution() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("TEST_SCAN_DB_PATH", "/tmp/substituted.db");

    let file = write_config("[storage]\ndb_file = \"${TEST_SCAN_DB_PATH}\"\n");
    let config = load_config(file.path()).unwrap();
    assert_eq!(config.storage.db_file, PathBuf::from("/tmp/substituted.db"));

    cleanup_env_vars();
}

#[test]
fn test_missing_substitution_variable_fails() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let file = write_config("[storage]\ndb_file = \"${TEST_SCAN_DB_PATH}\"\n");
    let err = load_config(file.path()).unwrap_err();
    assert!(err.to_string().contains("TEST_SCAN_DB_PATH"));
}

#[test]
fn test_env_overrides_take_precedence() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("PII_SCANNER_DB_FILE", "/tmp/override.db");
    std::env::set_var("PII_SCANNER_MAX_CHUNK_LENGTH", "128");
    std::env::set_var("PII_SCANNER_BASIC_LABELS", "email, ssn");
    std::env::set_var("PII_SCANNER_LOG_LEVEL", "warn");

    let file = write_config(
        r#"
[storage]
db_file = "file.db"

[scan]
max_chunk_length = 512
"#,
    );
    let config = load_config(file.path()).unwrap();

    assert_eq!(config.storage.db_file, PathBuf::from("/tmp/override.db"));
    assert_eq!(config.scan.max_chunk_length, 128);
    assert_eq!(config.labels.basic, vec!["email", "ssn"]);
    assert_eq!(config.logging.level, "warn");

    cleanup_env_vars();
}

#[test]
fn test_invalid_env_override_is_rejected() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("PII_SCANNER_MAX_CHUNK_LENGTH", "lots");

    let result = load_config_or_default("does-not-exist/pii-scanner.toml");
    assert!(matches!(result, Err(ScanError::Configuration(_))));

    cleanup_env_vars();
}

#[test]
fn test_invalid_values_fail_validation() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    for contents in [
        "[scan]\ndefault_mode = \"deep\"\n",
        "[scan]\nmax_chunk_length = 2\nreserved_tokens = 2\n",
        "[model]\nmin_confidence = 1.5\n",
        "[labels]\nbasic = []\n",
        "[logging]\nlevel = \"loud\"\n",
        "[logging]\nlocal_rotation = \"weekly\"\n",
    ] {
        let file = write_config(contents);
        assert!(
            load_config(file.path()).is_err(),
            "accepted invalid config: {contents}"
        );
    }
}
