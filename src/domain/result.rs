//! Result type alias for the scanner
//!
//! This module provides a convenient Result type alias that uses [`ScanError`]
//! as the error type.

use super::errors::ScanError;

/// Result type alias for scanner operations
///
/// # Examples
///
/// ```
/// use pii_scanner::domain::result::Result;
/// use pii_scanner::domain::errors::ScanError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(ScanError::MissingPath)
/// }
/// ```
pub type Result<T> = std::result::Result<T, ScanError>;
