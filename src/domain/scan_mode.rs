//! Scan mode selection

use super::errors::ScanError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Byte cap applied to fingerprints and extracted text in lite mode (1 MiB)
pub const LITE_SCAN_LIMIT: usize = 1024 * 1024;

/// How much of each file a scan covers
///
/// `Lite` trades completeness for speed: only the first [`LITE_SCAN_LIMIT`]
/// bytes are fingerprinted and at most that much text is extracted, and the
/// detector runs the reduced label set. `Full` covers entire file content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
    /// Bounded-prefix scan
    Lite,
    /// Entire-content scan
    #[default]
    Full,
}

impl ScanMode {
    /// Lowercase spelling used in the history store and on the console
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanMode::Lite => "lite",
            ScanMode::Full => "full",
        }
    }

    /// Byte cap for this mode, if any
    pub fn byte_limit(&self) -> Option<usize> {
        match self {
            ScanMode::Lite => Some(LITE_SCAN_LIMIT),
            ScanMode::Full => None,
        }
    }
}

impl fmt::Display for ScanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScanMode {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lite" => Ok(ScanMode::Lite),
            "full" => Ok(ScanMode::Full),
            _ => Err(ScanError::InvalidScanType(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("lite", ScanMode::Lite)]
    #[test_case("LITE", ScanMode::Lite)]
    #[test_case("full", ScanMode::Full)]
    #[test_case(" Full ", ScanMode::Full)]
    fn test_parse_scan_mode(input: &str, expected: ScanMode) {
        assert_eq!(input.parse::<ScanMode>().unwrap(), expected);
    }

    #[test]
    fn test_parse_invalid_scan_mode() {
        let err = "quick".parse::<ScanMode>().unwrap_err();
        assert!(matches!(err, ScanError::InvalidScanType(ref s) if s == "quick"));
    }

    #[test]
    fn test_default_is_full() {
        assert_eq!(ScanMode::default(), ScanMode::Full);
    }

    #[test]
    fn test_byte_limit() {
        assert_eq!(ScanMode::Lite.byte_limit(), Some(1024 * 1024));
        assert_eq!(ScanMode::Full.byte_limit(), None);
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&ScanMode::Lite).unwrap();
        assert_eq!(json, "\"lite\"");
    }
}
