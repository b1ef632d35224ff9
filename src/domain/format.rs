//! Supported document formats

use std::fmt;
use std::path::Path;

/// Document format resolved from a file extension
///
/// The set of readable formats is closed; anything outside the allow-list is
/// `Unsupported` and short-circuits before any I/O.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DocumentFormat {
    /// `.txt`
    PlainText,
    /// `.docx` (and `.doc`, read as Office Open XML)
    WordProcessor,
    /// `.xlsx`
    Spreadsheet,
    /// `.pptx`
    Presentation,
    /// Any other extension (lowercased, without the dot; empty if none)
    Unsupported(String),
}

impl DocumentFormat {
    /// Resolve the format of a path from its extension (case-insensitive)
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        Self::from_extension(&ext)
    }

    /// Resolve a format from a bare extension such as `"docx"`
    pub fn from_extension(ext: &str) -> Self {
        match ext.trim_start_matches('.').to_lowercase().as_str() {
            "txt" => DocumentFormat::PlainText,
            "doc" | "docx" => DocumentFormat::WordProcessor,
            "xlsx" => DocumentFormat::Spreadsheet,
            "pptx" => DocumentFormat::Presentation,
            other => DocumentFormat::Unsupported(other.to_string()),
        }
    }

    /// Check whether the orchestrator should process this format
    pub fn is_supported(&self) -> bool {
        !matches!(self, DocumentFormat::Unsupported(_))
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentFormat::PlainText => f.write_str("plain text"),
            DocumentFormat::WordProcessor => f.write_str("word processor"),
            DocumentFormat::Spreadsheet => f.write_str("spreadsheet"),
            DocumentFormat::Presentation => f.write_str("presentation"),
            DocumentFormat::Unsupported(ext) => write!(f, "unsupported (.{ext})"),
        }
    }
}
