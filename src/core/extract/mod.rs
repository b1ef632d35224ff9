//! Text extraction from supported document formats
//!
//! Each [`DocumentFormat`] maps to one reader. Lite scans cap the extracted
//! text at [`LITE_SCAN_LIMIT`](crate::domain::LITE_SCAN_LIMIT) bytes, and the
//! structured readers stop parsing as soon as the cap is reached.
//!
//! `None` from [`extract_text`] means extraction failed; an empty document
//! yields `Some("")`.

pub mod accumulator;
mod docx;
mod ooxml;
mod plain;
mod pptx;
mod xlsx;

pub use accumulator::{truncate_utf8, TextAccumulator};

use crate::domain::{DocumentFormat, ScanError, ScanMode};
use crate::log_stage_failure;
use std::path::Path;
use thiserror::Error;

/// Why a document could not be turned into text
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("unsupported file type: {0}")]
    Unsupported(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid UTF-8: {0}")]
    InvalidUtf8(String),

    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("missing document part: {0}")]
    MissingPart(String),

    #[error("XML error: {0}")]
    Xml(String),
}

impl From<quick_xml::Error> for ExtractError {
    fn from(err: quick_xml::Error) -> Self {
        ExtractError::Xml(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for ExtractError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        ExtractError::Xml(err.to_string())
    }
}

/// Extract text, reporting the failure as a typed error
///
/// # Errors
///
/// Returns an [`ExtractError`] for unsupported formats, unreadable files,
/// corrupt archives, malformed XML or invalid UTF-8.
pub fn try_extract_text(
    path: &Path,
    format: &DocumentFormat,
    mode: ScanMode,
) -> Result<String, ExtractError> {
    let limit = mode.byte_limit();
    match format {
        DocumentFormat::PlainText => plain::read_plain_text(path, limit),
        DocumentFormat::WordProcessor => docx::read_docx(path, limit),
        DocumentFormat::Spreadsheet => xlsx::read_xlsx(path, limit),
        DocumentFormat::Presentation => pptx::read_pptx(path, limit),
        DocumentFormat::Unsupported(ext) => Err(ExtractError::Unsupported(ext.clone())),
    }
}

/// Extract text, logging and swallowing failures
///
/// # Examples
///
/// ```no_run
/// use pii_scanner::core::extract::extract_text;
/// use pii_scanner::domain::{DocumentFormat, ScanMode};
/// use std::path::Path;
///
/// let path = Path::new("minutes.docx");
/// let format = DocumentFormat::from_path(path);
/// if let Some(text) = extract_text(path, &format, ScanMode::Full) {
///     println!("{} bytes of text", text.len());
/// }
/// ```
pub fn extract_text(path: &Path, format: &DocumentFormat, mode: ScanMode) -> Option<String> {
    match try_extract_text(path, format, mode) {
        Ok(text) => {
            tracing::debug!(
                path = %path.display(),
                format = %format,
                bytes = text.len(),
                "Extracted text"
            );
            Some(text)
        }
        Err(e) => {
            let err = e.into_scan_error(path);
            log_stage_failure!(path, "extract", err);
            None
        }
    }
}

impl ExtractError {
    /// Attach the file path, producing the domain error
    pub fn into_scan_error(self, path: &Path) -> ScanError {
        ScanError::Extraction {
            path: path.to_path_buf(),
            message: self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_unsupported_format_is_none() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.pdf");
        fs::write(&path, b"%PDF-1.7").unwrap();

        let format = DocumentFormat::from_path(&path);
        assert!(extract_text(&path, &format, ScanMode::Full).is_none());
        assert!(matches!(
            try_extract_text(&path, &format, ScanMode::Full),
            Err(ExtractError::Unsupported(_))
        ));
    }

    #[test]
    fn test_empty_text_file_is_some_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.txt");
        fs::write(&path, b"").unwrap();

        let text = extract_text(&path, &DocumentFormat::PlainText, ScanMode::Full);
        assert_eq!(text.as_deref(), Some(""));
    }

    #[test]
    fn test_legacy_binary_doc_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("legacy.doc");
        fs::write(&path, [0xd0, 0xcf, 0x11, 0xe0, 0xa1, 0xb1, 0x1a, 0xe1]).unwrap();

        let format = DocumentFormat::from_path(&path);
        assert_eq!(format, DocumentFormat::WordProcessor);
        assert!(extract_text(&path, &format, ScanMode::Full).is_none());
    }

    #[test]
    fn test_into_scan_error_maps_to_extraction() {
        let err = ExtractError::MissingPart("word/document.xml".into())
            .into_scan_error(Path::new("/tmp/a.docx"));
        assert!(matches!(err, ScanError::Extraction { .. }));
    }
}
