//! Word-processor documents (`word/document.xml`)

use super::accumulator::TextAccumulator;
use super::ooxml::{open_package, read_part};
use super::ExtractError;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::path::Path;

const DOCUMENT_PART: &str = "word/document.xml";

/// Extract paragraph text, one paragraph per line
pub fn read_docx(path: &Path, limit: Option<usize>) -> Result<String, ExtractError> {
    let mut package = open_package(path)?;
    let xml = read_part(&mut package, DOCUMENT_PART)?;
    paragraphs_from_xml(&xml, limit)
}

pub(crate) fn paragraphs_from_xml(xml: &[u8], limit: Option<usize>) -> Result<String, ExtractError> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut acc = TextAccumulator::new(limit);

    let mut paragraph = String::new();
    let mut depth = 0usize;
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"p" => depth += 1,
                b"t" if depth > 0 => in_text = true,
                b"tab" if depth > 0 => paragraph.push('\t'),
                b"br" | b"cr" if depth > 0 => paragraph.push('\n'),
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"p" if depth == 0 => {
                    if acc.push_line("") {
                        break;
                    }
                }
                b"tab" if depth > 0 => paragraph.push('\t'),
                b"br" | b"cr" if depth > 0 => paragraph.push('\n'),
                _ => {}
            },
            Event::Text(e) if in_text => paragraph.push_str(&e.unescape()?),
            Event::CData(e) if in_text => {
                paragraph.push_str(&String::from_utf8_lossy(&e.into_inner()));
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" if depth > 0 => {
                    depth -= 1;
                    // nested paragraphs (text boxes) fold into the outer one
                    if depth == 0 {
                        let done = acc.push_line(&paragraph);
                        paragraph.clear();
                        if done {
                            break;
                        }
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(acc.into_text())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
        )
    }

    #[test]
    fn test_paragraphs_are_newline_separated() {
        let xml = document(
            "<w:p><w:r><w:t>Name: Jane</w:t></w:r><w:r><w:t xml:space=\"preserve\"> Doe</w:t></w:r></w:p>\
             <w:p><w:r><w:t>jane@example.com</w:t></w:r></w:p>",
        );
        let text = paragraphs_from_xml(xml.as_bytes(), None).unwrap();
        assert_eq!(text, "Name: Jane Doe\njane@example.com\n");
    }

    #[test]
    fn test_tabs_breaks_and_empty_paragraphs() {
        let xml = document(
            "<w:p><w:r><w:t>a</w:t><w:tab/><w:t>b</w:t><w:br/><w:t>c</w:t></w:r></w:p><w:p/>",
        );
        let text = paragraphs_from_xml(xml.as_bytes(), None).unwrap();
        assert_eq!(text, "a\tb\nc\n\n");
    }

    #[test]
    fn test_entities_are_unescaped() {
        let xml = document("<w:p><w:r><w:t>Smith &amp; Sons</w:t></w:r></w:p>");
        let text = paragraphs_from_xml(xml.as_bytes(), None).unwrap();
        assert_eq!(text, "Smith & Sons\n");
    }

    #[test]
    fn test_non_text_runs_are_ignored() {
        let xml = document(
            "<w:p><w:r><w:instrText>PAGE</w:instrText><w:t>visible</w:t></w:r></w:p>",
        );
        let text = paragraphs_from_xml(xml.as_bytes(), None).unwrap();
        assert_eq!(text, "visible\n");
    }

    #[test]
    fn test_limit_stops_after_first_paragraph_over_cap() {
        let xml = document(
            "<w:p><w:r><w:t>0123456789</w:t></w:r></w:p><w:p><w:r><w:t>never read</w:t></w:r></w:p>",
        );
        let text = paragraphs_from_xml(xml.as_bytes(), Some(5)).unwrap();
        assert_eq!(text, "01234");
    }
}
