//! Presentations: text-bearing shapes across slides in presentation order

use super::accumulator::TextAccumulator;
use super::ooxml::{numbered_parts, open_package, ordered_parts, read_part, Package};
use super::ExtractError;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::path::Path;

/// Extract shape text, one shape per line with its paragraphs newline-joined
pub fn read_pptx(path: &Path, limit: Option<usize>) -> Result<String, ExtractError> {
    let mut package = open_package(path)?;
    let slides = slide_parts(&mut package)?;

    let mut acc = TextAccumulator::new(limit);
    for slide in slides {
        let xml = read_part(&mut package, &slide)?;
        append_slide_shapes(&xml, &mut acc)?;
        if acc.is_capped() {
            break;
        }
    }
    Ok(acc.into_text())
}

const PRESENTATION_PART: &str = "ppt/presentation.xml";
const PRESENTATION_RELS_PART: &str = "ppt/_rels/presentation.xml.rels";

/// Slide part names in the order of the presentation's slide list
///
/// Falls back to `slideN.xml` numbering when the presentation relationships
/// cannot be resolved.
fn slide_parts(package: &mut Package) -> Result<Vec<String>, ExtractError> {
    match ordered_parts(package, PRESENTATION_PART, PRESENTATION_RELS_PART, b"sldId", "ppt/")? {
        Some(parts) => Ok(parts),
        None => Ok(numbered_parts(package, "ppt/slides/slide", ".xml")),
    }
}

#[derive(Default)]
struct Shape {
    has_text_body: bool,
    paragraphs: Vec<String>,
}

pub(crate) fn append_slide_shapes(
    xml: &[u8],
    acc: &mut TextAccumulator,
) -> Result<(), ExtractError> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();

    let mut shape: Option<Shape> = None;
    let mut paragraph: Option<String> = None;
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"sp" => shape = Some(Shape::default()),
                b"txBody" => {
                    if let Some(shape) = shape.as_mut() {
                        shape.has_text_body = true;
                    }
                }
                b"p" if shape.is_some() => paragraph = Some(String::new()),
                b"t" if paragraph.is_some() => in_text = true,
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"p" => {
                    if let Some(shape) = shape.as_mut() {
                        shape.paragraphs.push(String::new());
                    }
                }
                b"br" => {
                    if let Some(paragraph) = paragraph.as_mut() {
                        paragraph.push('\n');
                    }
                }
                _ => {}
            },
            Event::Text(e) if in_text => {
                if let Some(paragraph) = paragraph.as_mut() {
                    paragraph.push_str(&e.unescape()?);
                }
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => {
                    if let (Some(shape), Some(text)) = (shape.as_mut(), paragraph.take()) {
                        shape.paragraphs.push(text);
                    }
                }
                b"sp" => {
                    if let Some(done) = shape.take() {
                        if done.has_text_body && acc.push_line(&done.paragraphs.join("\n")) {
                            return Ok(());
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
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slide(shapes: &str) -> String {
        format!(
            r#"<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld><p:spTree>{shapes}</p:spTree></p:cSld></p:sld>"#
        )
    }

    #[test]
    fn test_shapes_and_paragraphs() {
        let xml = slide(
            r#"<p:sp><p:txBody><a:bodyPr/><a:p><a:r><a:t>Quarterly review</a:t></a:r></a:p></p:txBody></p:sp>
<p:sp><p:txBody><a:p><a:r><a:t>Owner: </a:t></a:r><a:r><a:t>Jane Doe</a:t></a:r></a:p><a:p><a:r><a:t>555-123-4567</a:t></a:r></a:p></p:txBody></p:sp>"#,
        );
        let mut acc = TextAccumulator::new(None);
        append_slide_shapes(xml.as_bytes(), &mut acc).unwrap();
        assert_eq!(
            acc.into_text(),
            "Quarterly review\nOwner: Jane Doe\n555-123-4567\n"
        );
    }

    #[test]
    fn test_shapes_without_text_body_are_skipped() {
        let xml = slide(
            r#"<p:sp><p:nvSpPr><p:cNvPr id="2" name="Rectangle"/></p:nvSpPr></p:sp>
<p:sp><p:txBody><a:p><a:r><a:t>caption</a:t></a:r></a:p></p:txBody></p:sp>"#,
        );
        let mut acc = TextAccumulator::new(None);
        append_slide_shapes(xml.as_bytes(), &mut acc).unwrap();
        assert_eq!(acc.into_text(), "caption\n");
    }

    #[test]
    fn test_empty_text_frame_yields_empty_line() {
        let xml = slide(r#"<p:sp><p:txBody><a:bodyPr/><a:p/></p:txBody></p:sp>"#);
        let mut acc = TextAccumulator::new(None);
        append_slide_shapes(xml.as_bytes(), &mut acc).unwrap();
        assert_eq!(acc.into_text(), "\n");
    }

    #[test]
    fn test_limit_stops_after_shape() {
        let xml = slide(
            r#"<p:sp><p:txBody><a:p><a:r><a:t>abcdefgh</a:t></a:r></a:p></p:txBody></p:sp>
<p:sp><p:txBody><a:p><a:r><a:t>never</a:t></a:r></a:p></p:txBody></p:sp>"#,
        );
        let mut acc = TextAccumulator::new(Some(4));
        append_slide_shapes(xml.as_bytes(), &mut acc).unwrap();
        assert_eq!(acc.into_text(), "abcd");
    }
}
