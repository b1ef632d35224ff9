//! Spreadsheets: shared strings plus worksheets in workbook order

use super::accumulator::TextAccumulator;
use super::ooxml::{
    attribute, numbered_parts, open_package, ordered_parts, read_optional_part, read_part,
    Package,
};
use super::ExtractError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::path::Path;

const WORKBOOK_PART: &str = "xl/workbook.xml";
const WORKBOOK_RELS_PART: &str = "xl/_rels/workbook.xml.rels";
const SHARED_STRINGS_PART: &str = "xl/sharedStrings.xml";

/// Column count of the widest sheet OOXML allows (`XFD`)
const MAX_COLUMNS: usize = 16_384;

/// Extract cell values: one line per row, cells joined with single spaces
pub fn read_xlsx(path: &Path, limit: Option<usize>) -> Result<String, ExtractError> {
    let mut package = open_package(path)?;

    let shared = match read_optional_part(&mut package, SHARED_STRINGS_PART)? {
        Some(xml) => parse_shared_strings(&xml)?,
        None => Vec::new(),
    };

    let mut acc = TextAccumulator::new(limit);
    for sheet in sheet_parts(&mut package)? {
        let xml = read_part(&mut package, &sheet)?;
        append_sheet_rows(&xml, &shared, &mut acc)?;
        if acc.is_capped() {
            break;
        }
    }
    Ok(acc.into_text())
}

/// Worksheet part names in the order the workbook lists them
///
/// Falls back to `sheetN.xml` numbering when the workbook relationships
/// cannot be resolved.
fn sheet_parts(package: &mut Package) -> Result<Vec<String>, ExtractError> {
    match ordered_parts(package, WORKBOOK_PART, WORKBOOK_RELS_PART, b"sheet", "xl/")? {
        Some(parts) => Ok(parts),
        None => Ok(numbered_parts(package, "xl/worksheets/sheet", ".xml")),
    }
}

/// Shared string table; rich-text runs are concatenated, phonetic hints skipped
pub(crate) fn parse_shared_strings(xml: &[u8]) -> Result<Vec<String>, ExtractError> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut strings = Vec::new();

    let mut current = String::new();
    let mut in_item = false;
    let mut in_text = false;
    let mut in_phonetic = false;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"si" => {
                    in_item = true;
                    current.clear();
                }
                b"rPh" => in_phonetic = true,
                b"t" if in_item && !in_phonetic => in_text = true,
                _ => {}
            },
            Event::Empty(e) if e.local_name().as_ref() == b"si" => strings.push(String::new()),
            Event::Text(e) if in_text => current.push_str(&e.unescape()?),
            Event::End(e) => match e.local_name().as_ref() {
                b"si" => {
                    in_item = false;
                    strings.push(std::mem::take(&mut current));
                }
                b"rPh" => in_phonetic = false,
                b"t" => in_text = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(strings)
}

/// Zero-based column index from a cell reference such as `C7`
///
/// # Errors
///
/// Returns [`ExtractError::Xml`] for columns past `XFD`.
fn column_index(reference: &str) -> Result<Option<usize>, ExtractError> {
    let letters = reference
        .bytes()
        .take_while(u8::is_ascii_alphabetic)
        .map(|b| usize::from(b.to_ascii_uppercase() - b'A') + 1);

    let mut index: Option<usize> = None;
    for letter in letters {
        let next = index
            .unwrap_or(0)
            .checked_mul(26)
            .and_then(|i| i.checked_add(letter))
            .filter(|i| *i <= MAX_COLUMNS)
            .ok_or_else(|| {
                ExtractError::Xml(format!("cell reference out of range: {reference}"))
            })?;
        index = Some(next);
    }
    Ok(index.map(|i| i - 1))
}

fn cell_column(element: &BytesStart<'_>) -> Result<Option<usize>, ExtractError> {
    match attribute(element, "r")? {
        Some(reference) => column_index(&reference),
        None => Ok(None),
    }
}

#[derive(Default)]
struct Cell {
    kind: Option<String>,
    column: Option<usize>,
    value: String,
}

impl Cell {
    fn render(&self, shared: &[String]) -> String {
        match self.kind.as_deref() {
            Some("s") => self
                .value
                .trim()
                .parse::<usize>()
                .ok()
                .and_then(|i| shared.get(i).cloned())
                .unwrap_or_default(),
            Some("b") => match self.value.trim() {
                "1" => "TRUE".to_string(),
                "0" => "FALSE".to_string(),
                other => other.to_string(),
            },
            _ => self.value.clone(),
        }
    }
}

pub(crate) fn append_sheet_rows(
    xml: &[u8],
    shared: &[String],
    acc: &mut TextAccumulator,
) -> Result<(), ExtractError> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();

    let mut row: Vec<String> = Vec::new();
    let mut cell: Option<Cell> = None;
    let mut in_value = false;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"row" => row.clear(),
                b"c" => {
                    cell = Some(Cell {
                        kind: attribute(&e, "t")?,
                        column: cell_column(&e)?,
                        value: String::new(),
                    });
                }
                // <v> for stored values, <t> inside <is> for inline strings
                b"v" | b"t" if cell.is_some() => in_value = true,
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"row" => {
                    if acc.push_line("") {
                        return Ok(());
                    }
                }
                b"c" => {
                    let column = cell_column(&e)?;
                    place_cell(&mut row, column, String::new());
                }
                _ => {}
            },
            Event::Text(e) if in_value => {
                if let Some(cell) = cell.as_mut() {
                    cell.value.push_str(&e.unescape()?);
                }
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"v" | b"t" => in_value = false,
                b"c" => {
                    if let Some(done) = cell.take() {
                        let rendered = done.render(shared);
                        place_cell(&mut row, done.column, rendered);
                    }
                }
                b"row" => {
                    if acc.push_line(&row.join(" ")) {
                        return Ok(());
                    }
                    row.clear();
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

/// Put a cell at its column, padding skipped columns with empty values
fn place_cell(row: &mut Vec<String>, column: Option<usize>, value: String) {
    if let Some(column) = column {
        if column > row.len() {
            row.resize(column, String::new());
        }
    }
    row.push(value);
}
