//! Shared plumbing for Office Open XML packages (zip containers of XML parts)

use super::ExtractError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use zip::result::ZipError;
use zip::ZipArchive;

pub type Package = ZipArchive<File>;

/// Largest up-front buffer reserved for a part, whatever its header declares
const MAX_PREALLOC: u64 = 1024 * 1024;

/// Open an OOXML package
pub fn open_package(path: &Path) -> Result<Package, ExtractError> {
    let file = File::open(path)?;
    Ok(ZipArchive::new(file)?)
}

/// Read a named part into memory
///
/// # Errors
///
/// Returns [`ExtractError::MissingPart`] when the package has no such part.
pub fn read_part(package: &mut Package, name: &str) -> Result<Vec<u8>, ExtractError> {
    let mut entry = match package.by_name(name) {
        Ok(entry) => entry,
        Err(ZipError::FileNotFound) => return Err(ExtractError::MissingPart(name.to_string())),
        Err(e) => return Err(e.into()),
    };
    let mut bytes = Vec::with_capacity(initial_capacity(entry.size()));
    entry.read_to_end(&mut bytes)?;
    Ok(bytes)
}

fn initial_capacity(declared: u64) -> usize {
    declared.min(MAX_PREALLOC) as usize
}

/// Read a part that may legitimately be absent
pub fn read_optional_part(
    package: &mut Package,
    name: &str,
) -> Result<Option<Vec<u8>>, ExtractError> {
    match read_part(package, name) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(ExtractError::MissingPart(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Part names of the form `{prefix}{N}{suffix}`, ordered by `N`
///
/// `numbered_parts(pkg, "ppt/slides/slide", ".xml")` yields slide2 before
/// slide10, which plain string ordering would not.
pub fn numbered_parts(package: &Package, prefix: &str, suffix: &str) -> Vec<String> {
    let mut parts: Vec<(u32, String)> = package
        .file_names()
        .filter_map(|name| {
            let index = name.strip_prefix(prefix)?.strip_suffix(suffix)?;
            let index = index.parse::<u32>().ok()?;
            Some((index, name.to_string()))
        })
        .collect();
    parts.sort();
    parts.into_iter().map(|(_, name)| name).collect()
}

/// Value of an attribute by qualified name, unescaped
pub fn attribute(element: &BytesStart<'_>, name: &str) -> Result<Option<String>, ExtractError> {
    match element.try_get_attribute(name)? {
        Some(attr) => Ok(Some(attr.unescape_value()?.into_owned())),
        None => Ok(None),
    }
}

/// Relationship ids (`r:id`) of every `element`, in document order
///
/// Used for `<sheet>` entries of a workbook and `<sldId>` entries of a
/// presentation, whose order is the reading order of the parts.
pub fn relationship_ids(xml: &[u8], element: &[u8]) -> Result<Vec<String>, ExtractError> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut ids = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == element => {
                if let Some(id) = attribute(&e, "r:id")? {
                    ids.push(id);
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(ids)
}

/// Relationship id to target map from a `.rels` part
pub fn parse_relationships(xml: &[u8]) -> Result<HashMap<String, String>, ExtractError> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut targets = HashMap::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"Relationship" => {
                if let (Some(id), Some(target)) = (attribute(&e, "Id")?, attribute(&e, "Target")?)
                {
                    targets.insert(id, target);
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(targets)
}

/// Parts listed by a root part, in its order
///
/// Reads `root` and its relationships part, collects the `r:id` of every
/// `element` and resolves each against `base_dir`. Returns `None` when either
/// part is absent or no listed id resolves, so callers can fall back to
/// [`numbered_parts`].
pub fn ordered_parts(
    package: &mut Package,
    root: &str,
    rels: &str,
    element: &[u8],
    base_dir: &str,
) -> Result<Option<Vec<String>>, ExtractError> {
    let root = read_optional_part(package, root)?;
    let rels = read_optional_part(package, rels)?;
    let (Some(root), Some(rels)) = (root, rels) else {
        return Ok(None);
    };

    let targets = parse_relationships(&rels)?;
    let parts: Vec<String> = relationship_ids(&root, element)?
        .iter()
        .filter_map(|id| targets.get(id))
        .map(|target| resolve_target(base_dir, target))
        .collect();
    Ok((!parts.is_empty()).then_some(parts))
}

/// Resolve a relationship target against the directory of its source part
///
/// `resolve_target("xl/", "worksheets/sheet1.xml")` is `xl/worksheets/sheet1.xml`;
/// absolute targets (`/xl/...`) are package-rooted.
pub fn resolve_target(base_dir: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }
    let mut segments: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}
