//! Plain text reader

use super::ExtractError;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Read a UTF-8 text file, reading at most `limit` bytes when one is given
///
/// A multi-byte sequence cut in half by the limit is dropped. Any other
/// invalid UTF-8 fails the read.
pub fn read_plain_text(path: &Path, limit: Option<usize>) -> Result<String, ExtractError> {
    let file = File::open(path)?;
    let mut bytes = Vec::new();
    match limit {
        Some(limit) => {
            file.take(limit as u64).read_to_end(&mut bytes)?;
        }
        None => {
            let mut file = file;
            file.read_to_end(&mut bytes)?;
        }
    }

    let hit_limit = limit.is_some_and(|limit| bytes.len() == limit);
    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(e) => {
            let utf8 = e.utf8_error();
            // error_len() is None only for an incomplete sequence at the end
            if hit_limit && utf8.error_len().is_none() {
                let valid = utf8.valid_up_to();
                let mut bytes = e.into_bytes();
                bytes.truncate(valid);
                String::from_utf8(bytes).map_err(|e| ExtractError::InvalidUtf8(e.to_string()))
            } else {
                Err(ExtractError::InvalidUtf8(utf8.to_string()))
            }
        }
    }
}
