//! Bounded text buffer shared by the format readers

/// Truncate a string to at most `max_bytes` bytes without splitting a char
pub fn truncate_utf8(text: &mut String, max_bytes: usize) {
    if text.len() <= max_bytes {
        return;
    }
    let mut cut = max_bytes;
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }
    text.truncate(cut);
}

/// Collects extracted lines and enforces an optional byte cap
///
/// Readers push one structural unit at a time (paragraph, row, shape). Once
/// the buffer grows past the cap it is cut back to the cap and reports itself
/// full, and the reader stops parsing.
#[derive(Debug, Default)]
pub struct TextAccumulator {
    text: String,
    limit: Option<usize>,
    capped: bool,
}

impl TextAccumulator {
    pub fn new(limit: Option<usize>) -> Self {
        Self {
            text: String::new(),
            limit,
            capped: false,
        }
    }

    /// Append a unit followed by a newline
    ///
    /// Returns `true` when the cap has been reached and parsing should stop.
    pub fn push_line(&mut self, line: &str) -> bool {
        if self.capped {
            return true;
        }
        self.text.push_str(line);
        self.text.push('\n');

        if let Some(limit) = self.limit {
            if self.text.len() > limit {
                truncate_utf8(&mut self.text, limit);
                self.capped = true;
            }
        }
        self.capped
    }

    pub fn is_capped(&self) -> bool {
        self.capped
    }

    pub fn into_text(self) -> String {
        self.text
    }
}
