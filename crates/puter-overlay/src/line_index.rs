//! Rope-backed logical line index.
//!
//! Used by the in-memory [`Workspace`](crate::workspace::Workspace) host to answer
//! "does this line exist, and where does it end" queries in O(log N).

use crate::position::utf16_len;
use ropey::Rope;

/// Logical line index.
pub struct LineIndex {
    rope: Rope,
}

impl LineIndex {
    /// Create an empty line index.
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    /// Build a line index from text.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    /// Replace the whole text.
    pub fn replace_text(&mut self, text: &str) {
        self.rope = Rope::from_str(text);
    }

    /// Total line count.
    ///
    /// An empty document has one (empty) line, and a trailing newline opens a final empty line.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Total character count.
    pub fn char_count(&self) -> usize {
        self.rope.len_chars()
    }

    /// Text of the given line, without its line terminator.
    pub fn get_line_text(&self, line_number: usize) -> Option<String> {
        if line_number >= self.rope.len_lines() {
            return None;
        }

        let mut text = self.rope.line(line_number).to_string();
        if text.ends_with('\n') {
            text.pop();
        }
        if text.ends_with('\r') {
            text.pop();
        }

        Some(text)
    }

    /// Length of the given line in UTF-16 code units (the end-of-line column).
    pub fn line_utf16_len(&self, line_number: usize) -> Option<usize> {
        self.get_line_text(line_number).map(|text| utf16_len(&text))
    }

    /// Complete text.
    pub fn get_text(&self) -> String {
        self.rope.to_string()
    }
}

impl Default for LineIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_index_has_one_line() {
        let index = LineIndex::new();
        assert_eq!(index.line_count(), 1);
        assert_eq!(index.char_count(), 0);
        assert_eq!(index.get_line_text(0).as_deref(), Some(""));
    }

    #[test]
    fn test_line_text_strips_terminators() {
        let index = LineIndex::from_text("a = 1\r\nb = a + 1\n");
        assert_eq!(index.line_count(), 3);
        assert_eq!(index.get_line_text(0).as_deref(), Some("a = 1"));
        assert_eq!(index.get_line_text(1).as_deref(), Some("b = a + 1"));
        assert_eq!(index.get_line_text(2).as_deref(), Some(""));
        assert_eq!(index.get_line_text(3), None);
    }

    #[test]
    fn test_line_utf16_len() {
        let index = LineIndex::from_text("// | 👋 + 1\nx");
        assert_eq!(index.line_utf16_len(0), Some(11));
        assert_eq!(index.line_utf16_len(1), Some(1));
        assert_eq!(index.line_utf16_len(2), None);
    }

    #[test]
    fn test_replace_text() {
        let mut index = LineIndex::from_text("1\n2\n3\n4\n5");
        assert_eq!(index.line_count(), 5);
        index.replace_text("1");
        assert_eq!(index.line_count(), 1);
        assert_eq!(index.get_text(), "1");
    }
}
