//! Document coordinates.
//!
//! Evaluation reports and diagnostics arrive from an LSP-speaking analysis process, so the
//! overlay keeps every coordinate in the LSP position encoding: zero-based lines and UTF-16
//! code unit columns. Hosts that index text differently convert at their own boundary.

/// A zero-based document position (`character` counted in UTF-16 code units).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    /// Line number (0-based).
    pub line: u32,
    /// Column (UTF-16 code units, 0-based).
    pub character: u32,
}

impl Position {
    /// Create a new position.
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// A half-open range between two positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Range {
    /// Range start position (inclusive).
    pub start: Position,
    /// Range end position (exclusive).
    pub end: Position,
}

impl Range {
    /// Create a new range.
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// A zero-width range anchored at `pos`.
    pub fn point(pos: Position) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    /// Returns `true` if the range is zero-width.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Number of UTF-16 code units in `text`.
pub fn utf16_len(text: &str) -> usize {
    text.encode_utf16().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf16_len_counts_surrogate_pairs() {
        assert_eq!(utf16_len("a👋b"), 4);
        assert_eq!(utf16_len("ä"), 1);
        assert_eq!(utf16_len(""), 0);
    }

    #[test]
    fn test_point_range_is_empty() {
        let range = Range::point(Position::new(2, 7));
        assert!(range.is_empty());
        assert!(!Range::new(Position::new(0, 0), Position::new(0, 1)).is_empty());
    }
}
