use serde::{Deserialize, Serialize};
use std::fmt;

/// Byte range inside a single statement's text.
///
/// Statements are always one line, so a span is just a half-open
/// `[start, end)` range of byte offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    /// Create a new span.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Create a zero-width span at a single offset.
    pub fn point(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    /// Merge two spans into one that covers both.
    pub fn merge(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }

    /// Shift the span right by `offset` bytes.
    ///
    /// Used to map a span inside one `;`-separated segment back onto the
    /// full input line.
    pub fn shifted(self, offset: usize) -> Span {
        Span::new(self.start + offset, self.end + offset)
    }

    /// Number of bytes covered.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The text covered by this span, or `""` if it does not fit `source`.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        source.get(self.start..self.end).unwrap_or("")
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 1-based column for humans
        write!(f, "col {}", self.start + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_point() {
        let s = Span::point(5);
        assert_eq!(s.start, 5);
        assert_eq!(s.end, 5);
        assert!(s.is_empty());
    }

    #[test]
    fn test_span_merge() {
        let a = Span::new(4, 9);
        let b = Span::new(2, 6);
        assert_eq!(a.merge(b), Span::new(2, 9));
        assert_eq!(b.merge(a), Span::new(2, 9));
    }

    #[test]
    fn test_span_shifted() {
        assert_eq!(Span::new(1, 3).shifted(10), Span::new(11, 13));
    }

    #[test]
    fn test_span_text() {
        let src = "fs.time.year";
        assert_eq!(Span::new(3, 7).text(src), "time");
        assert_eq!(Span::new(10, 40).text(src), "");
    }

    #[test]
    fn test_span_display() {
        assert_eq!(format!("{}", Span::new(6, 9)), "col 7");
    }
}
