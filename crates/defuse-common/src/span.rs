//! Source location tracking (byte offsets).

use std::fmt;

/// A half-open byte range into a source file.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub fn new(start: u32, end: u32) -> Self {
        debug_assert!(start <= end, "span start must not exceed end");
        Span { start, end }
    }

    /// Span covering both `self` and `other`.
    pub fn to(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }

    pub fn len(self) -> u32 {
        self.end - self.start
    }

    pub fn is_empty(self) -> bool {
        self.start == self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Maps byte offsets to 1-based line and column numbers.
///
/// Built once per file from the source text; lookups are binary searches
/// over the recorded line-start offsets.
#[derive(Debug, Clone)]
pub struct LineMap {
    line_starts: Vec<u32>,
}

impl LineMap {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0u32];
        for (i, b) in source.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i as u32 + 1);
            }
        }
        LineMap { line_starts }
    }

    /// 1-based (line, column) for a byte offset.
    pub fn location(&self, offset: u32) -> (u32, u32) {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx - 1,
        };
        let column = offset - self.line_starts[line];
        (line as u32 + 1, column + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_join() {
        let a = Span::new(4, 8);
        let b = Span::new(10, 12);
        assert_eq!(a.to(b), Span::new(4, 12));
        assert_eq!(b.to(a), Span::new(4, 12));
    }

    #[test]
    fn line_map_locations() {
        let map = LineMap::new("ab\ncd\n\nxyz");
        assert_eq!(map.location(0), (1, 1));
        assert_eq!(map.location(1), (1, 2));
        assert_eq!(map.location(3), (2, 1));
        assert_eq!(map.location(6), (3, 1));
        assert_eq!(map.location(7), (4, 1));
        assert_eq!(map.location(9), (4, 3));
    }

    #[test]
    fn line_map_single_line() {
        let map = LineMap::new("hello");
        assert_eq!(map.location(4), (1, 5));
    }
}
