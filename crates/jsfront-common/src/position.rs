//! Line/column lookup for byte offsets.

use serde::Serialize;

/// A 1-based line and column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Location {
    pub line: u32,
    pub column: u32,
}

/// Precomputed line start offsets for a source text.
///
/// Only `\n` is treated as a line break here; diagnostics only need to be
/// close enough for a human to find the spot.
#[derive(Clone, Debug, Default)]
pub struct LineMap {
    line_starts: Vec<u32>,
}

impl LineMap {
    pub fn build(text: &str) -> LineMap {
        let mut line_starts = vec![0];
        line_starts.extend(memchr::memchr_iter(b'\n', text.as_bytes()).map(|i| i as u32 + 1));
        LineMap { line_starts }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Convert a byte offset into a 1-based line/column pair.
    pub fn location(&self, offset: u32) -> Location {
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx - 1,
        };
        Location {
            line: line_idx as u32 + 1,
            column: offset - self.line_starts[line_idx] + 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_map_locations() {
        let map = LineMap::build("ab\ncd\n\nx");
        assert_eq!(map.line_count(), 4);
        assert_eq!(map.location(0), Location { line: 1, column: 1 });
        assert_eq!(map.location(4), Location { line: 2, column: 2 });
        assert_eq!(map.location(6), Location { line: 3, column: 1 });
        assert_eq!(map.location(7), Location { line: 4, column: 1 });
    }
}
