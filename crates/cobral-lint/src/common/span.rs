//! Source locations: byte spans, line/column positions and the index
//! converting between them

use std::fmt;

/// Byte range into the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl From<std::ops::Range<usize>> for Span {
    fn from(range: std::ops::Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

/// 1-based line and column, columns counted in characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Line start table for a source text
#[derive(Debug, Clone, Default)]
pub struct LineIndex {
    line_starts: Vec<usize>,
    len: usize,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            source
                .char_indices()
                .filter(|&(_, c)| c == '\n')
                .map(|(i, _)| i + 1),
        );
        Self {
            line_starts,
            len: source.len(),
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Position of a byte offset. `source` must be the text this index was built from.
    pub fn position(&self, source: &str, offset: usize) -> Position {
        let offset = offset.min(self.len);
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let line_start = self.line_starts[line];
        let column = source[line_start..offset].chars().count() + 1;
        Position::new(line + 1, column)
    }

    /// Byte offset of a position, clamped to the end of its line.
    pub fn offset(&self, source: &str, position: Position) -> usize {
        let Some(&line_start) = self.line_starts.get(position.line.saturating_sub(1)) else {
            return self.len;
        };
        let line_end = self
            .line_starts
            .get(position.line)
            .map_or(self.len, |next| next - 1);
        source[line_start..line_end]
            .char_indices()
            .nth(position.column.saturating_sub(1))
            .map_or(line_end, |(i, _)| line_start + i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positions_are_one_based() {
        let source = "ab\ncd\n\nef";
        let index = LineIndex::new(source);

        assert_eq!(index.line_count(), 4);
        assert_eq!(index.position(source, 0), Position::new(1, 1));
        assert_eq!(index.position(source, 4), Position::new(2, 2));
        assert_eq!(index.position(source, 6), Position::new(3, 1));
        assert_eq!(index.position(source, 8), Position::new(4, 2));
    }

    #[test]
    fn test_columns_count_characters() {
        let source = "declare ação = 1";
        let index = LineIndex::new(source);
        let offset = source.find('=').unwrap();

        assert_eq!(index.position(source, offset), Position::new(1, 14));
        assert_eq!(index.offset(source, Position::new(1, 14)), offset);
    }

    #[test]
    fn test_offset_clamps_to_line_end() {
        let source = "abc\ndef";
        let index = LineIndex::new(source);

        assert_eq!(index.offset(source, Position::new(1, 10)), 3);
        assert_eq!(index.offset(source, Position::new(9, 1)), source.len());
    }
}
