//! Offset/position bookkeeping over a source buffer.

use crate::types::{Position, Range};

/// Precomputed line-start table for a source text.
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    text: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub fn new(text: &'a str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            text.bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self { text, line_starts }
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Position of a byte offset. Offsets past the end clamp to the end.
    pub fn position(&self, offset: usize) -> Position {
        let offset = offset.min(self.text.len());
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        Position::new(line + 1, offset - self.line_starts[line] + 1)
    }

    /// Byte offset of a position, clamped to the text.
    pub fn offset(&self, position: Position) -> usize {
        let line = position.line.max(1) - 1;
        let Some(&line_start) = self.line_starts.get(line) else {
            return self.text.len();
        };
        (line_start + position.column.max(1) - 1).min(self.text.len())
    }

    /// Range between two byte offsets.
    pub fn range(&self, start: usize, end: usize) -> Range {
        Range::new(self.position(start), self.position(end))
    }

    /// Range covering the whole text.
    pub fn full_range(&self) -> Range {
        self.range(0, self.text.len())
    }

    /// Source slice addressed by a range.
    pub fn slice(&self, range: &Range) -> &'a str {
        let start = self.offset(range.start);
        let end = self.offset(range.end).max(start);
        self.text.get(start..end).unwrap_or_default()
    }
}

/// Clamp an offset into `text`, moving it back onto a char boundary.
pub(crate) fn clamp_to_boundary(text: &str, offset: usize) -> usize {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

/// Whether `text` spans at most one line, ignoring a single trailing
/// line terminator.
pub(crate) fn is_single_line(text: &str) -> bool {
    let body = text
        .strip_suffix('\n')
        .map(|t| t.strip_suffix('\r').unwrap_or(t))
        .unwrap_or(text);
    !body.contains('\n')
}

/// Number of lines in `text` whose trimmed content equals `line`.
pub(crate) fn count_line_occurrences(text: &str, line: &str) -> usize {
    let needle = line.trim();
    text.lines().filter(|l| l.trim() == needle).count()
}

/// Collapse whitespace runs to single spaces and trim the ends.
pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
