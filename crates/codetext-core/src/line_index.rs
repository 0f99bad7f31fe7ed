//! Logical Line Index
//!
//! Maps character offsets to line numbers and back. Every [`Line`] stores only its length (including
//! the trailing `\n`, if any); start offsets are derived lazily by prefix sum and are trusted only up
//! to a single watermark. Edits move the watermark back to the edited line, and the next query
//! re-derives starts forward only as far as it needs to.
//!
//! All offsets and lengths are in `char`s.

use std::ops::Range;
use tracing::trace;

/// A logical line record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Line {
    /// Char offset of the first character. Only meaningful below the index's watermark.
    start: usize,
    /// Char count including the `\n` terminator, if any.
    length: usize,
}

impl Line {
    fn end(&self) -> usize {
        self.start + self.length
    }
}

/// Lazily validated line index.
///
/// Invariants:
/// - there is always at least one line (an empty buffer is one empty line);
/// - the sum of all lengths equals the buffer length;
/// - every line except the last ends with `\n`;
/// - `lines[..valid_through]` carry correct start offsets.
#[derive(Debug, Clone)]
pub struct LineIndex {
    lines: Vec<Line>,
    valid_through: usize,
    len_chars: usize,
}

impl LineIndex {
    /// Create an index for an empty buffer.
    pub fn new() -> Self {
        Self {
            lines: vec![Line::default()],
            valid_through: 1,
            len_chars: 0,
        }
    }

    /// Build an index for `text`, with every start offset already validated.
    pub fn from_text(text: &str) -> Self {
        let mut lines = Vec::new();
        let mut start = 0;
        let mut length = 0;
        for ch in text.chars() {
            length += 1;
            if ch == '\n' {
                lines.push(Line { start, length });
                start += length;
                length = 0;
            }
        }
        lines.push(Line { start, length });
        let valid_through = lines.len();
        Self {
            lines,
            valid_through,
            len_chars: start + length,
        }
    }

    /// Number of lines (at least one).
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Total buffer length in chars.
    pub fn len_chars(&self) -> usize {
        self.len_chars
    }

    /// Number of leading lines whose start offsets are currently trusted.
    pub fn validated_lines(&self) -> usize {
        self.valid_through
    }

    /// Line lengths including terminators, in order.
    pub fn line_lengths(&self) -> impl Iterator<Item = usize> + '_ {
        self.lines.iter().map(|l| l.length)
    }

    /// Length of `line` including its terminator (0 for out-of-range lines).
    pub fn line_length(&self, line: usize) -> usize {
        self.lines.get(line).map_or(0, |l| l.length)
    }

    /// Length of `line` excluding its terminator.
    pub fn line_text_length(&self, line: usize) -> usize {
        let length = self.line_length(line);
        if line + 1 < self.lines.len() {
            length.saturating_sub(1)
        } else {
            length
        }
    }

    /// Drops trusted start offsets from `line` onward.
    pub fn invalidate_from(&mut self, line: usize) {
        self.valid_through = self.valid_through.min(line);
    }

    fn validate_through(&mut self, line: usize) {
        let target = line.min(self.lines.len() - 1);
        if target < self.valid_through {
            return;
        }
        let mut start = match self.valid_through {
            0 => 0,
            n => self.lines[n - 1].end(),
        };
        for record in &mut self.lines[self.valid_through..=target] {
            record.start = start;
            start += record.length;
        }
        self.valid_through = target + 1;
    }

    /// Char offset of the first character of `line`; the buffer length for out-of-range lines.
    pub fn line_start(&mut self, line: usize) -> usize {
        if line >= self.lines.len() {
            return self.len_chars;
        }
        self.validate_through(line);
        self.lines[line].start
    }

    /// Char range of `line`'s text, excluding the terminator.
    pub fn line_range(&mut self, line: usize) -> Range<usize> {
        let start = self.line_start(line);
        start..start + self.line_text_length(line)
    }

    /// The line containing `offset`. Offsets past the end map to the last line.
    pub fn line_of(&mut self, offset: usize) -> usize {
        let offset = offset.min(self.len_chars);
        let last = self.lines.len() - 1;
        if self.valid_through > 0 {
            let last_valid = self.valid_through - 1;
            if last_valid == last || self.lines[last_valid].end() > offset {
                return self.lines[..self.valid_through]
                    .partition_point(|l| l.end() <= offset)
                    .min(last);
            }
        }
        let mut line = self.valid_through;
        trace!(from_line = line, offset, "revalidating line starts");
        loop {
            self.validate_through(line);
            if line == last || self.lines[line].end() > offset {
                return line;
            }
            line += 1;
        }
    }

    /// `(line, column)` of `offset`.
    pub fn coordinates_of(&mut self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.len_chars);
        let line = self.line_of(offset);
        (line, offset - self.lines[line].start)
    }

    /// Char offset of `(line, column)`; the column is clamped to the line's text.
    pub fn offset_of(&mut self, line: usize, column: usize) -> usize {
        if line >= self.lines.len() {
            return self.len_chars;
        }
        self.line_start(line) + column.min(self.line_text_length(line))
    }

    /// Records an insertion of `text` at `offset`.
    ///
    /// An insertion containing N newlines splits the host line into N+1 records.
    pub fn on_insert(&mut self, offset: usize, text: &str) {
        if text.is_empty() {
            return;
        }
        let offset = offset.min(self.len_chars);
        let line = self.line_of(offset);
        let host = self.lines[line];
        let column = offset - host.start;

        let mut pieces = text
            .split('\n')
            .map(|part| part.chars().count() + 1)
            .collect::<Vec<_>>();
        // The final piece has no terminator of its own.
        if let Some(tail) = pieces.last_mut() {
            *tail -= 1;
        }
        let inserted = pieces.iter().sum::<usize>();

        if pieces.len() == 1 {
            self.lines[line].length += inserted;
        } else {
            let count = pieces.len();
            let records = pieces.iter().enumerate().map(|(i, &length)| {
                let length = match i {
                    0 => column + length,
                    i if i == count - 1 => length + host.length - column,
                    _ => length,
                };
                let start = if i == 0 { host.start } else { 0 };
                Line { start, length }
            });
            self.lines.splice(line..=line, records.collect::<Vec<_>>());
        }
        self.len_chars += inserted;
        self.valid_through = self.valid_through.min(line + 1);
    }

    /// Records a removal of `length` chars at `offset`.
    ///
    /// A removal spanning M newlines merges M+1 records into one.
    pub fn on_remove(&mut self, offset: usize, length: usize) {
        let offset = offset.min(self.len_chars);
        let end = offset.saturating_add(length).min(self.len_chars);
        if end == offset {
            return;
        }
        let first = self.line_of(offset);
        let last = self.line_of(end);
        let merged = self.lines[first..=last]
            .iter()
            .map(|l| l.length)
            .sum::<usize>()
            - (end - offset);
        self.lines[first].length = merged;
        self.lines.drain(first + 1..=last);
        self.len_chars -= end - offset;
        self.valid_through = self.valid_through.min(first + 1);
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

    fn assert_consistent(index: &mut LineIndex, text: &str) {
        let expected = LineIndex::from_text(text);
        assert_eq!(
            index.line_lengths().collect::<Vec<_>>(),
            expected.line_lengths().collect::<Vec<_>>(),
            "line lengths for {text:?}"
        );
        assert_eq!(index.len_chars(), text.chars().count());
        for line in 0..index.line_count() {
            assert_eq!(
                index.line_start(line),
                expected.lines[line].start,
                "start of line {line} for {text:?}"
            );
        }
    }

    #[test]
    fn test_new_line_index() {
        let mut index = LineIndex::new();
        assert_eq!(index.line_count(), 1);
        assert_eq!(index.len_chars(), 0);
        assert_eq!(index.line_of(0), 0);
        assert_eq!(index.line_of(10), 0);
    }

    #[test]
    fn test_from_text() {
        let text = "Line 1\nLine 2\nLine 3";
        let index = LineIndex::from_text(text);

        assert_eq!(index.line_count(), 3);
        assert_eq!(index.len_chars(), text.chars().count());
        assert_eq!(index.line_lengths().collect::<Vec<_>>(), vec![7, 7, 6]);
        assert_eq!(index.line_text_length(0), 6);
        assert_eq!(index.line_text_length(2), 6);
    }

    #[test]
    fn test_trailing_newline_makes_empty_last_line() {
        let mut index = LineIndex::from_text("a\n");
        assert_eq!(index.line_count(), 2);
        assert_eq!(index.line_of(2), 1);
        assert_eq!(index.coordinates_of(2), (1, 0));
    }

    #[test]
    fn test_coordinates_round_trip() {
        let text = "ABC\nDEF\n\nGHI";
        let mut index = LineIndex::from_text(text);

        assert_eq!(index.coordinates_of(0), (0, 0));
        assert_eq!(index.coordinates_of(3), (0, 3)); // the '\n' itself
        assert_eq!(index.coordinates_of(4), (1, 0));
        assert_eq!(index.coordinates_of(8), (2, 0));
        assert_eq!(index.coordinates_of(9), (3, 0));
        for offset in 0..=text.chars().count() {
            let (line, col) = index.coordinates_of(offset);
            assert_eq!(index.offset_of(line, col), offset, "offset {offset}");
        }
    }

    #[test]
    fn test_utf8_cjk() {
        let text = "你好\n世界";
        let mut index = LineIndex::from_text(text);

        assert_eq!(index.line_count(), 2);
        assert_eq!(index.len_chars(), 5);
        assert_eq!(index.coordinates_of(1), (0, 1));
        assert_eq!(index.coordinates_of(3), (1, 0));
    }

    #[test]
    fn test_insert_without_newline_keeps_lines() {
        let mut index = LineIndex::from_text("abc\ndef");
        index.on_insert(5, "XY");
        assert_consistent(&mut index, "abc\ndXYef");
    }

    #[test]
    fn test_insert_splits_host_line() {
        let mut index = LineIndex::from_text("abc\ndef\nghi");
        index.on_insert(5, "1\n2\n3");
        assert_consistent(&mut index, "abc\nd1\n2\n3ef\nghi");
        assert_eq!(index.line_count(), 5);
    }

    #[test]
    fn test_insert_at_end_and_start() {
        let mut index = LineIndex::from_text("abc");
        index.on_insert(3, "\n");
        assert_consistent(&mut index, "abc\n");
        index.on_insert(0, "\n\n");
        assert_consistent(&mut index, "\n\nabc\n");
    }

    #[test]
    fn test_remove_merges_lines() {
        let mut index = LineIndex::from_text("ab\ncd\nef\ngh");
        // Remove "d\nef\ng".
        index.on_remove(4, 6);
        assert_consistent(&mut index, "ab\nch");
    }

    #[test]
    fn test_remove_terminator_only() {
        let mut index = LineIndex::from_text("ab\ncd");
        index.on_remove(2, 1);
        assert_consistent(&mut index, "abcd");
        assert_eq!(index.line_count(), 1);
    }

    #[test]
    fn test_remove_clamps_past_end() {
        let mut index = LineIndex::from_text("ab\ncd");
        index.on_remove(4, 100);
        assert_consistent(&mut index, "ab\nc");
        index.on_remove(40, 1);
        assert_consistent(&mut index, "ab\nc");
    }

    #[test]
    fn test_edit_moves_watermark_back() {
        let mut lines = Vec::new();
        for i in 0..100 {
            lines.push(format!("Line {}", i));
        }
        let text = lines.join("\n");
        let mut index = LineIndex::from_text(&text);
        assert_eq!(index.validated_lines(), 100);

        let offset = index.offset_of(10, 0);
        index.on_insert(offset, "x");
        assert_eq!(index.validated_lines(), 11);

        // A query near the edit only validates as far as it needs to.
        let offset = index.offset_of(20, 0);
        assert_eq!(index.validated_lines(), 21);
        assert_eq!(index.line_of(offset), 20);
        assert_eq!(index.line_of(index.len_chars()), 99);
        assert_eq!(index.validated_lines(), 100);
    }

    #[test]
    fn test_large_document() {
        let mut lines = Vec::new();
        for i in 0..10000 {
            lines.push(format!("Line {}", i));
        }
        let text = lines.join("\n");

        let mut index = LineIndex::from_text(&text);
        assert_eq!(index.line_count(), 10000);
        let offset = index.offset_of(5000, 2);
        assert_eq!(index.coordinates_of(offset), (5000, 2));
    }
}
