//! Text model: a rope buffer kept in step with its line index and tokenizer.
//!
//! Every edit goes to the buffer first, then to the [`LineIndex`], then to the [`Tokenizer`], and
//! reports what it invalidated as an [`EditSummary`].

use crate::indent::{StyledLines, leading_whitespace};
use crate::language::Language;
use crate::line_index::LineIndex;
use crate::style::Segment;
use crate::tokenizer::{Invalidation, LineSource, LineState, Tokenizer};
use ropey::Rope;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, trace};

/// Errors raised by [`TextModel`] edits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    /// Offset beyond the end of the buffer.
    #[error("offset {offset} is out of bounds (buffer length {len})")]
    OffsetOutOfBounds {
        /// Requested offset.
        offset: usize,
        /// Buffer length in chars.
        len: usize,
    },

    /// Range extending beyond the end of the buffer.
    #[error("range {start}..{end} is out of bounds (buffer length {len})")]
    RangeOutOfBounds {
        /// Range start.
        start: usize,
        /// Range end (exclusive).
        end: usize,
        /// Buffer length in chars.
        len: usize,
    },

    /// Line number beyond the last line.
    #[error("line {line} is out of bounds ({count} lines)")]
    LineOutOfBounds {
        /// Requested line.
        line: usize,
        /// Number of lines.
        count: usize,
    },
}

/// What an edit changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditSummary {
    /// First line touched by the edit.
    pub line: usize,
    /// Line terminators inserted.
    pub lines_added: usize,
    /// Line terminators removed.
    pub lines_removed: usize,
    /// Styling invalidated beyond the edited line.
    pub invalidation: Invalidation,
}

impl EditSummary {
    fn merge(self, other: EditSummary) -> EditSummary {
        EditSummary {
            line: self.line.min(other.line),
            lines_added: self.lines_added + other.lines_added,
            lines_removed: self.lines_removed + other.lines_removed,
            invalidation: self.invalidation.merge(other.invalidation),
        }
    }
}

/// Buffer lines as seen by the tokenizer.
struct BufferLines<'a> {
    rope: &'a Rope,
    lines: &'a mut LineIndex,
}

impl LineSource for BufferLines<'_> {
    fn line_count(&self) -> usize {
        self.lines.line_count()
    }

    fn line_text(&mut self, line: usize) -> String {
        if line >= self.lines.line_count() {
            return String::new();
        }
        let range = self.lines.line_range(line);
        self.rope.slice(range).to_string()
    }
}

/// A buffer with its line index, incremental tokenizer and language.
///
/// Queries take `&mut self`: they may validate the lazy caches.
#[derive(Debug, Clone)]
pub struct TextModel {
    rope: Rope,
    lines: LineIndex,
    tokenizer: Tokenizer,
}

impl TextModel {
    /// Creates a model holding `text`.
    pub fn new(text: &str, language: Arc<Language>) -> Self {
        Self {
            rope: Rope::from_str(text),
            lines: LineIndex::from_text(text),
            tokenizer: Tokenizer::new(language),
        }
    }

    /// Creates a plain-text model.
    pub fn plain(text: &str) -> Self {
        Self::new(text, Arc::new(Language::plain_text()))
    }

    /// The language in use.
    pub fn language(&self) -> &Arc<Language> {
        self.tokenizer.language()
    }

    /// The tokenizer (for inspecting its cache).
    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// The line index.
    pub fn line_index(&self) -> &LineIndex {
        &self.lines
    }

    /// Switches language; all cached styling is dropped.
    pub fn set_language(&mut self, language: Arc<Language>) {
        debug!(language = language.name(), "language changed");
        self.tokenizer = Tokenizer::new(language);
    }

    /// Replaces the whole buffer.
    pub fn set_text(&mut self, text: &str) {
        self.rope = Rope::from_str(text);
        self.lines = LineIndex::from_text(text);
        self.tokenizer.reset();
    }

    /// The whole buffer.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Buffer length in chars.
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Number of lines (at least one).
    pub fn line_count(&self) -> usize {
        self.lines.line_count()
    }

    /// Text of `line` without its terminator; empty for out-of-range lines.
    pub fn line_text(&mut self, line: usize) -> String {
        self.buffer_lines().line_text(line)
    }

    /// Char offset of the start of `line`.
    pub fn line_start(&mut self, line: usize) -> usize {
        self.lines.line_start(line)
    }

    /// The line containing `offset`.
    pub fn line_of(&mut self, offset: usize) -> usize {
        self.lines.line_of(offset)
    }

    /// `(line, column)` of `offset`.
    pub fn coordinates_of(&mut self, offset: usize) -> (usize, usize) {
        self.lines.coordinates_of(offset)
    }

    /// Offset of `(line, column)`, clamped to the buffer.
    pub fn offset_of(&mut self, line: usize, column: usize) -> usize {
        self.lines.offset_of(line, column)
    }

    fn buffer_lines(&mut self) -> BufferLines<'_> {
        BufferLines {
            rope: &self.rope,
            lines: &mut self.lines,
        }
    }

    /// Inserts `text` at char `offset`.
    pub fn insert(&mut self, offset: usize, text: &str) -> Result<EditSummary, EditError> {
        let len = self.len_chars();
        if offset > len {
            return Err(EditError::OffsetOutOfBounds { offset, len });
        }
        let line = self.lines.line_of(offset);
        self.rope.insert(offset, text);
        self.lines.on_insert(offset, text);
        let lines_added = text.matches('\n').count();
        let mut source = BufferLines {
            rope: &self.rope,
            lines: &mut self.lines,
        };
        let invalidation = self.tokenizer.on_edit(&mut source, line, lines_added > 0);
        trace!(offset, chars = text.chars().count(), line, ?invalidation, "insert");
        Ok(EditSummary {
            line,
            lines_added,
            lines_removed: 0,
            invalidation,
        })
    }

    /// Removes `length` chars starting at `offset`.
    pub fn remove(&mut self, offset: usize, length: usize) -> Result<EditSummary, EditError> {
        let len = self.len_chars();
        let end = offset.saturating_add(length);
        if end > len {
            return Err(EditError::RangeOutOfBounds {
                start: offset,
                end,
                len,
            });
        }
        let line = self.lines.line_of(offset);
        let lines_removed = self
            .rope
            .slice(offset..end)
            .chars()
            .filter(|&c| c == '\n')
            .count();
        self.rope.remove(offset..end);
        self.lines.on_remove(offset, length);
        let mut source = BufferLines {
            rope: &self.rope,
            lines: &mut self.lines,
        };
        let invalidation = self
            .tokenizer
            .on_edit(&mut source, line, lines_removed > 0);
        trace!(offset, length, line, ?invalidation, "remove");
        Ok(EditSummary {
            line,
            lines_added: 0,
            lines_removed,
            invalidation,
        })
    }

    /// Replaces `length` chars at `offset` with `text`.
    pub fn replace(
        &mut self,
        offset: usize,
        length: usize,
        text: &str,
    ) -> Result<EditSummary, EditError> {
        let removed = self.remove(offset, length)?;
        let inserted = self.insert(offset, text)?;
        Ok(removed.merge(inserted))
    }

    /// Styled segments of `line`, covering its text. Out-of-range lines have none.
    pub fn segments_for(&mut self, line: usize) -> Vec<Segment> {
        let mut source = BufferLines {
            rope: &self.rope,
            lines: &mut self.lines,
        };
        self.tokenizer.segments_for(&mut source, line)
    }

    /// Indentation `line` should have; `None` when it must be left alone.
    pub fn indent_for(&mut self, line: usize) -> Option<String> {
        let language = Arc::clone(self.tokenizer.language());
        language.indenter().indent_for(self, line)
    }

    /// Whether typing `c` should re-indent the current line.
    pub fn is_electric(&self, c: char) -> bool {
        self.language().is_electric(c)
    }

    /// Re-indents `line`: its leading whitespace becomes the computed indentation and trailing
    /// whitespace is trimmed. Returns whether the line changed.
    pub fn fix_indentation(&mut self, line: usize) -> Result<bool, EditError> {
        let count = self.line_count();
        if line >= count {
            return Err(EditError::LineOutOfBounds { line, count });
        }
        let Some(indentation) = self.indent_for(line) else {
            return Ok(false);
        };
        let text = self.line_text(line);
        let body = text[leading_whitespace(&text).len()..].trim_end();
        let replacement = format!("{indentation}{body}");
        if replacement == text {
            return Ok(false);
        }
        let start = self.line_start(line);
        self.replace(start, text.chars().count(), &replacement)?;
        Ok(true)
    }

    /// Re-indents lines `first..=last`, top to bottom. Returns the number of changed lines.
    pub fn fix_indentation_range(&mut self, first: usize, last: usize) -> Result<usize, EditError> {
        let count = self.line_count();
        if last >= count {
            return Err(EditError::LineOutOfBounds { line: last, count });
        }
        let mut changed = 0;
        for line in first..=last {
            if self.fix_indentation(line)? {
                changed += 1;
            }
        }
        Ok(changed)
    }

    /// Re-indents the whole buffer. Returns the number of changed lines.
    pub fn reindent_all(&mut self) -> Result<usize, EditError> {
        let last = self.line_count() - 1;
        let changed = self.fix_indentation_range(0, last)?;
        debug!(changed, "re-indented buffer");
        Ok(changed)
    }
}

impl StyledLines for TextModel {
    fn line_count(&self) -> usize {
        TextModel::line_count(self)
    }

    fn line_text(&mut self, line: usize) -> String {
        TextModel::line_text(self, line)
    }

    fn segments(&mut self, line: usize) -> Vec<Segment> {
        self.segments_for(line)
    }

    fn state_after(&mut self, line: usize) -> LineState {
        let mut source = BufferLines {
            rope: &self.rope,
            lines: &mut self.lines,
        };
        self.tokenizer.state_after(&mut source, line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::StyleTag;
    use codetext_lang::builtin;
    use pretty_assertions::assert_eq;

    fn cpp(text: &str) -> TextModel {
        TextModel::new(text, Arc::new(Language::compile(builtin::cpp()).unwrap()))
    }

    #[test]
    fn test_insert_and_remove_keep_lines_in_step() {
        let mut model = TextModel::plain("hello\nworld");
        let summary = model.insert(5, ",\nbig").unwrap();
        assert_eq!(summary.line, 0);
        assert_eq!(summary.lines_added, 1);
        assert_eq!(model.text(), "hello,\nbig\nworld");
        assert_eq!(model.line_count(), 3);
        assert_eq!(model.line_text(1), "big");

        let summary = model.remove(6, 5).unwrap();
        assert_eq!(summary.lines_removed, 2);
        assert_eq!(model.text(), "hello,world");
        assert_eq!(model.line_count(), 1);
    }

    #[test]
    fn test_out_of_bounds_edits() {
        let mut model = TextModel::plain("abc");
        assert_eq!(
            model.insert(4, "x"),
            Err(EditError::OffsetOutOfBounds { offset: 4, len: 3 })
        );
        assert_eq!(
            model.remove(2, 2),
            Err(EditError::RangeOutOfBounds {
                start: 2,
                end: 4,
                len: 3
            })
        );
        assert_eq!(
            model.fix_indentation(1),
            Err(EditError::LineOutOfBounds { line: 1, count: 1 })
        );
        assert_eq!(model.text(), "abc");
    }

    #[test]
    fn test_comment_opener_reports_stale_lines() {
        let mut model = cpp("a;\nb;\nc;");
        model.segments_for(2);
        let summary = model.insert(0, "/*").unwrap();
        assert_eq!(summary.invalidation, Invalidation::StaleFrom(0));
        assert_eq!(
            model.segments_for(2),
            vec![Segment::new(0, 2, StyleTag::Comment)]
        );

        let summary = model.remove(0, 2).unwrap();
        assert_eq!(summary.invalidation, Invalidation::StaleFrom(0));
        assert_eq!(
            model.segments_for(2),
            vec![Segment::new(0, 2, StyleTag::Normal)]
        );
    }

    #[test]
    fn test_fix_indentation() {
        let mut model = cpp("if (x) {\nfoo();   \n}");
        assert!(model.fix_indentation(1).unwrap());
        assert_eq!(model.line_text(1), "    foo();");
        assert!(!model.fix_indentation(1).unwrap());
        assert!(!model.fix_indentation(2).unwrap());
    }

    #[test]
    fn test_set_text_resets_caches() {
        let mut model = cpp("/* a\nb");
        assert_eq!(
            model.segments_for(1),
            vec![Segment::new(0, 1, StyleTag::Comment)]
        );
        model.set_text("a\nb");
        assert_eq!(model.tokenizer().cached_lines(), 0);
        assert_eq!(
            model.segments_for(1),
            vec![Segment::new(0, 1, StyleTag::Normal)]
        );
    }

    #[test]
    fn test_replace_merges_summaries() {
        let mut model = TextModel::plain("one\ntwo\nthree");
        let summary = model.replace(2, 3, "X\nY\nZ").unwrap();
        assert_eq!(model.text(), "onX\nY\nZwo\nthree");
        assert_eq!(summary.lines_removed, 1);
        assert_eq!(summary.lines_added, 2);
        assert_eq!(model.line_count(), 4);
    }
}
