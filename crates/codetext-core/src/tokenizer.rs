//! Incremental tokenizer.
//!
//! The tokenizer turns one line at a time into styled [`Segment`]s. The only state threaded between
//! lines is the region (if any) left open at the end of each line, a [`LineState`]. Those states are
//! cached for a prefix of the buffer; `carry[i]` is the state at the end of line `i`, and the
//! length of the cache is the "last good line" watermark.
//!
//! Requests beyond the watermark replay the missing lines (caching only their carry-over) before
//! computing the requested line. Edits drop the cache from the edited line onward, but only when
//! they can actually have changed what flows into later lines: see [`Tokenizer::on_edit`].

use crate::language::Language;
use crate::matcher::{OpenRegion, RegionEnd, SequenceMatcher};
use crate::style::{Segment, SegmentBuilder, StyleTag};
use std::sync::Arc;
use tracing::{debug, trace};

/// Carry-over state at the end of a line: the region still open, if any.
pub type LineState = Option<OpenRegion>;

/// Read access to buffer lines for the tokenizer.
pub trait LineSource {
    /// Number of lines.
    fn line_count(&self) -> usize;
    /// Text of `line`, without its terminator.
    fn line_text(&mut self, line: usize) -> String;
}

impl<S: AsRef<str>> LineSource for [S] {
    fn line_count(&self) -> usize {
        self.len()
    }

    fn line_text(&mut self, line: usize) -> String {
        self.get(line)
            .map(|s| s.as_ref().to_string())
            .unwrap_or_default()
    }
}

/// What an edit invalidated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invalidation {
    /// Only the edited line's own segments changed.
    Unchanged,
    /// Styling of every line from this one onward may have changed.
    StaleFrom(usize),
}

impl Invalidation {
    /// Combines the invalidations of two edits applied one after the other.
    pub fn merge(self, other: Invalidation) -> Invalidation {
        match (self, other) {
            (Invalidation::StaleFrom(a), Invalidation::StaleFrom(b)) => {
                Invalidation::StaleFrom(a.min(b))
            }
            (Invalidation::StaleFrom(a), Invalidation::Unchanged)
            | (Invalidation::Unchanged, Invalidation::StaleFrom(a)) => Invalidation::StaleFrom(a),
            (Invalidation::Unchanged, Invalidation::Unchanged) => Invalidation::Unchanged,
        }
    }
}

/// Tokenizes `text`, resuming `carried` if the previous line left a region open.
///
/// Returns the segments (covering the whole line) and the state at the end of the line.
pub(crate) fn scan_line(
    matchers: &[Box<dyn SequenceMatcher>],
    text: &[char],
    carried: Option<&OpenRegion>,
) -> (Vec<Segment>, LineState) {
    let mut builder = SegmentBuilder::new();
    let mut index = 0;
    if let Some(region) = carried {
        match region.terminator.end_in(text) {
            Some(end) => {
                builder.push(end, region.style);
                index = end;
            }
            None => {
                builder.push(text.len(), region.style);
                return (builder.finish(), Some(region.clone()));
            }
        }
    }
    while index < text.len() {
        match matchers.iter().find_map(|m| m.match_at(text, index)) {
            None => index += 1,
            Some(RegionEnd::Within { style, end }) => {
                builder.push(index, StyleTag::Normal);
                let end = end.clamp(index + 1, text.len());
                builder.push(end, style);
                index = end;
            }
            Some(RegionEnd::Open(region)) => {
                builder.push(index, StyleTag::Normal);
                builder.push(text.len(), region.style);
                return (builder.finish(), Some(region));
            }
        }
    }
    builder.push(text.len(), StyleTag::Normal);
    (builder.finish(), None)
}

/// Per-buffer tokenizer with cached carry-over state.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    language: Arc<Language>,
    carry: Vec<LineState>,
}

impl Tokenizer {
    /// Creates a tokenizer with an empty cache.
    pub fn new(language: Arc<Language>) -> Self {
        Self {
            language,
            carry: Vec::new(),
        }
    }

    /// The language driving this tokenizer.
    pub fn language(&self) -> &Arc<Language> {
        &self.language
    }

    /// Number of leading lines whose carry-over state is cached.
    pub fn cached_lines(&self) -> usize {
        self.carry.len()
    }

    /// Last line whose carry-over state is cached.
    pub fn last_good_line(&self) -> Option<usize> {
        self.carry.len().checked_sub(1)
    }

    /// Cached state at the end of `line`, if cached.
    pub fn cached_state(&self, line: usize) -> Option<&LineState> {
        self.carry.get(line)
    }

    /// Drops cached state for `line` and every later line.
    pub fn invalidate_from(&mut self, line: usize) {
        if line < self.carry.len() {
            trace!(line, cached = self.carry.len(), "dropping tokenizer state");
            self.carry.truncate(line);
        }
    }

    /// Drops the whole cache (the buffer was replaced).
    pub fn reset(&mut self) {
        self.carry.clear();
    }

    fn carried_into(&self, line: usize) -> Option<&OpenRegion> {
        match line {
            0 => None,
            n => self.carry.get(n - 1).and_then(|state| state.as_ref()),
        }
    }

    fn scan<S: LineSource + ?Sized>(
        &self,
        source: &mut S,
        line: usize,
    ) -> (Vec<char>, Vec<Segment>, LineState) {
        let text: Vec<char> = source.line_text(line).chars().collect();
        let (segments, state) = scan_line(self.language.matchers(), &text, self.carried_into(line));
        (text, segments, state)
    }

    /// Segments of `line`, covering its text exactly. Out-of-range lines have no segments.
    pub fn segments_for<S: LineSource + ?Sized>(
        &mut self,
        source: &mut S,
        line: usize,
    ) -> Vec<Segment> {
        if line >= source.line_count() {
            return Vec::new();
        }
        if self.carry.len() < line {
            trace!(from = self.carry.len(), to = line, "replaying carry-over state");
        }
        while self.carry.len() < line {
            let (_, _, state) = self.scan(source, self.carry.len());
            self.carry.push(state);
        }
        let (text, segments, state) = self.scan(source, line);
        match self.carry.get(line) {
            None => self.carry.push(state),
            Some(cached) if *cached != state => {
                debug!(line, "cached carry-over was stale");
                self.carry.truncate(line);
                self.carry.push(state);
            }
            Some(_) => {}
        }
        self.language.apply_styles(&text, segments)
    }

    /// State at the end of `line`, replaying the cache up to it. Out-of-range lines carry nothing.
    pub fn state_after<S: LineSource + ?Sized>(&mut self, source: &mut S, line: usize) -> LineState {
        if line >= source.line_count() {
            return None;
        }
        while self.carry.len() <= line {
            let (_, _, state) = self.scan(source, self.carry.len());
            self.carry.push(state);
        }
        self.carry[line].clone()
    }

    /// Notifies the tokenizer of an edit on `line` (the first line the edit touched).
    ///
    /// `source` must already reflect the edit. If the edit added or removed a line terminator,
    /// every cached state from `line` onward is dropped. Otherwise only `line` is re-tokenized: if
    /// its carry-over is unchanged nothing else is invalidated.
    pub fn on_edit<S: LineSource + ?Sized>(
        &mut self,
        source: &mut S,
        line: usize,
        touched_newline: bool,
    ) -> Invalidation {
        if line >= self.carry.len() {
            return Invalidation::Unchanged;
        }
        if touched_newline {
            self.invalidate_from(line);
            return Invalidation::StaleFrom(line);
        }
        let (_, _, state) = self.scan(source, line);
        if self.carry[line] == state {
            return Invalidation::Unchanged;
        }
        debug!(line, "carry-over changed by edit");
        self.invalidate_from(line);
        Invalidation::StaleFrom(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::Terminator;
    use codetext_lang::builtin;
    use pretty_assertions::assert_eq;

    fn cpp() -> Arc<Language> {
        Arc::new(Language::compile(builtin::cpp()).unwrap())
    }

    fn seg(start: usize, end: usize, style: StyleTag) -> Segment {
        Segment::new(start, end, style)
    }

    #[test]
    fn test_block_comment_carries_over() {
        let mut tokenizer = Tokenizer::new(cpp());
        let mut lines = vec!["x = 1; /* open", "still comment", "done */ y"];
        let source = lines.as_mut_slice();

        assert_eq!(
            tokenizer.segments_for(source, 1),
            vec![seg(0, 13, StyleTag::Comment)]
        );
        assert_eq!(tokenizer.cached_lines(), 2);
        assert_eq!(
            tokenizer.cached_state(0),
            Some(&Some(OpenRegion {
                style: StyleTag::Comment,
                terminator: Terminator::Text("*/".into()),
            }))
        );
        assert_eq!(
            tokenizer.segments_for(source, 2),
            vec![seg(0, 7, StyleTag::Comment), seg(7, 9, StyleTag::Normal)]
        );
        assert_eq!(tokenizer.cached_state(2), Some(&None));
    }

    #[test]
    fn test_state_after_replays_without_styling() {
        let mut tokenizer = Tokenizer::new(cpp());
        let mut lines = vec!["a;", "s = R\"(", "body", ")\";"];
        let source = lines.as_mut_slice();
        assert_eq!(tokenizer.last_good_line(), None);

        let open = tokenizer.state_after(source, 2);
        assert_eq!(open.map(|region| region.style), Some(StyleTag::String));
        assert_eq!(tokenizer.last_good_line(), Some(2));
        assert_eq!(tokenizer.state_after(source, 3), None);
        assert_eq!(tokenizer.state_after(source, 9), None);
        assert_eq!(tokenizer.last_good_line(), Some(3));
    }

    #[test]
    fn test_out_of_range_line() {
        let mut tokenizer = Tokenizer::new(cpp());
        let mut lines = vec!["a"];
        assert!(tokenizer.segments_for(lines.as_mut_slice(), 3).is_empty());
    }

    #[test]
    fn test_edit_inside_line_comment_keeps_cache() {
        let mut tokenizer = Tokenizer::new(cpp());
        let mut lines = vec![
            "int a; // note".to_string(),
            "int b;".to_string(),
            "int c;".to_string(),
        ];
        tokenizer.segments_for(lines.as_mut_slice(), 2);
        assert_eq!(tokenizer.cached_lines(), 3);

        lines[0] = "int a; // note /* not a comment opener".to_string();
        assert_eq!(
            tokenizer.on_edit(lines.as_mut_slice(), 0, false),
            Invalidation::Unchanged
        );
        assert_eq!(tokenizer.cached_lines(), 3);
    }

    #[test]
    fn test_opening_block_comment_invalidates() {
        let mut tokenizer = Tokenizer::new(cpp());
        let mut lines = vec!["a;".to_string(), "b;".to_string(), "c;".to_string()];
        tokenizer.segments_for(lines.as_mut_slice(), 2);

        lines[1] = "b; /*".to_string();
        assert_eq!(
            tokenizer.on_edit(lines.as_mut_slice(), 1, false),
            Invalidation::StaleFrom(1)
        );
        assert_eq!(tokenizer.cached_lines(), 1);
        assert_eq!(
            tokenizer.segments_for(lines.as_mut_slice(), 2),
            vec![seg(0, 2, StyleTag::Comment)]
        );
    }

    #[test]
    fn test_newline_edit_invalidates_from_line() {
        let mut tokenizer = Tokenizer::new(cpp());
        let mut lines = vec!["a;", "b;", "c;"];
        tokenizer.segments_for(lines.as_mut_slice(), 2);
        assert_eq!(
            tokenizer.on_edit(lines.as_mut_slice(), 1, true),
            Invalidation::StaleFrom(1)
        );
        assert_eq!(tokenizer.cached_lines(), 1);
        // Edits beyond the watermark have nothing to invalidate.
        assert_eq!(
            tokenizer.on_edit(lines.as_mut_slice(), 2, true),
            Invalidation::Unchanged
        );
    }

    #[test]
    fn test_unterminated_string_is_error() {
        let mut tokenizer = Tokenizer::new(cpp());
        let mut lines = vec!["s = \"abc;"];
        assert_eq!(
            tokenizer.segments_for(lines.as_mut_slice(), 0),
            vec![seg(0, 4, StyleTag::Normal), seg(4, 9, StyleTag::Error)]
        );
        assert_eq!(tokenizer.cached_state(0), Some(&None));
    }

    #[test]
    fn test_keywords_and_preprocessor_applied() {
        let mut tokenizer = Tokenizer::new(cpp());
        let mut lines = vec!["#else", "else x;"];
        assert_eq!(
            tokenizer.segments_for(lines.as_mut_slice(), 0),
            vec![seg(0, 5, StyleTag::Preprocessor)]
        );
        assert_eq!(
            tokenizer.segments_for(lines.as_mut_slice(), 1),
            vec![seg(0, 4, StyleTag::Keyword), seg(4, 7, StyleTag::Normal)]
        );
    }

    #[test]
    fn test_invalidation_merge() {
        use Invalidation::*;
        assert_eq!(Unchanged.merge(Unchanged), Unchanged);
        assert_eq!(StaleFrom(4).merge(Unchanged), StaleFrom(4));
        assert_eq!(StaleFrom(4).merge(StaleFrom(2)), StaleFrom(2));
    }
}
