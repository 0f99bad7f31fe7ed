//! Style tags and styled segments.

/// Version of the [`StyleTag`] enumeration.
///
/// Bumped whenever a variant is added, removed or renumbered, so that consumers mapping tags to
/// colors (or persisting them) can detect the change.
pub const STYLE_TAG_VERSION: u32 = 1;

/// Lexical style of a run of text.
///
/// This is a closed enumeration. Numeric values are stable within a [`STYLE_TAG_VERSION`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum StyleTag {
    /// Ordinary code.
    Normal = 0,
    /// Comment text, including delimiters.
    Comment = 1,
    /// String or character literal, including quotes.
    String = 2,
    /// A keyword from the language's keyword set.
    Keyword = 3,
    /// Preprocessor directive text.
    Preprocessor = 4,
    /// Malformed input, such as an unterminated string.
    Error = 5,
    /// A URL inside a comment.
    Hyperlink = 6,
    /// Line-break marker used by layout collaborators; never produced by the tokenizer.
    Newline = 7,
}

impl StyleTag {
    /// Stable numeric id.
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Whether text in this style takes part in indentation decisions as code.
    pub fn is_code(self) -> bool {
        matches!(
            self,
            StyleTag::Normal | StyleTag::Keyword | StyleTag::Preprocessor
        )
    }
}

/// A styled run within one line.
///
/// `start` and `end` are line-relative `char` columns; `end` is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Segment {
    /// First column.
    pub start: usize,
    /// Column after the last character.
    pub end: usize,
    /// Style of the run.
    pub style: StyleTag,
}

impl Segment {
    /// Create a segment covering `[start, end)`.
    pub fn new(start: usize, end: usize, style: StyleTag) -> Self {
        Self { start, end, style }
    }

    /// Number of chars covered.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the segment covers nothing.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Check if the segment contains a specific column.
    pub fn contains(&self, column: usize) -> bool {
        self.start <= column && column < self.end
    }

    /// Extracts the segment's text from the chars of its line.
    pub fn text(&self, line: &[char]) -> String {
        let end = self.end.min(line.len());
        let start = self.start.min(end);
        line[start..end].iter().collect()
    }
}

/// Appends contiguous segments, dropping empty ones.
///
/// Adjacent runs of the same style are kept apart: two string literals side by side stay two
/// segments, which the raw-string detection of the bracket-depth indenter relies on.
#[derive(Debug, Default)]
pub(crate) struct SegmentBuilder {
    segments: Vec<Segment>,
    start: usize,
}

impl SegmentBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Ends the current run at `end` with `style`.
    pub(crate) fn push(&mut self, end: usize, style: StyleTag) {
        if end <= self.start {
            return;
        }
        self.segments.push(Segment::new(self.start, end, style));
        self.start = end;
    }

    pub(crate) fn finish(self) -> Vec<Segment> {
        self.segments
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_ids_are_stable() {
        assert_eq!(STYLE_TAG_VERSION, 1);
        assert_eq!(StyleTag::Normal.id(), 0);
        assert_eq!(StyleTag::Newline.id(), 7);
    }

    #[test]
    fn test_builder_skips_empty_runs() {
        let mut builder = SegmentBuilder::new();
        builder.push(0, StyleTag::Normal);
        builder.push(3, StyleTag::String);
        builder.push(5, StyleTag::String);
        builder.push(9, StyleTag::Comment);
        builder.push(9, StyleTag::Normal);
        assert_eq!(
            builder.finish(),
            vec![
                Segment::new(0, 3, StyleTag::String),
                Segment::new(3, 5, StyleTag::String),
                Segment::new(5, 9, StyleTag::Comment),
            ]
        );
    }

    #[test]
    fn test_segment_text() {
        let line: Vec<char> = "let x = 1;".chars().collect();
        let seg = Segment::new(4, 5, StyleTag::Normal);
        assert_eq!(seg.text(&line), "x");
        assert!(seg.contains(4));
        assert!(!seg.contains(5));
        assert_eq!(seg.len(), 1);
    }
}
