//! Sequence matchers: recognizers for one lexical region starting at a given column.
//!
//! A matcher looks at a line (as a slice of `char`s) and a start column and either declines, or
//! reports where the region ends: at a column on the same line ([`RegionEnd::Within`]), or not on
//! this line at all ([`RegionEnd::Open`]), in which case the [`OpenRegion`] carries the terminator
//! to search for on later lines. That carried value is the only state the tokenizer threads from
//! one line to the next.

use crate::style::StyleTag;
use codetext_lang::MatcherSpec;
use std::fmt::Debug;

/// How a region that is still open at the end of a line is closed on a later line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Terminator {
    /// The region ends after the first occurrence of this text anywhere on the line.
    Text(String),
    /// The region ends on a line consisting solely of this word (a heredoc terminator).
    Line {
        /// The terminating word.
        word: String,
        /// Leading tabs before the word are ignored (`<<-WORD`).
        strip_tabs: bool,
    },
}

impl Terminator {
    /// Column just after the terminator on `line`, or `None` if the region continues.
    pub fn end_in(&self, line: &[char]) -> Option<usize> {
        match self {
            Terminator::Text(text) => {
                let pattern: Vec<char> = text.chars().collect();
                find(line, 0, &pattern).map(|index| index + pattern.len())
            }
            Terminator::Line { word, strip_tabs } => {
                let body = if *strip_tabs {
                    let tabs = line.iter().take_while(|&&c| c == '\t').count();
                    &line[tabs..]
                } else {
                    line
                };
                body.iter()
                    .copied()
                    .eq(word.chars())
                    .then_some(line.len())
            }
        }
    }
}

/// A region that continues past the end of its line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OpenRegion {
    /// Style of the whole region.
    pub style: StyleTag,
    /// What closes it.
    pub terminator: Terminator,
}

/// Where a matched region ends.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RegionEnd {
    /// The region ends on the same line, just before column `end`.
    Within {
        /// Style of the region.
        style: StyleTag,
        /// Column after the region's last character.
        end: usize,
    },
    /// The region runs to the end of the line and beyond.
    Open(OpenRegion),
}

impl RegionEnd {
    fn within(style: StyleTag, end: usize) -> Self {
        RegionEnd::Within { style, end }
    }

    fn open(style: StyleTag, terminator: Terminator) -> Self {
        RegionEnd::Open(OpenRegion { style, terminator })
    }

    /// Style of the region.
    pub fn style(&self) -> StyleTag {
        match self {
            RegionEnd::Within { style, .. } => *style,
            RegionEnd::Open(region) => region.style,
        }
    }
}

/// Recognizes one kind of lexical region.
pub trait SequenceMatcher: Debug + Send + Sync {
    /// Tries to match a region starting exactly at `from` (which is always `< line.len()`).
    fn match_at(&self, line: &[char], from: usize) -> Option<RegionEnd>;
}

pub(crate) fn starts_with_at(line: &[char], from: usize, pattern: &[char]) -> bool {
    line.get(from..from + pattern.len()) == Some(pattern)
}

pub(crate) fn find(line: &[char], from: usize, pattern: &[char]) -> Option<usize> {
    if pattern.is_empty() || from > line.len() {
        return None;
    }
    line[from..]
        .windows(pattern.len())
        .position(|window| window == pattern)
        .map(|index| from + index)
}

/// Builds the matcher described by `spec`.
pub fn compile(spec: &MatcherSpec) -> Box<dyn SequenceMatcher> {
    match spec {
        MatcherSpec::LineComment { prefix } => Box::new(LineComment::new(prefix)),
        MatcherSpec::BlockComment { open, close } => Box::new(BlockComment::new(open, close)),
        MatcherSpec::EscapedString { quote } => Box::new(EscapedString { quote: *quote }),
        MatcherSpec::CharLiteral => Box::new(CharLiteral),
        MatcherSpec::MultiLineString { delimiter } => Box::new(MultiLineString::new(delimiter)),
        MatcherSpec::CppRawString => Box::new(CppRawString),
        MatcherSpec::HereDoc => Box::new(HereDoc),
    }
}

/// A comment from a prefix to the end of the line.
#[derive(Debug, Clone)]
pub struct LineComment {
    prefix: Vec<char>,
}

impl LineComment {
    /// Comment introduced by `prefix`.
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.chars().collect(),
        }
    }
}

impl SequenceMatcher for LineComment {
    fn match_at(&self, line: &[char], from: usize) -> Option<RegionEnd> {
        starts_with_at(line, from, &self.prefix)
            .then(|| RegionEnd::within(StyleTag::Comment, line.len()))
    }
}

/// A comment between two tokens, possibly spanning lines.
#[derive(Debug, Clone)]
pub struct BlockComment {
    open: Vec<char>,
    close: String,
    close_chars: Vec<char>,
}

impl BlockComment {
    /// Comment delimited by `open` and `close`.
    pub fn new(open: &str, close: &str) -> Self {
        Self {
            open: open.chars().collect(),
            close: close.to_string(),
            close_chars: close.chars().collect(),
        }
    }
}

impl SequenceMatcher for BlockComment {
    fn match_at(&self, line: &[char], from: usize) -> Option<RegionEnd> {
        if !starts_with_at(line, from, &self.open) {
            return None;
        }
        Some(
            match find(line, from + self.open.len(), &self.close_chars) {
                Some(index) => RegionEnd::within(StyleTag::Comment, index + self.close_chars.len()),
                None => RegionEnd::open(StyleTag::Comment, Terminator::Text(self.close.clone())),
            },
        )
    }
}

/// A single-line string with backslash escapes.
///
/// A quote is escaped when preceded by an odd number of backslashes. An unterminated string is an
/// [`StyleTag::Error`] region running to the end of the line.
#[derive(Debug, Clone)]
pub struct EscapedString {
    quote: char,
}

impl EscapedString {
    /// String delimited by `quote`.
    pub fn new(quote: char) -> Self {
        Self { quote }
    }
}

impl SequenceMatcher for EscapedString {
    fn match_at(&self, line: &[char], from: usize) -> Option<RegionEnd> {
        if line[from] != self.quote {
            return None;
        }
        let mut escaped = false;
        for (index, &ch) in line.iter().enumerate().skip(from + 1) {
            if ch == '\\' {
                escaped = !escaped;
                continue;
            }
            if ch == self.quote && !escaped {
                return Some(RegionEnd::within(StyleTag::String, index + 1));
            }
            escaped = false;
        }
        Some(RegionEnd::within(StyleTag::Error, line.len()))
    }
}

/// A C character literal.
///
/// Escapes (`'\n'`, `'\x41'`) are accepted up to the next quote; empty (`''`) and unterminated
/// literals, and literals holding more than one unescaped character, are errors.
#[derive(Debug, Clone, Copy)]
pub struct CharLiteral;

impl SequenceMatcher for CharLiteral {
    fn match_at(&self, line: &[char], from: usize) -> Option<RegionEnd> {
        if line[from] != '\'' {
            return None;
        }
        let error_to_eol = Some(RegionEnd::within(StyleTag::Error, line.len()));
        let mut index = from + 1;
        match line.get(index) {
            None | Some('\'') => return error_to_eol,
            Some('\\') => {
                return line
                    .iter()
                    .enumerate()
                    .skip(index + 2)
                    .find(|&(_, &ch)| ch == '\'')
                    .map(|(close, _)| RegionEnd::within(StyleTag::String, close + 1))
                    .or(error_to_eol);
            }
            Some(_) => {}
        }
        index += 1;
        match line.get(index) {
            None => error_to_eol,
            Some('\'') => Some(RegionEnd::within(StyleTag::String, index + 1)),
            Some(_) => Some(RegionEnd::within(StyleTag::Error, index + 1)),
        }
    }
}

/// A string opened and closed by the same delimiter, possibly spanning lines.
#[derive(Debug, Clone)]
pub struct MultiLineString {
    delimiter: String,
    delimiter_chars: Vec<char>,
}

impl MultiLineString {
    /// String delimited by `delimiter` on both ends.
    pub fn new(delimiter: &str) -> Self {
        Self {
            delimiter: delimiter.to_string(),
            delimiter_chars: delimiter.chars().collect(),
        }
    }
}

impl SequenceMatcher for MultiLineString {
    fn match_at(&self, line: &[char], from: usize) -> Option<RegionEnd> {
        let delimiter = &self.delimiter_chars;
        if !starts_with_at(line, from, delimiter) {
            return None;
        }
        Some(match find(line, from + delimiter.len(), delimiter) {
            Some(index) => RegionEnd::within(StyleTag::String, index + delimiter.len()),
            None => RegionEnd::open(StyleTag::String, Terminator::Text(self.delimiter.clone())),
        })
    }
}

/// Longest delimiter allowed in a C++ raw string literal.
pub const CPP_RAW_DELIMITER_MAX: usize = 16;

/// A C++ raw string literal, `R"delim( ... )delim"`.
///
/// The delimiter may hold up to [`CPP_RAW_DELIMITER_MAX`] characters other than parentheses,
/// whitespace and backslashes; anything else makes the prefix an error region.
#[derive(Debug, Clone, Copy)]
pub struct CppRawString;

impl SequenceMatcher for CppRawString {
    fn match_at(&self, line: &[char], from: usize) -> Option<RegionEnd> {
        if !starts_with_at(line, from, &['R', '"']) {
            return None;
        }
        let delimiter_start = from + 2;
        let mut delimiter_end = delimiter_start;
        while delimiter_end < line.len() {
            let ch = line[delimiter_end];
            if ch == '(' {
                break;
            }
            if ch.is_whitespace()
                || ch == ')'
                || ch == '\\'
                || delimiter_end - delimiter_start >= CPP_RAW_DELIMITER_MAX
            {
                return Some(RegionEnd::within(StyleTag::Error, delimiter_end));
            }
            delimiter_end += 1;
        }
        if delimiter_end == line.len() {
            return Some(RegionEnd::within(StyleTag::Error, delimiter_end));
        }
        let close: Vec<char> = std::iter::once(')')
            .chain(line[delimiter_start..delimiter_end].iter().copied())
            .chain(std::iter::once('"'))
            .collect();
        Some(match find(line, delimiter_end + 1, &close) {
            Some(index) => RegionEnd::within(StyleTag::String, index + close.len()),
            None => RegionEnd::open(
                StyleTag::String,
                Terminator::Text(close.into_iter().collect()),
            ),
        })
    }
}

/// A shell here-document: `<<WORD`, `<<-WORD`, `<<'WORD'` or `<<"WORD"`.
///
/// The rest of the opening line and every following line up to one consisting solely of `WORD`
/// are styled as a string. `<<<` (a here-string) and a missing word are not here-documents.
#[derive(Debug, Clone, Copy)]
pub struct HereDoc;

fn is_here_doc_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || matches!(ch, '_' | '-' | '+' | '$')
}

impl SequenceMatcher for HereDoc {
    fn match_at(&self, line: &[char], from: usize) -> Option<RegionEnd> {
        if !starts_with_at(line, from, &['<', '<']) || line.get(from + 2) == Some(&'<') {
            return None;
        }
        let mut index = from + 2;
        let strip_tabs = line.get(index) == Some(&'-');
        if strip_tabs {
            index += 1;
        }
        while index < line.len() && line[index].is_whitespace() {
            index += 1;
        }
        if index == line.len() {
            return Some(RegionEnd::within(StyleTag::Error, line.len()));
        }
        let word: String = match line[index] {
            quote @ ('\'' | '"') => line[index + 1..]
                .iter()
                .take_while(|&&ch| ch != quote)
                .collect(),
            _ => line[index..]
                .iter()
                .take_while(|&&ch| is_here_doc_word_char(ch))
                .collect(),
        };
        if word.is_empty() {
            return None;
        }
        Some(RegionEnd::open(
            StyleTag::String,
            Terminator::Line { word, strip_tabs },
        ))
    }
}
