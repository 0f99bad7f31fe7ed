//! Indentation engines.
//!
//! An engine computes the indentation a line *should* have from the lines above it, reading
//! their text and their tokenizer segments through [`StyledLines`]. The answer is
//! `Some(whitespace)` (possibly empty: flush left) or `None`, meaning the line must be left alone.
//!
//! | engine                     | used by         | idea                                      |
//! |----------------------------|-----------------|-------------------------------------------|
//! | [`StatementIndenter`]      | C++, Java, Rust | replay a bracket/label/continuation stack |
//! | [`BracketDepthIndenter`]   | Go, Kotlin      | one unit per line leaving brackets open   |
//! | [`PatternIndenter`]        | Bash            | indent-after / unindent regexes           |
//! | [`BlockKeywordIndenter`]   | Python          | block keywords                            |
//! | [`CopyPreviousIndenter`]   | plain text      | previous non-blank line                   |

mod block_keyword;
mod bracket_depth;
mod effective;
mod pattern;
mod statement;

pub use block_keyword::BlockKeywordIndenter;
pub use bracket_depth::BracketDepthIndenter;
pub use effective::{active_part, effective_text, indentation_of, leading_whitespace};
pub use pattern::PatternIndenter;
pub use statement::{BraceLanguage, SEMICOLON_ANCHOR_THRESHOLD, StatementIndenter};

use crate::language::{LanguageError, compile_pattern};
use crate::style::Segment;
use crate::tokenizer::LineState;
use codetext_lang::{IndentOptions, IndentSpec, IndentStyle, keys};
use std::fmt::Debug;
use tracing::trace;

/// Lines with their styling, as seen by the indenters.
///
/// Queries take `&mut self` because answering them may validate lazy caches.
pub trait StyledLines {
    /// Number of lines.
    fn line_count(&self) -> usize;
    /// Text of `line` without its terminator.
    fn line_text(&mut self, line: usize) -> String;
    /// Segments of `line`, covering its text.
    fn segments(&mut self, line: usize) -> Vec<Segment>;
    /// Region left open at the end of `line`, if any.
    fn state_after(&mut self, line: usize) -> LineState;
}

/// An indentation algorithm.
pub trait LineIndenter: Debug + Send + Sync {
    /// Indentation for `line`, or `None` to leave it untouched. `line` is in range.
    fn indent_for(&self, lines: &mut dyn StyledLines, line: usize) -> Option<String>;
}

/// Copies the leading whitespace of the previous non-blank line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyPreviousIndenter;

impl LineIndenter for CopyPreviousIndenter {
    fn indent_for(&self, lines: &mut dyn StyledLines, line: usize) -> Option<String> {
        let indentation = match effective::previous_code_line(lines, line) {
            Some(previous) => leading_whitespace(&lines.line_text(previous)).to_string(),
            None => String::new(),
        };
        Some(indentation)
    }
}

/// The configured engine.
#[derive(Debug, Clone)]
pub enum IndentEngine {
    /// Statement replay for brace languages.
    Statement(StatementIndenter),
    /// Bracket-depth counting.
    BracketDepth(BracketDepthIndenter),
    /// Regex rules.
    Pattern(PatternIndenter),
    /// Block keywords.
    BlockKeyword(BlockKeywordIndenter),
    /// Previous line's indentation.
    CopyPrevious(CopyPreviousIndenter),
}

impl IndentEngine {
    fn as_indenter(&self) -> &dyn LineIndenter {
        match self {
            IndentEngine::Statement(indenter) => indenter,
            IndentEngine::BracketDepth(indenter) => indenter,
            IndentEngine::Pattern(indenter) => indenter,
            IndentEngine::BlockKeyword(indenter) => indenter,
            IndentEngine::CopyPrevious(indenter) => indenter,
        }
    }
}

fn text_option(options: &IndentOptions, key: &str) -> String {
    options.text(key).unwrap_or_default().to_string()
}

/// An engine plus the characters whose insertion re-indents the current line.
#[derive(Debug, Clone)]
pub struct Indenter {
    engine: IndentEngine,
    electric: String,
}

impl Indenter {
    /// Builds the engine described by `spec`, with its option overrides applied.
    pub fn from_spec(spec: &IndentSpec) -> Result<Self, LanguageError> {
        let options = spec.options()?;
        let engine = match &spec.style {
            IndentStyle::Statement { flavor } => IndentEngine::Statement(StatementIndenter::new(
                BraceLanguage::for_flavor(*flavor),
                &options,
            )),
            IndentStyle::BracketDepth => {
                IndentEngine::BracketDepth(BracketDepthIndenter::new(&options))
            }
            IndentStyle::Pattern {
                indent_after,
                indent,
                unindent,
            } => IndentEngine::Pattern(PatternIndenter::new(
                compile_pattern(indent_after)?,
                indent.as_deref().map(compile_pattern).transpose()?,
                compile_pattern(unindent)?,
                text_option(&options, keys::INDENT_UNIT),
            )),
            IndentStyle::BlockKeyword => IndentEngine::BlockKeyword(BlockKeywordIndenter::new(
                text_option(&options, keys::INDENT_UNIT),
            )?),
            IndentStyle::CopyPrevious => IndentEngine::CopyPrevious(CopyPreviousIndenter),
        };
        Ok(Self {
            engine,
            electric: spec.electric.clone(),
        })
    }

    /// A copy-previous indenter using `spec`'s electric characters.
    pub(crate) fn copy_previous(spec: &IndentSpec) -> Self {
        Self {
            engine: IndentEngine::CopyPrevious(CopyPreviousIndenter),
            electric: spec.electric.clone(),
        }
    }

    /// The configured engine.
    pub fn engine(&self) -> &IndentEngine {
        &self.engine
    }

    /// Whether typing `c` should trigger re-indentation of the current line.
    pub fn is_electric(&self, c: char) -> bool {
        self.electric.contains(c)
    }

    /// Indentation for `line`; `None` when the line must be left alone or is out of range.
    ///
    /// A line starting inside a multi-line string (a raw string or a heredoc, for instance)
    /// is part of the literal and is always left alone.
    pub fn indent_for(&self, lines: &mut dyn StyledLines, line: usize) -> Option<String> {
        if line >= lines.line_count() {
            return None;
        }
        if effective::starts_inside_string(lines, line) {
            trace!(line, "inside a multi-line string; leaving indentation alone");
            return None;
        }
        self.engine.as_indenter().indent_for(lines, line)
    }
}
