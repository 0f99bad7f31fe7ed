//! Compiled languages: matchers, style applicators and an indenter built from a
//! [`LanguageDefinition`].

use crate::applicators::{
    HYPERLINK_PATTERN, HyperlinkApplicator, KeywordApplicator, PreprocessorApplicator,
    StyleApplicator,
};
use crate::indent::Indenter;
use crate::matcher::{self, SequenceMatcher};
use crate::style::Segment;
use codetext_lang::{LangError, LanguageDefinition};
use regex::Regex;
use thiserror::Error;
use tracing::debug;

/// Errors raised while compiling a language definition.
#[derive(Debug, Error)]
pub enum LanguageError {
    /// The definition itself is invalid.
    #[error(transparent)]
    Definition(#[from] LangError),

    /// A regular expression in the definition failed to compile.
    #[error("invalid pattern `{pattern}`")]
    InvalidPattern {
        /// The offending pattern.
        pattern: String,
        /// Regex compiler error.
        #[source]
        source: regex::Error,
    },
}

/// Compiles `pattern`, attributing failures to it.
pub(crate) fn compile_pattern(pattern: &str) -> Result<Regex, LanguageError> {
    Regex::new(pattern).map_err(|source| LanguageError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

/// A language ready for use by the tokenizer and the indentation engines.
///
/// Immutable once compiled; text models share it behind an `Arc`.
#[derive(Debug)]
pub struct Language {
    definition: LanguageDefinition,
    matchers: Vec<Box<dyn SequenceMatcher>>,
    applicators: Vec<Box<dyn StyleApplicator>>,
    indenter: Indenter,
}

impl Language {
    /// Validates and compiles `definition`.
    pub fn compile(definition: LanguageDefinition) -> Result<Self, LanguageError> {
        definition.validate()?;

        let matchers = definition.matchers.iter().map(matcher::compile).collect();

        let mut applicators: Vec<Box<dyn StyleApplicator>> = Vec::new();
        if definition.preprocessor {
            applicators.push(Box::new(PreprocessorApplicator));
        }
        if !definition.keywords.is_empty() {
            let regex = compile_pattern(&definition.keyword_pattern)?;
            applicators.push(Box::new(KeywordApplicator::new(
                regex,
                &definition.keywords,
                definition.keywords_case_sensitive,
            )));
        }
        if definition.hyperlinks {
            let applicator =
                HyperlinkApplicator::new().map_err(|source| LanguageError::InvalidPattern {
                    pattern: HYPERLINK_PATTERN.to_string(),
                    source,
                })?;
            applicators.push(Box::new(applicator));
        }

        let indenter = Indenter::from_spec(&definition.indent)?;
        debug!(
            language = %definition.name,
            matchers = definition.matchers.len(),
            applicators = applicators.len(),
            indent = definition.indent.style.name(),
            "compiled language"
        );
        Ok(Self {
            definition,
            matchers,
            applicators,
            indenter,
        })
    }

    /// Plain text: no matchers, no keywords, indentation copied from the previous line.
    pub fn plain_text() -> Self {
        let definition = codetext_lang::builtin::plain_text();
        let indenter = Indenter::copy_previous(&definition.indent);
        Self {
            definition,
            matchers: Vec::new(),
            applicators: Vec::new(),
            indenter,
        }
    }

    /// Language name.
    pub fn name(&self) -> &str {
        &self.definition.name
    }

    /// The definition this language was compiled from.
    pub fn definition(&self) -> &LanguageDefinition {
        &self.definition
    }

    /// Sequence matchers, in priority order.
    pub fn matchers(&self) -> &[Box<dyn SequenceMatcher>] {
        &self.matchers
    }

    /// The indentation engine.
    pub fn indenter(&self) -> &Indenter {
        &self.indenter
    }

    /// Whether typing `c` should re-indent the current line.
    pub fn is_electric(&self, c: char) -> bool {
        self.indenter.is_electric(c)
    }

    /// Appends a matcher after the compiled ones.
    pub fn with_matcher(mut self, matcher: Box<dyn SequenceMatcher>) -> Self {
        self.matchers.push(matcher);
        self
    }

    /// Runs the style applicators, in order, over the tokenizer's segments of one line.
    pub fn apply_styles(&self, line: &[char], segments: Vec<Segment>) -> Vec<Segment> {
        self.applicators
            .iter()
            .fold(segments, |segments, applicator| applicator.apply(line, segments))
    }
}
