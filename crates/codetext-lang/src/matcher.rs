use crate::LangError;
use serde::{Deserialize, Serialize};

/// Declarative description of one lexical region recognizer.
///
/// A language lists these in priority order; at every scan position the tokenizer tries them in
/// that order and takes the first match. Order matters when two matchers share a leading
/// character (for example a `//` line comment must come before anything starting with `/`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatcherSpec {
    /// A comment running from `prefix` to the end of the line (`//`, `#`, `--`).
    LineComment {
        /// The token that opens the comment.
        prefix: String,
    },
    /// A comment delimited by `open`/`close` that may span lines (`/*` ... `*/`).
    BlockComment {
        /// Opening token.
        open: String,
        /// Closing token.
        close: String,
    },
    /// A single-line string closed by `quote`, with backslash escapes.
    ///
    /// An unterminated string is reported as an error region that still consumes the rest of the
    /// line.
    EscapedString {
        /// The quote character (`"` or `'`).
        quote: char,
    },
    /// A C-style character literal (`'a'`, `'\n'`).
    CharLiteral,
    /// A string opened and closed by the same `delimiter` that may span lines
    /// (Go's `` ` ``, Python's `"""`, Bash quotes).
    MultiLineString {
        /// Opening and closing token.
        delimiter: String,
    },
    /// A C++ raw string literal, `R"delim( ... )delim"`.
    CppRawString,
    /// A shell here-document, `<<WORD`, closed by a line consisting solely of `WORD`.
    HereDoc,
}

impl MatcherSpec {
    /// Short name of the matcher kind, as used in YAML and error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            MatcherSpec::LineComment { .. } => "line_comment",
            MatcherSpec::BlockComment { .. } => "block_comment",
            MatcherSpec::EscapedString { .. } => "escaped_string",
            MatcherSpec::CharLiteral => "char_literal",
            MatcherSpec::MultiLineString { .. } => "multi_line_string",
            MatcherSpec::CppRawString => "cpp_raw_string",
            MatcherSpec::HereDoc => "here_doc",
        }
    }

    /// Rejects matchers with empty delimiters.
    pub fn validate(&self) -> Result<(), LangError> {
        let empty = match self {
            MatcherSpec::LineComment { prefix } => prefix.is_empty(),
            MatcherSpec::BlockComment { open, close } => open.is_empty() || close.is_empty(),
            MatcherSpec::MultiLineString { delimiter } => delimiter.is_empty(),
            MatcherSpec::EscapedString { .. }
            | MatcherSpec::CharLiteral
            | MatcherSpec::CppRawString
            | MatcherSpec::HereDoc => false,
        };
        if empty {
            return Err(LangError::EmptyDelimiter {
                matcher: self.kind(),
            });
        }
        Ok(())
    }

    /// `//`-style line comment.
    pub fn line_comment(prefix: impl Into<String>) -> Self {
        MatcherSpec::LineComment {
            prefix: prefix.into(),
        }
    }

    /// Block comment with the given tokens.
    pub fn block_comment(open: impl Into<String>, close: impl Into<String>) -> Self {
        MatcherSpec::BlockComment {
            open: open.into(),
            close: close.into(),
        }
    }

    /// Symmetric multi-line string.
    pub fn multi_line_string(delimiter: impl Into<String>) -> Self {
        MatcherSpec::MultiLineString {
            delimiter: delimiter.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_tagged_matchers() {
        let yaml = r#"
- kind: line_comment
  prefix: "//"
- kind: escaped_string
  quote: '"'
- kind: here_doc
"#;
        let matchers: Vec<MatcherSpec> = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            matchers,
            vec![
                MatcherSpec::line_comment("//"),
                MatcherSpec::EscapedString { quote: '"' },
                MatcherSpec::HereDoc,
            ]
        );
    }

    #[test]
    fn test_empty_delimiter_rejected() {
        let err = MatcherSpec::block_comment("/*", "").validate().unwrap_err();
        assert!(matches!(
            err,
            LangError::EmptyDelimiter {
                matcher: "block_comment"
            }
        ));
        assert!(MatcherSpec::CharLiteral.validate().is_ok());
    }
}
