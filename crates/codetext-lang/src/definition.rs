use crate::options::{
    BLOCK_KEYWORD_OPTIONS, BRACKET_DEPTH_OPTIONS, COPY_PREVIOUS_OPTIONS, PATTERN_OPTIONS,
    STATEMENT_OPTIONS,
};
use crate::{DEFAULT_KEYWORD_PATTERN, IndentOptions, LangError, MatcherSpec, OptionValue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which brace-language predicates the statement indenter enables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BraceFlavor {
    /// C and C++: namespaces, templates, access specifiers, flush-left preprocessor lines and
    /// `<<` alignment.
    Cpp,
    /// Java: switch labels only.
    Java,
    /// Any other brace language (Rust, C#, ...): switch labels only.
    #[default]
    CLike,
}

/// The indentation algorithm a language uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IndentStyle {
    /// Statement-oriented replay for brace languages.
    Statement {
        #[serde(default)]
        /// Predicate set to use.
        flavor: BraceFlavor,
    },
    /// Bracket-depth counting (Go, Kotlin).
    BracketDepth,
    /// Regular-expression rules on the active part of lines.
    Pattern {
        /// If the previous non-blank line matches, indentation is added.
        indent_after: String,
        #[serde(default)]
        /// If the current line matches, indentation is added (only when `indent_after` did not).
        indent: Option<String>,
        /// If the current line matches, indentation is removed.
        unindent: String,
    },
    /// Block keywords ending in `:` (Python).
    BlockKeyword,
    /// Copy the indentation of the previous non-blank line.
    CopyPrevious,
}

impl IndentStyle {
    /// Short style name used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            IndentStyle::Statement { .. } => "statement",
            IndentStyle::BracketDepth => "bracket-depth",
            IndentStyle::Pattern { .. } => "pattern",
            IndentStyle::BlockKeyword => "block-keyword",
            IndentStyle::CopyPrevious => "copy-previous",
        }
    }

    /// Default option values for this style.
    pub fn default_options(&self) -> IndentOptions {
        let descriptors = match self {
            IndentStyle::Statement { .. } => STATEMENT_OPTIONS,
            IndentStyle::BracketDepth => BRACKET_DEPTH_OPTIONS,
            IndentStyle::Pattern { .. } => PATTERN_OPTIONS,
            IndentStyle::BlockKeyword => BLOCK_KEYWORD_OPTIONS,
            IndentStyle::CopyPrevious => COPY_PREVIOUS_OPTIONS,
        };
        IndentOptions::defaults(self.name(), descriptors)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Indentation configuration: algorithm, electric characters and option overrides.
pub struct IndentSpec {
    /// Algorithm.
    pub style: IndentStyle,

    #[serde(default)]
    /// Characters whose insertion should trigger re-indentation of the current line.
    pub electric: String,

    #[serde(default)]
    /// Option overrides on top of the style's defaults.
    pub options: BTreeMap<String, OptionValue>,
}

impl IndentSpec {
    /// Creates a spec with no electric characters and default options.
    pub fn new(style: IndentStyle) -> Self {
        Self {
            style,
            electric: String::new(),
            options: BTreeMap::new(),
        }
    }

    /// Sets the electric characters.
    pub fn with_electric(mut self, electric: impl Into<String>) -> Self {
        self.electric = electric.into();
        self
    }

    /// Adds an option override.
    pub fn with_option(mut self, key: &str, value: OptionValue) -> Self {
        self.options.insert(key.to_string(), value);
        self
    }

    /// Resolves the style defaults plus overrides.
    pub fn options(&self) -> Result<IndentOptions, LangError> {
        let mut options = self.style.default_options();
        options.apply(&self.options)?;
        Ok(options)
    }

    /// Whether typing `c` should trigger re-indentation.
    pub fn is_electric(&self, c: char) -> bool {
        self.electric.contains(c)
    }
}

impl Default for IndentSpec {
    fn default() -> Self {
        Self::new(IndentStyle::CopyPrevious)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// A complete, data-only language description.
pub struct LanguageDefinition {
    /// Display name, also the registry key (`"C++"`, `"Go"`).
    pub name: String,

    #[serde(default)]
    /// File-name suffixes (`".cpp"`) or whole names (`"Makefile"`) associated with the language.
    pub file_extensions: Vec<String>,

    #[serde(default)]
    /// Region matchers in priority order.
    pub matchers: Vec<MatcherSpec>,

    #[serde(default)]
    /// Keywords highlighted in normal text.
    pub keywords: Vec<String>,

    #[serde(default = "default_keyword_pattern")]
    /// Regex finding keyword candidates; the first capture group is tested against `keywords`.
    pub keyword_pattern: String,

    #[serde(default = "default_true")]
    /// Whether keyword membership is case-sensitive.
    pub keywords_case_sensitive: bool,

    #[serde(default)]
    /// Style normal text from a line-leading `#` as preprocessor.
    pub preprocessor: bool,

    #[serde(default = "default_true")]
    /// Detect URLs inside comments.
    pub hyperlinks: bool,

    #[serde(default)]
    /// Indentation configuration.
    pub indent: IndentSpec,
}

fn default_keyword_pattern() -> String {
    DEFAULT_KEYWORD_PATTERN.to_string()
}

fn default_true() -> bool {
    true
}

impl LanguageDefinition {
    /// Creates an empty definition: no matchers, no keywords, copy-previous indentation.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            file_extensions: Vec::new(),
            matchers: Vec::new(),
            keywords: Vec::new(),
            keyword_pattern: default_keyword_pattern(),
            keywords_case_sensitive: true,
            preprocessor: false,
            hyperlinks: true,
            indent: IndentSpec::default(),
        }
    }

    /// Parses and validates a definition from YAML.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, LangError> {
        let definition: LanguageDefinition = serde_yaml::from_str(yaml)?;
        definition.validate()?;
        Ok(definition)
    }

    /// Checks everything that can be checked without a regex engine.
    pub fn validate(&self) -> Result<(), LangError> {
        if self.name.trim().is_empty() {
            return Err(LangError::MissingName);
        }
        for matcher in &self.matchers {
            matcher.validate()?;
        }
        self.indent.options()?;
        Ok(())
    }

    /// Whether `file_name` (a bare name, not a path) belongs to this language.
    pub fn matches_file_name(&self, file_name: &str) -> bool {
        self.file_extensions
            .iter()
            .any(|suffix| file_name.ends_with(suffix.as_str()))
    }
}
