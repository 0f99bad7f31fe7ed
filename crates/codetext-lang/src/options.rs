//! Named indentation options.
//!
//! Every indentation style declares the options it understands as a static table of
//! [`OptionDescriptor`]s. [`IndentOptions`] starts from those defaults and only accepts overrides
//! for declared names with a value of the declared type, so a typo in a preferences file is an
//! error instead of a silently ignored setting.

use crate::LangError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Option names shared with preference files.
pub mod keys {
    /// Align continuation lines with the text after an open bracket.
    pub const ALIGN_FUNCTION_ARGS: &str = "alignFunctionArgs";
    /// Indent after `namespace xx {`.
    pub const NAMESPACE_INDENT: &str = "namespaceIndent";
    /// Indent after `{` (and inside `case` labels).
    pub const BRACE_INDENT: &str = "braceIndent";
    /// Indent after `[`.
    pub const SQUARE_BRACKET_INDENT: &str = "squareBracketIndent";
    /// Indent after `(` and for statement continuation lines.
    pub const PARENTHESIS_INDENT: &str = "parenthesisIndent";
    /// Outdent applied to `case`/`default` labels.
    pub const SWITCH_LABEL_OUTDENT: &str = "switchLabelOutdent";
    /// Outdent applied to `public:`/`protected:`/`private:`.
    pub const ACCESS_SPECIFIER_OUTDENT: &str = "accessSpecifierOutdent";
    /// One level of indentation for the bracket-depth, regex and block-keyword styles.
    pub const INDENT_UNIT: &str = "indentUnit";
}

/// A concrete option value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    /// A flag.
    Bool(bool),
    /// A string, usually a run of whitespace.
    Text(String),
}

/// Compile-time default of an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionDefault {
    /// A flag default.
    Bool(bool),
    /// A string default.
    Text(&'static str),
}

impl OptionDefault {
    /// Converts the default into an owned value.
    pub fn to_value(self) -> OptionValue {
        match self {
            OptionDefault::Bool(b) => OptionValue::Bool(b),
            OptionDefault::Text(s) => OptionValue::Text(s.to_string()),
        }
    }

    fn kind_name(self) -> &'static str {
        match self {
            OptionDefault::Bool(_) => "boolean",
            OptionDefault::Text(_) => "string",
        }
    }
}

/// Declaration of one option: name, default and description for preference UIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionDescriptor {
    /// Option name (see [`keys`]).
    pub key: &'static str,
    /// Default value.
    pub default: OptionDefault,
    /// Human-readable description.
    pub description: &'static str,
}

pub(crate) const STATEMENT_OPTIONS: &[OptionDescriptor] = &[
    OptionDescriptor {
        key: keys::ALIGN_FUNCTION_ARGS,
        default: OptionDefault::Bool(true),
        description: "Align args in multi-line function calls",
    },
    OptionDescriptor {
        key: keys::NAMESPACE_INDENT,
        default: OptionDefault::Text(""),
        description: "Indent after C++ 'namespace xx {' lines",
    },
    OptionDescriptor {
        key: keys::BRACE_INDENT,
        default: OptionDefault::Text("    "),
        description: "Indent after an open curly brace",
    },
    OptionDescriptor {
        key: keys::SQUARE_BRACKET_INDENT,
        default: OptionDefault::Text("    "),
        description: "Indent after an open square bracket",
    },
    OptionDescriptor {
        key: keys::PARENTHESIS_INDENT,
        default: OptionDefault::Text("    "),
        description: "Indent after round brackets (also expression continuation)",
    },
    OptionDescriptor {
        key: keys::SWITCH_LABEL_OUTDENT,
        default: OptionDefault::Text(""),
        description: "Outdent for 'case' and 'default' switch labels",
    },
    OptionDescriptor {
        key: keys::ACCESS_SPECIFIER_OUTDENT,
        default: OptionDefault::Text(" "),
        description: "Outdent for access specifiers",
    },
];

pub(crate) const BRACKET_DEPTH_OPTIONS: &[OptionDescriptor] = &[
    OptionDescriptor {
        key: keys::INDENT_UNIT,
        default: OptionDefault::Text("\t"),
        description: "Indent added per line that leaves brackets open",
    },
];

pub(crate) const PATTERN_OPTIONS: &[OptionDescriptor] = &[OptionDescriptor {
    key: keys::INDENT_UNIT,
    default: OptionDefault::Text("    "),
    description: "Indent added after a line matching the indent-after rule",
}];

pub(crate) const BLOCK_KEYWORD_OPTIONS: &[OptionDescriptor] = &[OptionDescriptor {
    key: keys::INDENT_UNIT,
    default: OptionDefault::Text("    "),
    description: "Indent added inside a block",
}];

pub(crate) const COPY_PREVIOUS_OPTIONS: &[OptionDescriptor] = &[];

/// Resolved option values for one indentation style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndentOptions {
    style: &'static str,
    descriptors: &'static [OptionDescriptor],
    values: BTreeMap<String, OptionValue>,
}

impl IndentOptions {
    pub(crate) fn defaults(style: &'static str, descriptors: &'static [OptionDescriptor]) -> Self {
        let values = descriptors
            .iter()
            .map(|d| (d.key.to_string(), d.default.to_value()))
            .collect();
        Self {
            style,
            descriptors,
            values,
        }
    }

    /// The options this style understands, in declaration order.
    pub fn descriptors(&self) -> &'static [OptionDescriptor] {
        self.descriptors
    }

    /// Overrides one option.
    pub fn set(&mut self, key: &str, value: OptionValue) -> Result<(), LangError> {
        let Some(descriptor) = self.descriptors.iter().find(|d| d.key == key) else {
            return Err(LangError::UnknownOption {
                key: key.to_string(),
                style: self.style,
            });
        };
        let type_matches = matches!(
            (descriptor.default, &value),
            (OptionDefault::Bool(_), OptionValue::Bool(_))
                | (OptionDefault::Text(_), OptionValue::Text(_))
        );
        if !type_matches {
            return Err(LangError::OptionType {
                key: key.to_string(),
                expected: descriptor.default.kind_name(),
            });
        }
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    /// Applies every override in `overrides`, stopping at the first invalid one.
    pub fn apply(&mut self, overrides: &BTreeMap<String, OptionValue>) -> Result<(), LangError> {
        for (key, value) in overrides {
            self.set(key, value.clone())?;
        }
        Ok(())
    }

    /// String value of `key`, if declared as a string option.
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.values.get(key) {
            Some(OptionValue::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Flag value of `key`, if declared as a boolean option.
    pub fn flag(&self, key: &str) -> Option<bool> {
        match self.values.get(key) {
            Some(OptionValue::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    /// Iterates over `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}
