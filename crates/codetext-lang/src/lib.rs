#![warn(missing_docs)]
//! `codetext-lang` - data-driven language definitions for `codetext-core`.
//!
//! This crate intentionally stays lightweight and does **not** depend on any regex engine or
//! tokenizer. It describes languages as plain data that hosts can build in code or load from YAML:
//!
//! - an ordered list of [`MatcherSpec`]s (comments, strings, heredocs, ...),
//! - a keyword set plus the regex used to find keyword candidates,
//! - an [`IndentSpec`] selecting an indentation algorithm together with its named options
//!   ([`IndentOptions`]), each with a default and a human-readable description.
//!
//! `codetext-core` compiles a [`LanguageDefinition`] into an executable language.

pub mod builtin;
mod definition;
mod error;
mod matcher;
mod options;
mod registry;

pub use definition::{BraceFlavor, IndentSpec, IndentStyle, LanguageDefinition};
pub use error::LangError;
pub use matcher::MatcherSpec;
pub use options::{IndentOptions, OptionDefault, OptionDescriptor, OptionValue, keys};
pub use registry::LanguageRegistry;

/// Default keyword-finding pattern: every run of word characters is a candidate.
///
/// The first capturing group (if any) is what gets tested for membership in the keyword set.
pub const DEFAULT_KEYWORD_PATTERN: &str = r"\b(\w+)\b";
