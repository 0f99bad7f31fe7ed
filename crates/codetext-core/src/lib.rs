#![warn(missing_docs)]
//! Codetext Core - Headless Code-Aware Text Kernel
//!
//! # Overview
//!
//! `codetext-core` keeps three views of a text buffer consistent under edits: a lazily validated
//! line index, per-line lexical styling from an incremental tokenizer, and language-aware
//! indentation computed from that styling. It draws nothing and owns no UI; hosts feed it edits
//! and query lines.
//!
//! # Core Features
//!
//! - **Lazy Line Index**: offset ↔ line mapping with a validation watermark, O(log n) lookups
//! - **Incremental Tokenizer**: one region of carry-over state per line, re-tokenizing only what
//!   an edit can affect
//! - **Sequence Matchers**: comments, strings, char literals, C++ raw strings, heredocs
//! - **Indentation Engines**: statement replay for brace languages, bracket depth for Go/Kotlin,
//!   regex rules, block keywords and copy-previous
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  TextModel (edits, fix_indentation)         │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  Indentation Engines                        │  ← Indentation
//! ├─────────────────────────────────────────────┤
//! │  Style Applicators (keywords, links, #)     │  ← Styling Refinement
//! ├─────────────────────────────────────────────┤
//! │  Tokenizer + Sequence Matchers              │  ← Lexical Regions
//! ├─────────────────────────────────────────────┤
//! │  Line Index                                 │  ← Line Access
//! ├─────────────────────────────────────────────┤
//! │  Rope Storage (ropey)                       │  ← Text Storage
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use codetext_core::{Language, TextModel};
//! use codetext_lang::builtin;
//! use std::sync::Arc;
//!
//! let cpp = Arc::new(Language::compile(builtin::cpp()).unwrap());
//! let mut model = TextModel::new("if (x) {\nfoo();\n}", cpp);
//!
//! assert_eq!(model.indent_for(1), Some("    ".to_string()));
//! model.reindent_all().unwrap();
//! assert_eq!(model.text(), "if (x) {\n    foo();\n}");
//! ```
//!
//! # Module Description
//!
//! - [`line_index`] - offset/line mapping
//! - [`matcher`] - sequence matchers and carry-over regions
//! - [`tokenizer`] - incremental tokenizer and invalidation
//! - [`applicators`] - keyword, preprocessor and hyperlink styling
//! - [`language`] - compiled languages
//! - [`indent`] - indentation engines
//! - [`model`] - the text model tying everything together
//!
//! All offsets and columns are counted in `char`s.

pub mod applicators;
pub mod indent;
pub mod language;
pub mod line_index;
pub mod matcher;
pub mod model;
pub mod style;
pub mod tokenizer;

pub use applicators::{HyperlinkApplicator, KeywordApplicator, PreprocessorApplicator, StyleApplicator};
pub use indent::{
    BlockKeywordIndenter, BraceLanguage, BracketDepthIndenter, CopyPreviousIndenter, IndentEngine,
    Indenter, LineIndenter, PatternIndenter, StatementIndenter, StyledLines, indentation_of,
};
pub use language::{Language, LanguageError};
pub use line_index::LineIndex;
pub use matcher::{OpenRegion, RegionEnd, SequenceMatcher, Terminator};
pub use model::{EditError, EditSummary, TextModel};
pub use style::{STYLE_TAG_VERSION, Segment, StyleTag};
pub use tokenizer::{Invalidation, LineSource, LineState, Tokenizer};
