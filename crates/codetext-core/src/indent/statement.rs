//! Statement-oriented indentation for brace languages (C, C++, Java, Rust...).
//!
//! The indentation of a line is derived from a window of preceding lines that are assumed to be
//! correctly indented already:
//!
//! ```text
//!   backward scan        forward replay                  adjust
//!  ┌──────────────┐     ┌────────────────────────┐      ┌─────────────────────┐
//!  │ effective    │ ──► │ frame stack: brackets, │ ──►  │ outdent for leading │
//!  │ lines until  │     │ labels, continuations  │      │ `}`, labels, access │
//!  │ an anchor    │     │ top frame = indent     │      │ specifiers          │
//!  └──────────────┘     └────────────────────────┘      └─────────────────────┘
//! ```

use super::effective::{
    active_part, effective_text, indentation_of, is_close_bracket, is_open_bracket, outdent,
    partner,
};
use super::{LineIndenter, StyledLines};
use crate::style::StyleTag;
use codetext_lang::{BraceFlavor, IndentOptions, keys};
use std::collections::VecDeque;
use tracing::trace;

/// Number of `;`-terminated lines, seen with no unmatched close bracket, that ends the backward
/// scan. Three is enough to step over the header of a `for (;;)` split across lines.
pub const SEMICOLON_ANCHOR_THRESHOLD: usize = 3;

/// Language-specific predicates of the statement indenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BraceLanguage {
    /// `namespace x {` and `extern "C" {` open blocks indented by `namespaceIndent`.
    pub namespaces: bool,
    /// `template <...>` lines are not statement continuations.
    pub templates: bool,
    /// `public:`, `protected:` and `private:` are outdented by `accessSpecifierOutdent`.
    pub access_specifiers: bool,
    /// Lines whose code starts with `#` go to column 0.
    pub preprocessor_flush_left: bool,
    /// Lines starting with `<<` line up with the previous line's `<<`.
    pub stream_alignment: bool,
}

impl BraceLanguage {
    /// Predicates for `flavor`.
    pub fn for_flavor(flavor: BraceFlavor) -> Self {
        match flavor {
            BraceFlavor::Cpp => Self {
                namespaces: true,
                templates: true,
                access_specifiers: true,
                preprocessor_flush_left: true,
                stream_alignment: true,
            },
            BraceFlavor::Java | BraceFlavor::CLike => Self::default(),
        }
    }

    fn is_namespace(&self, line: &str) -> bool {
        if !self.namespaces {
            return false;
        }
        let trimmed = line.trim_start();
        starts_with_word(trimmed, "namespace") || trimmed.starts_with("extern \"")
    }

    fn is_template(&self, line: &str) -> bool {
        self.templates
            && line
                .trim_start()
                .strip_prefix("template")
                .is_some_and(|rest| rest.trim_start().starts_with('<'))
    }

    fn is_access_specifier(&self, trimmed: &str) -> bool {
        self.access_specifiers
            && ["public", "protected", "private"].iter().any(|word| {
                trimmed.strip_prefix(word).is_some_and(|rest| {
                    let rest = rest.trim_start();
                    rest.starts_with(':') && !rest.starts_with("::")
                })
            })
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn starts_with_word(text: &str, word: &str) -> bool {
    text.strip_prefix(word)
        .is_some_and(|rest| !rest.starts_with(is_word_char))
}

/// `case ...:` or `default:`.
pub(crate) fn is_switch_label(trimmed: &str) -> bool {
    if let Some(rest) = trimmed.strip_prefix("case") {
        return !rest.starts_with(is_word_char) && rest.contains(':');
    }
    trimmed
        .strip_prefix("default")
        .is_some_and(|rest| rest.trim_start().starts_with(':'))
}

/// One level of the replay stack.
///
/// `open` is an open bracket, `:` for a switch label or `;` for a statement continued on the next
/// line.
#[derive(Debug, Clone, PartialEq, Eq)]
struct IndentFrame {
    open: char,
    indentation: String,
    delta: String,
}

impl IndentFrame {
    fn new(open: char, indentation: impl Into<String>, delta: impl Into<String>) -> Self {
        Self {
            open,
            indentation: indentation.into(),
            delta: delta.into(),
        }
    }
}

/// Pops trailing label and continuation frames, returning the last one popped.
fn drop_trailing_soft_frames(frames: &mut Vec<IndentFrame>) -> Option<IndentFrame> {
    drop_trailing(frames, &[':', ';'])
}

/// Pops trailing frames whose `open` is one of `kinds`, returning the last one popped.
fn drop_trailing(frames: &mut Vec<IndentFrame>, kinds: &[char]) -> Option<IndentFrame> {
    let mut base = None;
    while frames.last().is_some_and(|f| kinds.contains(&f.open)) {
        base = frames.pop();
    }
    base
}

/// Whether the statement on `line` continues on the next line.
///
/// A trailing `,` terminates the line inside a parenthesis (it separates arguments).
fn continues_on_next_line(frames: &[IndentFrame], line: &str) -> bool {
    let Some(last) = line.chars().last() else {
        return false;
    };
    if last == ',' {
        if let Some(top) = frames.last() {
            return top.open != '(';
        }
    }
    !":;}{(".contains(last)
}

/// The statement indenter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementIndenter {
    language: BraceLanguage,
    align_arguments: bool,
    namespace_indent: String,
    brace_indent: String,
    square_bracket_indent: String,
    parenthesis_indent: String,
    switch_label_outdent: String,
    access_specifier_outdent: String,
}

impl StatementIndenter {
    /// Creates an indenter from resolved options.
    pub fn new(language: BraceLanguage, options: &IndentOptions) -> Self {
        let text = |key: &str| options.text(key).unwrap_or_default().to_string();
        Self {
            language,
            align_arguments: options.flag(keys::ALIGN_FUNCTION_ARGS).unwrap_or(true),
            namespace_indent: text(keys::NAMESPACE_INDENT),
            brace_indent: text(keys::BRACE_INDENT),
            square_bracket_indent: text(keys::SQUARE_BRACKET_INDENT),
            parenthesis_indent: text(keys::PARENTHESIS_INDENT),
            switch_label_outdent: text(keys::SWITCH_LABEL_OUTDENT),
            access_specifier_outdent: text(keys::ACCESS_SPECIFIER_OUTDENT),
        }
    }

    /// Predicates in use.
    pub fn language(&self) -> BraceLanguage {
        self.language
    }

    fn delta(&self, open: char) -> &str {
        match open {
            '{' | ':' => &self.brace_indent,
            '[' => &self.square_bracket_indent,
            '(' | ';' => &self.parenthesis_indent,
            _ => "",
        }
    }

    fn effective_line(lines: &mut dyn StyledLines, line: usize) -> String {
        let text = lines.line_text(line);
        let segments = lines.segments(line);
        effective_text(&text, &segments)
    }

    /// Collects the effective lines preceding `target`, oldest first, back to the nearest anchor.
    fn previous_statements(&self, lines: &mut dyn StyledLines, target: usize) -> VecDeque<String> {
        let mut window = VecDeque::new();
        let mut unmatched: Vec<char> = Vec::new();
        let mut semicolons = 0;
        for index in (0..target).rev() {
            let line = Self::effective_line(lines, index);
            if line.is_empty() {
                continue;
            }
            let chars: Vec<char> = line.chars().collect();
            let mut anchored = false;
            for (column, &ch) in chars.iter().enumerate().rev() {
                if ch == '<' || ch == '>' {
                    continue;
                }
                let starts_line = chars[..column].iter().all(|&c| c == ' ' || c == '\t');
                if is_close_bracket(ch) {
                    anchored |= starts_line;
                    unmatched.extend(partner(ch));
                } else if is_open_bracket(ch) {
                    if unmatched.last() == Some(&ch) {
                        unmatched.pop();
                    } else {
                        anchored |= starts_line;
                    }
                }
            }
            let ends_statement = line.ends_with(';');
            window.push_front(line);
            if unmatched.is_empty() && ends_statement {
                semicolons += 1;
                anchored |= semicolons >= SEMICOLON_ANCHOR_THRESHOLD;
            }
            if anchored {
                trace!(target, anchor = index, "statement window anchored");
                break;
            }
        }
        window
    }

    /// Replays `window` and returns the indentation of the line after it.
    fn replay(&self, window: &VecDeque<String>, trimmed_current: &str) -> String {
        let Some(first) = window.front() else {
            return String::new();
        };
        let mut frames: Vec<IndentFrame> = Vec::new();
        let mut baseline = indentation_of(first).to_string();
        for line in window {
            let indentation = indentation_of(line);
            if is_switch_label(line.trim_start()) {
                if let Some(base) = drop_trailing_soft_frames(&mut frames) {
                    baseline = base.indentation;
                }
                frames.push(IndentFrame::new(':', baseline.clone(), self.delta(':')));
            }
            let chars: Vec<char> = line.chars().collect();
            for (column, &ch) in chars.iter().enumerate() {
                if ch == '<' || ch == '>' {
                    continue;
                }
                if is_open_bracket(ch) {
                    if self.language.is_namespace(line) {
                        frames.push(IndentFrame::new(ch, indentation, self.namespace_indent.clone()));
                    } else if self.align_arguments && column + 1 < chars.len() {
                        let width = (column + 1).saturating_sub(indentation.chars().count());
                        let delta = " ".repeat(width);
                        baseline = format!("{indentation}{delta}");
                        frames.push(IndentFrame::new(ch, indentation, delta));
                    } else {
                        let delta = self.delta(ch).to_string();
                        frames.push(IndentFrame::new(ch, baseline.clone(), delta.clone()));
                        baseline.push_str(&delta);
                    }
                } else if is_close_bracket(ch) {
                    let Some(open) = partner(ch) else {
                        continue;
                    };
                    drop_trailing_soft_frames(&mut frames);
                    match frames.last().map(|f| f.open) {
                        None => {
                            let before: String = chars[..column].iter().collect();
                            if before.trim_start().is_empty() {
                                baseline = before;
                            }
                        }
                        Some(top) if top == open => {
                            if let Some(frame) = frames.pop() {
                                baseline = frame.indentation;
                            }
                            // A label frame outlives brackets opened and closed under it.
                            if let Some(base) = drop_trailing(&mut frames, &[';']) {
                                baseline = base.indentation;
                            }
                        }
                        Some(_) => {}
                    }
                }
            }
            if line.ends_with(';') {
                if let Some(base) = drop_trailing(&mut frames, &[';']) {
                    baseline = base.indentation;
                }
            }
            if continues_on_next_line(&frames, line) && !self.language.is_template(line) {
                frames.push(IndentFrame::new(';', baseline.clone(), self.delta(';')));
            }
        }
        if is_switch_label(trimmed_current) || trimmed_current.starts_with('}') {
            if let Some(base) = drop_trailing_soft_frames(&mut frames) {
                baseline = base.indentation;
            }
        }
        match frames.pop() {
            Some(frame) => frame.indentation + &frame.delta,
            None => baseline,
        }
    }

    /// Removes the outdent owed by what the target line starts with.
    fn adjust_for_current_line(&self, indentation: &str, trimmed_effective: &str) -> String {
        let Some(first) = trimmed_effective.chars().next() else {
            return indentation.to_string();
        };
        let unit = if is_close_bracket(first) {
            partner(first).map_or("", |open| self.delta(open))
        } else if is_switch_label(trimmed_effective) {
            self.switch_label_outdent.as_str()
        } else if self.language.is_access_specifier(trimmed_effective) {
            self.access_specifier_outdent.as_str()
        } else {
            ""
        };
        outdent(indentation, unit)
    }
}

impl LineIndenter for StatementIndenter {
    fn indent_for(&self, lines: &mut dyn StyledLines, line: usize) -> Option<String> {
        let text = lines.line_text(line);
        let segments = lines.segments(line);
        let active = active_part(&text, &segments);

        if self.language.preprocessor_flush_left && active.starts_with('#') {
            return Some(String::new());
        }
        if self.language.stream_alignment && active.starts_with("<<") {
            if line == 0 {
                return Some(String::new());
            }
            let previous = lines.line_text(line - 1);
            if let Some(byte) = previous.find("<<") {
                return Some(" ".repeat(previous[..byte].chars().count()));
            }
        }

        let window = self.previous_statements(lines, line);
        let indentation = self.replay(&window, text.trim_start());
        let effective = effective_text(&text, &segments);
        let mut indentation = self.adjust_for_current_line(&indentation, effective.trim_start());

        // A `*` continuing a block comment lines up under the opener's first `*`.
        let first_column = text.chars().take_while(|c| c.is_whitespace()).count();
        let in_comment = segments
            .iter()
            .any(|s| s.contains(first_column) && s.style == StyleTag::Comment);
        if in_comment && text.trim_start().starts_with('*') {
            indentation.push(' ');
        }
        Some(indentation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_switch_labels() {
        assert!(is_switch_label("case 1:"));
        assert!(is_switch_label("case(X): foo();"));
        assert!(is_switch_label("default :"));
        assert!(!is_switch_label("cases:"));
        assert!(!is_switch_label("case 1"));
        assert!(!is_switch_label("defaults:"));
    }

    #[test]
    fn test_cpp_predicates() {
        let cpp = BraceLanguage::for_flavor(BraceFlavor::Cpp);
        assert!(cpp.is_namespace("namespace foo {"));
        assert!(cpp.is_namespace("extern \" \" {"));
        assert!(!cpp.is_namespace("namespaces {"));
        assert!(cpp.is_template("template <typename T>"));
        assert!(cpp.is_access_specifier("public:"));
        assert!(cpp.is_access_specifier("private :"));
        assert!(!cpp.is_access_specifier("public::x();"));

        let java = BraceLanguage::for_flavor(BraceFlavor::Java);
        assert!(!java.is_namespace("namespace foo {"));
        assert!(!java.is_access_specifier("public:"));
    }

    #[test]
    fn test_continuation() {
        let paren = vec![IndentFrame::new('(', "", "    ")];
        assert!(!continues_on_next_line(&paren, "foo(a,"));
        assert!(continues_on_next_line(&[], "int x = a +"));
        assert!(continues_on_next_line(&[], "enum { A,"));
        assert!(!continues_on_next_line(&[], "x;"));
        assert!(!continues_on_next_line(&[], ""));
    }

    #[test]
    fn test_replay_brace_block() {
        let indenter = StatementIndenter::new(
            BraceLanguage::default(),
            &codetext_lang::IndentStyle::Statement {
                flavor: BraceFlavor::CLike,
            }
            .default_options(),
        );
        let window: VecDeque<String> = ["if (x) {".to_string()].into();
        assert_eq!(indenter.replay(&window, "foo();"), "    ");
        assert_eq!(indenter.replay(&VecDeque::new(), "foo();"), "");
        assert_eq!(indenter.adjust_for_current_line("    ", "}"), "");
    }
}
