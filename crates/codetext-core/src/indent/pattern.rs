//! Regular-expression rule indentation (shell scripts and similar).

use super::effective::{active_part, leading_whitespace, outdent, previous_code_line};
use super::{LineIndenter, StyledLines};
use regex::Regex;

/// Indents from the previous non-blank line according to three rules, all matched against the
/// active part of lines:
///
/// * `indent_after`: the previous line opens a block;
/// * `indent`: the current line is indented even though the previous one opened nothing;
/// * `unindent`: the current line closes a block.
#[derive(Debug, Clone)]
pub struct PatternIndenter {
    indent_after: Regex,
    indent: Option<Regex>,
    unindent: Regex,
    unit: String,
}

impl PatternIndenter {
    /// Creates an indenter adding or removing `unit` per rule.
    pub fn new(
        indent_after: Regex,
        indent: Option<Regex>,
        unindent: Regex,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            indent_after,
            indent,
            unindent,
            unit: unit.into(),
        }
    }

    fn active_part(lines: &mut dyn StyledLines, line: usize) -> String {
        let text = lines.line_text(line);
        let segments = lines.segments(line);
        active_part(&text, &segments)
    }
}

impl LineIndenter for PatternIndenter {
    fn indent_for(&self, lines: &mut dyn StyledLines, line: usize) -> Option<String> {
        let Some(previous) = previous_code_line(lines, line) else {
            return Some(String::new());
        };
        let mut indentation = leading_whitespace(&lines.line_text(previous)).to_string();
        let current = Self::active_part(lines, line);
        if self
            .indent_after
            .is_match(&Self::active_part(lines, previous))
            || self.indent.as_ref().is_some_and(|re| re.is_match(&current))
        {
            indentation.push_str(&self.unit);
        }
        if self.unindent.is_match(&current) {
            indentation = outdent(&indentation, &self.unit);
        }
        Some(indentation)
    }
}
