//! Bracket-depth indentation (Go, Kotlin): one indent unit per line that leaves brackets open.

use super::effective::{active_part, effective_text, leading_whitespace, outdent, starts_inside_string};
use super::statement::is_switch_label;
use super::{LineIndenter, StyledLines};
use codetext_lang::{IndentOptions, keys};
use tracing::trace;

fn closer_for(c: char) -> Option<char> {
    match c {
        '(' => Some(')'),
        '[' => Some(']'),
        '{' => Some('}'),
        _ => None,
    }
}

fn is_closer(c: char) -> bool {
    matches!(c, ')' | ']' | '}')
}

/// `ident:` alone on a line (a goto or loop label).
fn is_plain_label(trimmed: &str) -> bool {
    trimmed.strip_suffix(':').is_some_and(|name| {
        name.chars().next().is_some_and(|c| c.is_alphabetic() || c == '_')
            && name.chars().all(|c| c.is_alphanumeric() || c == '_')
    })
}

/// The bracket-depth indenter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BracketDepthIndenter {
    unit: String,
}

impl BracketDepthIndenter {
    /// Creates an indenter from resolved options.
    pub fn new(options: &IndentOptions) -> Self {
        Self {
            unit: options
                .text(keys::INDENT_UNIT)
                .unwrap_or_default()
                .to_string(),
        }
    }

    /// Indentation added per open line.
    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Text of the line with strings and comments blanked in place.
    fn bracket_text(lines: &mut dyn StyledLines, line: usize) -> String {
        let text = lines.line_text(line);
        let segments = lines.segments(line);
        effective_text(&text, &segments)
    }
}

impl LineIndenter for BracketDepthIndenter {
    fn indent_for(&self, lines: &mut dyn StyledLines, line: usize) -> Option<String> {
        // Back to the nearest line indented at column 0. A line that starts inside a string keeps
        // its code (the rest of a statement) but cannot anchor.
        let mut window = Vec::new();
        let mut anchor_indentation = String::new();
        for index in (0..line).rev() {
            let text = Self::bracket_text(lines, index);
            if text.trim().is_empty() {
                continue;
            }
            let indentation = leading_whitespace(&text).to_string();
            window.push(text);
            if starts_inside_string(lines, index) {
                continue;
            }
            anchor_indentation = indentation;
            if anchor_indentation.is_empty() {
                break;
            }
        }

        let mut frames: Vec<(String, char)> = Vec::new();
        let mut indentation = anchor_indentation;
        for text in window.iter().rev() {
            let mut level = 0usize;
            for c in text.chars() {
                if let Some(closer) = closer_for(c) {
                    frames.push((indentation.clone(), closer));
                    level += 1;
                } else if is_closer(c) && frames.last().is_some_and(|(_, expected)| *expected == c) {
                    if let Some((restored, _)) = frames.pop() {
                        indentation = restored;
                    }
                    level = level.saturating_sub(1);
                }
            }
            if level > 0 {
                indentation.push_str(&self.unit);
            }
        }

        // Leading close brackets on the target line take their level with them.
        let text = Self::bracket_text(lines, line);
        for c in text.trim_start().chars().take_while(|&c| is_closer(c)) {
            if frames.last().is_some_and(|(_, expected)| *expected == c) {
                if let Some((restored, _)) = frames.pop() {
                    indentation = restored;
                }
            }
        }

        let raw = lines.line_text(line);
        let segments = lines.segments(line);
        let active = active_part(&raw, &segments);
        if is_switch_label(&active) || is_plain_label(&active) {
            indentation = outdent(&indentation, &self.unit);
        }
        trace!(line, window = window.len(), "bracket depth");
        Some(indentation)
    }
}
