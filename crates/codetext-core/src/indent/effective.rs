//! Line views shared by the indenters.

use super::StyledLines;
use crate::style::{Segment, StyleTag};

/// Leading spaces and tabs of `line`.
pub fn leading_whitespace(line: &str) -> &str {
    let rest = line.trim_start_matches([' ', '\t']);
    &line[..line.len() - rest.len()]
}

/// Leading indentation of `line`: spaces and tabs, plus a doc-comment `* ` (or a lone trailing
/// `*`) when one follows.
///
/// Hosts use this to continue comment blocks when a newline is inserted.
pub fn indentation_of(line: &str) -> &str {
    let whitespace = leading_whitespace(line);
    match line[whitespace.len()..].strip_prefix('*') {
        Some("") => line,
        Some(after) if after.starts_with(' ') => &line[..whitespace.len() + 2],
        _ => whitespace,
    }
}

/// Concatenated text of the code segments of a line (see [`StyleTag::is_code`]), trimmed.
pub fn active_part(line: &str, segments: &[Segment]) -> String {
    let chars: Vec<char> = line.chars().collect();
    let text: String = segments
        .iter()
        .filter(|s| s.style.is_code())
        .map(|s| s.text(&chars))
        .collect();
    text.trim().to_string()
}

/// The line with lexical noise neutralized, keeping every column where it was:
///
/// * comments (and links in them) become blanks;
/// * strings and unterminated literals become a quote, blanks and a quote;
/// * a line containing preprocessor text becomes empty.
///
/// Trailing whitespace is trimmed, so a line holding only comments and whitespace comes back
/// empty.
pub fn effective_text(line: &str, segments: &[Segment]) -> String {
    let chars: Vec<char> = line.chars().collect();
    let mut result = String::with_capacity(line.len());
    for segment in segments {
        match segment.style {
            StyleTag::Preprocessor => return String::new(),
            StyleTag::Comment | StyleTag::Hyperlink => {
                result.extend(std::iter::repeat_n(' ', segment.len()));
            }
            StyleTag::String | StyleTag::Error if segment.len() >= 2 => {
                result.push('"');
                result.extend(std::iter::repeat_n(' ', segment.len() - 2));
                result.push('"');
            }
            _ => result.push_str(&segment.text(&chars)),
        }
    }
    result.truncate(result.trim_end().len());
    result
}

/// Whether `line` begins inside a string left open by an earlier line.
pub(crate) fn starts_inside_string(lines: &mut dyn StyledLines, line: usize) -> bool {
    line > 0
        && lines
            .state_after(line - 1)
            .is_some_and(|region| region.style == StyleTag::String)
}

/// Index of the previous line with non-whitespace content that does not begin inside a string.
///
/// The body of a multi-line string says nothing about the indentation of the code around it.
pub(crate) fn previous_code_line(lines: &mut dyn StyledLines, line: usize) -> Option<usize> {
    (0..line).rev().find(|&index| {
        !lines.line_text(index).trim().is_empty() && !starts_inside_string(lines, index)
    })
}

/// `indentation` without a trailing `unit`; unchanged when it does not end with one.
pub(crate) fn outdent(indentation: &str, unit: &str) -> String {
    indentation
        .strip_suffix(unit)
        .unwrap_or(indentation)
        .to_string()
}

pub(crate) fn is_open_bracket(c: char) -> bool {
    matches!(c, '(' | '[' | '{' | '<')
}

pub(crate) fn is_close_bracket(c: char) -> bool {
    matches!(c, ')' | ']' | '}' | '>')
}

/// The other half of a bracket pair.
pub(crate) fn partner(c: char) -> Option<char> {
    match c {
        '(' => Some(')'),
        ')' => Some('('),
        '[' => Some(']'),
        ']' => Some('['),
        '{' => Some('}'),
        '}' => Some('{'),
        '<' => Some('>'),
        '>' => Some('<'),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn seg(start: usize, end: usize, style: StyleTag) -> Segment {
        Segment::new(start, end, style)
    }

    #[test]
    fn test_indentation_of() {
        assert_eq!(indentation_of("\t  foo"), "\t  ");
        assert_eq!(indentation_of("   * foo"), "   * ");
        assert_eq!(indentation_of("   *"), "   *");
        assert_eq!(indentation_of("   *p = 1;"), "   ");
        assert_eq!(indentation_of(""), "");
        assert_eq!(leading_whitespace("   * foo"), "   ");
    }

    #[test]
    fn test_effective_text_blanks_noise() {
        let line = "f(\"a(b\", x); /* ) */";
        let segments = vec![
            seg(0, 2, StyleTag::Normal),
            seg(2, 7, StyleTag::String),
            seg(7, 13, StyleTag::Normal),
            seg(13, 20, StyleTag::Comment),
        ];
        assert_eq!(effective_text(line, &segments), "f(\"   \", x);");
    }

    #[test]
    fn test_effective_text_drops_preprocessor_lines() {
        let segments = vec![seg(0, 10, StyleTag::Preprocessor)];
        assert_eq!(effective_text("#define X(", &segments), "");
    }

    #[test]
    fn test_active_part() {
        let line = "  if x: # why";
        let segments = vec![
            seg(0, 2, StyleTag::Normal),
            seg(2, 4, StyleTag::Keyword),
            seg(4, 8, StyleTag::Normal),
            seg(8, 13, StyleTag::Comment),
        ];
        assert_eq!(active_part(line, &segments), "if x:");
    }

    #[test]
    fn test_outdent_requires_suffix() {
        assert_eq!(outdent("\t\t", "\t"), "\t");
        assert_eq!(outdent("  ", "\t"), "  ");
        assert_eq!(outdent("    ", ""), "    ");
    }
}
