//! Block-keyword indentation (Python).

use super::effective::{leading_whitespace, outdent, previous_code_line, starts_inside_string};
use super::{LineIndenter, StyledLines};
use crate::language::{LanguageError, compile_pattern};
use regex::Regex;

const BLOCK_END: &str = r"^\s*(break|continue|raise|return|pass)\b";
const SAME_AS_BLOCK: &str = r"^\s*(else|elif|except|finally)\b";
const BLOCK_START: &str = r"^\s*(class|def|elif|else|except|if|for|while|try)\b";

/// Indentation driven by block-opening, block-closing and continuation keywords.
#[derive(Debug, Clone)]
pub struct BlockKeywordIndenter {
    block_end: Regex,
    same_as_block: Regex,
    block_start: Regex,
    unit: String,
}

impl BlockKeywordIndenter {
    /// Creates an indenter using `unit` per block level.
    pub fn new(unit: impl Into<String>) -> Result<Self, LanguageError> {
        Ok(Self {
            block_end: compile_pattern(BLOCK_END)?,
            same_as_block: compile_pattern(SAME_AS_BLOCK)?,
            block_start: compile_pattern(BLOCK_START)?,
            unit: unit.into(),
        })
    }

    /// Whether any enclosing block starter exists above `previous`, skipping blocks already
    /// closed by `return`-like statements and the bodies of multi-line strings.
    fn has_enclosing_block(&self, lines: &mut dyn StyledLines, previous: usize) -> bool {
        let mut nesting = 0usize;
        let mut closed_one = false;
        for index in (0..=previous).rev() {
            if starts_inside_string(lines, index) {
                continue;
            }
            let text = lines.line_text(index);
            if self.block_start.is_match(&text) {
                if (!closed_one && nesting == 0) || (closed_one && nesting <= 1) {
                    return true;
                }
                nesting -= 1;
            } else if self.block_end.is_match(&text) {
                nesting += 1;
                closed_one = true;
            }
        }
        false
    }
}

impl LineIndenter for BlockKeywordIndenter {
    fn indent_for(&self, lines: &mut dyn StyledLines, line: usize) -> Option<String> {
        let Some(previous) = previous_code_line(lines, line) else {
            return Some(String::new());
        };
        if !self.has_enclosing_block(lines, previous) {
            return Some(String::new());
        }
        let previous_text = lines.line_text(previous);
        let current_text = lines.line_text(line);
        let indentation = leading_whitespace(&previous_text);
        let adjusted = if self.same_as_block.is_match(&current_text) {
            outdent(indentation, &self.unit)
        } else if self.same_as_block.is_match(&previous_text)
            || self.block_start.is_match(&previous_text)
        {
            format!("{indentation}{}", self.unit)
        } else if self.block_end.is_match(&previous_text) {
            outdent(indentation, &self.unit)
        } else {
            indentation.to_string()
        };
        Some(adjusted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_patterns() {
        let indenter = BlockKeywordIndenter::new("    ").unwrap();
        assert!(indenter.block_start.is_match("    def f(x):"));
        assert!(!indenter.block_start.is_match("define = 1"));
        assert!(indenter.block_end.is_match("        return x"));
        assert!(indenter.same_as_block.is_match("else:"));
    }
}
