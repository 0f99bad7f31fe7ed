//! Style applicators: post-passes that refine the tokenizer's segments of one line.
//!
//! Applicators run on the tokenizer's output only. They never see or influence the state carried
//! between lines, so they can be added or reconfigured without invalidating anything.

use crate::style::{Segment, StyleTag};
use regex::{Captures, Regex};
use std::collections::HashSet;
use std::fmt::Debug;

/// Refines the segments of a single line.
pub trait StyleApplicator: Debug + Send + Sync {
    /// Returns `segments` restyled. Input and output both cover the whole line.
    fn apply(&self, line: &[char], segments: Vec<Segment>) -> Vec<Segment>;
}

/// Splits every `source`-styled segment around the regex matches accepted by `accept`, giving the
/// matched runs `style`.
fn restyle_matches(
    line: &[char],
    segments: Vec<Segment>,
    source: StyleTag,
    regex: &Regex,
    style: StyleTag,
    accept: impl Fn(&Captures<'_>) -> bool,
) -> Vec<Segment> {
    let mut result = Vec::with_capacity(segments.len());
    for segment in segments {
        if segment.style != source {
            result.push(segment);
            continue;
        }
        let text = segment.text(line);
        let mut unstyled_from = segment.start;
        for caps in regex.captures_iter(&text) {
            let Some(m) = caps.get(0) else {
                continue;
            };
            if m.start() == m.end() || !accept(&caps) {
                continue;
            }
            let start = segment.start + text[..m.start()].chars().count();
            let end = start + m.as_str().chars().count();
            if start > unstyled_from {
                result.push(Segment::new(unstyled_from, start, source));
            }
            result.push(Segment::new(start, end, style));
            unstyled_from = end;
        }
        if segment.end > unstyled_from {
            result.push(Segment::new(unstyled_from, segment.end, source));
        }
    }
    result
}

/// Marks keywords inside normal text.
///
/// The pattern finds candidates; the first capture group (or the whole match when the pattern
/// has no groups) is tested against the keyword set.
#[derive(Debug, Clone)]
pub struct KeywordApplicator {
    regex: Regex,
    keywords: HashSet<String>,
    case_sensitive: bool,
}

impl KeywordApplicator {
    /// Creates an applicator; `keywords` are lowercased when matching is case-insensitive.
    pub fn new<I, S>(regex: Regex, keywords: I, case_sensitive: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = keywords
            .into_iter()
            .map(|k| {
                if case_sensitive {
                    k.as_ref().to_string()
                } else {
                    k.as_ref().to_lowercase()
                }
            })
            .collect();
        Self {
            regex,
            keywords,
            case_sensitive,
        }
    }

    /// Whether `word` is in the keyword set.
    pub fn is_keyword(&self, word: &str) -> bool {
        if self.case_sensitive {
            self.keywords.contains(word)
        } else {
            self.keywords.contains(&word.to_lowercase())
        }
    }
}

impl StyleApplicator for KeywordApplicator {
    fn apply(&self, line: &[char], segments: Vec<Segment>) -> Vec<Segment> {
        restyle_matches(
            line,
            segments,
            StyleTag::Normal,
            &self.regex,
            StyleTag::Keyword,
            |caps| {
                caps.get(1)
                    .or_else(|| caps.get(0))
                    .is_some_and(|word| self.is_keyword(word.as_str()))
            },
        )
    }
}

/// Restyles normal text from a line-leading `#` onward as preprocessor text.
///
/// Strings and comments inside the directive keep their own style.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreprocessorApplicator;

impl StyleApplicator for PreprocessorApplicator {
    fn apply(&self, line: &[char], segments: Vec<Segment>) -> Vec<Segment> {
        let Some(hash) = line.iter().position(|c| !c.is_whitespace()) else {
            return segments;
        };
        let directive = line[hash] == '#'
            && segments
                .iter()
                .any(|s| s.contains(hash) && s.style == StyleTag::Normal);
        if !directive {
            return segments;
        }
        let mut result = Vec::with_capacity(segments.len() + 1);
        for segment in segments {
            if segment.style != StyleTag::Normal || segment.end <= hash {
                result.push(segment);
            } else if segment.start < hash {
                result.push(Segment::new(segment.start, hash, StyleTag::Normal));
                result.push(Segment::new(hash, segment.end, StyleTag::Preprocessor));
            } else {
                result.push(Segment::new(
                    segment.start,
                    segment.end,
                    StyleTag::Preprocessor,
                ));
            }
        }
        result
    }
}

/// URL pattern used by [`HyperlinkApplicator::new`].
pub const HYPERLINK_PATTERN: &str =
    r#"\b(?:https?|ftp|file)://[^\s<>"'`()\[\]{}]*[^\s<>"'`()\[\]{}.,;:!?]"#;

/// Marks URLs inside comments.
#[derive(Debug, Clone)]
pub struct HyperlinkApplicator {
    regex: Regex,
}

impl HyperlinkApplicator {
    /// Creates an applicator using [`HYPERLINK_PATTERN`].
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(HYPERLINK_PATTERN)?,
        })
    }
}

impl StyleApplicator for HyperlinkApplicator {
    fn apply(&self, line: &[char], segments: Vec<Segment>) -> Vec<Segment> {
        restyle_matches(
            line,
            segments,
            StyleTag::Comment,
            &self.regex,
            StyleTag::Hyperlink,
            |_| true,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn seg(start: usize, end: usize, style: StyleTag) -> Segment {
        Segment::new(start, end, style)
    }

    #[test]
    fn test_keywords_only_in_normal_text() {
        let applicator = KeywordApplicator::new(
            Regex::new(codetext_lang::DEFAULT_KEYWORD_PATTERN).unwrap(),
            ["if", "return"],
            true,
        );
        let line = chars("if (x) return \"if\";");
        let segments = vec![
            seg(0, 14, StyleTag::Normal),
            seg(14, 18, StyleTag::String),
            seg(18, 19, StyleTag::Normal),
        ];
        assert_eq!(
            applicator.apply(&line, segments),
            vec![
                seg(0, 2, StyleTag::Keyword),
                seg(2, 7, StyleTag::Normal),
                seg(7, 13, StyleTag::Keyword),
                seg(13, 14, StyleTag::Normal),
                seg(14, 18, StyleTag::String),
                seg(18, 19, StyleTag::Normal),
            ]
        );
    }

    #[test]
    fn test_keywords_case_insensitive() {
        let applicator = KeywordApplicator::new(
            Regex::new(codetext_lang::DEFAULT_KEYWORD_PATTERN).unwrap(),
            ["BEGIN"],
            false,
        );
        assert!(applicator.is_keyword("begin"));
        assert!(applicator.is_keyword("Begin"));
        let line = chars("Begin x");
        assert_eq!(
            applicator.apply(&line, vec![seg(0, 7, StyleTag::Normal)]),
            vec![seg(0, 5, StyleTag::Keyword), seg(5, 7, StyleTag::Normal)]
        );
    }

    #[test]
    fn test_keyword_columns_count_chars_not_bytes() {
        let applicator = KeywordApplicator::new(
            Regex::new(codetext_lang::DEFAULT_KEYWORD_PATTERN).unwrap(),
            ["for"],
            true,
        );
        let line = chars("é for");
        assert_eq!(
            applicator.apply(&line, vec![seg(0, 5, StyleTag::Normal)]),
            vec![seg(0, 2, StyleTag::Normal), seg(2, 5, StyleTag::Keyword)]
        );
    }

    #[test]
    fn test_preprocessor_directive() {
        let line = chars("  #include \"a.h\" // x");
        let segments = vec![
            seg(0, 11, StyleTag::Normal),
            seg(11, 16, StyleTag::String),
            seg(16, 17, StyleTag::Normal),
            seg(17, 21, StyleTag::Comment),
        ];
        assert_eq!(
            PreprocessorApplicator.apply(&line, segments),
            vec![
                seg(0, 2, StyleTag::Normal),
                seg(2, 11, StyleTag::Preprocessor),
                seg(11, 16, StyleTag::String),
                seg(16, 17, StyleTag::Preprocessor),
                seg(17, 21, StyleTag::Comment),
            ]
        );
    }

    #[test]
    fn test_hash_inside_comment_is_not_a_directive() {
        let line = chars("# note");
        let segments = vec![seg(0, 6, StyleTag::Comment)];
        assert_eq!(PreprocessorApplicator.apply(&line, segments.clone()), segments);
    }

    #[test]
    fn test_hyperlinks_in_comments() {
        let applicator = HyperlinkApplicator::new().unwrap();
        let line = chars("// see https://example.com/a_b.");
        let segments = vec![seg(0, 31, StyleTag::Comment)];
        assert_eq!(
            applicator.apply(&line, segments),
            vec![
                seg(0, 7, StyleTag::Comment),
                seg(7, 30, StyleTag::Hyperlink),
                seg(30, 31, StyleTag::Comment),
            ]
        );
    }
}
