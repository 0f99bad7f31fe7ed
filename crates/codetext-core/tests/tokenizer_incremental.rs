use codetext_core::{Invalidation, Language, Segment, StyleTag, TextModel};
use codetext_lang::builtin;
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

const SAMPLE: &str = r#"#include <vector>
/* A block
   comment */
int main() {
    const char* s = "a \"quoted\" // not a comment";
    char c = '\'';
    auto raw = R"x(
      raw ) body
    )x";
    return 0; // done
}
"#;

fn cpp() -> Arc<Language> {
    Arc::new(Language::compile(builtin::cpp()).unwrap())
}

fn all_segments(model: &mut TextModel) -> Vec<Vec<Segment>> {
    (0..model.line_count())
        .map(|line| model.segments_for(line))
        .collect()
}

fn assert_covers(model: &mut TextModel) {
    for line in 0..model.line_count() {
        let segments = model.segments_for(line);
        let length = model.line_text(line).chars().count();
        let mut expected_start = 0;
        for segment in &segments {
            assert_eq!(segment.start, expected_start, "gap on line {line}");
            assert!(segment.end > segment.start, "empty segment on line {line}");
            expected_start = segment.end;
        }
        assert_eq!(expected_start, length, "line {line} not covered");
    }
}

#[test]
fn test_segments_cover_every_line() {
    let mut model = TextModel::new(SAMPLE, cpp());
    assert_covers(&mut model);
}

#[test]
fn test_sample_styles() {
    let mut model = TextModel::new(SAMPLE, cpp());
    assert_eq!(
        model.segments_for(0),
        vec![Segment::new(0, 17, StyleTag::Preprocessor)]
    );
    assert_eq!(
        model.segments_for(2),
        vec![Segment::new(0, 13, StyleTag::Comment)]
    );
    // The raw string body is a string, parenthesis and all.
    assert_eq!(
        model.segments_for(7),
        vec![Segment::new(0, 16, StyleTag::String)]
    );
    let last = model.segments_for(9);
    assert_eq!(last.last().map(|s| s.style), Some(StyleTag::Comment));
}

#[test]
fn test_incremental_matches_full_retokenization() {
    let mut rng = StdRng::seed_from_u64(42);
    let fragments = ["/*", "*/", "\"", "\n", "x", "//", "R\"(", ")\"", "'", " "];
    let mut model = TextModel::new(SAMPLE, cpp());

    for _ in 0..200 {
        // Touch a random prefix of the cache first, as a viewport would.
        let viewed = rng.gen_range(0..model.line_count());
        model.segments_for(viewed);

        let len = model.len_chars();
        if len > 0 && rng.gen_bool(0.3) {
            let offset = rng.gen_range(0..len);
            let length = rng.gen_range(1..=(len - offset).min(4));
            model.remove(offset, length).unwrap();
        } else {
            let offset = rng.gen_range(0..=len);
            let fragment = fragments[rng.gen_range(0..fragments.len())];
            model.insert(offset, fragment).unwrap();
        }

        let mut fresh = TextModel::new(&model.text(), cpp());
        assert_eq!(all_segments(&mut model), all_segments(&mut fresh));
    }
    assert_covers(&mut model);
}

#[test]
fn test_edit_inside_line_comment_keeps_later_state() {
    let mut model = TextModel::new(SAMPLE, cpp());
    model.segments_for(model.line_count() - 1);
    let cached = model.tokenizer().cached_lines();

    // Inside "// done" on line 9.
    let offset = model.offset_of(9, 17);
    let summary = model.insert(offset, "/* still a line comment").unwrap();
    assert_eq!(summary.invalidation, Invalidation::Unchanged);
    assert_eq!(model.tokenizer().cached_lines(), cached);
}

#[test]
fn test_edit_inside_string_keeps_later_state() {
    let mut model = TextModel::new(SAMPLE, cpp());
    model.segments_for(model.line_count() - 1);
    let cached = model.tokenizer().cached_lines();

    let offset = model.offset_of(4, 22);
    let summary = model.insert(offset, "/*").unwrap();
    assert_eq!(summary.invalidation, Invalidation::Unchanged);
    assert_eq!(model.tokenizer().cached_lines(), cached);
}

#[test]
fn test_closing_block_comment_invalidates_from_edit() {
    let mut model = TextModel::new(SAMPLE, cpp());
    model.segments_for(model.line_count() - 1);

    // Close the comment early on line 1.
    let offset = model.offset_of(1, 4);
    let summary = model.insert(offset, "*/").unwrap();
    assert_eq!(summary.invalidation, Invalidation::StaleFrom(1));
    assert_eq!(model.tokenizer().cached_lines(), 1);

    // "   comment */" is now code followed by an unmatched "*/".
    let segments = model.segments_for(2);
    assert_eq!(segments.first().map(|s| s.style), Some(StyleTag::Normal));
}
