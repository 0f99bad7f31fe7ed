//! Line index consistency under random edits, checked against a `Rope` reference.

use codetext_core::LineIndex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ropey::Rope;

fn check_against(index: &mut LineIndex, reference: &Rope) {
    assert_eq!(index.len_chars(), reference.len_chars());
    assert_eq!(index.line_count(), reference.len_lines());
    assert_eq!(index.line_lengths().sum::<usize>(), reference.len_chars());

    for line in 0..index.line_count() {
        assert_eq!(index.line_start(line), reference.line_to_char(line), "line {line}");
    }
    let len = reference.len_chars();
    for offset in [0, len / 3, len / 2, len.saturating_sub(1), len] {
        assert_eq!(index.line_of(offset), reference.char_to_line(offset), "offset {offset}");
        let (line, column) = index.coordinates_of(offset);
        assert_eq!(index.offset_of(line, column), offset);
    }
}

#[test]
fn test_random_edits_match_reference() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let initial = "fn main() {\n    let x = 1;\n}\n".repeat(20);
    let mut index = LineIndex::from_text(&initial);
    let mut reference = Rope::from_str(&initial);

    for step in 0..400 {
        let len = reference.len_chars();
        if len == 0 || rng.gen_bool(0.55) {
            let text = match rng.gen_range(0..5) {
                0 => "x",
                1 => "\n",
                2 => "你好\n世界",
                3 => "👋",
                _ => "a\n\nb",
            };
            let offset = rng.gen_range(0..=len);
            index.on_insert(offset, text);
            reference.insert(offset, text);
        } else {
            let offset = rng.gen_range(0..len);
            let length = rng.gen_range(1..=(len - offset).min(12));
            index.on_remove(offset, length);
            reference.remove(offset..offset + length);
        }
        if step % 20 == 0 {
            check_against(&mut index, &reference);
        }
    }
    check_against(&mut index, &reference);
}

#[test]
fn test_line_count_tracks_newlines() {
    let mut index = LineIndex::new();
    assert_eq!(index.line_count(), 1);

    index.on_insert(0, "a\nb\nc");
    assert_eq!(index.line_count(), 3);

    // Remove "\nb\n": two terminators gone.
    index.on_remove(1, 3);
    assert_eq!(index.line_count(), 1);
    assert_eq!(index.line_text_length(0), 2);
}

#[test]
fn test_lazy_validation_after_early_edit() {
    let text = "line\n".repeat(1000);
    let mut index = LineIndex::from_text(&text);
    assert_eq!(index.line_start(999), 999 * 5);

    index.on_insert(0, "x");
    assert!(index.validated_lines() <= 1);

    // Only the lines up to the queried one are re-derived.
    assert_eq!(index.line_start(10), 10 * 5 + 1);
    assert!(index.validated_lines() <= 11);
    assert_eq!(index.line_of(999 * 5 + 1), 999);
}
