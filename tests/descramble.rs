use std::collections::HashMap;
use std::path::PathBuf;

use tempfile::TempDir;

use unjumble_core::{store, DescrambleEngine};

fn counts(entries: &[((&str, &str), u64)]) -> HashMap<(String, String), u64> {
    entries
        .iter()
        .map(|((p, n), c)| ((p.to_string(), n.to_string()), *c))
        .collect()
}

fn model(dir: &TempDir, file: &str, entries: &[((&str, &str), u64)]) -> PathBuf {
    let path = dir.path().join(file);
    store::write(&path, &counts(entries)).unwrap();
    path
}

/// The worked example: a strongly attested "that is" path must beat every
/// alternative that leans on the default weight.
const THAT_IS: &[((&str, &str), u64)] = &[
    (("<START>", "that"), 10),
    (("that", "is"), 8),
    (("is", "<END>"), 5),
    (("taht", "si"), 1),
];

#[test]
fn known_bigram_path_beats_default_weighted_alternatives() {
    let dir = tempfile::tempdir().unwrap();
    let engine = DescrambleEngine::open(&model(&dir, "model.json", THAT_IS)).unwrap();
    assert_eq!(engine.descramble("taht si").unwrap(), "that is");
}

#[test]
fn the_sqlite_form_decodes_identically_to_the_flat_form() {
    let dir = tempfile::tempdir().unwrap();
    let flat = DescrambleEngine::open(&model(&dir, "model.json", THAT_IS)).unwrap();
    let relational = DescrambleEngine::open(&model(&dir, "model.db", THAT_IS)).unwrap();
    for text in ["taht si", "taht, si!", "si taht si"] {
        assert_eq!(
            flat.descramble(text).unwrap(),
            relational.descramble(text).unwrap()
        );
    }
}

#[test]
fn separators_are_preserved_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let engine = DescrambleEngine::open(&model(&dir, "model.json", THAT_IS)).unwrap();
    assert_eq!(engine.descramble("  taht... si?! ").unwrap(), "  that... is?! ");
}

#[test]
fn tokens_without_anagrams_fall_back_to_themselves_lowercased() {
    let dir = tempfile::tempdir().unwrap();
    let engine = DescrambleEngine::open(&model(&dir, "model.json", THAT_IS)).unwrap();
    assert_eq!(engine.descramble("taht Zzyx si").unwrap(), "that zzyx is");
}

#[test]
fn punctuation_only_input_is_returned_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let engine = DescrambleEngine::open(&model(&dir, "model.json", THAT_IS)).unwrap();
    assert_eq!(engine.descramble("?! ... --").unwrap(), "?! ... --");
    assert_eq!(engine.descramble("").unwrap(), "");
}

#[test]
fn unambiguous_sequences_decode_to_themselves() {
    let dir = tempfile::tempdir().unwrap();
    // Frequencies are irrelevant when every position has one candidate.
    let engine = DescrambleEngine::open(&model(
        &dir,
        "model.json",
        &[(("<START>", "hello"), 1), (("hello", "world"), 1)],
    ))
    .unwrap();
    assert_eq!(engine.descramble("hello world").unwrap(), "hello world");
}

#[test]
fn all_default_weights_pick_the_first_candidate_in_index_order() {
    let dir = tempfile::tempdir().unwrap();
    // No stored pair touches a single-token decode, so every transition
    // carries the default weight; the flat store enumerates its sorted
    // vocabulary, making "amen" the first anagram candidate.
    let engine =
        DescrambleEngine::open(&model(&dir, "model.json", &[(("mean", "amen"), 1)])).unwrap();
    assert_eq!(engine.descramble("nema").unwrap(), "amen");
}

#[test]
fn a_single_uppercase_letter_narrows_the_candidates() {
    let dir = tempfile::tempdir().unwrap();
    let engine =
        DescrambleEngine::open(&model(&dir, "model.json", &[(("name", "mean"), 1)])).unwrap();
    assert_eq!(engine.descramble("Nema").unwrap(), "name");
    // Multiple capitals carry no signal; first sorted candidate wins.
    assert_eq!(engine.descramble("NeMa").unwrap(), "mean");
}

#[test]
fn decoding_is_deterministic_across_calls_and_engines() {
    let dir = tempfile::tempdir().unwrap();
    let path = model(&dir, "model.json", THAT_IS);
    let first = DescrambleEngine::open(&path).unwrap();
    let second = DescrambleEngine::open(&path).unwrap();
    let text = "taht si taht si";
    let once = first.descramble(text).unwrap();
    assert_eq!(once, first.descramble(text).unwrap());
    assert_eq!(once, second.descramble(text).unwrap());
}
