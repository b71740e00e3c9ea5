use crate::core::signature::{letter_signature, SignatureIndex};
use crate::core::types::CandidateSet;

/// Enumerates the dictionary words consistent with a scrambled token's
/// letters. A token with no anagram in the index falls back to itself
/// lowercased, so every position always has at least one candidate and
/// the decoder never faces an empty choice set.
pub fn candidates(index: &SignatureIndex, token: &str) -> CandidateSet {
    let lowered = token.to_lowercase();
    let base = match index.words_for(&letter_signature(&lowered)) {
        Some(words) => words.to_vec(),
        None => vec![lowered],
    };
    narrow_by_initial(base, token)
}

/// A token carrying exactly one uppercase letter probably had a
/// capitalized first letter before its letters were permuted. Narrowing
/// to candidates starting with that letter is a heuristic only: when
/// nothing survives the filter, the unfiltered set is kept. Zero or
/// multiple uppercase letters mean no narrowing at all.
fn narrow_by_initial(base: CandidateSet, token: &str) -> CandidateSet {
    let initial = match single_uppercase_letter(token) {
        Some(c) => c,
        None => return base,
    };
    let narrowed: CandidateSet = base
        .iter()
        .filter(|word| word.starts_with(initial))
        .cloned()
        .collect();
    if narrowed.is_empty() {
        base
    } else {
        narrowed
    }
}

fn single_uppercase_letter(token: &str) -> Option<char> {
    let mut uppers = token.chars().filter(|c| c.is_uppercase());
    let first = uppers.next()?;
    if uppers.next().is_some() {
        return None;
    }
    first.to_lowercase().next()
}
