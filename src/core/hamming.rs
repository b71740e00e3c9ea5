use crate::core::signature::{letter_signature, SignatureIndex};
use crate::core::tokenize::{tokenize, Token};

/// Positions at which two equal-length words disagree. Anagram candidates
/// always have the same length as the token they decode, so no padding
/// is needed.
fn hamming_distance(a: &str, b: &str) -> usize {
    a.chars().zip(b.chars()).filter(|(x, y)| x != y).count()
}

/// Per-word nearest-neighbor descrambler: each word token is replaced by
/// the anagram candidate closest to it in Hamming distance, with no
/// sequence context at all. Cheaper than the bigram decoder and
/// correspondingly weaker on ambiguous anagram sets. The first minimal
/// candidate in index order wins ties.
pub fn descramble_hamming(index: &SignatureIndex, text: &str) -> String {
    let mut out = String::new();
    for token in tokenize(text) {
        match token {
            Token::Separator(s) => out.push_str(&s),
            Token::Word(word) => {
                let word = word.to_lowercase();
                let chosen = index
                    .words_for(&letter_signature(&word))
                    .and_then(|words| {
                        words
                            .iter()
                            .min_by_key(|choice| hamming_distance(&word, choice))
                    })
                    .cloned()
                    .unwrap_or(word);
                out.push_str(&chosen);
            }
        }
    }
    out
}
