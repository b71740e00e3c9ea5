use rand::seq::index::sample;
use rand::Rng;

use crate::core::tokenize::{tokenize, Token};

/// Permutes part of a word's letters. `amount` controls how many
/// positions join the permutation: `min(floor(amount * len), len)`
/// distinct positions are drawn in random order, and the selected
/// positions taken in ascending order are rewritten with the letters at
/// the drawn positions. Everything else stays put, so the result is
/// always a letter permutation of the input.
pub fn scramble_word<R: Rng>(word: &str, amount: f64, rng: &mut R) -> String {
    let letters: Vec<char> = word.chars().collect();
    let take = ((amount * letters.len() as f64) as usize).min(letters.len());
    let drawn: Vec<usize> = sample(rng, letters.len(), take).into_vec();
    let mut slots = drawn.clone();
    slots.sort_unstable();

    let mut out = letters.clone();
    for (slot, source) in slots.into_iter().zip(drawn) {
        out[slot] = letters[source];
    }
    out.into_iter().collect()
}

/// Scrambles every word run in `text`, leaving separators untouched.
pub fn scramble_text<R: Rng>(text: &str, amount: f64, rng: &mut R) -> String {
    let mut out = String::new();
    for token in tokenize(text) {
        match token {
            Token::Separator(s) => out.push_str(&s),
            Token::Word(word) => out.push_str(&scramble_word(&word, amount, rng)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::signature::letter_signature;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn scrambling_preserves_the_letter_signature() {
        let mut rng = StdRng::seed_from_u64(7);
        for word in ["a", "ab", "scrambled", "tournament"] {
            let scrambled = scramble_word(word, 1.0, &mut rng);
            assert_eq!(letter_signature(&scrambled), letter_signature(word));
        }
    }

    #[test]
    fn amount_zero_is_the_identity() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(scramble_word("unchanged", 0.0, &mut rng), "unchanged");
    }

    #[test]
    fn amount_is_capped_at_the_word_length() {
        let mut rng = StdRng::seed_from_u64(7);
        let scrambled = scramble_word("short", 100.0, &mut rng);
        assert_eq!(letter_signature(&scrambled), letter_signature("short"));
    }

    #[test]
    fn separators_survive_scrambling() {
        let mut rng = StdRng::seed_from_u64(7);
        let scrambled = scramble_text("well, well!", 1.0, &mut rng);
        assert_eq!(scrambled.matches(", ").count(), 1);
        assert!(scrambled.ends_with('!'));
        assert_eq!(scrambled.len(), "well, well!".len());
    }

    #[test]
    fn seeded_scrambles_are_reproducible() {
        let first = scramble_text("the same text", 0.8, &mut StdRng::seed_from_u64(42));
        let second = scramble_text("the same text", 0.8, &mut StdRng::seed_from_u64(42));
        assert_eq!(first, second);
    }
}
