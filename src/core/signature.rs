// src/core/signature.rs
use std::collections::{HashMap, HashSet};

/// Canonical letter signature of a word: its characters in sorted order.
/// Two words share a signature exactly when one is a letter permutation
/// of the other.
pub fn letter_signature(word: &str) -> String {
    let mut letters: Vec<char> = word.chars().collect();
    letters.sort_unstable();
    letters.into_iter().collect()
}

/// Groups a vocabulary by letter signature so every anagram of a
/// scrambled token can be enumerated in a single lookup.
#[derive(Debug, Default, Clone)]
pub struct SignatureIndex {
    words_by_signature: HashMap<String, Vec<String>>,
}

impl SignatureIndex {
    /// Builds the index from raw words, trimming and lowercasing each one
    /// before the signature is computed. Duplicates are skipped and
    /// insertion order is preserved, so candidate enumeration order is
    /// stable for a given input order.
    pub fn build<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut index = Self::default();
        let mut seen = HashSet::new();
        for word in words {
            let word = word.as_ref().trim().to_lowercase();
            if word.is_empty() || !seen.insert(word.clone()) {
                continue;
            }
            index
                .words_by_signature
                .entry(letter_signature(&word))
                .or_default()
                .push(word);
        }
        index
    }

    /// Builds the index from (signature, word) rows a model store already
    /// persists, trusting the stored signatures instead of recomputing.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut index = Self::default();
        let mut seen = HashSet::new();
        for (signature, word) in entries {
            if !seen.insert(word.clone()) {
                continue;
            }
            index
                .words_by_signature
                .entry(signature)
                .or_default()
                .push(word);
        }
        index
    }

    /// All indexed words sharing `signature`, in insertion order.
    pub fn words_for(&self, signature: &str) -> Option<&[String]> {
        self.words_by_signature.get(signature).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.words_by_signature.is_empty()
    }
}
