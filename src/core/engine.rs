use std::collections::HashSet;
use std::path::Path;

use tracing::debug;

use crate::core::candidates::candidates;
use crate::core::decoder::{best_path, BigramWeights};
use crate::core::signature::SignatureIndex;
use crate::core::tokenize::{reassemble, tokenize, Token};
use crate::core::types::{CandidateSet, END, START};
use crate::store::{self, BigramStore, StoreError};

/// The descrambling decision engine: an anagram index over the model's
/// vocabulary plus the frequency store the sequence decoder scores
/// against. Opening the model is the only fallible step; decoding always
/// terminates with a complete answer.
pub struct DescrambleEngine {
    store: Box<dyn BigramStore>,
    index: SignatureIndex,
}

impl DescrambleEngine {
    /// Opens the persisted model at `path` and builds the signature index
    /// from its vocabulary.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        Self::with_store(store::open(path)?)
    }

    pub fn with_store(store: Box<dyn BigramStore>) -> Result<Self, StoreError> {
        let index = SignatureIndex::from_entries(store.signature_entries()?);
        Ok(Self { store, index })
    }

    /// Reconstructs the most plausible original text: every word run is
    /// replaced by the candidate sequence maximizing the product of
    /// bigram frequencies, separators pass through untouched. Input with
    /// no word runs is returned unchanged without consulting the store.
    pub fn descramble(&self, text: &str) -> Result<String, StoreError> {
        let tokens = tokenize(text);
        let sets: Vec<CandidateSet> = tokens
            .iter()
            .filter_map(|token| match token {
                Token::Word(word) => Some(candidates(&self.index, word)),
                Token::Separator(_) => None,
            })
            .collect();
        if sets.is_empty() {
            return Ok(text.to_string());
        }

        let weights = self.resolve_weights(&sets)?;
        let (score, chosen) = best_path(&weights, START, &sets);
        debug!(score, positions = sets.len(), "best path selected");
        Ok(reassemble(&tokens, &chosen))
    }

    /// Resolves exactly the transition weights this decode can touch: the
    /// Cartesian products of consecutive candidate sets plus the boundary
    /// pairs, restricted to words the store knows. Query cost scales with
    /// the input text, never with the model.
    fn resolve_weights(&self, sets: &[CandidateSet]) -> Result<BigramWeights, StoreError> {
        let mut vocabulary: HashSet<String> = sets.iter().flatten().cloned().collect();
        vocabulary.insert(START.to_string());
        vocabulary.insert(END.to_string());
        let known = self.store.resolve_vocabulary(&vocabulary)?;

        let start = START.to_string();
        let end = END.to_string();
        let mut pairs: HashSet<(String, String)> = HashSet::new();
        for (i, set) in sets.iter().enumerate() {
            let prevs: &[String] = if i == 0 {
                std::slice::from_ref(&start)
            } else {
                &sets[i - 1]
            };
            for prev in prevs {
                if !known.contains_key(prev) {
                    continue;
                }
                for next in set {
                    if known.contains_key(next) {
                        pairs.insert((prev.clone(), next.clone()));
                    }
                }
            }
        }
        if let Some(last) = sets.last() {
            if known.contains_key(&end) {
                for prev in last {
                    if known.contains_key(prev) {
                        pairs.insert((prev.clone(), end.clone()));
                    }
                }
            }
        }

        let frequencies = self.store.batch_lookup(&pairs)?;
        debug!(
            words = known.len(),
            pairs = pairs.len(),
            found = frequencies.len(),
            "resolved store weights"
        );
        Ok(BigramWeights::new(frequencies))
    }
}
