use std::collections::HashMap;

use crate::core::types::{CandidateSet, DEFAULT_TRANSITION_WEIGHT, END};

/// Transition weights resolved for one decode call. Pairs absent from
/// the map fall back to a fixed default weight rather than zero, so one
/// novel pair lowers a path's score without annihilating it.
pub struct BigramWeights {
    frequencies: HashMap<(String, String), f64>,
    default_weight: f64,
}

impl BigramWeights {
    pub fn new(frequencies: HashMap<(String, String), f64>) -> Self {
        Self::with_default_weight(frequencies, DEFAULT_TRANSITION_WEIGHT)
    }

    pub fn with_default_weight(
        frequencies: HashMap<(String, String), f64>,
        default_weight: f64,
    ) -> Self {
        Self {
            frequencies,
            default_weight,
        }
    }

    pub fn get(&self, prev: &str, next: &str) -> f64 {
        self.frequencies
            .get(&(prev.to_string(), next.to_string()))
            .copied()
            .unwrap_or(self.default_weight)
    }
}

/// Finds the highest-scoring choice of one candidate per position, scored
/// as the product of transition weights along the path from `start`
/// through every chosen word to `<END>`.
///
/// Implemented as a dynamic-programming sweep over (position, previous
/// word) states instead of plain recursion: the same previous word and
/// remaining suffix recur across many earlier choices, and tabulating
/// them bounds the work to one entry per position-candidate pair while
/// keeping stack depth independent of sequence length. Without that, a
/// run of ambiguous multi-candidate positions blows up exponentially.
///
/// Ties break by strict comparison: the first candidate in set order to
/// reach the maximum wins, later equal scores never replace it.
pub fn best_path(
    weights: &BigramWeights,
    start: &str,
    candidate_sets: &[CandidateSet],
) -> (f64, Vec<String>) {
    let positions = candidate_sets.len();

    // suffix_scores[prev]: best score over all completions of positions
    // i.. given `prev` was chosen at position i - 1. Seeded with the
    // <END> boundary for the final previous-word domain.
    let mut suffix_scores: HashMap<String, f64> = prev_domain(start, candidate_sets, positions)
        .into_iter()
        .map(|prev| (prev.to_string(), weights.get(prev, END)))
        .collect();

    // winner[i][prev]: index into candidate_sets[i] of the best choice.
    let mut winner: Vec<HashMap<String, usize>> = vec![HashMap::new(); positions];

    for i in (0..positions).rev() {
        let mut scores = HashMap::new();
        for prev in prev_domain(start, candidate_sets, i) {
            let mut best_score = 0.0;
            let mut best_index = 0;
            for (index, candidate) in candidate_sets[i].iter().enumerate() {
                let score = weights.get(prev, candidate) * suffix_scores[candidate];
                if index == 0 || score > best_score {
                    best_score = score;
                    best_index = index;
                }
            }
            scores.insert(prev.to_string(), best_score);
            winner[i].insert(prev.to_string(), best_index);
        }
        suffix_scores = scores;
    }

    let mut chosen = Vec::with_capacity(positions);
    let mut prev = start;
    for (i, set) in candidate_sets.iter().enumerate() {
        let candidate = &set[winner[i][prev]];
        chosen.push(candidate.clone());
        prev = candidate;
    }
    (suffix_scores[start], chosen)
}

/// Previous-word values reachable at position `i`: the start sentinel at
/// the front, otherwise the candidates of the preceding position.
fn prev_domain<'a>(start: &'a str, sets: &'a [CandidateSet], i: usize) -> Vec<&'a str> {
    if i == 0 {
        vec![start]
    } else {
        sets[i - 1].iter().map(String::as_str).collect()
    }
}
