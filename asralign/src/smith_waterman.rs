//! Smith-Waterman local alignment over token sequences.
//!
//! Finds the best-scoring contiguous subsequence of a search sequence that
//! matches a query, discarding non-matching prefixes and suffixes. Token
//! equality is delegated to [`crate::fuzzy::words_match`], never plain string
//! comparison.

use crate::fuzzy::words_match;

/// Scoring parameters for local alignment.
///
/// Thread these explicitly into the orchestrators; there are no module-level
/// tunables.
#[derive(Clone, Copy, Debug)]
pub struct ScoreParams {
    /// Reward for a (fuzzy) token match
    pub match_reward: f64,
    /// Penalty for a substitution
    pub mismatch_penalty: f64,
    /// Penalty for an extra token in the query
    pub insertion_penalty: f64,
    /// Penalty for a missing token in the query
    pub deletion_penalty: f64,
    /// Divide the raw score by `query_len * match_reward`, mapping it into
    /// roughly [0, 1]
    pub normalize: bool,
    /// Additionally scale by `query_len / search_len`, penalizing matches that
    /// cover only a small fragment of a long search slice
    pub length_scaled: bool,
    /// Maximum edit distance for fuzzy token equality
    pub fuzzy_threshold: usize,
}

impl Default for ScoreParams {
    fn default() -> Self {
        Self {
            match_reward: 3.0,
            mismatch_penalty: -1.0,
            insertion_penalty: -0.5,
            deletion_penalty: -0.5,
            normalize: true,
            length_scaled: false,
            fuzzy_threshold: crate::fuzzy::DEFAULT_EDIT_DISTANCE,
        }
    }
}

impl ScoreParams {
    /// Default parameters with length-aware score scaling, as used by the
    /// timestamp-constrained orchestrator.
    pub fn length_scaled() -> Self {
        Self {
            length_scaled: true,
            ..Self::default()
        }
    }
}

/// Result of a local alignment.
///
/// `start..end` index the search sequence (the first argument to [`align`]).
/// The matched tokens are always a contiguous slice of the search sequence,
/// so `tokens.len() == end - start`.
#[derive(Clone, Debug, Default)]
pub struct LocalAlignment {
    /// Alignment score; NaN when normalizing against an empty query
    pub score: f64,
    /// Matched tokens from the search sequence, in order
    pub tokens: Vec<String>,
    /// Match start index in the search sequence
    pub start: usize,
    /// Match end index in the search sequence, exclusive
    pub end: usize,
}

impl LocalAlignment {
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    fn rejected(score: f64) -> Self {
        Self {
            score,
            ..Self::default()
        }
    }
}

/// Flat DP score matrix, `(query_len + 1) x (search_len + 1)`.
struct ScoreMatrix {
    cells: Vec<f64>,
    cols: usize,
}

impl ScoreMatrix {
    fn get(&self, i: usize, j: usize) -> f64 {
        self.cells[i * self.cols + j]
    }

    /// Fill the matrix and return the maximum cell value and its position.
    fn fill(search: &[&str], query: &[&str], params: &ScoreParams) -> (Self, f64, (usize, usize)) {
        let cols = search.len() + 1;
        let rows = query.len() + 1;
        let mut mat = Self {
            cells: vec![0.0; rows * cols],
            cols,
        };

        let mut best = 0.0;
        let mut best_cell = (0, 0);

        for i in 1..rows {
            for j in 1..cols {
                let pair_score = if words_match(search[j - 1], query[i - 1], params.fuzzy_threshold)
                {
                    params.match_reward
                } else {
                    params.mismatch_penalty
                };

                // Clamping to 0 is what makes this a local alignment: a
                // negative-scoring prefix is dropped instead of carried along.
                let value = (mat.get(i - 1, j - 1) + pair_score)
                    .max(mat.get(i - 1, j) + params.deletion_penalty)
                    .max(mat.get(i, j - 1) + params.insertion_penalty)
                    .max(0.0);

                mat.cells[i * cols + j] = value;

                if value > best {
                    best = value;
                    best_cell = (i, j);
                }
            }
        }

        (mat, best, best_cell)
    }
}

fn finalize_score(raw: f64, search_len: usize, query_len: usize, params: &ScoreParams) -> f64 {
    let mut score = if params.normalize {
        raw / (query_len as f64 * params.match_reward)
    } else {
        raw
    };
    if params.length_scaled {
        score *= query_len as f64 / search_len as f64;
    }
    score
}

/// Compute the alignment score only, without backtracing the matched span.
///
/// When `seq2` is longer than `seq1` the two are swapped internally, so the
/// query is always the shorter sequence. An empty query under normalization
/// yields NaN (callers treat that as a rejected match).
pub fn score(seq1: &[&str], seq2: &[&str], params: &ScoreParams) -> f64 {
    let (search, query) = order(seq1, seq2);
    let (_, best, _) = ScoreMatrix::fill(search, query, params);
    finalize_score(best, search.len(), query.len(), params)
}

/// Compute the best local alignment of `query` within `search`.
///
/// The returned indices always refer to `search`, regardless of which
/// sequence is longer; a query with no counterpart in the search space simply
/// scores low. A zero maximum score yields an empty match, never an error.
pub fn align(search: &[&str], query: &[&str], params: &ScoreParams) -> LocalAlignment {
    let (mat, best, best_cell) = ScoreMatrix::fill(search, query, params);
    let score = finalize_score(best, search.len(), query.len(), params);

    if best <= 0.0 {
        return LocalAlignment::rejected(score);
    }

    // Backtrace from the argmax cell, appending the search-sequence index at
    // each step and moving to whichever of the diagonal or left neighbor
    // scores higher (diagonal preferred on ties, biasing substitutions over
    // insertions). Stops at the first zero cell.
    let (mut i, mut j) = best_cell;
    let mut indices = Vec::new();
    while mat.get(i, j) != 0.0 {
        indices.push(j - 1);
        if mat.get(i - 1, j - 1) >= mat.get(i, j - 1) {
            i -= 1;
            j -= 1;
        } else {
            j -= 1;
        }
    }

    // Discovered right-to-left with j decreasing by one each step, so the
    // span is contiguous: first pushed index is the match end.
    let end = indices[0] + 1;
    let start = *indices.last().expect("nonzero best cell yields a span");
    let tokens = indices
        .iter()
        .rev()
        .map(|&idx| search[idx].to_string())
        .collect();

    LocalAlignment {
        score,
        tokens,
        start,
        end,
    }
}

fn order<'a, 'b>(seq1: &'b [&'a str], seq2: &'b [&'a str]) -> (&'b [&'a str], &'b [&'a str]) {
    if seq2.len() > seq1.len() {
        (seq2, seq1)
    } else {
        (seq1, seq2)
    }
}
