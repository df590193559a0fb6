//! Bounded search window over the ASR token stream.
//!
//! The window is the slice `asr[cursor .. cursor + size]`. Keeping the search
//! space bounded caps every alignment matrix at `size x sentence_len` cells
//! regardless of total stream length; the trade-off is that alignments can
//! never look back past the cursor once it has confidently advanced.

use crate::types::Token;

/// Default search window size in tokens.
pub const DEFAULT_WINDOW_SIZE: usize = 1000;

/// Window and cursor-advance policy.
#[derive(Clone, Copy, Debug)]
pub struct WindowConfig {
    /// Maximum window length in tokens
    pub size: usize,
    /// Score at or above which an alignment may advance the cursor
    pub strong_score: f64,
    /// Minimum reference sentence length (tokens, punctuation included) for a
    /// cursor advance; short sentences align too noisily to anchor on, and a
    /// bad advance desynchronizes the whole remaining stream
    pub min_sentence_tokens: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_WINDOW_SIZE,
            strong_score: 0.85,
            min_sentence_tokens: 10,
        }
    }
}

impl WindowConfig {
    /// Whether an accepted alignment is strong enough to advance the cursor.
    pub fn allows_advance(&self, sentence_tokens: usize, score: f64) -> bool {
        sentence_tokens >= self.min_sentence_tokens && score >= self.strong_score
    }
}

/// Sliding view into the full ASR token sequence.
///
/// The cursor is the absolute index of the last confirmed alignment boundary;
/// it only ever moves forward.
#[derive(Debug)]
pub struct StreamWindow<'a> {
    stream: &'a [Token],
    cursor: usize,
    size: usize,
}

impl<'a> StreamWindow<'a> {
    pub fn new(stream: &'a [Token], size: usize) -> Self {
        Self {
            stream,
            cursor: 0,
            size,
        }
    }

    /// Absolute index in the full stream of the window's first token.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Current window slice. At most `size` tokens; the final window may be
    /// shorter.
    pub fn tokens(&self) -> &'a [Token] {
        let end = (self.cursor + self.size).min(self.stream.len());
        &self.stream[self.cursor..end]
    }

    /// Window token texts, for handing to the aligner.
    pub fn texts(&self) -> Vec<&'a str> {
        self.tokens().iter().map(|t| t.text.as_str()).collect()
    }

    /// Advance the cursor by `offset` tokens (saturating at stream end) and
    /// recompute the window from the new position.
    pub fn advance(&mut self, offset: usize) {
        self.cursor = (self.cursor + offset).min(self.stream.len());
        tracing::debug!(cursor = self.cursor, "advanced window cursor");
    }
}
