//! Core types for asralign.

use serde::{Deserialize, Serialize};

/// Token classification from the tokenizer.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TokenKind {
    /// Regular word, participates in alignment
    Word,
    /// Punctuation, excluded from alignment input but kept in transcript text
    Punctuation,
}

/// A single token from the ASR stream or a tokenized transcript.
///
/// Timing fields are present only when the source provides them (the
/// timestamp-constrained orchestrator requires them; the cursor-based one
/// ignores them). Immutable once produced.
#[derive(Clone, Debug)]
pub struct Token {
    /// Token text
    pub text: String,
    /// Word or punctuation
    pub kind: TokenKind,
    /// Start time in milliseconds, if the source carries timing
    pub start_ms: Option<u64>,
    /// End time in milliseconds, if the source carries timing
    pub end_ms: Option<u64>,
}

impl Token {
    /// Create an untimed word token.
    pub fn word(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: TokenKind::Word,
            start_ms: None,
            end_ms: None,
        }
    }

    /// Create an untimed punctuation token.
    pub fn punctuation(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: TokenKind::Punctuation,
            start_ms: None,
            end_ms: None,
        }
    }

    /// Create a timed word token.
    pub fn timed(text: impl Into<String>, start_ms: u64, end_ms: u64) -> Self {
        Self {
            text: text.into(),
            kind: TokenKind::Word,
            start_ms: Some(start_ms),
            end_ms: Some(end_ms),
        }
    }

    /// Whether this token participates in alignment.
    pub fn is_word(&self) -> bool {
        self.kind == TokenKind::Word
    }
}

/// A reference sentence: an ordered token sequence with optional declared
/// utterance times.
#[derive(Clone, Debug)]
pub struct Sentence {
    pub tokens: Vec<Token>,
    /// Declared utterance start in milliseconds (timestamp variant only)
    pub start_ms: Option<u64>,
    /// Declared utterance end in milliseconds (timestamp variant only)
    pub end_ms: Option<u64>,
}

impl Sentence {
    /// Create a sentence without declared times.
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            start_ms: None,
            end_ms: None,
        }
    }

    /// Create a sentence with declared utterance times.
    pub fn timed(tokens: Vec<Token>, start_ms: Option<u64>, end_ms: Option<u64>) -> Self {
        Self {
            tokens,
            start_ms,
            end_ms,
        }
    }

    /// Word texts only, in order. This is the alignment input; punctuation is
    /// excluded here but stays in [`Sentence::text`].
    pub fn alignment_words(&self) -> Vec<&str> {
        self.tokens
            .iter()
            .filter(|t| t.is_word())
            .map(|t| t.text.as_str())
            .collect()
    }

    /// Full sentence text, all tokens joined with spaces.
    pub fn text(&self) -> String {
        self.tokens
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// One emitted alignment: a reference sentence paired with its matched ASR
/// span and confidence score. Never mutated after creation.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct AlignedPair {
    /// Reference transcript sentence (punctuation included)
    pub transcript: String,
    /// Matched ASR text
    pub asr: String,
    /// Alignment score, roughly in [0, 1] when normalized
    pub score: f64,
    /// Chosen flexibility offset (timestamp variant only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
}

/// Running acceptance statistics over one document run.
#[derive(Clone, Copy, Debug, Default)]
pub struct AlignStats {
    /// Sentences processed
    pub total: usize,
    /// Sentences rejected (score below threshold)
    pub loss: usize,
    /// Sum of all scores prior to pruning, NaN normalized to 0
    pub score_sum: f64,
}

impl AlignStats {
    /// Record one processed sentence.
    pub fn record(&mut self, score: f64, accepted: bool) {
        self.total += 1;
        if !accepted {
            self.loss += 1;
        }
        self.score_sum += if score.is_nan() { 0.0 } else { score };
    }

    /// Fraction of sentences rejected, 0 when nothing was processed.
    pub fn loss_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.loss as f64 / self.total as f64
        }
    }

    /// Mean score over all processed sentences, prior to pruning.
    pub fn mean_score(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.score_sum / self.total as f64
        }
    }
}
