//! Timestamp-constrained alignment orchestrator.
//!
//! Used when the ASR source carries per-token times and the reference
//! transcript declares utterance start times. Sentence boundaries in the ASR
//! stream are fixed by timestamp lookup alone (no text comparison); the local
//! aligner is then used to score the candidate span, trying small boundary
//! perturbations to compensate for timestamp jitter at utterance edges.

use crate::smith_waterman::{self, ScoreParams};
use crate::types::{AlignStats, AlignedPair, Sentence, Token};

/// Boundary perturbations tried during the flexibility step.
const FLEX_OFFSETS: std::ops::Range<i64> = -5..5;

/// Configuration for the timestamp-constrained orchestrator.
#[derive(Clone, Copy, Debug)]
pub struct TimeAlignConfig {
    /// Minimum score for an utterance alignment to be accepted
    pub score_threshold: f64,
    /// Scoring parameters; length-scaled by default so a small fragment match
    /// inside a long candidate span scores low
    pub params: ScoreParams,
}

impl Default for TimeAlignConfig {
    fn default() -> Self {
        Self {
            score_threshold: 0.5,
            params: ScoreParams::length_scaled(),
        }
    }
}

/// The previous utterance, held until the next one fixes its end boundary.
#[derive(Debug)]
struct PendingUtterance {
    transcript: String,
    words: Vec<String>,
    begin: usize,
}

/// Timestamp-constrained aligner over a timed ASR token stream.
///
/// A pull-based iterator over [`AlignedPair`] records. Each utterance's span
/// runs from its own timestamp boundary to the next utterance's; scoring of
/// utterance N therefore happens while processing utterance N+1, with a final
/// flush at end of stream.
pub struct TimeAligner<'a, I> {
    asr: &'a [Token],
    sentences: I,
    config: TimeAlignConfig,
    begin: usize,
    pending: Option<PendingUtterance>,
    stats: AlignStats,
    done: bool,
}

impl<'a, I> TimeAligner<'a, I>
where
    I: Iterator<Item = Sentence>,
{
    pub fn new(asr: &'a [Token], sentences: I, config: TimeAlignConfig) -> Self {
        Self {
            asr,
            sentences,
            config,
            begin: 0,
            pending: None,
            stats: AlignStats::default(),
            done: false,
        }
    }

    /// Acceptance statistics so far.
    pub fn stats(&self) -> AlignStats {
        self.stats
    }

    /// First ASR token at or after the utterance's declared start time,
    /// scanning forward from the last confirmed boundary. No text comparison
    /// is involved. Falls back to the current boundary when no token
    /// qualifies.
    fn find_boundary(&self, sentence: &Sentence) -> usize {
        let target = sentence.start_ms.unwrap_or(0);
        self.asr
            .iter()
            .enumerate()
            .skip(self.begin)
            .find(|(_, token)| token.start_ms.unwrap_or(0) >= target)
            .map_or(self.begin, |(index, _)| index)
    }

    /// Score the pending utterance against `asr[pending.begin .. begin + j]`
    /// for every admissible perturbation `j`, keep the best, and move the
    /// boundary accordingly. Emits a pair when the best score clears the
    /// threshold; otherwise counts a loss.
    fn flush_pending(&mut self) -> Option<AlignedPair> {
        let pending = self.pending.take()?;
        let words: Vec<&str> = pending.words.iter().map(String::as_str).collect();

        let mut best: Option<(i64, f64, usize)> = None;
        for j in FLEX_OFFSETS {
            let end = self.begin as i64 + j;
            if end <= pending.begin as i64 {
                continue;
            }
            let end = (end as usize).min(self.asr.len());
            let slice: Vec<&str> = self.asr[pending.begin..end]
                .iter()
                .map(|t| t.text.as_str())
                .collect();

            let raw = smith_waterman::score(&words, &slice, &self.config.params);
            // Degenerate slices normalize to NaN; treat as no match.
            let score = if raw.is_nan() { 0.0 } else { raw };

            if best.is_none_or(|(_, best_score, _)| score > best_score) {
                best = Some((j, score, end));
            }
        }

        let Some((offset, score, end)) = best else {
            // No admissible endpoint; nothing to score.
            self.stats.record(0.0, false);
            return None;
        };

        self.begin = end;
        tracing::debug!(offset, score, "best flexibility offset");

        let accepted = score >= self.config.score_threshold;
        self.stats.record(score, accepted);
        if !accepted {
            tracing::debug!(
                score,
                transcript = %pending.transcript,
                "score threshold not met"
            );
            return None;
        }

        let asr_text = self.asr[pending.begin..end]
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        Some(AlignedPair {
            transcript: pending.transcript,
            asr: asr_text,
            score,
            offset: Some(offset),
        })
    }
}

impl<I> Iterator for TimeAligner<'_, I>
where
    I: Iterator<Item = Sentence>,
{
    type Item = AlignedPair;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.done {
                return None;
            }

            let sentence = self.sentences.next();
            self.begin = match &sentence {
                Some(s) => self.find_boundary(s),
                None => {
                    // End of stream: the last utterance runs to the stream end.
                    self.done = true;
                    self.asr.len()
                }
            };

            let emitted = self.flush_pending();

            if let Some(s) = sentence {
                self.pending = Some(PendingUtterance {
                    transcript: s.text(),
                    words: s.alignment_words().iter().map(|w| w.to_string()).collect(),
                    begin: self.begin,
                });
            }

            if emitted.is_some() {
                return emitted;
            }
        }
    }
}
