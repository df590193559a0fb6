//! Cursor-based alignment orchestrator.
//!
//! Drives the per-sentence loop for ASR streams without timing metadata:
//! aligns each reference sentence against the current search window, applies
//! the acceptance policy, advances the window cursor on strong alignments, and
//! buffers each accepted match for one round so the small token gap between
//! two consecutive matches can be bridged before the earlier one is emitted.
//!
//! The orchestrator is a pull-based iterator over [`AlignedPair`] records;
//! consumers advance it one record at a time and there is no backward seeking.

use crate::error::{AlignError, ConfigError, Result};
use crate::fuzzy::words_match;
use crate::smith_waterman::{self, ScoreParams};
use crate::types::{AlignStats, AlignedPair, Sentence, Token};
use crate::window::{StreamWindow, WindowConfig};

/// Configuration for the cursor-based orchestrator.
#[derive(Clone, Copy, Debug)]
pub struct AlignConfig {
    /// Minimum normalized score for a sentence alignment to be accepted
    pub score_threshold: f64,
    /// Minimum score of the *new* match for gap bridging to fire
    pub bridge_score: f64,
    /// Gap bridging fires for gaps strictly between 0 and this many tokens
    pub bridge_max_gap: usize,
    /// Window sizing and cursor-advance policy
    pub window: WindowConfig,
    /// Local alignment scoring parameters
    pub params: ScoreParams,
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self {
            score_threshold: 0.8,
            bridge_score: 0.75,
            bridge_max_gap: 3,
            window: WindowConfig::default(),
            params: ScoreParams::default(),
        }
    }
}

impl AlignConfig {
    /// Validate threshold and window tunables.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.score_threshold) {
            return Err(ConfigError::InvalidScoreThreshold(self.score_threshold).into());
        }
        if self.window.size == 0 {
            return Err(ConfigError::InvalidWindowSize(self.window.size).into());
        }
        Ok(())
    }
}

/// One accepted alignment held back until the next sentence resolves the gap
/// between them.
#[derive(Clone, Debug)]
struct PendingMatch {
    transcript: String,
    asr_tokens: Vec<String>,
    score: f64,
    /// Absolute stream index one past the last matched token
    end_index: usize,
}

impl PendingMatch {
    fn into_pair(self) -> AlignedPair {
        AlignedPair {
            transcript: self.transcript,
            asr: self.asr_tokens.join(" "),
            score: self.score,
            offset: None,
        }
    }
}

/// Orchestrator state across per-sentence steps.
#[derive(Debug)]
enum AlignerState {
    /// No match accepted yet (or the pending buffer was just flushed)
    AwaitingFirstSentence,
    /// Exactly one accepted match is buffered
    HavePending(PendingMatch),
}

impl AlignerState {
    fn take(&mut self) -> Option<PendingMatch> {
        match std::mem::replace(self, AlignerState::AwaitingFirstSentence) {
            AlignerState::AwaitingFirstSentence => None,
            AlignerState::HavePending(pending) => Some(pending),
        }
    }
}

/// Cursor-based aligner over a full ASR token stream.
///
/// Sentence N's outcome depends on sentence N-1's (cursor, window, pending
/// buffer), so processing is strictly sequential.
pub struct CursorAligner<'a, I> {
    asr: &'a [Token],
    sentences: I,
    window: StreamWindow<'a>,
    config: AlignConfig,
    state: AlignerState,
    stats: AlignStats,
    done: bool,
}

impl<'a, I> CursorAligner<'a, I>
where
    I: Iterator<Item = Sentence>,
{
    pub fn new(asr: &'a [Token], sentences: I, config: AlignConfig) -> Self {
        Self {
            asr,
            sentences,
            window: StreamWindow::new(asr, config.window.size),
            config,
            state: AlignerState::AwaitingFirstSentence,
            stats: AlignStats::default(),
            done: false,
        }
    }

    /// Acceptance statistics so far.
    pub fn stats(&self) -> AlignStats {
        self.stats
    }

    /// Process one reference sentence. Returns the flushed previous match, if
    /// this sentence's alignment was accepted and a match was buffered.
    fn step(&mut self, sentence: &Sentence) -> Result<Option<AlignedPair>> {
        let words = sentence.alignment_words();
        let alignment = smith_waterman::align(&self.window.texts(), &words, &self.config.params);

        tracing::debug!(
            transcript = %sentence.text(),
            score = alignment.score,
            "aligned sentence against window"
        );

        // NaN (empty alignment input) fails this comparison and is rejected.
        let accepted =
            alignment.score >= self.config.score_threshold && !alignment.is_empty();
        self.stats.record(alignment.score, accepted);
        if !accepted {
            return Ok(None);
        }

        // Absolute span of this match in the full stream. The span offsets
        // are window-relative, so adding the cursor must land its start
        // exactly on the first matched token; anything else is a bookkeeping
        // defect, not bad input.
        let abs_end = self.window.cursor() + alignment.end;
        let abs_begin = self.window.cursor() + alignment.start;
        let first_matched = &alignment.tokens[0];
        match self.asr.get(abs_begin) {
            Some(token) if token.text == *first_matched => {}
            other => {
                return Err(AlignError::CursorDesync {
                    index: abs_begin,
                    expected: first_matched.clone(),
                    found: other.map(|t| t.text.clone()),
                }
                .into());
            }
        }

        let flushed = self.state.take().map(|mut previous| {
            self.bridge_gap(&mut previous, abs_begin, &alignment.tokens, &words, alignment.score);
            previous.into_pair()
        });

        self.state = AlignerState::HavePending(PendingMatch {
            transcript: sentence.text(),
            asr_tokens: alignment.tokens,
            score: alignment.score,
            end_index: abs_end,
        });

        if self
            .config
            .window
            .allows_advance(sentence.len(), alignment.score)
        {
            self.window.advance(alignment.end);
        }

        Ok(flushed)
    }

    /// Reattach a short run of ASR tokens left between the previous match's
    /// end and the new match's start: those tokens belong acoustically to the
    /// prior utterance but fell just outside its own alignment. Heuristic
    /// boundary-slop correction, not a correctness guarantee.
    fn bridge_gap(
        &self,
        previous: &mut PendingMatch,
        new_begin: usize,
        new_tokens: &[String],
        new_words: &[&str],
        new_score: f64,
    ) {
        let gap = new_begin.saturating_sub(previous.end_index);
        if gap == 0 || gap >= self.config.bridge_max_gap {
            return;
        }
        if new_score < self.config.bridge_score {
            return;
        }
        let clean_start = match (new_tokens.first(), new_words.first()) {
            (Some(matched), Some(word)) => {
                words_match(matched, word, self.config.params.fuzzy_threshold)
            }
            _ => false,
        };
        if !clean_start {
            return;
        }

        tracing::debug!(gap, end = previous.end_index, "bridging gap into previous match");
        previous
            .asr_tokens
            .extend(self.asr[previous.end_index..new_begin].iter().map(|t| t.text.clone()));
        previous.end_index = new_begin;
    }
}

impl<I> Iterator for CursorAligner<'_, I>
where
    I: Iterator<Item = Sentence>,
{
    type Item = Result<AlignedPair>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            match self.sentences.next() {
                Some(sentence) => match self.step(&sentence) {
                    Ok(Some(pair)) => return Some(Ok(pair)),
                    Ok(None) => continue,
                    Err(e) => {
                        self.done = true;
                        return Some(Err(e));
                    }
                },
                None => {
                    // End of stream: flush the last accepted match, if any.
                    self.done = true;
                    return self.state.take().map(|pending| Ok(pending.into_pair()));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::{BasicTokenizer, SentenceTokenizer};

    fn asr(words: &str) -> Vec<Token> {
        words.split_whitespace().map(Token::word).collect()
    }

    fn sentences(text: &str) -> Vec<Sentence> {
        BasicTokenizer.sentences(text)
    }

    fn collect(
        asr_tokens: &[Token],
        text: &str,
        config: AlignConfig,
    ) -> (Vec<AlignedPair>, AlignStats) {
        let mut aligner = CursorAligner::new(asr_tokens, sentences(text).into_iter(), config);
        let mut pairs = Vec::new();
        while let Some(pair) = aligner.next() {
            pairs.push(pair.expect("no bookkeeping error expected"));
        }
        (pairs, aligner.stats())
    }

    #[test]
    fn aligns_single_sentence_end_to_end() {
        let tokens = asr("de kat zat op de mat en sliep");
        let (pairs, stats) = collect(&tokens, "De kat zat op de mat.", AlignConfig::default());

        match &pairs[..] {
            [pair] => {
                assert_eq!(pair.asr, "de kat zat op de mat");
                assert_eq!(pair.transcript, "De kat zat op de mat .");
                assert!(pair.score >= 0.8);
                assert!(pair.offset.is_none());
            }
            _ => panic!("expected 1 pair, got {}", pairs.len()),
        }
        assert_eq!(stats.total, 1);
        assert_eq!(stats.loss, 0);
    }

    #[test]
    fn unmatched_sentence_counts_as_loss() {
        let tokens = asr("de kat zat op de mat");
        let (pairs, stats) = collect(
            &tokens,
            "Volstrekt onverwante woorden zonder tegenhanger.",
            AlignConfig::default(),
        );

        assert!(pairs.is_empty());
        assert_eq!(stats.total, 1);
        assert_eq!(stats.loss, 1);
    }

    #[test]
    fn skipped_sentence_does_not_block_later_ones() {
        let tokens = asr("de kat zat op de mat en de hond sliep buiten rustig door");
        let text = "De kat zat op de mat. Compleet afwezige tussenzin hier. En de hond sliep buiten rustig door.";
        let (pairs, stats) = collect(&tokens, text, AlignConfig::default());

        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].asr, "de kat zat op de mat");
        assert_eq!(pairs[1].asr, "en de hond sliep buiten rustig door");
        assert_eq!(stats.total, 3);
        assert_eq!(stats.loss, 1);
    }

    #[test]
    fn bridges_small_gap_into_previous_match() {
        // Two filler tokens sit between the two matched spans; they belong to
        // the first utterance and should be reattached to it.
        let tokens = asr("de kat zat op de mat uh uhm en de hond sliep buiten rustig door");
        let text = "De kat zat op de mat. En de hond sliep buiten rustig door.";
        let (pairs, _) = collect(&tokens, text, AlignConfig::default());

        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].asr, "de kat zat op de mat uh uhm");
        assert_eq!(pairs[1].asr, "en de hond sliep buiten rustig door");
    }

    #[test]
    fn does_not_bridge_gap_of_three_or_more() {
        let tokens = asr("de kat zat op de mat uh uhm eh en de hond sliep buiten rustig door");
        let text = "De kat zat op de mat. En de hond sliep buiten rustig door.";
        let (pairs, _) = collect(&tokens, text, AlignConfig::default());

        assert_eq!(pairs.len(), 2);
        // Gap is exactly 3 tokens: strictly outside the bridging bound.
        assert_eq!(pairs[0].asr, "de kat zat op de mat");
    }

    #[test]
    fn does_not_bridge_zero_gap() {
        let tokens = asr("de kat zat op de mat en de hond sliep buiten rustig door");
        let text = "De kat zat op de mat. En de hond sliep buiten rustig door.";
        let (pairs, _) = collect(&tokens, text, AlignConfig::default());

        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].asr, "de kat zat op de mat");
    }

    #[test]
    fn does_not_bridge_below_bridge_score() {
        let config = AlignConfig {
            score_threshold: 0.5,
            bridge_score: 0.99,
            ..AlignConfig::default()
        };
        // "heel" is missing from the ASR side, so the second match scores
        // well below the bridge gate while still clearing the threshold.
        let tokens = asr("de kat zat op de mat uh uhm en de hond sliep buiten rustig door");
        let text = "De kat zat op de mat. En de hond sliep buiten heel rustig door.";
        let (pairs, _) = collect(&tokens, text, config);

        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].asr, "de kat zat op de mat");
    }

    #[test]
    fn sentence_longer_than_stream_is_a_loss_not_an_error() {
        // A short ASR document (or a cursor near stream end) can leave the
        // window smaller than the sentence. That is ordinary input: the
        // sentence scores low and is dropped, never reported as desync.
        let tokens = asr("de kat zat");
        let (pairs, stats) = collect(
            &tokens,
            "Vandaag zei iemand iets want de kat zat.",
            AlignConfig::default(),
        );

        assert!(pairs.is_empty());
        assert_eq!(stats.total, 1);
        assert_eq!(stats.loss, 1);
    }

    #[test]
    fn long_sentence_near_stream_end_can_still_match() {
        // The 8-word sentence outgrows the 7-token window but still clears
        // the threshold on the 7 words it does cover; the emitted span must
        // come from the stream, not the transcript.
        let tokens = asr("en de hond sliep buiten rustig door");
        let text = "Maar en de hond sliep buiten rustig door.";
        let config = AlignConfig {
            window: WindowConfig {
                size: 7,
                ..WindowConfig::default()
            },
            ..AlignConfig::default()
        };
        let (pairs, stats) = collect(&tokens, text, config);

        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].asr, "en de hond sliep buiten rustig door");
        assert_eq!(stats.loss, 0);
    }

    #[test]
    fn does_not_bridge_when_match_start_is_unclean() {
        // "en" never made it into the ASR stream, so the second match starts
        // one word into its sentence; reattaching the gap to the previous
        // match would misplace the boundary.
        let tokens = asr("de kat zat op de mat uh uhm de hond sliep buiten rustig door");
        let text = "De kat zat op de mat. En de hond sliep buiten rustig door.";
        let (pairs, _) = collect(&tokens, text, AlignConfig::default());

        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].asr, "de kat zat op de mat");
        assert_eq!(pairs[1].asr, "de hond sliep buiten rustig door");
    }

    #[test]
    fn strong_alignment_advances_cursor() {
        // First sentence has 10+ tokens and aligns perfectly, so the cursor
        // must move past it; with a 8-token window the second sentence would
        // otherwise fall outside the searchable range.
        let tokens = asr(
            "de voorzitter opent de vergadering van de kamer vandaag stipt en de hond sliep buiten rustig door",
        );
        let text = "De voorzitter opent de vergadering van de kamer vandaag stipt. En de hond sliep buiten rustig door.";
        let config = AlignConfig {
            window: WindowConfig {
                size: 11,
                ..WindowConfig::default()
            },
            ..AlignConfig::default()
        };

        let mut aligner = CursorAligner::new(&tokens, sentences(text).into_iter(), config);
        let mut pairs = Vec::new();
        while let Some(pair) = aligner.next() {
            pairs.push(pair.unwrap());
        }

        assert_eq!(pairs.len(), 2);
        assert_eq!(
            pairs[1].asr, "en de hond sliep buiten rustig door",
            "second sentence must be found after the advanced cursor"
        );
        assert_eq!(aligner.stats().loss, 0);
    }

    #[test]
    fn short_sentences_do_not_advance_cursor() {
        // Both sentences are under the 10-token gate; everything stays inside
        // the initial window and still aligns.
        let tokens = asr("de kat zat op de mat en de hond sliep");
        let text = "De kat zat op de mat. En de hond sliep.";
        let (pairs, stats) = collect(&tokens, text, AlignConfig::default());

        assert_eq!(pairs.len(), 2);
        assert_eq!(stats.loss, 0);
    }

    #[test]
    fn punctuation_only_sentence_is_a_loss_not_an_error() {
        let tokens = asr("de kat zat");
        let mut only_punct = sentences("De kat zat.");
        only_punct.push(Sentence::new(vec![Token::punctuation("…")]));

        let mut aligner =
            CursorAligner::new(&tokens, only_punct.into_iter(), AlignConfig::default());
        let mut pairs = Vec::new();
        while let Some(pair) = aligner.next() {
            pairs.push(pair.expect("degenerate input must not error"));
        }

        assert_eq!(pairs.len(), 1);
        assert_eq!(aligner.stats().loss, 1);
    }

    #[test]
    fn validate_rejects_bad_config() {
        let bad_score = AlignConfig {
            score_threshold: 1.5,
            ..AlignConfig::default()
        };
        assert!(bad_score.validate().is_err());

        let bad_window = AlignConfig {
            window: WindowConfig {
                size: 0,
                ..WindowConfig::default()
            },
            ..AlignConfig::default()
        };
        assert!(bad_window.validate().is_err());
    }
}
