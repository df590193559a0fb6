//! JSON input documents for speech and transcript sources.
//!
//! The core library only sees token and sentence sequences; these documents
//! are the file-level adapters producing them. XML sources (AudioDoc,
//! parliamentary transcript formats) are external collaborators expected to be
//! converted to this JSON shape upstream.

use asralign::types::{Sentence, Token, TokenKind};
use eyre::{Result, WrapErr};
use serde::Deserialize;
use std::path::Path;

/// ASR output document: an ordered word stream with optional per-token times.
#[derive(Debug, Deserialize)]
pub struct SpeechDoc {
    pub words: Vec<SpeechWord>,
}

/// One recognized word, times in milliseconds when the recognizer provides
/// them.
#[derive(Debug, Deserialize)]
pub struct SpeechWord {
    pub text: String,
    #[serde(default)]
    pub start: Option<u64>,
    #[serde(default)]
    pub end: Option<u64>,
}

impl SpeechDoc {
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read speech document: {:?}", path.display()))?;
        serde_json::from_str(&data)
            .wrap_err_with(|| format!("failed to parse speech document: {:?}", path.display()))
    }

    /// Convert to alignment tokens. Words that are empty after trimming are
    /// skipped with a warning; they carry no alignable text.
    pub fn tokens(&self) -> Vec<Token> {
        self.words
            .iter()
            .filter_map(|word| {
                let text = word.text.trim();
                if text.is_empty() {
                    tracing::warn!("skipping empty word in speech document");
                    return None;
                }
                Some(Token {
                    text: text.to_string(),
                    kind: TokenKind::Word,
                    start_ms: word.start,
                    end_ms: word.end,
                })
            })
            .collect()
    }
}

/// Reference transcript as raw paragraphs, to be sentence-tokenized.
#[derive(Debug, Deserialize)]
pub struct TranscriptDoc {
    pub paragraphs: Vec<String>,
}

impl TranscriptDoc {
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path).wrap_err_with(|| {
            format!("failed to read transcript document: {:?}", path.display())
        })?;
        serde_json::from_str(&data)
            .wrap_err_with(|| format!("failed to parse transcript document: {:?}", path.display()))
    }
}

/// Reference transcript as pre-segmented utterances with declared times.
#[derive(Debug, Deserialize)]
pub struct UtteranceDoc {
    pub utterances: Vec<Utterance>,
}

/// One utterance, times in milliseconds.
#[derive(Debug, Deserialize)]
pub struct Utterance {
    pub text: String,
    #[serde(default)]
    pub start: Option<u64>,
    #[serde(default)]
    pub end: Option<u64>,
}

impl UtteranceDoc {
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path).wrap_err_with(|| {
            format!("failed to read utterance document: {:?}", path.display())
        })?;
        serde_json::from_str(&data)
            .wrap_err_with(|| format!("failed to parse utterance document: {:?}", path.display()))
    }

    /// Convert to sentences: whitespace-split word tokens with the utterance's
    /// declared times. Utterances left empty after cleanup are skipped with a
    /// warning.
    pub fn sentences(&self) -> Vec<Sentence> {
        self.utterances
            .iter()
            .filter_map(|utterance| {
                let text = strip_speaker_prefix(&utterance.text).trim();
                if text.is_empty() {
                    tracing::warn!("skipping empty utterance in transcript document");
                    return None;
                }
                let tokens = text.split_whitespace().map(Token::word).collect();
                Some(Sentence::timed(tokens, utterance.start, utterance.end))
            })
            .collect()
    }
}

/// Strip a leading `[Speaker: ...]` metadata prefix. Only applies when the
/// closing bracket sits near the start of the utterance, so bracketed text
/// later in a sentence is left alone.
fn strip_speaker_prefix(text: &str) -> &str {
    match text.find(']') {
        Some(i) if i < 100 && text.trim_start().starts_with('[') => &text[i + 1..],
        _ => text,
    }
}
