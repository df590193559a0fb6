//! Sentence tokenization contract and a basic reference implementation.
//!
//! The real linguistic tokenizer is an external collaborator; the orchestrators
//! only depend on the [`SentenceTokenizer`] contract: a stream of typed tokens
//! with an end-of-sentence marker per token. [`BasicTokenizer`] is a minimal
//! whitespace-and-punctuation splitter that satisfies the contract for plain
//! text input.

use crate::types::{Sentence, Token};

/// One tokenizer output: a typed token plus its end-of-sentence flag.
#[derive(Clone, Debug)]
pub struct TokenEvent {
    pub token: Token,
    pub end_of_sentence: bool,
}

/// Splits raw text into typed tokens with sentence boundary markers.
pub trait SentenceTokenizer {
    /// Tokenize one paragraph of text.
    fn tokenize(&self, text: &str) -> Vec<TokenEvent>;

    /// Group tokenized output into sentences.
    fn sentences(&self, text: &str) -> Vec<Sentence> {
        let mut sentences = Vec::new();
        let mut current = Vec::new();
        for event in self.tokenize(text) {
            current.push(event.token);
            if event.end_of_sentence {
                sentences.push(Sentence::new(std::mem::take(&mut current)));
            }
        }
        if !current.is_empty() {
            sentences.push(Sentence::new(current));
        }
        sentences
    }
}

/// Whitespace tokenizer that peels leading/trailing punctuation off each word
/// and marks `.`, `!` and `?` as sentence boundaries.
#[derive(Clone, Copy, Debug, Default)]
pub struct BasicTokenizer;

impl SentenceTokenizer for BasicTokenizer {
    fn tokenize(&self, text: &str) -> Vec<TokenEvent> {
        let mut events = Vec::new();

        for chunk in text.split_whitespace() {
            let core_start = chunk
                .char_indices()
                .find(|(_, c)| c.is_alphanumeric())
                .map(|(i, _)| i);

            let Some(start) = core_start else {
                // Pure punctuation chunk, one token per character.
                for c in chunk.chars() {
                    push_punctuation(&mut events, c);
                }
                continue;
            };

            let end = chunk
                .char_indices()
                .rev()
                .find(|(_, c)| c.is_alphanumeric())
                .map(|(i, c)| i + c.len_utf8())
                .unwrap_or(chunk.len());

            for c in chunk[..start].chars() {
                push_punctuation(&mut events, c);
            }
            events.push(TokenEvent {
                token: Token::word(&chunk[start..end]),
                end_of_sentence: false,
            });
            for c in chunk[end..].chars() {
                push_punctuation(&mut events, c);
            }
        }

        events
    }
}

fn push_punctuation(events: &mut Vec<TokenEvent>, c: char) {
    events.push(TokenEvent {
        token: Token::punctuation(c.to_string()),
        end_of_sentence: matches!(c, '.' | '!' | '?'),
    });
}
