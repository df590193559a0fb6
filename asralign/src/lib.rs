//! asralign: aligns noisy ASR token streams against clean reference transcripts.
//!
//! The library pairs every reference sentence with the span of ASR output that
//! best matches it, using windowed Smith-Waterman local alignment with fuzzy
//! token equality. Two orchestrators are provided:
//!
//! - [`cursor_aligner::CursorAligner`]: cursor-based, for ASR streams without
//!   timing metadata. A bounded search window slides over the stream as
//!   confident alignments are found.
//! - [`time_aligner::TimeAligner`]: timestamp-constrained, for ASR streams with
//!   per-token times and transcripts with declared utterance times.
//!
//! Both are pull-based iterators producing [`types::AlignedPair`] records.
//!
//! # Quick Start
//!
//! ```
//! use asralign::cursor_aligner::{AlignConfig, CursorAligner};
//! use asralign::tokenizer::{BasicTokenizer, SentenceTokenizer};
//! use asralign::types::Token;
//!
//! let asr: Vec<Token> = ["de", "kat", "zat", "op", "de", "mat"]
//!     .map(Token::word)
//!     .to_vec();
//! let sentences = BasicTokenizer.sentences("De kat zat op de mat.");
//!
//! let mut aligner = CursorAligner::new(&asr, sentences.into_iter(), AlignConfig::default());
//! while let Some(pair) = aligner.next() {
//!     let pair = pair.unwrap();
//!     println!("{} ||| {} ({:.2})", pair.transcript, pair.asr, pair.score);
//! }
//! ```

pub mod cursor_aligner;
pub mod error;
pub mod fuzzy;
pub mod smith_waterman;
pub mod time_aligner;
pub mod tokenizer;
pub mod types;
pub mod window;

pub use cursor_aligner::{AlignConfig, CursorAligner};
pub use error::{Error, Result};
pub use time_aligner::{TimeAlignConfig, TimeAligner};
pub use types::{AlignStats, AlignedPair, Sentence, Token, TokenKind};
