//! Align subcommand - windowed cursor-based alignment without timestamps.

use crate::docs::{SpeechDoc, TranscriptDoc};
use crate::output;
use asralign::cursor_aligner::{AlignConfig, CursorAligner};
use asralign::smith_waterman::ScoreParams;
use asralign::tokenizer::{BasicTokenizer, SentenceTokenizer};
use asralign::types::Sentence;
use asralign::window::{DEFAULT_WINDOW_SIZE, WindowConfig};
use eyre::{Result, WrapErr};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

/// CLI arguments for cursor-based alignment.
#[derive(clap::Args, Debug)]
pub struct Args {
    /// Speech document (JSON word stream from the recognizer)
    #[arg(short, long)]
    pub speech: PathBuf,

    /// Transcript document (JSON paragraphs)
    #[arg(short, long)]
    pub transcript: PathBuf,

    /// Alignment score threshold
    #[arg(short = 'S', long, default_value_t = 0.8)]
    pub score: f64,

    /// Maximum edit distance for fuzzy word matching
    #[arg(short = 'D', long, default_value_t = 2)]
    pub distance: usize,

    /// Search window size in tokens
    #[arg(short, long, default_value_t = DEFAULT_WINDOW_SIZE)]
    pub window: usize,

    /// Output path (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Resolved configuration for cursor-based alignment.
#[derive(Debug)]
pub struct Config {
    pub speech: PathBuf,
    pub transcript: PathBuf,
    pub output: Option<PathBuf>,
    pub align: AlignConfig,
}

impl TryFrom<Args> for Config {
    type Error = eyre::Error;

    fn try_from(args: Args) -> Result<Self> {
        let align = AlignConfig {
            score_threshold: args.score,
            window: WindowConfig {
                size: args.window,
                ..WindowConfig::default()
            },
            params: ScoreParams {
                fuzzy_threshold: args.distance,
                ..ScoreParams::default()
            },
            ..AlignConfig::default()
        };
        align.validate()?;

        Ok(Self {
            speech: args.speech,
            transcript: args.transcript,
            output: args.output,
            align,
        })
    }
}

pub fn execute(config: Config) -> Result<()> {
    let speech = SpeechDoc::load(&config.speech)?;
    let tokens = speech.tokens();

    let transcript = TranscriptDoc::load(&config.transcript)?;
    let sentences: Vec<Sentence> = transcript
        .paragraphs
        .iter()
        .flat_map(|paragraph| BasicTokenizer.sentences(paragraph))
        .collect();

    tracing::info!(
        asr_words = tokens.len(),
        sentences = sentences.len(),
        "aligning document"
    );

    let mut aligner = CursorAligner::new(&tokens, sentences.into_iter(), config.align);

    let written = match &config.output {
        Some(path) => {
            let file = File::create(path)
                .wrap_err_with(|| format!("failed to create output: {:?}", path.display()))?;
            output::write_all(aligner.by_ref(), BufWriter::new(file))?
        }
        None => output::write_all(aligner.by_ref(), std::io::stdout().lock())?,
    };

    let stats = aligner.stats();
    tracing::info!(
        pairs = written,
        loss_pct = format!("{:.2}", stats.loss_rate() * 100.0),
        mean_score = format!("{:.2}", stats.mean_score()),
        "alignment finished"
    );

    Ok(())
}
