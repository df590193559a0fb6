//! Timealign subcommand - timestamp-constrained alignment.

use crate::docs::{SpeechDoc, UtteranceDoc};
use crate::output;
use asralign::smith_waterman::ScoreParams;
use asralign::time_aligner::{TimeAlignConfig, TimeAligner};
use eyre::{Result, WrapErr, ensure};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

/// CLI arguments for timestamp-constrained alignment.
#[derive(clap::Args, Debug)]
pub struct Args {
    /// Speech document (JSON word stream with per-token times)
    #[arg(short, long)]
    pub speech: PathBuf,

    /// Transcript document (JSON utterances with declared times)
    #[arg(short, long)]
    pub transcript: PathBuf,

    /// Alignment score threshold
    #[arg(short = 'S', long, default_value_t = 0.5)]
    pub score: f64,

    /// Maximum edit distance for fuzzy word matching
    #[arg(short = 'D', long, default_value_t = 2)]
    pub distance: usize,

    /// Output path (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Resolved configuration for timestamp-constrained alignment.
#[derive(Debug)]
pub struct Config {
    pub speech: PathBuf,
    pub transcript: PathBuf,
    pub output: Option<PathBuf>,
    pub align: TimeAlignConfig,
}

impl TryFrom<Args> for Config {
    type Error = eyre::Error;

    fn try_from(args: Args) -> Result<Self> {
        ensure!(
            (0.0..=1.0).contains(&args.score),
            "invalid score threshold: {} (expected 0.0..=1.0)",
            args.score
        );

        Ok(Self {
            speech: args.speech,
            transcript: args.transcript,
            output: args.output,
            align: TimeAlignConfig {
                score_threshold: args.score,
                params: ScoreParams {
                    fuzzy_threshold: args.distance,
                    ..ScoreParams::length_scaled()
                },
            },
        })
    }
}

pub fn execute(config: Config) -> Result<()> {
    let speech = SpeechDoc::load(&config.speech)?;
    let tokens = speech.tokens();

    let transcript = UtteranceDoc::load(&config.transcript)?;
    let sentences = transcript.sentences();

    tracing::info!(
        asr_words = tokens.len(),
        utterances = sentences.len(),
        "aligning document by timestamps"
    );

    let mut aligner = TimeAligner::new(&tokens, sentences.into_iter(), config.align);

    let written = match &config.output {
        Some(path) => {
            let file = File::create(path)
                .wrap_err_with(|| format!("failed to create output: {:?}", path.display()))?;
            output::write_all(aligner.by_ref().map(Ok), BufWriter::new(file))?
        }
        None => output::write_all(aligner.by_ref().map(Ok), std::io::stdout().lock())?,
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
