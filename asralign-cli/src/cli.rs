//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use eyre::Result;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "asralign")]
#[command(about = "Align ASR output against reference transcripts into sentence pairs")]
#[command(version)]
pub struct Cli {
    /// Enable verbose diagnostic tracing on stderr
    #[arg(short, long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Align using the sliding search window (no timing metadata required)
    Align(crate::align::Args),

    /// Align using per-token timestamps and declared utterance times
    Timealign(crate::timealign::Args),

    /// Merge alignment JSON files into a parallel spoken/written corpus
    Corpus(crate::corpus::Args),
}

/// Log filter for the run. An explicit `RUST_LOG` always wins; `--debug`
/// only raises the default when the environment is silent.
pub fn log_filter(debug: bool) -> EnvFilter {
    if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::from_default_env()
    }
}

/// Execute CLI command - separated for testing.
pub fn run_cli(cli: Cli) -> Result<()> {
    tracing::debug!(?cli, "parsed arguments");

    match cli.command {
        Commands::Align(args) => crate::align::execute(args.try_into()?),
        Commands::Timealign(args) => crate::timealign::execute(args.try_into()?),
        Commands::Corpus(args) => crate::corpus::execute(args.try_into()?),
    }
}
