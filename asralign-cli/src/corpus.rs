//! Corpus subcommand - merge alignment output into a parallel text corpus.
//!
//! Reads every alignment JSON file in a directory and writes two line-aligned
//! text files: `<prefix>.spoken.txt` (ASR side) and `<prefix>.written.txt`
//! (transcript side), one sentence per line.

use asralign::types::AlignedPair;
use eyre::{Result, WrapErr};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// CLI arguments for corpus building.
#[derive(clap::Args, Debug)]
pub struct Args {
    /// Directory containing alignment JSON files
    #[arg(short, long, default_value = ".")]
    pub inputdir: PathBuf,

    /// Output prefix for the parallel text files
    #[arg(short, long, default_value = "corpus")]
    pub outputprefix: String,
}

/// Resolved configuration for corpus building.
#[derive(Debug)]
pub struct Config {
    pub inputdir: PathBuf,
    pub outputprefix: String,
}

impl TryFrom<Args> for Config {
    type Error = eyre::Error;

    fn try_from(args: Args) -> Result<Self> {
        Ok(Self {
            inputdir: args.inputdir,
            outputprefix: args.outputprefix,
        })
    }
}

/// On-disk shape of one alignment run's output.
#[derive(Debug, Deserialize)]
struct AlignmentDoc {
    sentence_pairs: Vec<AlignedPair>,
}

pub fn execute(config: Config) -> Result<()> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(&config.inputdir)
        .wrap_err_with(|| format!("failed to read directory: {:?}", config.inputdir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();

    let mut spoken = create_output(&format!("{}.spoken.txt", config.outputprefix))?;
    let mut written = create_output(&format!("{}.written.txt", config.outputprefix))?;

    let mut pair_count = 0;
    for path in &files {
        tracing::info!(file = ?path.display(), "merging alignment file");

        let data = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read: {:?}", path.display()))?;
        let doc: AlignmentDoc = serde_json::from_str(&data)
            .wrap_err_with(|| format!("failed to parse alignment file: {:?}", path.display()))?;

        for pair in &doc.sentence_pairs {
            writeln!(spoken, "{}", pair.asr)?;
            writeln!(written, "{}", pair.transcript)?;
            pair_count += 1;
        }
    }

    spoken.flush()?;
    written.flush()?;

    tracing::info!(
        files = files.len(),
        pairs = pair_count,
        "parallel corpus written"
    );

    Ok(())
}

fn create_output(path: &str) -> Result<BufWriter<File>> {
    let file =
        File::create(path).wrap_err_with(|| format!("failed to create output: {path:?}"))?;
    Ok(BufWriter::new(file))
}
