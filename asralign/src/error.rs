//! Error types for asralign organized by processing stage.

use thiserror::Error;

/// Alignment pipeline error variants organized by processing stage.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration stage error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Alignment bookkeeping error
    #[error(transparent)]
    Align(#[from] AlignError),
}

/// Configuration errors (thresholds, window sizing).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Score threshold outside the normalized range
    #[error("invalid score threshold: {0} (expected 0.0..=1.0)")]
    InvalidScoreThreshold(f64),

    /// Zero-sized search window
    #[error("invalid window size: {0} (must be > 0)")]
    InvalidWindowSize(usize),
}

/// Alignment bookkeeping errors.
///
/// These indicate a cursor/offset arithmetic defect in the aligner itself,
/// never bad input; a run must stop rather than silently miscount.
#[derive(Debug, Error)]
pub enum AlignError {
    /// Recomputed absolute match start does not index the expected token
    #[error(
        "cursor desync at stream index {index}: expected first matched token {expected:?}, found {found:?}"
    )]
    CursorDesync {
        index: usize,
        expected: String,
        found: Option<String>,
    },
}

/// Result type alias for asralign operations.
pub type Result<T> = std::result::Result<T, Error>;
