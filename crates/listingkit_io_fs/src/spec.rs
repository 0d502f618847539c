//! Output options and top-level error types.

use std::path::PathBuf;

use thiserror::Error;

/// Options for deriving and claiming an output path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecOutputOptions {
    /// Suffix appended to the input stem when no output path is given.
    pub suffix_processed: String,
    /// Highest numeric suffix tried when the preferred path is locked.
    pub n_attempts_max: usize,
}

impl Default for SpecOutputOptions {
    fn default() -> Self {
        Self {
            suffix_processed: "_processed".to_string(),
            n_attempts_max: 99,
        }
    }
}

/// Output-stage failures.
#[derive(Debug, Error)]
pub enum OutputPathError {
    /// Preferred path and every numbered alternative are held by another process.
    #[error(
        "Cannot write output file {}: close the program holding it and retry ({n_attempts} paths tried)",
        path.display()
    )]
    OutputLocked {
        /// Preferred output path.
        path: PathBuf,
        /// Number of candidate paths tried.
        n_attempts: usize,
    },
    /// Moving the finished temporary file onto the output path failed.
    #[error("Failed to move {} to {}: {source}", path_src.display(), path_dst.display())]
    PersistFailed {
        /// Temporary file.
        path_src: PathBuf,
        /// Output path.
        path_dst: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
}
