//! CLI-level error type and process exit codes.

use std::path::PathBuf;

/// Failure surfaced to the process exit code.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Reading or writing one of the command's file arguments failed.
    #[error("{path}: {source}")]
    Io {
        /// The path that could not be read or written.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// `diff` rejected the input buffers.
    #[error(transparent)]
    Diff(#[from] blockdiff::DiffError),
    /// `apply` could not reconstruct the target buffer from the delta.
    #[error(transparent)]
    Apply(#[from] blockdiff_apply::ApplyError),
}

impl CliError {
    /// Wraps an I/O error with the path that produced it.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Process exit code for this failure, distinguishing the three
    /// `blockdiff::DiffError` kinds from plain I/O and apply failures.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Io { .. } => 1,
            Self::Diff(blockdiff::DiffError::InvalidInput) => 2,
            Self::Diff(blockdiff::DiffError::OutOfMemory) => 3,
            Self::Diff(blockdiff::DiffError::SizeLimitExceeded) => 4,
            Self::Apply(_) => 5,
        }
    }
}
