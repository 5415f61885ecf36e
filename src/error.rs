//! Error types for parsum
//!
//! Every failure of a run is fatal: the library returns a `ReduceError` and the
//! CLI turns it into a diagnostic plus a non-zero exit code.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while configuring, processing or verifying a run
#[derive(Error, Debug)]
pub enum ReduceError {
    /// Bad worker count, missing working directory, invalid config values
    #[error("Invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    /// Leading integer of a task file is not a known operation
    #[error("Invalid operation code {code} in file {task}")]
    InvalidOperationCode { code: String, task: String },

    /// A file could not be opened for reading or writing
    #[error("Cannot access file '{}': {source}", .path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File content is not an operation code followed by numbers
    #[error("Malformed input in {task}: {reason}")]
    MalformedInput { task: String, reason: String },

    /// Reported total disagrees with the sequentially recomputed one
    #[error(
        "Verification failed: reported total {reported} differs from expected {expected} (epsilon {epsilon})"
    )]
    VerificationMismatch {
        reported: f64,
        expected: f64,
        epsilon: f64,
    },

    /// A worker thread panicked before returning
    #[error("Worker thread panicked during processing")]
    WorkerPanicked,
}

impl ReduceError {
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        ReduceError::InvalidConfiguration {
            reason: reason.into(),
        }
    }

    pub fn file_access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ReduceError::FileAccess {
            path: path.into(),
            source,
        }
    }

    pub fn malformed(task: impl Into<String>, reason: impl Into<String>) -> Self {
        ReduceError::MalformedInput {
            task: task.into(),
            reason: reason.into(),
        }
    }

    /// Process exit code for this error
    ///
    /// Verification mismatches get their own code since they point at a defect
    /// in the pipeline rather than at bad input.
    pub fn exit_code(&self) -> i32 {
        match self {
            ReduceError::VerificationMismatch { .. } => 3,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, ReduceError>;
