//! Error taxonomy for benchsweep.

use std::path::PathBuf;

/// Errors produced while orchestrating a benchmark sweep.
#[derive(Debug, thiserror::Error)]
pub enum SweepError {
    /// The problem id does not carry the expected run-number suffix.
    #[error("invalid problem id {id:?}: {reason}")]
    InvalidProblemId { id: String, reason: String },

    /// A command was configured with an empty argv.
    #[error("empty command")]
    EmptyCommand,

    /// The benchmark process exited non-zero. Fatal to the whole run.
    #[error("benchmark run failed with exit code {exit_code}")]
    BenchmarkFailed { exit_code: i32 },

    /// The expected report directory does not exist after the benchmark run.
    #[error("report directory not found: {0}")]
    ReportDirMissing(PathBuf),

    /// A subprocess exceeded its configured timeout.
    #[error("command {command:?} timed out after {timeout_secs} seconds")]
    Timeout {
        command: String,
        timeout_secs: u64,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for benchsweep operations.
pub type Result<T> = std::result::Result<T, SweepError>;
