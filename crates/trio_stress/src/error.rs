//! # Stress Error Types
//!
//! Configuration problems and verification failures.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while configuring or running a stress test.
#[derive(Error, Debug)]
pub enum StressError {
    /// The configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`StressConfig`].
    ///
    /// [`StressConfig`]: crate::StressConfig
    #[error("failed to parse config: {0}")]
    Config(#[from] toml::de::Error),

    /// The configuration parsed but cannot be run.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A worker thread could not be started.
    #[error("failed to spawn producer thread: {0}")]
    Spawn(#[source] std::io::Error),

    /// A worker thread panicked.
    #[error("{0} thread panicked")]
    ThreadPanicked(&'static str),

    /// The consumer saw a value older than one it had already seen.
    #[error("commit order violated: observed {observed} after {previous}")]
    OutOfOrder {
        /// Last value observed before the violation.
        previous: u64,
        /// Offending value.
        observed: u64,
    },

    /// The consumer saw a value the producer never committed.
    #[error("value {0} was never committed")]
    NeverCommitted(u64),

    /// The consumer never saw the final commit.
    #[error("final commit {expected} never observed, last seen {observed}")]
    FinalValueMissing {
        /// Last committed value.
        expected: u64,
        /// Last value the consumer observed.
        observed: u64,
    },

    /// A consumed string does not appear in the produced log, in order.
    #[error("consumed string #{index} does not appear in produced order")]
    Mismatch {
        /// Position in the consumed log.
        index: usize,
    },

    /// The last produced batch never reached the consumer.
    #[error("final batch never observed by the consumer")]
    FinalBatchMissing,
}

/// Result type for stress operations.
pub type StressResult<T> = Result<T, StressError>;
