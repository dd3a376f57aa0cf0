//! # Benchmark Error Types

use std::path::PathBuf;

use arena_pool::PoolError;
use thiserror::Error;

/// Errors that can occur while configuring or running benchmarks.
#[derive(Error, Debug)]
pub enum BenchError {
    /// Reading the config or writing the results file failed.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// The file being read or written.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The TOML config file could not be parsed.
    #[error("invalid config file: {0}")]
    Config(#[from] toml::de::Error),

    /// The configuration parsed but describes an impossible run.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The pool rejected an operation.
    #[error(transparent)]
    Pool(#[from] PoolError),

    /// The pool ran dry in the middle of a pattern.
    #[error("pool of capacity {capacity} ran out of slots mid-run")]
    Exhausted {
        /// Capacity of the exhausted pool.
        capacity: usize,
    },
}

impl BenchError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for benchmark operations.
pub type BenchResult<T> = Result<T, BenchError>;
