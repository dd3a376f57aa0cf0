//! # Benchmark Configuration
//!
//! A single run is described by [`BenchConfig`]. A whole suite (every
//! capacity × pattern × object size, repeated) is described by
//! [`SuiteConfig`], loaded once at startup from TOML:
//!
//! ```toml
//! op_count = 100000000
//! repetitions = 5
//! capacities = [1024, 8192, 65536, 262144]
//! patterns = ["batch", "rolling"]
//! object_sizes = ["small", "large"]
//! output = "results/results.csv"
//! ```
//!
//! Every key is optional.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{BenchError, BenchResult};

/// Default number of allocations per run.
pub const DEFAULT_OP_COUNT: u64 = 100_000_000;

/// Default number of warm-up allocations before timing starts.
pub const DEFAULT_WARMUP_OPS: u64 = 1_000_000;

/// `op_count` used by `--quick`.
pub const QUICK_OP_COUNT: u64 = 1_000_000;

/// Allocation pattern driven through the pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pattern {
    /// Fill to capacity, free everything, repeat.
    Batch,
    /// Keep `capacity / 2` slots live; allocate one and free the oldest per step.
    Rolling,
}

impl Pattern {
    /// Lower-case name used in results files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Batch => "batch",
            Self::Rolling => "rolling",
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Object size profile stored in each slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectSize {
    /// `[i32; 4]` (16 bytes).
    Small,
    /// `[i32; 32]` (128 bytes).
    Large,
}

impl ObjectSize {
    /// Lower-case name used in results files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Large => "large",
        }
    }
}

impl fmt::Display for ObjectSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration of one benchmark run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BenchConfig {
    /// Allocations performed by each side (pool and `Box`).
    pub op_count: u64,
    /// Pool capacity.
    pub capacity: usize,
    /// Access pattern.
    pub pattern: Pattern,
    /// Slot payload size.
    pub object_size: ObjectSize,
    /// Warm-up allocations before timing (the pool side is capped at capacity).
    pub warmup_ops: u64,
}

impl BenchConfig {
    /// Creates a run config with the default warm-up.
    #[must_use]
    pub const fn new(op_count: u64, capacity: usize, pattern: Pattern, object_size: ObjectSize) -> Self {
        Self {
            op_count,
            capacity,
            pattern,
            object_size,
            warmup_ops: DEFAULT_WARMUP_OPS,
        }
    }

    /// Checks that the run can make progress.
    ///
    /// # Errors
    ///
    /// Returns [`BenchError::InvalidConfig`] for a zero `op_count`, a zero
    /// batch capacity, or a rolling capacity below 2.
    pub fn validate(&self) -> BenchResult<()> {
        if self.op_count == 0 {
            return Err(BenchError::InvalidConfig("op_count must be positive".into()));
        }
        match self.pattern {
            Pattern::Batch if self.capacity == 0 => Err(BenchError::InvalidConfig(
                "batch pattern needs a capacity of at least 1".into(),
            )),
            Pattern::Rolling if self.capacity < 2 => Err(BenchError::InvalidConfig(format!(
                "rolling pattern needs a capacity of at least 2, got {}",
                self.capacity
            ))),
            _ => Ok(()),
        }
    }
}

/// Configuration of a full benchmark suite.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SuiteConfig {
    /// Allocations per run.
    pub op_count: u64,
    /// Warm-up allocations per run.
    pub warmup_ops: u64,
    /// Runs per combination.
    pub repetitions: u32,
    /// Pool capacities to sweep.
    pub capacities: Vec<usize>,
    /// Patterns to sweep.
    pub patterns: Vec<Pattern>,
    /// Object sizes to sweep.
    pub object_sizes: Vec<ObjectSize>,
    /// CSV file results are appended to.
    pub output: PathBuf,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            op_count: DEFAULT_OP_COUNT,
            warmup_ops: DEFAULT_WARMUP_OPS,
            repetitions: 5,
            capacities: vec![1_024, 8_192, 65_536, 262_144],
            patterns: vec![Pattern::Batch, Pattern::Rolling],
            object_sizes: vec![ObjectSize::Small, ObjectSize::Large],
            output: PathBuf::from("results/results.csv"),
        }
    }
}

impl SuiteConfig {
    /// Parses and validates a suite from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`BenchError::Config`] on malformed TOML and
    /// [`BenchError::InvalidConfig`] if validation fails.
    pub fn from_toml_str(text: &str) -> BenchResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a suite from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`BenchError::Io`] if the file cannot be read, otherwise as
    /// [`SuiteConfig::from_toml_str`].
    pub fn from_toml_file(path: impl AsRef<Path>) -> BenchResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| BenchError::io(path, e))?;
        let config = Self::from_toml_str(&text)?;
        tracing::info!(path = %path.display(), runs = config.total_runs(), "loaded suite config");
        Ok(config)
    }

    /// Shrinks the suite to a smoke run: fewer operations, one repetition.
    #[must_use]
    pub fn quick(mut self) -> Self {
        self.op_count = self.op_count.min(QUICK_OP_COUNT);
        self.warmup_ops = self.warmup_ops.min(QUICK_OP_COUNT);
        self.repetitions = 1;
        self
    }

    /// Checks every run in the suite.
    ///
    /// # Errors
    ///
    /// Returns [`BenchError::InvalidConfig`] for an empty sweep, zero
    /// repetitions, or any run rejected by [`BenchConfig::validate`].
    pub fn validate(&self) -> BenchResult<()> {
        if self.repetitions == 0 {
            return Err(BenchError::InvalidConfig("repetitions must be positive".into()));
        }
        if self.capacities.is_empty() || self.patterns.is_empty() || self.object_sizes.is_empty() {
            return Err(BenchError::InvalidConfig(
                "capacities, patterns and object_sizes must not be empty".into(),
            ));
        }
        self.combinations().try_for_each(|config| config.validate())
    }

    /// Total number of runs, repetitions included.
    #[must_use]
    pub fn total_runs(&self) -> usize {
        self.capacities.len() * self.patterns.len() * self.object_sizes.len() * self.repetitions as usize
    }

    /// Every run of the suite in execution order: capacity, then pattern,
    /// then object size, each repeated `repetitions` times back to back.
    pub fn runs(&self) -> impl Iterator<Item = BenchConfig> + '_ {
        self.combinations()
            .flat_map(move |config| std::iter::repeat(config).take(self.repetitions as usize))
    }

    fn combinations(&self) -> impl Iterator<Item = BenchConfig> + '_ {
        self.capacities.iter().flat_map(move |&capacity| {
            self.patterns.iter().flat_map(move |&pattern| {
                self.object_sizes.iter().map(move |&object_size| BenchConfig {
                    op_count: self.op_count,
                    capacity,
                    pattern,
                    object_size,
                    warmup_ops: self.warmup_ops,
                })
            })
        })
    }
}
