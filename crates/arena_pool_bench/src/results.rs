//! # Benchmark Results
//!
//! Timings of one run plus the CSV file they are appended to.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::BenchConfig;
use crate::error::{BenchError, BenchResult};

/// Header row of the results file.
pub const CSV_HEADER: &str = "operations,capacity,pattern,object_size_profile,\
elapsed_pool_time_ns,elapsed_boxed_time_ns,pool_op_latency_ns,boxed_op_latency_ns,\
pool_speedup_factor";

/// Timings of one benchmark run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BenchResults {
    /// The configuration that produced these timings.
    pub config: BenchConfig,
    /// Elapsed time for the pool side.
    pub pool_time: Duration,
    /// Elapsed time for the `Box` side.
    pub boxed_time: Duration,
}

impl BenchResults {
    /// Bundles the timings of a run.
    #[must_use]
    pub const fn new(config: BenchConfig, pool_time: Duration, boxed_time: Duration) -> Self {
        Self {
            config,
            pool_time,
            boxed_time,
        }
    }

    /// Operations timed per side: one allocation plus one release per op.
    #[allow(clippy::cast_precision_loss)]
    fn timed_ops(&self) -> f64 {
        (self.config.op_count * 2) as f64
    }

    /// Mean nanoseconds per pool allocate or release.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn pool_op_latency_ns(&self) -> f64 {
        self.pool_time.as_nanos() as f64 / self.timed_ops()
    }

    /// Mean nanoseconds per `Box` allocation or drop.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn boxed_op_latency_ns(&self) -> f64 {
        self.boxed_time.as_nanos() as f64 / self.timed_ops()
    }

    /// How many times faster the pool was than `Box`.
    ///
    /// Reported as `0.0` when the pool side measured no time at all (a tiny
    /// `op_count` on a coarse clock), so the CSV never carries `inf`/`NaN`.
    #[must_use]
    pub fn pool_speedup_factor(&self) -> f64 {
        if self.pool_time.is_zero() {
            return 0.0;
        }
        self.boxed_time.as_secs_f64() / self.pool_time.as_secs_f64()
    }

    /// Formats the run as one CSV row (no trailing newline).
    #[must_use]
    pub fn to_csv_row(&self) -> String {
        format!(
            "{},{},{},{},{},{},{:.2},{:.2},{:.2}",
            self.config.op_count,
            self.config.capacity,
            self.config.pattern,
            self.config.object_size,
            self.pool_time.as_nanos(),
            self.boxed_time.as_nanos(),
            self.pool_op_latency_ns(),
            self.boxed_op_latency_ns(),
            self.pool_speedup_factor(),
        )
    }
}

/// Appends [`BenchResults`] rows to a CSV file.
///
/// The header is written only when the file is new or empty, so repeated
/// suite runs accumulate in one file.
pub struct ResultsWriter {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl ResultsWriter {
    /// Opens `path` for appending, creating it (and its parent directories)
    /// if needed.
    ///
    /// # Errors
    ///
    /// Returns [`BenchError::Io`] if the file cannot be opened or written.
    pub fn open(path: impl AsRef<Path>) -> BenchResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| BenchError::io(parent, e))?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| BenchError::io(&path, e))?;
        let is_new = file.metadata().map_err(|e| BenchError::io(&path, e))?.len() == 0;

        let mut writer = Self {
            path,
            writer: BufWriter::new(file),
        };
        if is_new {
            writer.write_line(CSV_HEADER)?;
        }
        tracing::debug!(path = %writer.path.display(), is_new, "opened results file");
        Ok(writer)
    }

    /// Appends one row and flushes it to disk.
    ///
    /// # Errors
    ///
    /// Returns [`BenchError::Io`] if the write fails.
    pub fn append(&mut self, results: &BenchResults) -> BenchResult<()> {
        self.write_line(&results.to_csv_row())
    }

    /// Path of the results file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_line(&mut self, line: &str) -> BenchResult<()> {
        writeln!(self.writer, "{line}")
            .and_then(|()| self.writer.flush())
            .map_err(|e| BenchError::io(&self.path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ObjectSize, Pattern};

    fn sample() -> BenchResults {
        BenchResults::new(
            BenchConfig::new(1_000, 64, Pattern::Rolling, ObjectSize::Large),
            Duration::from_nanos(10_000),
            Duration::from_nanos(25_000),
        )
    }

    #[test]
    fn test_latency_and_speedup() {
        let results = sample();
        assert!((results.pool_op_latency_ns() - 5.0).abs() < f64::EPSILON);
        assert!((results.boxed_op_latency_ns() - 12.5).abs() < f64::EPSILON);
        assert!((results.pool_speedup_factor() - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_speedup_with_unmeasured_pool_time() {
        let config = BenchConfig::new(1, 8, Pattern::Batch, ObjectSize::Small);

        let results = BenchResults::new(config, Duration::ZERO, Duration::from_nanos(40));
        assert!(results.pool_speedup_factor().abs() < f64::EPSILON);
        assert!(results.to_csv_row().ends_with(",0.00,20.00,0.00"));

        let results = BenchResults::new(config, Duration::ZERO, Duration::ZERO);
        assert!(results.pool_speedup_factor().is_finite());
        assert_eq!(results.to_csv_row(), "1,8,batch,small,0,0,0.00,0.00,0.00");
    }

    #[test]
    fn test_csv_row() {
        assert_eq!(
            sample().to_csv_row(),
            "1000,64,rolling,large,10000,25000,5.00,12.50,2.50"
        );
        assert_eq!(CSV_HEADER.split(',').count(), 9);
    }
}
