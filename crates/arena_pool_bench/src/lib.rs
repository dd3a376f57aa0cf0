//! # Arena Pool Benchmarks
//!
//! Measures [`arena_pool::ArenaPool`] against plain `Box` allocation.
//!
//! ## Patterns
//!
//! - **batch** - allocate up to capacity, free everything, repeat
//! - **rolling** - keep half the pool live, allocate one and free the oldest
//!
//! Each run reports elapsed time for both sides, per-operation latency and
//! the pool's speedup factor. Results are appended to a CSV file and
//! repeated runs are reduced to medians.
//!
//! ## Example
//!
//! ```rust,no_run
//! use arena_pool_bench::{run, BenchConfig, ObjectSize, Pattern};
//!
//! let config = BenchConfig::new(10_000_000, 65_536, Pattern::Rolling, ObjectSize::Small);
//! let results = run(&config)?;
//! println!("speedup = {:.2}x", results.pool_speedup_factor());
//! # Ok::<(), arena_pool_bench::BenchError>(())
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod cli;
pub mod config;
pub mod error;
pub mod results;
pub mod runner;
pub mod summary;

pub use cli::CliArgs;
pub use config::{BenchConfig, ObjectSize, Pattern, SuiteConfig};
pub use error::{BenchError, BenchResult};
pub use results::{BenchResults, ResultsWriter, CSV_HEADER};
pub use runner::run;
pub use summary::{summarize, GroupSummary};
