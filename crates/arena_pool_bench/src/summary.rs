//! # Run Summary
//!
//! Reduces repeated runs to one median per (capacity, pattern, object size).

use std::collections::BTreeMap;

use crate::config::{ObjectSize, Pattern};
use crate::results::BenchResults;

/// Median timings of one benchmark combination.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroupSummary {
    /// Pool capacity.
    pub capacity: usize,
    /// Access pattern.
    pub pattern: Pattern,
    /// Slot payload size.
    pub object_size: ObjectSize,
    /// Number of runs folded into this group.
    pub runs: usize,
    /// Median pool latency per operation.
    pub median_pool_latency_ns: f64,
    /// Median `Box` latency per operation.
    pub median_boxed_latency_ns: f64,
}

impl GroupSummary {
    /// Speedup of the pool over `Box`, computed from the medians.
    ///
    /// `0.0` when the pool median is zero, matching
    /// [`BenchResults::pool_speedup_factor`].
    #[must_use]
    pub fn speedup(&self) -> f64 {
        if self.median_pool_latency_ns <= 0.0 {
            return 0.0;
        }
        self.median_boxed_latency_ns / self.median_pool_latency_ns
    }

    /// Short label such as `1024-B-S` (batch, small).
    #[must_use]
    pub fn label(&self) -> String {
        let pattern = match self.pattern {
            Pattern::Batch => 'B',
            Pattern::Rolling => 'R',
        };
        let size = match self.object_size {
            ObjectSize::Small => 'S',
            ObjectSize::Large => 'L',
        };
        format!("{}-{pattern}-{size}", self.capacity)
    }
}

/// Groups results by combination, ordered by capacity, then batch before
/// rolling, then small before large.
#[must_use]
pub fn summarize(results: &[BenchResults]) -> Vec<GroupSummary> {
    let mut groups: BTreeMap<(usize, Pattern, ObjectSize), (Vec<f64>, Vec<f64>)> = BTreeMap::new();
    for result in results {
        let key = (result.config.capacity, result.config.pattern, result.config.object_size);
        let (pool, boxed) = groups.entry(key).or_default();
        pool.push(result.pool_op_latency_ns());
        boxed.push(result.boxed_op_latency_ns());
    }

    groups
        .into_iter()
        .map(|((capacity, pattern, object_size), (mut pool, mut boxed))| GroupSummary {
            capacity,
            pattern,
            object_size,
            runs: pool.len(),
            median_pool_latency_ns: median(&mut pool),
            median_boxed_latency_ns: median(&mut boxed),
        })
        .collect()
}

/// Median of a non-empty sample; the mean of the two middle values for
/// even lengths.
fn median(values: &mut [f64]) -> f64 {
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}
