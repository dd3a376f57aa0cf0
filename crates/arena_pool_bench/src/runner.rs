//! # Pattern Runners
//!
//! Drives an [`ArenaPool`] through the batch and rolling patterns and times
//! the identical sequence against `Box` allocation.

use std::hint::black_box;
use std::time::Instant;

use arena_pool::{ArenaPool, SlotHandle};

use crate::config::{BenchConfig, ObjectSize, Pattern};
use crate::error::{BenchError, BenchResult};
use crate::results::BenchResults;

/// Payload for [`ObjectSize::Small`].
pub type SmallObject = [i32; 4];
/// Payload for [`ObjectSize::Large`].
pub type LargeObject = [i32; 32];

/// A slot payload the runners can write to.
pub trait BenchObject: Default {
    /// Writes to the object so the allocation cannot be optimized away.
    fn touch(&mut self);
}

impl<const N: usize> BenchObject for [i32; N]
where
    [i32; N]: Default,
{
    #[inline]
    fn touch(&mut self) {
        if let Some(first) = self.first_mut() {
            *first = -1;
        }
    }
}

/// Runs one benchmark configuration.
///
/// # Errors
///
/// Returns [`BenchError::InvalidConfig`] for an unrunnable config, and
/// propagates any pool failure (which would indicate a pool bug).
pub fn run(config: &BenchConfig) -> BenchResult<BenchResults> {
    config.validate()?;
    tracing::debug!(
        capacity = config.capacity,
        pattern = %config.pattern,
        object_size = %config.object_size,
        op_count = config.op_count,
        "starting run"
    );

    match (config.pattern, config.object_size) {
        (Pattern::Batch, ObjectSize::Small) => run_batch::<SmallObject>(config),
        (Pattern::Batch, ObjectSize::Large) => run_batch::<LargeObject>(config),
        (Pattern::Rolling, ObjectSize::Small) => run_rolling::<SmallObject>(config),
        (Pattern::Rolling, ObjectSize::Large) => run_rolling::<LargeObject>(config),
    }
}

fn allocate_touched<T: BenchObject>(pool: &mut ArenaPool<T>) -> BenchResult<SlotHandle> {
    let handle = pool.allocate().ok_or(BenchError::Exhausted {
        capacity: pool.capacity(),
    })?;
    if let Some(object) = pool.get_mut(handle) {
        object.touch();
    }
    Ok(handle)
}

fn boxed_touched<T: BenchObject>() -> Box<T> {
    let mut object = Box::<T>::default();
    object.touch();
    black_box(object)
}

fn warmup_pool<T: BenchObject>(pool: &mut ArenaPool<T>, ops: u64) -> BenchResult<()> {
    let count = usize::try_from(ops).map_or(pool.capacity(), |ops| ops.min(pool.capacity()));
    let mut handles = Vec::with_capacity(count);
    for _ in 0..count {
        handles.push(allocate_touched(pool)?);
    }
    while let Some(handle) = handles.pop() {
        pool.try_deallocate(handle)?;
    }
    Ok(())
}

fn warmup_boxed<T: BenchObject>(ops: u64) {
    let mut boxes: Vec<Box<T>> = Vec::new();
    for _ in 0..ops {
        boxes.push(boxed_touched());
    }
    while let Some(object) = boxes.pop() {
        drop(object);
    }
}

/// Fill to capacity, free everything in reverse order, repeat until
/// `op_count` allocations were made.
fn run_batch<T: BenchObject>(config: &BenchConfig) -> BenchResult<BenchResults> {
    let capacity = config.capacity;
    let mut pool: ArenaPool<T> = ArenaPool::new(capacity)?;
    let mut handles = Vec::with_capacity(capacity);

    // time arena pool
    warmup_pool(&mut pool, config.warmup_ops)?;
    let mut op_count = 0;
    let start = Instant::now();
    while op_count < config.op_count {
        for _ in 0..capacity {
            handles.push(allocate_touched(&mut pool)?);
            op_count += 1;
            if op_count == config.op_count {
                break;
            }
        }
        while let Some(handle) = handles.pop() {
            pool.try_deallocate(handle)?;
        }
    }
    let pool_time = start.elapsed();

    // time Box
    let mut boxes: Vec<Box<T>> = Vec::with_capacity(capacity);
    warmup_boxed::<T>(config.warmup_ops);
    op_count = 0;
    let start = Instant::now();
    while op_count < config.op_count {
        for _ in 0..capacity {
            boxes.push(boxed_touched());
            op_count += 1;
            if op_count == config.op_count {
                break;
            }
        }
        while let Some(object) = boxes.pop() {
            drop(object);
        }
    }
    let boxed_time = start.elapsed();

    Ok(BenchResults::new(*config, pool_time, boxed_time))
}

/// Keep `capacity / 2` objects live; each step allocates one and frees the
/// oldest.
fn run_rolling<T: BenchObject>(config: &BenchConfig) -> BenchResult<BenchResults> {
    let working_set = config.capacity / 2;
    let mut pool: ArenaPool<T> = ArenaPool::new(config.capacity)?;

    // time arena pool
    warmup_pool(&mut pool, config.warmup_ops)?;
    let mut live = Vec::with_capacity(working_set);
    for _ in 0..working_set {
        live.push(allocate_touched(&mut pool)?);
    }
    let mut cursor = 0;
    let start = Instant::now();
    for _ in 0..config.op_count {
        let handle = allocate_touched(&mut pool)?;
        pool.try_deallocate(live[cursor])?;
        live[cursor] = handle;
        cursor = (cursor + 1) % working_set;
    }
    let pool_time = start.elapsed();
    for handle in live.drain(..) {
        pool.try_deallocate(handle)?;
    }

    // time Box
    warmup_boxed::<T>(config.warmup_ops);
    let mut live: Vec<Box<T>> = (0..working_set).map(|_| boxed_touched()).collect();
    cursor = 0;
    let start = Instant::now();
    for _ in 0..config.op_count {
        let object = boxed_touched();
        drop(std::mem::replace(&mut live[cursor], object));
        cursor = (cursor + 1) % working_set;
    }
    let boxed_time = start.elapsed();
    drop(live);

    Ok(BenchResults::new(*config, pool_time, boxed_time))
}
