//! # Arena Pool
//!
//! Fixed-capacity, single-type object pool designed for:
//! - O(1) allocate and release
//! - Zero heap traffic after construction
//! - Loud failure on misuse (null, foreign and double releases)
//!
//! ## Architecture Rules
//!
//! 1. **All memory is reserved at construction** - the pool never grows
//! 2. **Index-based free list** - handles are tokens, not raw addresses
//! 3. **Every release is validated** - occupancy flags plus generation tags
//!
//! ## Example
//!
//! ```rust
//! use arena_pool::{ArenaPool, PoolError};
//!
//! let mut pool: ArenaPool<u64> = ArenaPool::new(2)?;
//! let a = pool.allocate_with(1).unwrap();
//! let b = pool.allocate_with(2).unwrap();
//! assert!(pool.allocate().is_none()); // exhausted, not an error
//!
//! pool.try_deallocate(a)?;
//! assert_eq!(pool.try_deallocate(a), Err(PoolError::DoubleRelease { index: a.index() }));
//! pool.deallocate(b);
//! # Ok::<(), PoolError>(())
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod error;
pub mod pool;

pub use error::{PoolError, PoolResult};
pub use pool::{ArenaPool, SlotHandle};
