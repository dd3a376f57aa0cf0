//! # Pool Error Types
//!
//! Contract violations on slot release, plus the one construction failure.
//!
//! Running out of free slots is not listed here: `allocate` reports it with
//! `None`, because an exhausted pool is an expected state.

use thiserror::Error;

/// Errors reported by an [`ArenaPool`](crate::ArenaPool).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// Release of the null handle.
    #[error("attempted to deallocate null handle")]
    NullRelease,

    /// Release of a handle that did not originate from this pool.
    #[error("attempted to deallocate foreign handle (slot {index})")]
    ForeignPointer {
        /// Slot index carried by the rejected handle.
        index: usize,
    },

    /// Release of a slot that is already free, or of a stale handle whose
    /// slot has since been handed out again.
    #[error("attempted double deallocate (slot {index})")]
    DoubleRelease {
        /// Slot index carried by the rejected handle.
        index: usize,
    },

    /// Backing storage for the pool could not be reserved.
    #[error("out of memory: cannot reserve {bytes} bytes for {capacity} slots")]
    OutOfMemory {
        /// Requested slot count.
        capacity: usize,
        /// Approximate size of the failed reservation.
        bytes: usize,
    },
}

impl PoolError {
    /// True for misuse of the handle argument itself (null or foreign).
    #[must_use]
    pub const fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::NullRelease | Self::ForeignPointer { .. })
    }

    /// True for releases that contradict the pool's occupancy state.
    #[must_use]
    pub const fn is_logic_error(&self) -> bool {
        matches!(self, Self::DoubleRelease { .. })
    }
}

/// Result type for pool operations.
pub type PoolResult<T> = Result<T, PoolError>;
