//! # Pool Allocator
//!
//! Fixed-capacity slot allocator for objects of a single type.

use std::fmt;
use std::mem::size_of;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{PoolError, PoolResult};

/// Source of pool identities. Zero is reserved for [`SlotHandle::NULL`].
static NEXT_POOL_ID: AtomicU64 = AtomicU64::new(1);

/// Handle to an allocated slot in an [`ArenaPool`].
///
/// A handle is a plain token: it does not borrow the pool and does not free
/// anything when dropped. It records which pool issued it and the slot's
/// generation at the time, so the pool can reject handles that are null,
/// foreign, already released, or stale.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SlotHandle {
    /// Identity of the issuing pool.
    pool_id: u64,
    /// Index into the pool.
    index: usize,
    /// Generation of the slot when this handle was issued.
    generation: u64,
}

impl SlotHandle {
    /// The null handle. Never issued by any pool.
    pub const NULL: Self = Self {
        pool_id: 0,
        index: usize::MAX,
        generation: 0,
    };

    /// Returns true for [`SlotHandle::NULL`].
    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.pool_id == 0
    }

    /// Slot index within the issuing pool.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.index
    }

    /// Generation the slot had when this handle was issued.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u64 {
        self.generation
    }
}

impl Default for SlotHandle {
    fn default() -> Self {
        Self::NULL
    }
}

/// A pool allocator for fixed-size objects.
///
/// All storage is reserved up front for exactly `capacity` objects and never
/// grows, shrinks or moves afterwards. Allocation and release are **O(1)**
/// stack operations on a list of free slot indices.
///
/// Slots are initialized once, at construction. A reused slot still holds
/// whatever its previous owner left there; use [`ArenaPool::allocate_with`]
/// to overwrite it on allocation.
///
/// # Thread Safety
///
/// This pool is NOT thread-safe for mutation. Every mutating call takes
/// `&mut self`; use one pool per thread or wrap it in a mutex.
///
/// # Example
///
/// ```rust
/// use arena_pool::ArenaPool;
///
/// let mut pool: ArenaPool<[i32; 4]> = ArenaPool::new(1024)?;
///
/// // Allocate - O(1), no heap allocation
/// let handle = pool.allocate().expect("pool has free slots");
/// if let Some(slot) = pool.get_mut(handle) {
///     slot[0] = 7;
/// }
///
/// // Free - O(1), no heap deallocation
/// pool.try_deallocate(handle)?;
/// assert!(pool.full());
/// # Ok::<(), arena_pool::PoolError>(())
/// ```
pub struct ArenaPool<T> {
    /// The storage array.
    storage: Box<[T]>,
    /// Free list - indices of available slots.
    free_list: Vec<usize>,
    /// Occupancy flag per slot.
    occupied: Box<[bool]>,
    /// Generation per slot, bumped on every release. Wrapping back to a
    /// value an old handle carries takes 2^64 releases of one slot.
    generations: Box<[u64]>,
    /// Total capacity.
    capacity: usize,
    /// Identity stamped into every issued handle.
    pool_id: u64,
}

impl<T: Default> ArenaPool<T> {
    /// Creates a new pool with the specified capacity.
    ///
    /// Every slot is default-initialized and all memory is reserved upfront.
    /// A capacity of zero is allowed; such a pool never hands out a slot.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::OutOfMemory`] if the storage cannot be reserved.
    pub fn new(capacity: usize) -> PoolResult<Self> {
        Self::from_fn(capacity, |_| T::default())
    }
}

impl<T> ArenaPool<T> {
    /// Creates a new pool, initializing slot `i` with `init(i)`.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::OutOfMemory`] if the storage cannot be reserved.
    pub fn from_fn<F>(capacity: usize, init: F) -> PoolResult<Self>
    where
        F: FnMut(usize) -> T,
    {
        let bytes = capacity.saturating_mul(slot_footprint::<T>());

        // Pre-allocate storage
        let mut storage = reserve_exact::<T>(capacity, bytes)?;
        storage.extend((0..capacity).map(init));

        // Pre-allocate free list with all indices, lowest index on top
        let mut free_list = reserve_exact::<usize>(capacity, bytes)?;
        free_list.extend((0..capacity).rev());

        let mut occupied = reserve_exact::<bool>(capacity, bytes)?;
        occupied.resize(capacity, false);

        let mut generations = reserve_exact::<u64>(capacity, bytes)?;
        generations.resize(capacity, 0);

        let pool_id = NEXT_POOL_ID.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(pool_id, capacity, bytes, "arena pool created");

        Ok(Self {
            storage: storage.into_boxed_slice(),
            free_list,
            occupied: occupied.into_boxed_slice(),
            generations: generations.into_boxed_slice(),
            capacity,
            pool_id,
        })
    }

    /// Returns the total capacity.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of currently allocated slots.
    #[inline]
    #[must_use]
    pub fn used(&self) -> usize {
        self.capacity - self.free_list.len()
    }

    /// Returns the number of free slots.
    #[inline]
    #[must_use]
    pub fn available(&self) -> usize {
        self.free_list.len()
    }

    /// Returns true when no slot is left to allocate.
    #[inline]
    #[must_use]
    pub fn empty(&self) -> bool {
        self.free_list.is_empty()
    }

    /// Returns true when every slot is free, i.e. nothing is allocated.
    #[inline]
    #[must_use]
    pub fn full(&self) -> bool {
        self.free_list.len() == self.capacity
    }

    /// Allocates a slot.
    ///
    /// This is a **O(1)** operation with **zero heap allocations**. The slot
    /// keeps its previous contents.
    ///
    /// # Returns
    ///
    /// A handle to the allocated slot, or None if the pool is exhausted.
    pub fn allocate(&mut self) -> Option<SlotHandle> {
        let index = self.free_list.pop()?;
        self.occupied[index] = true;

        Some(SlotHandle {
            pool_id: self.pool_id,
            index,
            generation: self.generations[index],
        })
    }

    /// Allocates a slot and stores `value` in it, dropping the old contents.
    ///
    /// Returns None (and drops `value`) if the pool is exhausted.
    pub fn allocate_with(&mut self, value: T) -> Option<SlotHandle> {
        let handle = self.allocate()?;
        self.storage[handle.index] = value;
        Some(handle)
    }

    /// Releases a slot, returning the violated contract on misuse.
    ///
    /// Checks, in order: the handle is not null, it was issued by this pool,
    /// and it names a slot that is currently allocated under the same
    /// generation. A rejected release leaves the pool untouched.
    ///
    /// # Errors
    ///
    /// [`PoolError::NullRelease`], [`PoolError::ForeignPointer`] or
    /// [`PoolError::DoubleRelease`].
    pub fn try_deallocate(&mut self, handle: SlotHandle) -> PoolResult<()> {
        let index = match self.validate(handle) {
            Ok(index) => index,
            Err(error) => {
                tracing::error!(pool_id = self.pool_id, %error, "rejected slot release");
                return Err(error);
            }
        };

        self.occupied[index] = false;
        self.generations[index] = self.generations[index].wrapping_add(1);
        self.free_list.push(index);
        Ok(())
    }

    /// Releases a slot, treating any misuse as fatal.
    ///
    /// # Panics
    ///
    /// Panics if the handle is null, foreign, or already released. See
    /// [`ArenaPool::try_deallocate`] for the non-fatal variant.
    #[track_caller]
    pub fn deallocate(&mut self, handle: SlotHandle) {
        if let Err(error) = self.try_deallocate(handle) {
            panic!("{error}");
        }
    }

    /// Runs the release checks without releasing anything.
    ///
    /// # Errors
    ///
    /// Same as [`ArenaPool::try_deallocate`].
    pub fn validate(&self, handle: SlotHandle) -> PoolResult<usize> {
        if handle.is_null() {
            return Err(PoolError::NullRelease);
        }
        if handle.pool_id != self.pool_id || handle.index >= self.capacity {
            return Err(PoolError::ForeignPointer {
                index: handle.index,
            });
        }
        if !self.occupied[handle.index] || self.generations[handle.index] != handle.generation {
            return Err(PoolError::DoubleRelease {
                index: handle.index,
            });
        }
        Ok(handle.index)
    }

    /// Returns true if `handle` names a live slot of this pool.
    #[inline]
    #[must_use]
    pub fn contains(&self, handle: SlotHandle) -> bool {
        self.validate(handle).is_ok()
    }

    /// Gets a reference to an allocated object.
    #[inline]
    #[must_use]
    pub fn get(&self, handle: SlotHandle) -> Option<&T> {
        let index = self.validate(handle).ok()?;
        Some(&self.storage[index])
    }

    /// Gets a mutable reference to an allocated object.
    #[inline]
    pub fn get_mut(&mut self, handle: SlotHandle) -> Option<&mut T> {
        let index = self.validate(handle).ok()?;
        Some(&mut self.storage[index])
    }

    /// Fast-forwards a slot's generation, standing in for that many reuse cycles.
    #[cfg(test)]
    fn set_generation(&mut self, index: usize, generation: u64) {
        self.generations[index] = generation;
    }
}

impl<T> fmt::Debug for ArenaPool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArenaPool")
            .field("pool_id", &self.pool_id)
            .field("capacity", &self.capacity)
            .field("used", &self.used())
            .finish_non_exhaustive()
    }
}

impl<T> Drop for ArenaPool<T> {
    fn drop(&mut self) {
        let outstanding = self.used();
        if outstanding > 0 {
            tracing::debug!(
                pool_id = self.pool_id,
                outstanding,
                "arena pool dropped with slots still allocated"
            );
        }
    }
}

/// Bytes reserved per slot across storage and bookkeeping tables.
const fn slot_footprint<T>() -> usize {
    size_of::<T>() + size_of::<usize>() + size_of::<bool>() + size_of::<u64>()
}

fn reserve_exact<U>(capacity: usize, bytes: usize) -> PoolResult<Vec<U>> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(capacity)
        .map_err(|_| PoolError::OutOfMemory { capacity, bytes })?;
    Ok(buffer)
}
