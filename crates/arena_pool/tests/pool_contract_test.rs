//! Integration tests for the pool's public contract.
//!
//! Run with: cargo test --package arena_pool --test pool_contract_test

use std::collections::HashSet;

use arena_pool::{ArenaPool, PoolError, SlotHandle};

const CAPACITY: usize = 256;

/// Pool with one live slot, the starting point of every misuse test.
fn pool_with_one_live_slot() -> ArenaPool<i32> {
    let mut pool = ArenaPool::new(CAPACITY).unwrap();
    assert!(pool.allocate().is_some());
    assert_eq!(pool.used(), 1);
    assert!(!pool.full());
    pool
}

#[test]
fn test_construct() {
    let pool: ArenaPool<i32> = ArenaPool::new(CAPACITY).unwrap();
    assert_eq!(pool.capacity(), CAPACITY);
    assert_eq!(pool.used(), 0);
    assert!(!pool.empty());
    assert!(pool.full());
}

#[test]
fn test_construct_zero_capacity() {
    let mut pool: ArenaPool<i32> = ArenaPool::new(0).unwrap();
    assert_eq!(pool.capacity(), 0);
    assert_eq!(pool.used(), 0);
    assert!(pool.empty());
    assert!(pool.full());
    assert!(pool.allocate().is_none());
}

#[test]
fn test_allocate_to_exhaustion() {
    let mut pool: ArenaPool<i32> = ArenaPool::new(CAPACITY).unwrap();
    let mut seen = HashSet::new();

    for i in 1..=CAPACITY {
        let handle = pool.allocate().unwrap();
        assert!(!handle.is_null());
        assert!(handle.index() < CAPACITY, "slot {} is out of range", handle.index());
        assert!(seen.insert(handle.index()), "slot {} handed out twice", handle.index());
        assert_eq!(pool.capacity(), CAPACITY);
        assert_eq!(pool.used(), i);
        assert_eq!(pool.empty(), i == CAPACITY);
        assert!(!pool.full());
    }

    // allocate from exhausted pool
    assert!(pool.allocate().is_none());
    assert_eq!(pool.capacity(), CAPACITY);
    assert_eq!(pool.used(), CAPACITY);
    assert!(pool.empty());
    assert!(!pool.full());
}

#[test]
fn test_single_slot_pool() {
    let mut pool: ArenaPool<i32> = ArenaPool::new(1).unwrap();
    let handle = pool.allocate().unwrap();
    assert!(pool.empty());

    assert!(pool.allocate().is_none());
    assert!(pool.empty());
    assert!(!pool.full());

    pool.try_deallocate(handle).unwrap();
    assert!(pool.full());
    assert!(!pool.empty());
}

#[test]
fn test_deallocate_restores_accounting() {
    let mut pool: ArenaPool<i32> = ArenaPool::new(CAPACITY).unwrap();

    for _ in 0..CAPACITY * 2 {
        let handle = pool.allocate().unwrap();
        assert!(!pool.full());

        pool.try_deallocate(handle).unwrap();
        assert_eq!(pool.capacity(), CAPACITY);
        assert_eq!(pool.used(), 0);
        assert!(!pool.empty());
        assert!(pool.full());
    }
}

#[test]
fn test_released_slot_is_reallocated() {
    let mut pool: ArenaPool<i32> = ArenaPool::new(4).unwrap();
    let handles: Vec<_> = (0..4).map(|_| pool.allocate().unwrap()).collect();

    pool.try_deallocate(handles[2]).unwrap();
    let again = pool.allocate().unwrap();
    assert_eq!(again.index(), handles[2].index());
}

#[test]
fn test_deallocate_null() {
    let mut pool = pool_with_one_live_slot();

    assert_eq!(pool.try_deallocate(SlotHandle::NULL), Err(PoolError::NullRelease));
    assert_eq!(pool.used(), 1);
    assert!(!pool.full());
}

#[test]
fn test_deallocate_foreign() {
    let mut pool = pool_with_one_live_slot();
    let mut other: ArenaPool<i32> = ArenaPool::new(CAPACITY).unwrap();
    let foreign = other.allocate().unwrap();

    let result = pool.try_deallocate(foreign);
    assert_eq!(result, Err(PoolError::ForeignPointer { index: foreign.index() }));
    assert!(result.unwrap_err().is_invalid_argument());
    assert_eq!(pool.used(), 1);
    assert!(!pool.full());

    // The other pool is not affected either
    assert!(other.contains(foreign));
}

#[test]
fn test_double_deallocate() {
    let mut pool: ArenaPool<i32> = ArenaPool::new(CAPACITY).unwrap();
    let p1 = pool.allocate().unwrap();
    let p2 = pool.allocate().unwrap();
    assert_eq!(pool.used(), 2);
    assert!(!pool.full());

    pool.try_deallocate(p1).unwrap();
    assert_eq!(pool.used(), 1);
    assert!(!pool.full());

    let result = pool.try_deallocate(p1);
    assert_eq!(result, Err(PoolError::DoubleRelease { index: p1.index() }));
    assert!(result.unwrap_err().is_logic_error());
    assert_eq!(pool.used(), 1);
    assert!(!pool.full());

    pool.try_deallocate(p2).unwrap();
    assert_eq!(pool.used(), 0);
    assert!(pool.full());
}

#[test]
#[should_panic(expected = "attempted to deallocate null handle")]
fn test_deallocate_null_is_fatal() {
    let mut pool = pool_with_one_live_slot();
    pool.deallocate(SlotHandle::NULL);
}

#[test]
#[should_panic(expected = "attempted to deallocate foreign handle")]
fn test_deallocate_foreign_is_fatal() {
    let mut pool = pool_with_one_live_slot();
    let mut other: ArenaPool<i32> = ArenaPool::new(1).unwrap();
    let foreign = other.allocate().unwrap();
    pool.deallocate(foreign);
}

#[test]
#[should_panic(expected = "attempted double deallocate")]
fn test_double_deallocate_is_fatal() {
    let mut pool: ArenaPool<i32> = ArenaPool::new(CAPACITY).unwrap();
    let handle = pool.allocate().unwrap();
    pool.deallocate(handle);
    pool.deallocate(handle);
}

#[test]
fn test_contents_are_not_reset_on_reuse() {
    let mut pool: ArenaPool<[i32; 4]> = ArenaPool::new(1).unwrap();

    let first = pool.allocate().unwrap();
    assert_eq!(*pool.get(first).unwrap(), [0; 4]);
    pool.get_mut(first).unwrap()[0] = -1;
    pool.deallocate(first);

    let second = pool.allocate().unwrap();
    assert_eq!(pool.get(second).unwrap()[0], -1);

    // allocate_with is the re-initializing path
    pool.deallocate(second);
    let third = pool.allocate_with([5; 4]).unwrap();
    assert_eq!(*pool.get(third).unwrap(), [5; 4]);
}

#[test]
fn test_validate_does_not_mutate() {
    let mut pool: ArenaPool<i32> = ArenaPool::new(2).unwrap();
    let handle = pool.allocate().unwrap();

    assert_eq!(pool.validate(handle), Ok(handle.index()));
    assert_eq!(pool.validate(handle), Ok(handle.index()));
    assert_eq!(pool.used(), 1);
}

#[test]
fn test_pool_can_be_sent_to_another_thread() {
    let mut pool: ArenaPool<u64> = ArenaPool::new(16).unwrap();
    let handle = pool.allocate_with(11).unwrap();

    let pool = std::thread::spawn(move || {
        assert_eq!(*pool.get(handle).unwrap(), 11);
        pool
    })
    .join()
    .unwrap();

    assert_eq!(pool.used(), 1);
}

#[test]
fn test_shared_pool_behind_mutex() {
    use std::sync::Arc;

    use parking_lot::Mutex;

    const THREADS: usize = 8;
    const ROUNDS: usize = 1_000;

    let pool: Arc<Mutex<ArenaPool<usize>>> = Arc::new(Mutex::new(ArenaPool::new(THREADS).unwrap()));

    let workers: Vec<_> = (0..THREADS)
        .map(|t| {
            let pool = Arc::clone(&pool);
            std::thread::spawn(move || {
                for round in 0..ROUNDS {
                    let handle = pool.lock().allocate_with(t * ROUNDS + round).unwrap();
                    let mut guard = pool.lock();
                    assert_eq!(*guard.get(handle).unwrap(), t * ROUNDS + round);
                    guard.try_deallocate(handle).unwrap();
                }
            })
        })
        .collect();

    for worker in workers {
        worker.join().unwrap();
    }

    let pool = pool.lock();
    assert_eq!(pool.used(), 0);
    assert!(pool.full());
}
