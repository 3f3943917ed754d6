// PooledVec and MultiMap integration tests around buffer reuse.
//
// Verifies that containers sharing a pool hand buffers to each other, and
// that growth sizes follow the injected strategy.
use slot_intmap::{
    BufferPool, DoublingStrategy, Error, FixedTableStrategy, MultiMap, PooledVec, VecPool,
};
use std::cell::Cell;

// Counts traffic through a plain heap pool.
#[derive(Default)]
struct CountingPool {
    acquired: Cell<usize>,
    released: Cell<usize>,
}

impl<T> BufferPool<T> for CountingPool {
    fn acquire(&self, min_capacity: usize) -> Vec<T> {
        self.acquired.set(self.acquired.get() + 1);
        Vec::with_capacity(min_capacity)
    }

    fn release(&self, buffer: Vec<T>) {
        self.released.set(self.released.get() + 1);
        drop(buffer);
    }
}

// Test: every acquired buffer is released exactly once.
// Verifies: growth releases the outgrown buffer; drop releases the last.
#[test]
fn acquire_release_balance() {
    let pool = CountingPool::default();
    {
        let mut v = PooledVec::new_in(&pool, FixedTableStrategy);
        for i in 0..100u32 {
            v.push(i).unwrap();
        }
        // 3, 7, 15, 31, 63, 127
        assert_eq!(pool.acquired.get(), 6);
        assert_eq!(pool.released.get(), 5);
        assert_eq!(v.len(), 100);
    }
    assert_eq!(pool.released.get(), 6);
}

// Test: no buffer is acquired until the first element.
#[test]
fn empty_sequence_allocates_nothing() {
    let pool = CountingPool::default();
    let v: PooledVec<u8, _> = PooledVec::new_in(&pool, FixedTableStrategy);
    assert!(v.is_empty());
    drop(v);
    assert_eq!(pool.acquired.get(), 0);
    assert_eq!(pool.released.get(), 0);
}

// Test: growth past the strategy ceiling fails and keeps the contents.
#[test]
fn ceiling_is_reported() {
    let mut v = PooledVec::new_in(VecPool::new(), DoublingStrategy::new(7));
    for i in 0..7 {
        v.push(i).unwrap();
    }
    let err = v.push(7).unwrap_err();
    assert_eq!(
        err,
        Error::OutOfCapacity {
            current_capacity: "7".to_string(),
            required_size: "8".to_string(),
        }
    );
    assert_eq!(v.as_slice(), &[0, 1, 2, 3, 4, 5, 6]);
}

// Test: a registry borrowing a pool recycles buffers across keys.
#[test]
fn registry_recycles_buffers_across_keys() {
    let pool = VecPool::new();
    let mut m = MultiMap::with_pool(&pool, FixedTableStrategy);
    for round in 0..5 {
        m.bind("listener", round).unwrap();
        assert!(m.unbind_all("listener"));
        assert_eq!(pool.retained(), 1, "round {round}");
    }
    assert!(m.is_empty());
}
