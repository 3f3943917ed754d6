//! PooledVec: a growable sequence backed by pooled buffers.

use crate::capacity::{CapacityStrategy, FixedTableStrategy};
use crate::error::Result;
use crate::pool::{BufferPool, HeapPool};
use core::fmt;
use core::mem;
use core::ops::{Deref, DerefMut};

/// Growable sequence whose buffers come from a [`BufferPool`] and whose
/// growth steps come from a [`CapacityStrategy`].
///
/// When the buffer is full the next capacity is requested from the
/// strategy, a buffer of that size is acquired from the pool, the elements
/// move over and the old buffer is released. Dropping the sequence releases
/// its buffer.
pub struct PooledVec<T, P: BufferPool<T> = HeapPool, S = FixedTableStrategy> {
    buf: Vec<T>,
    pool: P,
    strategy: S,
}

impl<T> PooledVec<T> {
    pub fn new() -> Self {
        Self::new_in(HeapPool, FixedTableStrategy)
    }
}

impl<T> Default for PooledVec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, P, S> PooledVec<T, P, S>
where
    P: BufferPool<T>,
    S: CapacityStrategy,
{
    /// Empty sequence; nothing is acquired until the first push.
    pub fn new_in(pool: P, strategy: S) -> Self {
        Self {
            buf: Vec::new(),
            pool,
            strategy,
        }
    }

    /// Empty sequence with room for at least `capacity` elements.
    pub fn with_capacity_in(capacity: usize, pool: P, strategy: S) -> Result<Self> {
        if capacity == 0 {
            return Ok(Self::new_in(pool, strategy));
        }
        let capacity = strategy.calculate_capacity(0, capacity)?;
        let buf = pool.acquire(capacity);
        Ok(Self {
            buf,
            pool,
            strategy,
        })
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    pub fn pool(&self) -> &P {
        &self.pool
    }

    /// Appends `value`, growing through the strategy if the buffer is full.
    pub fn push(&mut self, value: T) -> Result<()> {
        if self.buf.len() == self.buf.capacity() {
            self.grow(self.buf.len() + 1)?;
        }
        self.buf.push(value);
        Ok(())
    }

    pub fn pop(&mut self) -> Option<T> {
        self.buf.pop()
    }

    /// Removes and returns the element at `index`, shifting later elements
    /// down. `None` if out of range.
    pub fn remove(&mut self, index: usize) -> Option<T> {
        if index >= self.buf.len() {
            return None;
        }
        Some(self.buf.remove(index))
    }

    /// Removes the element at `index` by moving the last element into its
    /// place. `None` if out of range.
    pub fn swap_remove(&mut self, index: usize) -> Option<T> {
        if index >= self.buf.len() {
            return None;
        }
        Some(self.buf.swap_remove(index))
    }

    /// Drops every element; the buffer is kept.
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Returns the buffer to the pool, leaving an empty, unallocated
    /// sequence.
    pub fn release_buffer(&mut self) {
        let buf = mem::take(&mut self.buf);
        if buf.capacity() > 0 {
            self.pool.release(buf);
        }
    }

    pub fn as_slice(&self) -> &[T] {
        &self.buf
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.buf
    }

    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.buf.iter()
    }

    pub fn iter_mut(&mut self) -> core::slice::IterMut<'_, T> {
        self.buf.iter_mut()
    }

    fn grow(&mut self, required: usize) -> Result<()> {
        let capacity = self
            .strategy
            .calculate_capacity(self.buf.capacity(), required)?;
        let mut next = self.pool.acquire(capacity);
        next.append(&mut self.buf);
        let old = mem::replace(&mut self.buf, next);
        if old.capacity() > 0 {
            self.pool.release(old);
        }
        Ok(())
    }
}

impl<T, P: BufferPool<T>, S> Drop for PooledVec<T, P, S> {
    fn drop(&mut self) {
        let buf = mem::take(&mut self.buf);
        if buf.capacity() > 0 {
            self.pool.release(buf);
        }
    }
}

impl<T, P: BufferPool<T>, S> Deref for PooledVec<T, P, S> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.buf
    }
}

impl<T, P: BufferPool<T>, S> DerefMut for PooledVec<T, P, S> {
    fn deref_mut(&mut self) -> &mut [T] {
        &mut self.buf
    }
}

impl<T: fmt::Debug, P: BufferPool<T>, S> fmt::Debug for PooledVec<T, P, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.buf.iter()).finish()
    }
}

impl<'a, T, P: BufferPool<T>, S> IntoIterator for &'a PooledVec<T, P, S> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.buf.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capacity::DoublingStrategy;
    use crate::error::Error;
    use crate::pool::VecPool;
    use std::rc::Rc;
    use test_log::test;

    #[test]
    fn grows_through_tabled_sizes() {
        let mut v = PooledVec::new();
        assert_eq!(v.capacity(), 0);
        v.push(1).unwrap();
        assert!(v.capacity() >= 3);
        for i in 2..=10 {
            v.push(i).unwrap();
        }
        assert!(v.capacity() >= 15);
        assert_eq!(v.as_slice(), &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
        assert_eq!(v.len(), 10);
        assert_eq!(v.iter().sum::<i32>(), 55);
    }

    #[test]
    fn growth_releases_old_buffer_to_pool() {
        let pool = Rc::new(VecPool::new());
        let mut v = PooledVec::new_in(Rc::clone(&pool), FixedTableStrategy);
        for i in 0..4 {
            v.push(i).unwrap();
        }
        // 3-slot buffer was handed back when growing to 7.
        assert_eq!(pool.retained(), 1);

        drop(v);
        assert_eq!(pool.retained(), 2);

        let w: PooledVec<i32, _> =
            PooledVec::with_capacity_in(5, Rc::clone(&pool), FixedTableStrategy).unwrap();
        assert!(w.capacity() >= 7);
        assert_eq!(pool.retained(), 1);
    }

    #[test]
    fn push_reports_out_of_capacity() {
        let mut v = PooledVec::new_in(HeapPool, DoublingStrategy::new(3));
        for i in 0..3 {
            v.push(i).unwrap();
        }
        assert!(matches!(v.push(3), Err(Error::OutOfCapacity { .. })));
        assert_eq!(v.as_slice(), &[0, 1, 2]);
    }

    #[test]
    fn removal_variants() {
        let mut v = PooledVec::new();
        for c in ['a', 'b', 'c', 'd'] {
            v.push(c).unwrap();
        }
        assert_eq!(v.remove(1), Some('b'));
        assert_eq!(v.as_slice(), &['a', 'c', 'd']);
        assert_eq!(v.swap_remove(0), Some('a'));
        assert_eq!(v.as_slice(), &['d', 'c']);
        assert_eq!(v.remove(5), None);
        assert_eq!(v.swap_remove(2), None);
        assert_eq!(v.pop(), Some('c'));

        v.clear();
        assert!(v.is_empty());
        assert!(v.capacity() > 0);
        v.release_buffer();
        assert_eq!(v.capacity(), 0);
    }

    #[test]
    fn deref_gives_slice_api() {
        let mut v = PooledVec::new();
        for i in [3, 1, 2] {
            v.push(i).unwrap();
        }
        v.sort();
        assert_eq!(&*v, &[1, 2, 3]);
        assert!(v.contains(&2));
        for x in v.iter_mut() {
            *x *= 2;
        }
        assert_eq!(format!("{v:?}"), "[2, 4, 6]");
    }
}
