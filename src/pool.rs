//! Buffer pools: where `PooledVec` gets its backing storage.
//!
//! A pool hands out empty `Vec<T>` buffers with at least the requested
//! capacity and takes them back when a container grows past them or is
//! dropped. Pools are passed to containers explicitly; there is no global
//! pool.

use core::cell::RefCell;
use std::rc::Rc;

/// Source of reusable buffers.
pub trait BufferPool<T> {
    /// Returns an empty buffer with `capacity() >= min_capacity`.
    fn acquire(&self, min_capacity: usize) -> Vec<T>;

    /// Hands a buffer back. Its elements are dropped.
    fn release(&self, buffer: Vec<T>);
}

impl<T, P: BufferPool<T> + ?Sized> BufferPool<T> for &P {
    #[inline]
    fn acquire(&self, min_capacity: usize) -> Vec<T> {
        (**self).acquire(min_capacity)
    }

    #[inline]
    fn release(&self, buffer: Vec<T>) {
        (**self).release(buffer)
    }
}

impl<T, P: BufferPool<T> + ?Sized> BufferPool<T> for Rc<P> {
    #[inline]
    fn acquire(&self, min_capacity: usize) -> Vec<T> {
        (**self).acquire(min_capacity)
    }

    #[inline]
    fn release(&self, buffer: Vec<T>) {
        (**self).release(buffer)
    }
}

/// No pooling: every acquire allocates, every release frees.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct HeapPool;

impl<T> BufferPool<T> for HeapPool {
    #[inline]
    fn acquire(&self, min_capacity: usize) -> Vec<T> {
        Vec::with_capacity(min_capacity)
    }

    #[inline]
    fn release(&self, buffer: Vec<T>) {
        drop(buffer);
    }
}

/// Single-threaded pool that keeps up to `max_retained` released buffers.
///
/// `acquire` returns the smallest retained buffer that fits and only
/// allocates when none does. Share one pool between containers with
/// `Rc<VecPool<T>>` or `&VecPool<T>`.
#[derive(Debug)]
pub struct VecPool<T> {
    free: RefCell<Vec<Vec<T>>>,
    max_retained: usize,
}

impl<T> VecPool<T> {
    pub const DEFAULT_MAX_RETAINED: usize = 32;

    pub fn new() -> Self {
        Self::with_max_retained(Self::DEFAULT_MAX_RETAINED)
    }

    pub fn with_max_retained(max_retained: usize) -> Self {
        Self {
            free: RefCell::new(Vec::new()),
            max_retained,
        }
    }

    /// Number of buffers currently held for reuse.
    pub fn retained(&self) -> usize {
        self.free.borrow().len()
    }

    pub fn max_retained(&self) -> usize {
        self.max_retained
    }

    /// Frees every retained buffer.
    pub fn trim(&self) {
        self.free.borrow_mut().clear();
    }
}

impl<T> Default for VecPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> BufferPool<T> for VecPool<T> {
    fn acquire(&self, min_capacity: usize) -> Vec<T> {
        let mut free = self.free.borrow_mut();
        let best = free
            .iter()
            .enumerate()
            .filter(|(_, b)| b.capacity() >= min_capacity)
            .min_by_key(|(_, b)| b.capacity())
            .map(|(i, _)| i);

        match best {
            Some(i) => free.swap_remove(i),
            None => {
                log::trace!("Buffer pool miss for capacity {min_capacity}, allocating");
                Vec::with_capacity(min_capacity)
            }
        }
    }

    fn release(&self, mut buffer: Vec<T>) {
        // Elements are dropped before the pool is borrowed.
        buffer.clear();
        if buffer.capacity() == 0 {
            return;
        }
        let mut free = self.free.borrow_mut();
        if free.len() < self.max_retained {
            free.push(buffer);
        }
    }
}
