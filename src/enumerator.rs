//! Cursors over the live slots of an `IntHashMap`.
//!
//! All of them scan slot positions `0..last_index` in ascending order and
//! skip tombstones, so each live entry is produced exactly once and its
//! position matches the slot index handed out by `add`/`set`.

use crate::slot::Slot;
use core::iter::FusedIterator;

/// Restartable cursor over live slot indices.
///
/// Independent cursors never share position. Calling
/// [`reset`](SlotIndices::reset) rewinds to the first slot.
#[derive(Debug)]
pub struct SlotIndices<'a, V> {
    slots: &'a [Slot<V>],
    pos: usize,
    remaining: usize,
    live: usize,
}

impl<'a, V> SlotIndices<'a, V> {
    pub(crate) fn new(slots: &'a [Slot<V>], live: usize) -> Self {
        Self {
            slots,
            pos: 0,
            remaining: live,
            live,
        }
    }

    pub fn reset(&mut self) {
        self.pos = 0;
        self.remaining = self.live;
    }
}

impl<'a, V> Iterator for SlotIndices<'a, V> {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        while self.pos < self.slots.len() {
            let i = self.pos;
            self.pos += 1;
            if self.slots[i].is_occupied() {
                self.remaining -= 1;
                return Some(i);
            }
        }
        None
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> Clone for SlotIndices<'_, V> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots,
            pos: self.pos,
            remaining: self.remaining,
            live: self.live,
        }
    }
}

impl<V> ExactSizeIterator for SlotIndices<'_, V> {}
impl<V> FusedIterator for SlotIndices<'_, V> {}

/// Iterator over `(slot index, key, &value)`.
pub struct Iter<'a, V> {
    it: core::iter::Enumerate<core::slice::Iter<'a, Slot<V>>>,
    remaining: usize,
}

impl<'a, V> Iter<'a, V> {
    pub(crate) fn new(slots: &'a [Slot<V>], live: usize) -> Self {
        Self {
            it: slots.iter().enumerate(),
            remaining: live,
        }
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (usize, i32, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        for (i, slot) in self.it.by_ref() {
            if let Slot::Occupied { key, value, .. } = slot {
                self.remaining -= 1;
                return Some((i, *key, value));
            }
        }
        None
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}
impl<V> FusedIterator for Iter<'_, V> {}

impl<V> Clone for Iter<'_, V> {
    fn clone(&self) -> Self {
        Self {
            it: self.it.clone(),
            remaining: self.remaining,
        }
    }
}

/// Iterator over `(slot index, key, &mut value)`.
pub struct IterMut<'a, V> {
    it: core::iter::Enumerate<core::slice::IterMut<'a, Slot<V>>>,
    remaining: usize,
}

impl<'a, V> IterMut<'a, V> {
    pub(crate) fn new(slots: &'a mut [Slot<V>], live: usize) -> Self {
        Self {
            it: slots.iter_mut().enumerate(),
            remaining: live,
        }
    }
}

impl<'a, V> Iterator for IterMut<'a, V> {
    type Item = (usize, i32, &'a mut V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        for (i, slot) in self.it.by_ref() {
            if let Slot::Occupied { key, value, .. } = slot {
                self.remaining -= 1;
                return Some((i, *key, value));
            }
        }
        None
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for IterMut<'_, V> {}
impl<V> FusedIterator for IterMut<'_, V> {}

/// Iterator over live keys in slot order.
pub struct Keys<'a, V> {
    pub(crate) inner: Iter<'a, V>,
}

impl<V> Iterator for Keys<'_, V> {
    type Item = i32;

    #[inline]
    fn next(&mut self) -> Option<i32> {
        self.inner.next().map(|(_, k, _)| k)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> Clone for Keys<'_, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<V> ExactSizeIterator for Keys<'_, V> {}
impl<V> FusedIterator for Keys<'_, V> {}

/// Iterator over live values in slot order.
pub struct Values<'a, V> {
    pub(crate) inner: Iter<'a, V>,
}

impl<'a, V> Iterator for Values<'a, V> {
    type Item = &'a V;

    #[inline]
    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, _, v)| v)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> Clone for Values<'_, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<V> ExactSizeIterator for Values<'_, V> {}
impl<V> FusedIterator for Values<'_, V> {}
