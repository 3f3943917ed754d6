//! Slot storage for `IntHashMap`.
//!
//! A slot is either never written (`Empty`), live (`Occupied`) or removed
//! and waiting for reuse (`Tombstone`). The link of an occupied slot points
//! at the next slot in its bucket chain; the link of a tombstone points at
//! the next recyclable slot. Only `SlotRecycler` reads or writes tombstone
//! links, so chain maintenance (including rehashing on growth) never sees
//! the free list.

use core::fmt;
use core::mem;

/// Compact slot reference: a slot index, or `NONE`.
#[derive(Copy, Clone, PartialEq, Eq)]
pub(crate) struct Link(u32);

impl Link {
    pub(crate) const NONE: Link = Link(u32::MAX);

    /// Number of addressable slots; `u32::MAX` itself is the `NONE` marker.
    pub(crate) const MAX_SLOTS: usize = u32::MAX as usize;

    #[inline]
    pub(crate) fn to(index: usize) -> Link {
        debug_assert!(index < Self::MAX_SLOTS);
        Link(index as u32)
    }

    #[inline]
    pub(crate) fn get(self) -> Option<usize> {
        if self == Self::NONE {
            None
        } else {
            Some(self.0 as usize)
        }
    }
}

impl fmt::Debug for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(i) => write!(f, "Link({i})"),
            None => f.write_str("Link(none)"),
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) enum Slot<V> {
    Empty,
    Occupied { key: i32, next: Link, value: V },
    Tombstone { next_free: Link },
}

impl<V> Slot<V> {
    #[inline]
    pub(crate) fn key(&self) -> Option<i32> {
        match self {
            Slot::Occupied { key, .. } => Some(*key),
            _ => None,
        }
    }

    #[inline]
    pub(crate) fn value(&self) -> Option<&V> {
        match self {
            Slot::Occupied { value, .. } => Some(value),
            _ => None,
        }
    }

    #[inline]
    pub(crate) fn value_mut(&mut self) -> Option<&mut V> {
        match self {
            Slot::Occupied { value, .. } => Some(value),
            _ => None,
        }
    }

    #[inline]
    pub(crate) fn is_occupied(&self) -> bool {
        matches!(self, Slot::Occupied { .. })
    }

    /// Rewrites the chain link of an occupied slot. No-op otherwise.
    #[inline]
    pub(crate) fn set_chain_next(&mut self, link: Link) {
        if let Slot::Occupied { next, .. } = self {
            *next = link;
        }
    }
}

/// Free list of tombstoned slots, threaded through `Slot::Tombstone`.
#[derive(Copy, Clone, Debug)]
pub(crate) struct SlotRecycler {
    head: Link,
}

impl SlotRecycler {
    pub(crate) const fn new() -> Self {
        Self { head: Link::NONE }
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.head == Link::NONE
    }

    /// Forgets every recyclable slot. The tombstones stay in place.
    #[inline]
    pub(crate) fn reset(&mut self) {
        self.head = Link::NONE;
    }

    /// Turns the slot at `index` into a tombstone at the head of the free
    /// list and returns the value it held.
    ///
    /// The caller must already have unlinked the slot from its chain.
    pub(crate) fn release<V>(&mut self, slots: &mut [Slot<V>], index: usize) -> Option<V> {
        let old = mem::replace(
            &mut slots[index],
            Slot::Tombstone {
                next_free: self.head,
            },
        );
        self.head = Link::to(index);
        match old {
            Slot::Occupied { value, .. } => Some(value),
            _ => {
                debug_assert!(false, "released slot {index} was not occupied");
                None
            }
        }
    }

    /// Pops the most recently released slot. The caller overwrites it.
    pub(crate) fn acquire<V>(&mut self, slots: &[Slot<V>]) -> Option<usize> {
        let index = self.head.get()?;
        self.head = match &slots[index] {
            Slot::Tombstone { next_free } => *next_free,
            _ => {
                debug_assert!(false, "free list points at live slot {index}");
                Link::NONE
            }
        };
        Some(index)
    }
}
