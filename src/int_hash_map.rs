//! IntHashMap: chained integer-keyed table with stable slot indices.

use crate::capacity::{CapacityStrategy, FixedTableStrategy, CAPACITY_TABLE};
use crate::enumerator::{Iter, IterMut, Keys, SlotIndices, Values};
use crate::error::{Error, Result};
use crate::slot::{Link, Slot, SlotRecycler};
use core::fmt;

/// Outcome of [`IntHashMap::set`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Placement {
    /// The key was absent and now lives in this slot.
    Inserted(usize),
    /// The key was present; its value in this slot was overwritten.
    Replaced(usize),
}

impl Placement {
    pub fn index(self) -> usize {
        match self {
            Placement::Inserted(i) | Placement::Replaced(i) => i,
        }
    }

    pub fn is_inserted(self) -> bool {
        matches!(self, Placement::Inserted(_))
    }
}

#[inline]
fn bucket_index(key: i32, mask: usize) -> usize {
    (key as u32 as usize) & mask
}

/// Smallest all-ones mask covering `capacity`. Tabled capacities are
/// their own mask.
#[inline]
fn mask_for(capacity: usize) -> usize {
    (capacity + 1).next_power_of_two() - 1
}

fn check_slot_limit(current: usize, capacity: usize) -> Result<()> {
    if capacity >= Link::MAX_SLOTS {
        return Err(Error::out_of_capacity(current, capacity));
    }
    Ok(())
}

/// Hash map from `i32` keys to `V`, with separate chaining.
///
/// Every entry lives in a slot whose index is handed back by
/// [`add`](IntHashMap::add) and [`set`](IntHashMap::set). The index stays
/// valid until that key is removed or the map is cleared; growth keeps slots
/// where they are. Removed slots are recycled before the map grows.
///
/// Capacities come from the strategy `S`; the map never shrinks.
pub struct IntHashMap<V, S = FixedTableStrategy> {
    strategy: S,
    buckets: Vec<Link>,
    slots: Vec<Slot<V>>,
    mask: usize,
    last_index: usize,
    len: usize,
    recycler: SlotRecycler,
}

impl<V> IntHashMap<V> {
    /// Creates an empty map with the smallest tabled capacity.
    pub fn new() -> Self {
        Self::allocate(CAPACITY_TABLE[0], FixedTableStrategy)
    }

    /// Creates an empty map able to hold `capacity` entries without growing.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Self::with_capacity_and_strategy(capacity, FixedTableStrategy)
    }
}

impl<V> Default for IntHashMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, S> IntHashMap<V, S>
where
    S: CapacityStrategy,
{
    pub fn with_strategy(strategy: S) -> Result<Self> {
        Self::with_capacity_and_strategy(0, strategy)
    }

    pub fn with_capacity_and_strategy(capacity: usize, strategy: S) -> Result<Self> {
        let required = capacity.max(1);
        let capacity = strategy.calculate_capacity(0, required)?;
        if capacity < required {
            return Err(Error::InvalidArgument(
                "capacity strategy returned a capacity below the requested size",
            ));
        }
        check_slot_limit(0, capacity)?;
        Ok(Self::allocate(capacity, strategy))
    }

    fn allocate(capacity: usize, strategy: S) -> Self {
        let mask = mask_for(capacity);
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || Slot::Empty);
        Self {
            strategy,
            buckets: vec![Link::NONE; mask + 1],
            slots,
            mask,
            last_index: 0,
            len: 0,
            recycler: SlotRecycler::new(),
        }
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots currently allocated.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// First slot position never handed out since creation or the last
    /// reset to empty. Every live slot index is below it.
    pub fn high_water_mark(&self) -> usize {
        self.last_index
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    #[inline]
    fn find_slot(&self, key: i32) -> Option<usize> {
        let mut link = self.buckets[bucket_index(key, self.mask)];
        while let Some(i) = link.get() {
            match &self.slots[i] {
                Slot::Occupied { key: k, next, .. } => {
                    if *k == key {
                        return Some(i);
                    }
                    link = *next;
                }
                _ => {
                    debug_assert!(false, "bucket chain reached non-occupied slot {i}");
                    return None;
                }
            }
        }
        None
    }

    /// Inserts `key` if it is absent.
    ///
    /// Returns the slot index of the new entry, or `None` when the key was
    /// already present (the stored value is left untouched and `value` is
    /// dropped).
    pub fn add(&mut self, key: i32, value: V) -> Result<Option<usize>> {
        if self.find_slot(key).is_some() {
            return Ok(None);
        }
        self.insert_new(key, value).map(Some)
    }

    /// Inserts `key`, or overwrites its value in place if present.
    pub fn set(&mut self, key: i32, value: V) -> Result<Placement> {
        if let Some(i) = self.find_slot(key) {
            if let Some(v) = self.slots[i].value_mut() {
                *v = value;
            }
            return Ok(Placement::Replaced(i));
        }
        self.insert_new(key, value).map(Placement::Inserted)
    }

    fn insert_new(&mut self, key: i32, value: V) -> Result<usize> {
        // Growth must succeed before any slot is claimed.
        let index = match self.recycler.acquire(&self.slots) {
            Some(i) => i,
            None => {
                if self.last_index == self.slots.len() {
                    self.expand()?;
                }
                let i = self.last_index;
                self.last_index += 1;
                i
            }
        };

        let b = bucket_index(key, self.mask);
        self.slots[index] = Slot::Occupied {
            key,
            next: self.buckets[b],
            value,
        };
        self.buckets[b] = Link::to(index);
        self.len += 1;
        Ok(index)
    }

    /// Removes `key` and returns its value.
    ///
    /// Removing the last entry rewinds the map to its freshly created state
    /// (the free list is dropped and slot allocation restarts at 0).
    pub fn remove(&mut self, key: i32) -> Option<V> {
        let b = bucket_index(key, self.mask);
        let mut prev: Option<usize> = None;
        let mut link = self.buckets[b];

        while let Some(i) = link.get() {
            let (k, next) = match &self.slots[i] {
                Slot::Occupied { key, next, .. } => (*key, *next),
                _ => {
                    debug_assert!(false, "bucket chain reached non-occupied slot {i}");
                    return None;
                }
            };

            if k == key {
                match prev {
                    None => self.buckets[b] = next,
                    Some(p) => self.slots[p].set_chain_next(next),
                }
                let value = self.recycler.release(&mut self.slots, i);
                self.len -= 1;
                if self.len == 0 {
                    self.last_index = 0;
                    self.recycler.reset();
                }
                return value;
            }

            prev = Some(i);
            link = next;
        }
        None
    }

    pub fn contains_key(&self, key: i32) -> bool {
        self.find_slot(key).is_some()
    }

    pub fn get(&self, key: i32) -> Option<&V> {
        self.find_slot(key).and_then(|i| self.slots[i].value())
    }

    /// Like [`get`](IntHashMap::get), but an absent key is an error.
    pub fn value(&self, key: i32) -> Result<&V> {
        self.get(key).ok_or(Error::KeyNotFound(key))
    }

    /// Mutable access to the stored value, in place.
    ///
    /// The borrow ends before the next call that could move or drop the
    /// value (`add`, `set`, `remove`, `clear`).
    pub fn get_mut(&mut self, key: i32) -> Option<&mut V> {
        let i = self.find_slot(key)?;
        self.slots[i].value_mut()
    }

    pub fn value_mut(&mut self, key: i32) -> Result<&mut V> {
        self.get_mut(key).ok_or(Error::KeyNotFound(key))
    }

    /// Slot index of `key`, for later use with the `*_at` accessors.
    pub fn find_index(&self, key: i32) -> Option<usize> {
        self.find_slot(key)
    }

    /// Key stored in slot `index`, or `None` if the slot is not live.
    pub fn key_at(&self, index: usize) -> Option<i32> {
        self.live_slot(index).and_then(Slot::key)
    }

    pub fn value_at(&self, index: usize) -> Option<&V> {
        self.live_slot(index).and_then(Slot::value)
    }

    pub fn value_at_mut(&mut self, index: usize) -> Option<&mut V> {
        if index >= self.last_index {
            return None;
        }
        self.slots[index].value_mut()
    }

    #[inline]
    fn live_slot(&self, index: usize) -> Option<&Slot<V>> {
        if index >= self.last_index {
            return None;
        }
        Some(&self.slots[index])
    }

    fn expand(&mut self) -> Result<()> {
        debug_assert!(self.recycler.is_empty());
        let current = self.slots.len();
        let required = current + 1;
        let capacity = self.strategy.calculate_capacity(current, required)?;
        if capacity < required {
            return Err(Error::InvalidArgument(
                "capacity strategy did not grow the table",
            ));
        }
        check_slot_limit(current, capacity)?;

        log::trace!("Growing int map from {current} to {capacity} slots ({} live)", self.len);
        self.slots.resize_with(capacity, || Slot::Empty);
        self.mask = mask_for(capacity);
        self.rebuild_buckets();
        Ok(())
    }

    /// Re-threads every occupied slot under the current mask. Tombstones are
    /// skipped; their links belong to the free list.
    fn rebuild_buckets(&mut self) {
        let mask = self.mask;
        let buckets = &mut self.buckets;
        buckets.clear();
        buckets.resize(mask + 1, Link::NONE);

        for (i, slot) in self.slots[..self.last_index].iter_mut().enumerate() {
            if let Slot::Occupied { key, next, .. } = slot {
                let b = bucket_index(*key, mask);
                *next = buckets[b];
                buckets[b] = Link::to(i);
            }
        }
    }

    /// Writes every live value, in slot order, to the front of `target`.
    ///
    /// Returns the number of values written (always `len()`).
    pub fn copy_to(&self, target: &mut [V]) -> Result<usize>
    where
        V: Clone,
    {
        if target.len() < self.len {
            return Err(Error::InvalidArgument(
                "copy_to target is shorter than the number of entries",
            ));
        }
        for (dst, v) in target.iter_mut().zip(self.values()) {
            dst.clone_from(v);
        }
        Ok(self.len)
    }

    /// Makes `self` an exact structural copy of `other`: same capacity,
    /// same slot indices, same free list.
    ///
    /// The strategy is kept, so the adopted capacity need not be one `self`'s
    /// strategy would have chosen. Later growth still goes through that
    /// strategy and fails with [`Error::OutOfCapacity`] past its ceiling.
    pub fn copy_from(&mut self, other: &IntHashMap<V, S>)
    where
        V: Clone,
    {
        log::trace!(
            "Copying int map state ({} live, {} slots)",
            other.len,
            other.slots.len()
        );
        self.buckets.clone_from(&other.buckets);
        self.slots.clone_from(&other.slots);
        self.mask = other.mask;
        self.last_index = other.last_index;
        self.len = other.len;
        self.recycler = other.recycler;
    }

    /// Drops every entry. Capacity is retained.
    pub fn clear(&mut self) {
        log::trace!("Clearing int map ({} live)", self.len);
        for slot in &mut self.slots[..self.last_index] {
            *slot = Slot::Empty;
        }
        self.buckets.fill(Link::NONE);
        self.last_index = 0;
        self.len = 0;
        self.recycler.reset();
    }

    /// Cursor over the slot indices of live entries.
    pub fn slot_indices(&self) -> SlotIndices<'_, V> {
        SlotIndices::new(&self.slots[..self.last_index], self.len)
    }

    pub fn iter(&self) -> Iter<'_, V> {
        Iter::new(&self.slots[..self.last_index], self.len)
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, V> {
        IterMut::new(&mut self.slots[..self.last_index], self.len)
    }

    pub fn keys(&self) -> Keys<'_, V> {
        Keys { inner: self.iter() }
    }

    pub fn values(&self) -> Values<'_, V> {
        Values { inner: self.iter() }
    }
}

impl<V, S> Clone for IntHashMap<V, S>
where
    V: Clone,
    S: CapacityStrategy + Clone,
{
    fn clone(&self) -> Self {
        Self {
            strategy: self.strategy.clone(),
            buckets: self.buckets.clone(),
            slots: self.slots.clone(),
            mask: self.mask,
            last_index: self.last_index,
            len: self.len,
            recycler: self.recycler,
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.strategy.clone_from(&source.strategy);
        self.copy_from(source);
    }
}

impl<V: fmt::Debug, S: CapacityStrategy> fmt::Debug for IntHashMap<V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(_, k, v)| (k, v)))
            .finish()
    }
}

impl<'a, V, S: CapacityStrategy> IntoIterator for &'a IntHashMap<V, S> {
    type Item = (usize, i32, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, V, S: CapacityStrategy> IntoIterator for &'a mut IntHashMap<V, S> {
    type Item = (usize, i32, &'a mut V);
    type IntoIter = IterMut<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
