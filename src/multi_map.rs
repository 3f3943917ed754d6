//! MultiMap: binds keys to ordered collections of values.

use crate::capacity::{CapacityStrategy, FixedTableStrategy};
use crate::error::Result;
use crate::pool::{BufferPool, HeapPool};
use crate::pooled_vec::PooledVec;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use hashbrown::HashMap;
use std::collections::hash_map::RandomState;

/// Registry from keys to ordered lists of values.
///
/// Each bound key owns a [`PooledVec`] built from clones of the registry's
/// pool and strategy. A key disappears as soon as its last value is
/// unbound, and its buffer goes back to the pool.
pub struct MultiMap<K, V, P = HeapPool, S = FixedTableStrategy, H = RandomState>
where
    P: BufferPool<V>,
{
    map: HashMap<K, PooledVec<V, P, S>, H>,
    pool: P,
    strategy: S,
}

impl<K, V> MultiMap<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_pool(HeapPool, FixedTableStrategy)
    }
}

impl<K, V> Default for MultiMap<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, P, S> MultiMap<K, V, P, S>
where
    K: Eq + Hash,
    P: BufferPool<V> + Clone,
    S: CapacityStrategy + Clone,
{
    pub fn with_pool(pool: P, strategy: S) -> Self {
        Self::with_pool_and_hasher(pool, strategy, RandomState::new())
    }
}

impl<K, V, P, S, H> MultiMap<K, V, P, S, H>
where
    K: Eq + Hash,
    P: BufferPool<V> + Clone,
    S: CapacityStrategy + Clone,
    H: BuildHasher,
{
    pub fn with_pool_and_hasher(pool: P, strategy: S, hasher: H) -> Self {
        Self {
            map: HashMap::with_hasher(hasher),
            pool,
            strategy,
        }
    }

    /// Number of keys with at least one bound value.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.contains_key(key)
    }

    /// Appends `value` to the values bound to `key`.
    ///
    /// On error the registry is unchanged.
    pub fn bind(&mut self, key: K, value: V) -> Result<()> {
        if let Some(values) = self.map.get_mut(&key) {
            return values.push(value);
        }
        let mut values = PooledVec::new_in(self.pool.clone(), self.strategy.clone());
        values.push(value)?;
        self.map.insert(key, values);
        Ok(())
    }

    /// Removes the first value equal to `value` from `key`'s list.
    ///
    /// Returns whether a value was removed.
    pub fn unbind<Q>(&mut self, key: &Q, value: &V) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: PartialEq,
    {
        let Some(values) = self.map.get_mut(key) else {
            return false;
        };
        let Some(pos) = values.iter().position(|v| v == value) else {
            return false;
        };
        values.remove(pos);
        if values.is_empty() {
            log::debug!("Last binding removed, releasing its buffer");
            self.map.remove(key);
        }
        true
    }

    /// Drops every value bound to `key`. Returns whether the key was bound.
    pub fn unbind_all<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.remove(key).is_some()
    }

    /// Values bound to `key` in bind order; empty if none.
    pub fn values<Q>(&self, key: &Q) -> &[V]
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        match self.map.get(key) {
            Some(values) => values.as_slice(),
            None => &[],
        }
    }

    pub fn clear(&mut self) {
        log::debug!("Clearing {} bound keys", self.map.len());
        self.map.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &[V])> {
        self.map.iter().map(|(k, values)| (k, values.as_slice()))
    }
}

impl<K, V, P, S, H> fmt::Debug for MultiMap<K, V, P, S, H>
where
    K: fmt::Debug,
    V: fmt::Debug,
    P: BufferPool<V>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.map.iter().map(|(k, values)| (k, &**values)))
            .finish()
    }
}
