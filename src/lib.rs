//! slot-intmap: allocation-conscious in-memory containers for
//! latency-sensitive, single-threaded callers (per-frame game logic and
//! the like).
//!
//! Internal Design:
//!
//! Summary
//! - Goal: an integer-keyed map whose entries sit in stable, reusable slots
//!   so callers can cache a slot index next to the key and skip the lookup.
//! - Layers:
//!   - CapacityStrategy: pure growth policy. Maps (current capacity,
//!     required size) to the next capacity. The default walks a fixed table
//!     of `2^n - 1` sizes and fails past 1048575.
//!   - IntHashMap<V, S>: bucket array of chain heads, slot array holding
//!     key/chain-link/value, a free list of removed slots, a high-water
//!     mark and a live count. Every growth decision goes through `S`.
//!   - SlotIndices / Iter: cursors over live slots in slot order.
//!   - BufferPool / PooledVec: growable sequence whose buffers come from an
//!     injected pool and whose growth steps come from a strategy.
//!   - MultiMap: key to ordered values, composed from a `hashbrown` map and
//!     `PooledVec`.
//!
//! Constraints
//! - Single-threaded: no internal synchronization; `VecPool` is `!Sync`.
//! - Slot indices are stable from insertion until removal or `clear`;
//!   growth copies slots positionally and only rebuilds the buckets.
//! - The map never shrinks. Removing the last entry rewinds allocation to
//!   slot 0; `clear` keeps the allocated capacity.
//! - Every mutating operation either completes or leaves the structure
//!   untouched. Growth is attempted before a slot is claimed.
//!
//! Slot states
//! - Slots are `Empty`, `Occupied { key, next, value }` or
//!   `Tombstone { next_free }`. There is no arithmetic key sentinel, so
//!   every `i32` is a valid key, `i32::MAX` included.
//! - The chain link and the free-list link never coexist in one slot. The
//!   free list is private to `SlotRecycler`; rebuilding buckets on growth
//!   only re-threads occupied slots and cannot disturb it.
//!
//! Borrowing
//! - `get_mut`/`value_mut`/`value_at_mut` hand out `&mut V` into slot
//!   storage. The borrow checker ends that borrow before any call that can
//!   move or drop values.
//!
//! Notes and non-goals
//! - Keys are `i32` only. No shrinking, persistence or thread-safety.
//! - Chaining is the only defence against adversarial key distributions.

pub mod capacity;
mod enumerator;
mod error;
pub mod int_hash_map;
mod int_hash_map_proptest;
pub mod multi_map;
pub mod pool;
pub mod pooled_vec;
mod slot;

// Public surface
pub use capacity::{CapacityStrategy, DoublingStrategy, FixedTableStrategy, CAPACITY_TABLE};
pub use enumerator::{Iter, IterMut, Keys, SlotIndices, Values};
pub use error::{Error, Result};
pub use int_hash_map::{IntHashMap, Placement};
pub use multi_map::MultiMap;
pub use pool::{BufferPool, HeapPool, VecPool};
pub use pooled_vec::PooledVec;
