//! Capacity growth policies.
//!
//! A strategy maps "I currently hold `current_capacity`, I need room for
//! `required_size`" to the capacity to allocate. Every table and pooled
//! container in this crate asks its strategy before it grows, so swapping the
//! strategy changes the growth curve of the container without touching its
//! algorithm.

use crate::error::{Error, Result};

/// Ascending table of "almost power-of-two" sizes.
///
/// Every entry is `2^n - 1`, so a tabled capacity doubles as the bit mask
/// used to pick a bucket.
pub const CAPACITY_TABLE: [usize; 19] = [
    3, 7, 15, 31, 63, 127, 255, 511, 1023, 2047, 4095, 8191, 16383, 32767, 65535, 131071, 262143,
    524287, 1048575,
];

/// Largest capacity [`FixedTableStrategy`] will hand out.
pub const MAX_TABLED_CAPACITY: usize = CAPACITY_TABLE[CAPACITY_TABLE.len() - 1];

/// A growth policy.
///
/// Implementations must be pure: the same inputs always give the same
/// answer. When `current_capacity >= required_size` the current capacity
/// is returned unchanged; otherwise the result must be at least
/// `required_size`, or an [`Error::OutOfCapacity`].
pub trait CapacityStrategy {
    fn calculate_capacity(&self, current_capacity: usize, required_size: usize) -> Result<usize>;
}

impl<S: CapacityStrategy + ?Sized> CapacityStrategy for &S {
    #[inline]
    fn calculate_capacity(&self, current_capacity: usize, required_size: usize) -> Result<usize> {
        (**self).calculate_capacity(current_capacity, required_size)
    }
}

/// The default policy: the first entry of [`CAPACITY_TABLE`] that fits.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FixedTableStrategy;

impl CapacityStrategy for FixedTableStrategy {
    fn calculate_capacity(&self, current_capacity: usize, required_size: usize) -> Result<usize> {
        if current_capacity >= required_size {
            return Ok(current_capacity);
        }
        CAPACITY_TABLE
            .iter()
            .copied()
            .find(|&size| size >= required_size)
            .ok_or_else(|| Error::out_of_capacity(current_capacity, required_size))
    }
}

/// Grows through `2^n - 1` sizes without a fixed table, up to
/// `max_capacity`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DoublingStrategy {
    max_capacity: usize,
}

impl DoublingStrategy {
    pub const DEFAULT_MAX_CAPACITY: usize = (1 << 30) - 1;

    pub const fn new(max_capacity: usize) -> Self {
        Self { max_capacity }
    }

    pub fn max_capacity(&self) -> usize {
        self.max_capacity
    }
}

impl Default for DoublingStrategy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_CAPACITY)
    }
}

impl CapacityStrategy for DoublingStrategy {
    fn calculate_capacity(&self, current_capacity: usize, required_size: usize) -> Result<usize> {
        if current_capacity >= required_size {
            return Ok(current_capacity);
        }
        let mut size: usize = 3;
        while size < required_size {
            size = match size.checked_mul(2).and_then(|s| s.checked_add(1)) {
                Some(s) => s,
                None => return Err(Error::out_of_capacity(current_capacity, required_size)),
            };
        }
        if size > self.max_capacity {
            return Err(Error::out_of_capacity(current_capacity, required_size));
        }
        Ok(size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn fixed_table_is_idempotent_when_large_enough() {
        let s = FixedTableStrategy;
        assert_eq!(s.calculate_capacity(10, 10), Ok(10));
        assert_eq!(s.calculate_capacity(10, 3), Ok(10));
        assert_eq!(s.calculate_capacity(0, 0), Ok(0));
    }

    #[test]
    fn fixed_table_picks_smallest_fitting_entry() {
        let s = FixedTableStrategy;
        assert_eq!(s.calculate_capacity(10, 20), Ok(31));
        assert_eq!(s.calculate_capacity(0, 1), Ok(3));
        assert_eq!(s.calculate_capacity(3, 4), Ok(7));
        assert_eq!(s.calculate_capacity(0, 1023), Ok(1023));
        assert_eq!(s.calculate_capacity(0, 1024), Ok(2047));
        assert_eq!(
            s.calculate_capacity(0, MAX_TABLED_CAPACITY),
            Ok(MAX_TABLED_CAPACITY)
        );
    }

    #[test]
    fn fixed_table_fails_past_last_entry() {
        let s = FixedTableStrategy;
        assert_eq!(
            s.calculate_capacity(1_000_000, 2_000_000),
            Err(Error::OutOfCapacity {
                current_capacity: "1000000".to_string(),
                required_size: "2000000".to_string(),
            })
        );
        assert!(s.calculate_capacity(0, MAX_TABLED_CAPACITY + 1).is_err());
    }

    #[test]
    fn every_tabled_entry_is_a_mask() {
        for size in CAPACITY_TABLE {
            assert_eq!((size + 1).count_ones(), 1, "{size} is not 2^n - 1");
        }
        assert!(CAPACITY_TABLE.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn doubling_matches_table_below_ceiling() {
        let d = DoublingStrategy::default();
        let f = FixedTableStrategy;
        for required in [1, 2, 3, 4, 8, 100, 5000, 1_048_575] {
            assert_eq!(
                d.calculate_capacity(0, required),
                f.calculate_capacity(0, required)
            );
        }
        assert_eq!(d.calculate_capacity(0, 1_048_576), Ok(2_097_151));
    }

    #[test]
    fn doubling_respects_ceiling() {
        let d = DoublingStrategy::new(63);
        assert_eq!(d.calculate_capacity(31, 40), Ok(63));
        assert_eq!(
            d.calculate_capacity(63, 64),
            Err(Error::OutOfCapacity {
                current_capacity: "63".to_string(),
                required_size: "64".to_string(),
            })
        );
        assert!(DoublingStrategy::default()
            .calculate_capacity(0, usize::MAX)
            .is_err());
    }
}
