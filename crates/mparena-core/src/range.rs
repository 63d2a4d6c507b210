//! The 1-based inclusive handle range.
//!
//! A [`Range`] is the only way code outside the pool names numeric
//! values. It is a plain pair of integers so it can cross a boundary
//! that only understands numbers; validity is always relative to the
//! current pool size and is checked by [`Range::is_valid`] before any
//! slot is dereferenced.

use std::fmt;

/// A 1-based, inclusive `[start, end]` range of pool slots.
///
/// Construction does not validate: a `Range` decoded from the host may
/// be empty, reversed or out of bounds. Use [`is_valid`](Range::is_valid)
/// against the pool size before calling [`len`](Range::len) or
/// converting to slice indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Range {
    /// First slot (1-based).
    pub start: usize,
    /// Last slot (1-based, inclusive).
    pub end: usize,
}

impl Range {
    /// Create a range from its bounds.
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// A range covering exactly one slot.
    pub const fn single(index: usize) -> Self {
        Self::new(index, index)
    }

    /// Whether `1 <= start <= end <= size`.
    pub fn is_valid(&self, size: usize) -> bool {
        1 <= self.start && self.start <= self.end && self.end <= size
    }

    /// Number of slots covered, `end - start + 1`.
    ///
    /// Only meaningful when `start <= end`; a reversed range reports 0.
    pub fn len(&self) -> usize {
        if self.start > self.end {
            0
        } else {
            self.end - self.start + 1
        }
    }

    /// Whether the range is reversed and therefore covers nothing.
    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    /// Zero-based half-open slice bounds for a validated range.
    pub fn to_slice_bounds(&self) -> std::ops::Range<usize> {
        (self.start - 1)..self.end
    }

    /// Whether the two ranges share at least one slot.
    pub fn overlaps(&self, other: &Range) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Whether `other` begins right after `self` ends or vice versa.
    pub fn is_adjacent(&self, other: &Range) -> bool {
        self.end.checked_add(1) == Some(other.start) || other.end.checked_add(1) == Some(self.start)
    }

    /// Smallest range covering both inputs.
    pub fn union(&self, other: &Range) -> Range {
        Range::new(self.start.min(other.start), self.end.max(other.end))
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}:{}]", self.start, self.end)
    }
}

impl From<(usize, usize)> for Range {
    fn from((start, end): (usize, usize)) -> Self {
        Self::new(start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn zero_start_is_invalid() {
        assert!(!Range::new(0, 3).is_valid(10));
    }

    #[test]
    fn end_past_size_is_invalid() {
        assert!(Range::new(8, 11).is_valid(11));
        assert!(!Range::new(8, 12).is_valid(11));
    }

    #[test]
    fn reversed_range_is_invalid_and_empty() {
        let r = Range::new(5, 4);
        assert!(!r.is_valid(10));
        assert!(r.is_empty());
        assert_eq!(r.len(), 0);
    }

    #[test]
    fn slice_bounds_are_zero_based() {
        assert_eq!(Range::new(3, 5).to_slice_bounds(), 2..5);
    }

    #[test]
    fn adjacency_is_symmetric() {
        let a = Range::new(1, 4);
        let b = Range::new(5, 9);
        assert!(a.is_adjacent(&b));
        assert!(b.is_adjacent(&a));
        assert!(!a.overlaps(&b));
        assert_eq!(a.union(&b), Range::new(1, 9));
    }

    #[test]
    fn display_uses_colon_notation() {
        assert_eq!(Range::new(2, 7).to_string(), "[2:7]");
    }

    proptest! {
        #[test]
        fn validity_matches_definition(s in 0usize..40, e in 0usize..40, size in 0usize..40) {
            let expected = 1 <= s && s <= e && e <= size;
            prop_assert_eq!(Range::new(s, e).is_valid(size), expected);
        }

        #[test]
        fn valid_range_len_matches_bounds(s in 1usize..100, n in 1usize..100) {
            let r = Range::new(s, s + n - 1);
            prop_assert!(r.is_valid(s + n - 1));
            prop_assert_eq!(r.len(), n);
            prop_assert_eq!(r.to_slice_bounds().len(), n);
        }
    }
}
