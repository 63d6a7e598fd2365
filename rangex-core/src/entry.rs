//! Closed numeric interval carrying an opaque payload

use crate::traits::Bound;

/// A closed interval `[start, end]` with an associated value
///
/// Both bounds are inclusive. The index assumes `start <= end` but never
/// checks it: predicates are applied literally to whatever is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RangeEntry<T, V> {
    /// Inclusive lower bound
    pub start: T,
    /// Inclusive upper bound
    pub end: T,
    /// Payload, opaque to the index
    pub value: V,
}

impl<T, V> RangeEntry<T, V> {
    /// Create a new range entry
    pub const fn new(start: T, end: T, value: V) -> Self {
        Self { start, end, value }
    }

    /// Replace the payload, keeping the bounds
    pub fn map_value<W, F: FnOnce(V) -> W>(self, f: F) -> RangeEntry<T, W> {
        RangeEntry {
            start: self.start,
            end: self.end,
            value: f(self.value),
        }
    }

    /// Borrow the payload, keeping the bounds
    pub fn as_borrowed(&self) -> RangeEntry<T, &V>
    where
        T: Copy,
    {
        RangeEntry {
            start: self.start,
            end: self.end,
            value: &self.value,
        }
    }
}

impl<T: Bound, V> RangeEntry<T, V> {
    /// Length of the interval, `end - start`
    #[inline]
    pub fn span(&self) -> T {
        self.end - self.start
    }

    /// Check whether two closed intervals intersect
    ///
    /// Touching boundaries count: `[0, 5]` overlaps `[5, 9]`.
    #[inline]
    pub fn overlaps<W>(&self, other: &RangeEntry<T, W>) -> bool {
        self.overlaps_interval(other.start, other.end)
    }

    /// Check whether this interval intersects `[from, to]`
    #[inline]
    pub fn overlaps_interval(&self, from: T, to: T) -> bool {
        self.start <= to && from <= self.end
    }

    /// Check whether `point` lies in `[start, end]`
    #[inline]
    pub fn contains(&self, point: T) -> bool {
        self.start <= point && point <= self.end
    }

    /// Whether `start <= end`
    pub fn is_well_formed(&self) -> bool {
        self.start <= self.end
    }
}

impl<T, V> From<(T, T, V)> for RangeEntry<T, V> {
    fn from((start, end, value): (T, T, V)) -> Self {
        Self::new(start, end, value)
    }
}

impl<T, V> From<RangeEntry<T, V>> for (T, T, V) {
    fn from(entry: RangeEntry<T, V>) -> Self {
        (entry.start, entry.end, entry.value)
    }
}
