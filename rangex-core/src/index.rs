//! Immutable range index sorted by start with a max-span pruning bound
//!
//! Entries are kept in one contiguous buffer sorted ascending by `start`.
//! A single scalar, the largest span of any stored entry, bounds how far
//! left of a query a matching entry can begin:
//!
//! ```text
//! start < from - max_span  =>  end = start + span <= start + max_span < from
//! ```
//!
//! so a query binary-searches for the first start `>= from - max_span` and
//! scans forward until a start passes `to`. Queries take `&self` and touch
//! no shared mutable state, so any number may run concurrently.

use alloc::vec::Vec;
use core::iter::FusedIterator;
use core::slice;

use crate::entry::RangeEntry;
use crate::traits::Bound;

/// Build-once, query-many index over closed ranges
#[derive(Debug, Clone, PartialEq)]
pub struct RangeIndex<T, V> {
    /// Entries sorted ascending by `start`
    entries: Vec<RangeEntry<T, V>>,
    /// Largest `end - start` among well-formed entries, zero if none
    max_span: T,
}

impl<T: Bound, V> RangeIndex<T, V> {
    /// Build an index from any finite collection of entries
    ///
    /// The input may be empty, unsorted, or contain duplicates. Sorting is
    /// stable, so entries with equal starts keep their input order.
    pub fn build<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = RangeEntry<T, V>>,
    {
        let mut entries: Vec<RangeEntry<T, V>> = entries.into_iter().collect();
        entries.sort_by(|a, b| a.start.order(&b.start));

        // Malformed entries (end < start) are skipped so unsigned types never
        // underflow; they can only match queries lying left of their start.
        let mut max_span = T::zero();
        for entry in &entries {
            if entry.end > entry.start {
                let span = entry.span();
                if span > max_span {
                    max_span = span;
                }
            }
        }

        Self { entries, max_span }
    }

    /// All entries overlapping `[from, to]`, in ascending start order
    ///
    /// Touching boundaries count as overlap. An inverted query (`from > to`)
    /// is evaluated literally and usually matches nothing.
    pub fn query_range(&self, from: T, to: T) -> Vec<&RangeEntry<T, V>> {
        self.overlapping(from, to).collect()
    }

    /// All entries containing `point`, in ascending start order
    pub fn query_point(&self, point: T) -> Vec<&RangeEntry<T, V>> {
        self.containing(point).collect()
    }

    /// Lazily iterate the entries overlapping `[from, to]`
    pub fn overlapping(&self, from: T, to: T) -> Overlapping<'_, T, V> {
        let first = self.scan_start(from);
        Overlapping {
            remaining: self.entries[first..].iter(),
            from,
            to,
        }
    }

    /// Lazily iterate the entries containing `point`
    pub fn containing(&self, point: T) -> Containing<'_, T, V> {
        let first = self.scan_start(point);
        Containing {
            remaining: self.entries[first..].iter(),
            point,
        }
    }

    /// Number of entries overlapping `[from, to]`
    pub fn count_range(&self, from: T, to: T) -> usize {
        self.overlapping(from, to).count()
    }

    /// Number of entries containing `point`
    pub fn count_point(&self, point: T) -> usize {
        self.containing(point).count()
    }

    /// Start of the first sorted entry, or zero when empty
    pub fn lower_bound(&self) -> T {
        self.entries.first().map_or_else(T::zero, |entry| entry.start)
    }

    /// End of the entry with the greatest start, or zero when empty
    ///
    /// This is not necessarily the largest `end` in the index: a long
    /// entry that starts earlier can reach further right.
    pub fn upper_bound(&self) -> T {
        self.entries.last().map_or_else(T::zero, |entry| entry.end)
    }

    /// The pruning bound: largest span among stored entries
    pub fn max_span(&self) -> T {
        self.max_span
    }

    /// Index of the first entry whose start is `>= anchor - max_span`
    #[inline]
    fn scan_start(&self, anchor: T) -> usize {
        let floor = anchor.scan_floor(self.max_span);
        self.entries.partition_point(|entry| entry.start < floor)
    }
}

impl<T, V> RangeIndex<T, V> {
    /// Number of stored entries
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate all entries in ascending start order
    ///
    /// The iterator is cheap to clone and can be restarted by calling
    /// `values` again; the underlying buffer never changes.
    pub fn values(&self) -> slice::Iter<'_, RangeEntry<T, V>> {
        self.entries.iter()
    }

    /// All entries as a sorted slice
    pub fn as_slice(&self) -> &[RangeEntry<T, V>] {
        &self.entries
    }

    /// Consume the index, returning the sorted entries
    pub fn into_entries(self) -> Vec<RangeEntry<T, V>> {
        self.entries
    }
}

impl<T: Bound, V> Default for RangeIndex<T, V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            max_span: T::zero(),
        }
    }
}

impl<T: Bound, V> FromIterator<RangeEntry<T, V>> for RangeIndex<T, V> {
    fn from_iter<I: IntoIterator<Item = RangeEntry<T, V>>>(iter: I) -> Self {
        Self::build(iter)
    }
}

impl<T: Bound, V> From<Vec<RangeEntry<T, V>>> for RangeIndex<T, V> {
    fn from(entries: Vec<RangeEntry<T, V>>) -> Self {
        Self::build(entries)
    }
}

impl<'a, T, V> IntoIterator for &'a RangeIndex<T, V> {
    type Item = &'a RangeEntry<T, V>;
    type IntoIter = slice::Iter<'a, RangeEntry<T, V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.values()
    }
}

/// Iterator over entries overlapping a query interval
///
/// Created by [`RangeIndex::overlapping`].
pub struct Overlapping<'a, T, V> {
    remaining: slice::Iter<'a, RangeEntry<T, V>>,
    from: T,
    to: T,
}

impl<'a, T: Bound, V> Iterator for Overlapping<'a, T, V> {
    type Item = &'a RangeEntry<T, V>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(entry) = self.remaining.next() {
            if entry.start > self.to {
                self.remaining = Default::default();
                return None;
            }
            if entry.overlaps_interval(self.from, self.to) {
                return Some(entry);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining.len()))
    }
}

impl<T: Bound, V> FusedIterator for Overlapping<'_, T, V> {}

impl<T: Copy, V> Clone for Overlapping<'_, T, V> {
    fn clone(&self) -> Self {
        Self {
            remaining: self.remaining.clone(),
            from: self.from,
            to: self.to,
        }
    }
}

/// Iterator over entries containing a query point
///
/// Created by [`RangeIndex::containing`].
pub struct Containing<'a, T, V> {
    remaining: slice::Iter<'a, RangeEntry<T, V>>,
    point: T,
}

impl<'a, T: Bound, V> Iterator for Containing<'a, T, V> {
    type Item = &'a RangeEntry<T, V>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(entry) = self.remaining.next() {
            if entry.start > self.point {
                self.remaining = Default::default();
                return None;
            }
            if entry.contains(self.point) {
                return Some(entry);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining.len()))
    }
}

impl<T: Bound, V> FusedIterator for Containing<'_, T, V> {}

impl<T: Copy, V> Clone for Containing<'_, T, V> {
    fn clone(&self) -> Self {
        Self {
            remaining: self.remaining.clone(),
            point: self.point,
        }
    }
}
