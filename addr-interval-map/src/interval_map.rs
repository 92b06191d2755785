use std::ops::Range;

use crate::error::Error;
use crate::store::{Entry, SortedStore};

/// Maps non-overlapping half-open address ranges `[start, limit)` to values.
///
/// Ranges are inserted with [`IntervalMap::set`], which always wins against
/// what is already stored: existing ranges that intersect the new range are
/// trimmed, split in two, or dropped, so that afterwards exactly the new
/// range covers `[start, limit)`. Parts of older ranges outside the new range
/// keep their old values.
///
/// Adjacent ranges are never merged, even if their values are equal.
///
/// ```
/// use addr_interval_map::IntervalMap;
///
/// let mut map = IntervalMap::new();
/// map.set(0x1000, 0x2000, "libxul.so")?;
/// map.set(0x1800, 0x1900, "jit code")?;
///
/// assert_eq!(map.len(), 3);
/// assert_eq!(map.lookup(0x17ff), Some(&"libxul.so"));
/// assert_eq!(map.lookup(0x1850), Some(&"jit code"));
/// assert_eq!(map.lookup(0x1900), Some(&"libxul.so"));
/// assert_eq!(map.lookup(0x2000), None);
/// # Ok::<(), addr_interval_map::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct IntervalMap<T> {
    store: SortedStore<T>,
}

impl<T> Default for IntervalMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> IntervalMap<T> {
    /// Creates a new empty map.
    pub fn new() -> Self {
        Self {
            store: SortedStore::new(),
        }
    }

    /// The number of stored ranges. Every surviving piece of a split range
    /// counts separately.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.len() == 0
    }

    /// Returns the value of the range which covers `key`, if any.
    pub fn lookup(&self, key: u64) -> Option<&T> {
        self.lookup_entry(key).map(|(_range, value)| value)
    }

    /// Like [`IntervalMap::lookup`], but also returns the covering range.
    pub fn lookup_entry(&self, key: u64) -> Option<(Range<u64>, &T)> {
        let entry = self.store.floor(key)?;
        if key < entry.limit {
            Some((entry.range(), &entry.value))
        } else {
            None
        }
    }

    /// Returns the first range, in ascending order, whose limit is above `key`.
    ///
    /// If `key` is covered by a range, that range is returned. Otherwise this
    /// is the first range which starts after `key`.
    pub fn find_next(&self, key: u64) -> Option<(Range<u64>, &T)> {
        let entry = match self.store.floor(key) {
            Some(floor) if floor.limit > key => floor,
            Some(_) => self.store.successor(key)?,
            None => self.store.ceiling(key)?,
        };
        Some((entry.range(), &entry.value))
    }

    /// Iterates over all ranges in ascending order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.store.iter(),
        }
    }

    /// Enumerates the ranges with a limit above `key` by calling
    /// [`IntervalMap::find_next`] repeatedly, each time with the limit of the
    /// previously returned range.
    pub fn ranges_from(&self, key: u64) -> RangesFrom<'_, T> {
        RangesFrom {
            map: self,
            next_key: Some(key),
        }
    }

    /// The index run of stored entries which intersect `[start, limit)`.
    fn overlapping_indexes(&self, start: u64, limit: u64) -> Range<usize> {
        let run = self.store.index_range(start, limit);
        match self.store.floor(start) {
            Some(floor) if floor.start < start && floor.limit > start => (run.start - 1)..run.end,
            _ => run,
        }
    }
}

impl<T: Clone> IntervalMap<T> {
    /// Stores `value` for `[start, limit)`, overwriting whatever was stored
    /// for any part of that range before.
    ///
    /// Returns [`Error::EmptyRange`] without touching the map if
    /// `start >= limit`.
    pub fn set(&mut self, start: u64, limit: u64, value: T) -> Result<(), Error> {
        if start >= limit {
            return Err(Error::EmptyRange { start, limit });
        }

        let new_entry = Entry {
            start,
            limit,
            value,
        };
        let overlapping = self.overlapping_indexes(start, limit);
        if overlapping.is_empty() {
            self.store.insert(new_entry);
            return Ok(());
        }

        // Take out every overlapping entry before putting anything back, so
        // that the store never holds two overlapping ranges.
        let insertion_index = overlapping.start;
        let removed = self.store.splice(overlapping, std::iter::empty());

        // Only the first removed entry can stick out on the left, and only
        // the last one can stick out on the right.
        let mut left_remainder = None;
        let mut right_remainder = None;
        for old in removed {
            match (old.start < start, old.limit > limit) {
                (true, true) => {
                    log::trace!(
                        "Splitting {:#x}..{:#x} around {:#x}..{:#x}",
                        old.start,
                        old.limit,
                        start,
                        limit
                    );
                    left_remainder = Some(Entry {
                        start: old.start,
                        limit: start,
                        value: old.value.clone(),
                    });
                    right_remainder = Some(Entry {
                        start: limit,
                        limit: old.limit,
                        value: old.value,
                    });
                }
                (true, false) => {
                    log::trace!(
                        "Truncating {:#x}..{:#x} to end at {:#x}",
                        old.start,
                        old.limit,
                        start
                    );
                    left_remainder = Some(Entry {
                        start: old.start,
                        limit: start,
                        value: old.value,
                    });
                }
                (false, true) => {
                    log::trace!(
                        "Truncating {:#x}..{:#x} to start at {:#x}",
                        old.start,
                        old.limit,
                        limit
                    );
                    right_remainder = Some(Entry {
                        start: limit,
                        limit: old.limit,
                        value: old.value,
                    });
                }
                (false, false) => {
                    log::trace!("Dropping subsumed {:#x}..{:#x}", old.start, old.limit);
                }
            }
        }

        let pieces = left_remainder
            .into_iter()
            .chain(std::iter::once(new_entry))
            .chain(right_remainder);
        self.store
            .splice(insertion_index..insertion_index, pieces);
        Ok(())
    }
}

/// Iterator over all ranges of an [`IntervalMap`], in ascending order.
#[derive(Debug, Clone)]
pub struct Iter<'a, T> {
    inner: std::slice::Iter<'a, Entry<T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (Range<u64>, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|e| (e.range(), &e.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|e| (e.range(), &e.value))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<'a, T> IntoIterator for &'a IntervalMap<T> {
    type Item = (Range<u64>, &'a T);
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator returned by [`IntervalMap::ranges_from`].
#[derive(Debug, Clone)]
pub struct RangesFrom<'a, T> {
    map: &'a IntervalMap<T>,
    next_key: Option<u64>,
}

impl<'a, T> Iterator for RangesFrom<'a, T> {
    type Item = (Range<u64>, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let key = self.next_key?;
        match self.map.find_next(key) {
            Some((range, value)) => {
                self.next_key = Some(range.end);
                Some((range, value))
            }
            None => {
                self.next_key = None;
                None
            }
        }
    }
}
