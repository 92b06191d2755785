use std::ops::Range;

/// A stored half-open range `[start, limit)` and its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Entry<T> {
    pub start: u64,
    pub limit: u64,
    pub value: T,
}

impl<T> Entry<T> {
    pub fn range(&self) -> Range<u64> {
        self.start..self.limit
    }
}

/// Entries sorted by their start key, in a plain `Vec`.
///
/// Lookups are binary searches. Mutations shift the tail of the vector, which
/// is fine for the build-once, query-often pattern of symbol tables and
/// library mappings.
///
/// The store itself does not know about limits; keeping the entries
/// non-overlapping is the job of `IntervalMap::set`.
#[derive(Debug, Clone)]
pub(crate) struct SortedStore<T> {
    sorted_entries: Vec<Entry<T>>,
}

impl<T> Default for SortedStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SortedStore<T> {
    pub fn new() -> Self {
        Self {
            sorted_entries: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.sorted_entries.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entry<T>> {
        self.sorted_entries.iter()
    }

    /// The index of the entry with the largest start that is `<= key`.
    pub fn floor_index(&self, key: u64) -> Option<usize> {
        match self
            .sorted_entries
            .binary_search_by_key(&key, |e| e.start)
        {
            Ok(exact_match) => Some(exact_match),
            Err(0) => None,
            Err(insertion_index) => Some(insertion_index - 1),
        }
    }

    /// The index of the first entry whose start is `>= key`. Equal to `len()`
    /// if there is no such entry.
    pub fn ceiling_index(&self, key: u64) -> usize {
        self.sorted_entries.partition_point(|e| e.start < key)
    }

    pub fn floor(&self, key: u64) -> Option<&Entry<T>> {
        self.floor_index(key).map(|i| &self.sorted_entries[i])
    }

    pub fn ceiling(&self, key: u64) -> Option<&Entry<T>> {
        self.sorted_entries.get(self.ceiling_index(key))
    }

    /// The entry with the smallest start that is `> key`.
    pub fn successor(&self, key: u64) -> Option<&Entry<T>> {
        let index = self.sorted_entries.partition_point(|e| e.start <= key);
        self.sorted_entries.get(index)
    }

    /// The run of indexes whose entries start in `start_lo..start_hi`.
    pub fn index_range(&self, start_lo: u64, start_hi: u64) -> Range<usize> {
        let begin = self.ceiling_index(start_lo);
        let end = self.ceiling_index(start_hi).max(begin);
        begin..end
    }

    /// Inserts the entry at its sorted position. An existing entry with the
    /// same start is replaced and returned.
    pub fn insert(&mut self, entry: Entry<T>) -> Option<Entry<T>> {
        match self
            .sorted_entries
            .binary_search_by_key(&entry.start, |e| e.start)
        {
            Ok(i) => Some(std::mem::replace(&mut self.sorted_entries[i], entry)),
            Err(i) => {
                self.sorted_entries.insert(i, entry);
                None
            }
        }
    }

    /// Replaces the entries at `indexes` with `replacement`, returning the
    /// removed entries in ascending order.
    ///
    /// The caller must make sure that the replacement is sorted and fits
    /// between the neighbors of the replaced run.
    pub fn splice(
        &mut self,
        indexes: Range<usize>,
        replacement: impl IntoIterator<Item = Entry<T>>,
    ) -> Vec<Entry<T>> {
        self.sorted_entries.splice(indexes, replacement).collect()
    }
}
