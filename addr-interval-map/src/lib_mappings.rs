use crate::error::Error;
use crate::interval_map::IntervalMap;

/// Keeps track of mapped libraries in an address space. Stores a value
/// for each mapping, and allows efficient lookup of that value based on
/// an address.
///
/// Newer mappings take precedence: if a mapping is added on top of existing
/// mappings, the parts of the old mappings which are not covered by the new
/// one stay usable, and addresses in them still convert to the right
/// relative address.
#[derive(Debug, Clone)]
pub struct LibMappings<T> {
    map: IntervalMap<Mapping<T>>,
}

impl<T> Default for LibMappings<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LibMappings<T> {
    /// Creates a new empty instance.
    pub fn new() -> Self {
        Self {
            map: IntervalMap::new(),
        }
    }

    /// The number of mapped address ranges, counting each surviving piece of
    /// a partially overwritten mapping separately.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Clear all mappings.
    pub fn clear(&mut self) {
        self.map = IntervalMap::new();
    }

    /// Converts an absolute address (AVMA, actual virtual memory address) into
    /// a relative address and the mapping's associated value.
    ///
    /// Returns `None` if the address is not covered by a mapping, or if the
    /// relative address doesn't fit into a `u32`.
    pub fn convert_address(&self, avma: u64) -> Option<(u32, &T)> {
        let mapping = self.map.lookup(avma)?;
        let relative_address = u32::try_from(avma.wrapping_sub(mapping.base_avma)).ok()?;
        Some((relative_address, &mapping.value))
    }
}

impl<T: Clone> LibMappings<T> {
    /// Add a mapping to this address space. Any existing mappings which overlap
    /// with the new mapping are trimmed or split so that the new mapping wins.
    ///
    /// `start_avma` and `end_avma` describe the address range that this mapping
    /// occupies.
    ///
    /// AVMA = "actual virtual memory address"
    ///
    /// `relative_address_at_start` is the "relative address" which corresponds
    /// to `start_avma`, in the library that is mapped in this mapping. This is zero if
    /// `start_avma` is the base address of the library.
    ///
    /// Returns [`Error::EmptyRange`] if `end_avma <= start_avma`.
    pub fn add_mapping(
        &mut self,
        start_avma: u64,
        end_avma: u64,
        relative_address_at_start: u32,
        value: T,
    ) -> Result<(), Error> {
        // Store the library base instead of the start offset, so that the
        // pieces of a split mapping keep converting correctly.
        let base_avma = start_avma.wrapping_sub(u64::from(relative_address_at_start));
        self.map
            .set(start_avma, end_avma, Mapping { base_avma, value })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Mapping<T> {
    base_avma: u64,
    value: T,
}
