use std::ops::Range;

use serde_derive::{Deserialize, Serialize};

use crate::error::Error;
use crate::hex::{as_hex_string, from_prefixed_hex_str};
use crate::interval_map::IntervalMap;

/// One symbol record of a symbol file: the address range `[start, end)` that
/// the symbol occupies, its name, and optionally where it was defined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolEntry {
    #[serde(
        serialize_with = "as_hex_string",
        deserialize_with = "from_prefixed_hex_str"
    )]
    pub start: u64,
    #[serde(
        serialize_with = "as_hex_string",
        deserialize_with = "from_prefixed_hex_str"
    )]
    pub end: u64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

#[derive(Deserialize)]
struct SymbolFile {
    symbols: Vec<SymbolEntry>,
}

/// The result of a successful [`SymbolTable::lookup`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressInfo {
    #[serde(serialize_with = "as_hex_string")]
    pub address: u64,
    pub name: String,
    /// The start address of the symbol, as given in the symbol file.
    #[serde(serialize_with = "as_hex_string")]
    pub symbol_address: u64,
    #[serde(serialize_with = "as_hex_string")]
    pub offset: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

/// Resolves addresses to symbols.
///
/// Symbols are added in input order, and a later symbol overrides an earlier
/// one wherever the two overlap. An earlier symbol that is partially covered
/// keeps answering for the addresses outside of the later symbol.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    symbols: Vec<SymbolEntry>,
    map: IntervalMap<usize>,
    skipped_entry_count: usize,
}

impl SymbolTable {
    pub fn from_entries(entries: impl IntoIterator<Item = SymbolEntry>) -> Self {
        let mut symbols = Vec::new();
        let mut map = IntervalMap::new();
        let mut skipped_entry_count = 0;
        for entry in entries {
            match map.set(entry.start, entry.end, symbols.len()) {
                Ok(()) => symbols.push(entry),
                Err(e) => {
                    log::warn!("Skipping symbol {}: {}", entry.name, e);
                    skipped_entry_count += 1;
                }
            }
        }
        log::debug!(
            "Built symbol table with {} symbols in {} ranges, skipped {} entries",
            symbols.len(),
            map.len(),
            skipped_entry_count
        );
        Self {
            symbols,
            map,
            skipped_entry_count,
        }
    }

    /// Parses a JSON symbol file of the form
    /// `{ "symbols": [{ "start": "0x1000", "end": "0x1040", "name": "main" }] }`.
    pub fn from_json_slice(data: &[u8]) -> Result<Self, Error> {
        let file: SymbolFile = serde_json::from_slice(data)?;
        Ok(Self::from_entries(file.symbols))
    }

    /// The number of symbols that were added. Symbols which were completely
    /// overwritten by later symbols are still counted.
    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }

    /// The number of disjoint address ranges that resolve to a symbol.
    pub fn range_count(&self) -> usize {
        self.map.len()
    }

    /// The number of input entries with an empty or inverted address range.
    pub fn skipped_entry_count(&self) -> usize {
        self.skipped_entry_count
    }

    pub fn lookup(&self, address: u64) -> Option<AddressInfo> {
        let symbol = &self.symbols[*self.map.lookup(address)?];
        Some(AddressInfo {
            address,
            name: symbol.name.clone(),
            symbol_address: symbol.start,
            offset: address - symbol.start,
            file: symbol.file.clone(),
            line: symbol.line,
        })
    }

    /// Iterates over every address range that resolves to a symbol, in
    /// ascending order, together with the symbol it resolves to.
    pub fn iter_symbols(&self) -> impl Iterator<Item = (Range<u64>, &SymbolEntry)> + '_ {
        self.map
            .ranges_from(0)
            .map(|(range, index)| (range, &self.symbols[*index]))
    }
}
