//! This crate provides [`IntervalMap`], a map from non-overlapping address
//! ranges to values, with "last write wins" semantics on overlap.
//!
//! It is the index that symbolication uses to answer "which symbol / which
//! library covers this address?". Two such consumers are included:
//!
//!  - [`LibMappings`] tracks the libraries mapped into a process address
//!    space and converts absolute addresses into library-relative addresses.
//!  - [`SymbolTable`] resolves addresses to symbol names, with optional file
//!    and line information, and can be loaded from a JSON symbol file.
//!
//! `IntervalMap` does no I/O and no locking. If you share one between threads,
//! wrap it in a lock; `&IntervalMap` lookups are fine to do concurrently.
//!
//! # Example
//!
//! ```
//! use addr_interval_map::SymbolTable;
//!
//! let table = SymbolTable::from_json_slice(br#"{
//!     "symbols": [
//!         { "start": "0x1000", "end": "0x1100", "name": "main", "file": "main.c", "line": 3 },
//!         { "start": "0x1040", "end": "0x1050", "name": "inlined" }
//!     ]
//! }"#)?;
//!
//! let info = table.lookup(0x1060).unwrap();
//! assert_eq!(info.name, "main");
//! assert_eq!(info.offset, 0x60);
//! assert_eq!(table.lookup(0x1044).unwrap().name, "inlined");
//! assert!(table.lookup(0x2000).is_none());
//! # Ok::<(), addr_interval_map::Error>(())
//! ```

mod error;
mod hex;
mod interval_map;
mod lib_mappings;
mod store;
mod symbol_table;

pub use crate::error::Error;
pub use crate::hex::{as_hex_string, from_prefixed_hex_str, parse_address};
pub use crate::interval_map::{IntervalMap, Iter, RangesFrom};
pub use crate::lib_mappings::LibMappings;
pub use crate::symbol_table::{AddressInfo, SymbolEntry, SymbolTable};
