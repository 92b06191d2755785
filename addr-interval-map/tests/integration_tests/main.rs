use std::ops::Range;
use std::path::PathBuf;

use addr_interval_map::{IntervalMap, SymbolTable};
use assert_json_diff::assert_json_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;

fn fixtures_dir() -> PathBuf {
    let this_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    this_dir.join("..").join("fixtures")
}

fn load_demo_table() -> anyhow::Result<SymbolTable> {
    let data = std::fs::read(fixtures_dir().join("symbols").join("demo.json"))?;
    Ok(SymbolTable::from_json_slice(&data)?)
}

#[test]
fn demo_symbol_file() -> anyhow::Result<()> {
    let table = load_demo_table()?;
    assert_eq!(table.symbol_count(), 5);
    assert_eq!(table.skipped_entry_count(), 1);
    assert_eq!(table.range_count(), 6);

    let ranges: Vec<(Range<u64>, &str)> = table
        .iter_symbols()
        .map(|(range, symbol)| (range, symbol.name.as_str()))
        .collect();
    assert_eq!(
        ranges,
        vec![
            (0x1000..0x1400, "main"),
            (0x1400..0x1480, "parse_args"),
            (0x2000..0x2200, "compute"),
            (0x2200..0x2300, "compute_inner_loop"),
            (0x2300..0x2700, "compute"),
            (0x2700..0x2900, "finish"),
        ]
    );

    assert_eq!(table.lookup(0x1480), None);
    assert_eq!(table.lookup(0x1fff), None);
    assert_eq!(table.lookup(0x2900), None);
    assert_eq!(table.lookup(0x2650).unwrap().offset, 0x650);
    Ok(())
}

#[test]
fn address_info_json() -> anyhow::Result<()> {
    let table = load_demo_table()?;
    let with_location = serde_json::to_value(table.lookup(0x2234).unwrap())?;
    assert_json_eq!(
        with_location,
        json!({
            "address": "0x2234",
            "name": "compute_inner_loop",
            "symbolAddress": "0x2200",
            "offset": "0x34",
            "file": "src/compute.c",
            "line": 87
        })
    );

    let without_location = serde_json::to_value(table.lookup(0x2780).unwrap())?;
    assert_json_eq!(
        without_location,
        json!({
            "address": "0x2780",
            "name": "finish",
            "symbolAddress": "0x2700",
            "offset": "0x80"
        })
    );
    Ok(())
}

#[test]
fn malformed_symbol_files() {
    let missing_prefix = br#"{ "symbols": [{ "start": "1000", "end": "0x1010", "name": "f" }] }"#;
    let err = SymbolTable::from_json_slice(missing_prefix).unwrap_err();
    assert_eq!(err.enum_as_string(), "InvalidSymbolFile");

    let not_json = b"1000 1010 f";
    assert!(SymbolTable::from_json_slice(not_json).is_err());

    let empty = br#"{ "symbols": [] }"#;
    let table = SymbolTable::from_json_slice(empty).unwrap();
    assert_eq!(table.range_count(), 0);
    assert_eq!(table.iter_symbols().count(), 0);
}

/// Checks the map against a per-key model after every `set`.
#[test]
fn random_overwrites_match_model() {
    const KEY_SPACE: u64 = 64;

    for seed in 0..50 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut map = IntervalMap::new();
        let mut model: Vec<Option<u32>> = vec![None; KEY_SPACE as usize + 2];

        for value in 0..40u32 {
            let start = rng.gen_range(0..KEY_SPACE);
            let limit = rng.gen_range(start + 1..=KEY_SPACE);
            map.set(start, limit, value).unwrap();
            for slot in &mut model[start as usize..limit as usize] {
                *slot = Some(value);
            }

            let ranges: Vec<(Range<u64>, u32)> = map.iter().map(|(r, v)| (r, *v)).collect();
            for pair in ranges.windows(2) {
                assert!(pair[0].0.end <= pair[1].0.start, "seed {seed}: overlap");
            }
            for (range, _) in &ranges {
                assert!(range.start < range.end, "seed {seed}: empty range");
            }

            for (key, expected) in model.iter().enumerate() {
                assert_eq!(
                    map.lookup(key as u64).copied(),
                    *expected,
                    "seed {seed}: lookup({key})"
                );
            }

            // Pieces of the same value are never adjacent, so every run of
            // equal values in the model is exactly one stored range.
            let mut runs = 0;
            let mut previous = None;
            for slot in &model {
                if slot.is_some() && *slot != previous {
                    runs += 1;
                }
                previous = *slot;
            }
            assert_eq!(map.len(), runs, "seed {seed}: len");

            for key in 0..=KEY_SPACE + 1 {
                let expected = ranges.iter().find(|(range, _)| range.end > key);
                let actual = map.find_next(key).map(|(r, v)| (r, *v));
                assert_eq!(actual.as_ref(), expected, "seed {seed}: find_next({key})");
            }

            let enumerated: Vec<(Range<u64>, u32)> =
                map.ranges_from(0).map(|(r, v)| (r, *v)).collect();
            assert_eq!(enumerated, ranges, "seed {seed}: ranges_from");
        }
    }
}
