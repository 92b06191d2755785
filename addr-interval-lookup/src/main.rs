mod cli;

use std::borrow::Cow;
use std::io::{BufRead, BufWriter, Write};
use std::path::Path;

use addr_interval_map::{parse_address, AddressInfo, SymbolTable};
use anyhow::Context;
use clap::Parser;
use serde_json::json;

use cli::Opt;

fn main() {
    let opt = Opt::parse();
    init_logger(opt.verbose);
    if let Err(err) = run(&opt) {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn init_logger(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn run(opt: &Opt) -> anyhow::Result<()> {
    let data = std::fs::read(&opt.symbols)
        .with_context(|| format!("Could not read symbol file {:?}", opt.symbols))?;
    let table = SymbolTable::from_json_slice(&data)
        .with_context(|| format!("Could not load symbol file {:?}", opt.symbols))?;
    log::info!(
        "Loaded {} symbols ({} ranges) from {:?}",
        table.symbol_count(),
        table.range_count(),
        opt.symbols
    );

    let stdout = std::io::stdout();
    let mut w = BufWriter::new(stdout.lock());
    if opt.dump {
        dump_table(&mut w, &table)?;
        return Ok(w.flush()?);
    }

    if opt.addresses.is_empty() {
        for line in std::io::stdin().lock().lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let address = parse_address(&line)?;
            write_result(&mut w, opt, address, table.lookup(address).as_ref())?;
            // Flush per line so that this can be driven interactively.
            w.flush()?;
        }
    } else {
        for address in &opt.addresses {
            let address = parse_address(address)?;
            write_result(&mut w, opt, address, table.lookup(address).as_ref())?;
        }
    }
    Ok(w.flush()?)
}

fn dump_table(w: &mut impl Write, table: &SymbolTable) -> anyhow::Result<()> {
    writeln!(
        w,
        "Found {} symbols in {} address ranges.",
        table.symbol_count(),
        table.range_count()
    )?;
    for (range, symbol) in table.iter_symbols() {
        write!(w, "{:x}-{:x} {}", range.start, range.end, symbol.name)?;
        if let Some(file) = &symbol.file {
            write!(w, " ({file}")?;
            if let Some(line) = symbol.line {
                write!(w, ":{line}")?;
            }
            write!(w, ")")?;
        }
        writeln!(w)?;
    }
    Ok(())
}

fn write_result(
    w: &mut impl Write,
    opt: &Opt,
    address: u64,
    info: Option<&AddressInfo>,
) -> anyhow::Result<()> {
    if opt.json {
        let value = match info {
            Some(info) => serde_json::to_value(info)?,
            None => json!({ "address": format!("{address:#x}"), "name": null }),
        };
        writeln!(w, "{value}")?;
        return Ok(());
    }

    if opt.print_addresses {
        writeln!(w, "0x{address:016x}")?;
    }
    if opt.functions {
        match info {
            Some(info) => writeln!(w, "{}", info.name)?,
            None => writeln!(w, "??")?,
        }
    }
    let file = info.and_then(|info| info.file.as_deref());
    match file {
        Some(file) => {
            let path: Cow<'_, str> = if opt.basenames {
                Path::new(file)
                    .file_name()
                    .map_or_else(|| file.into(), |name| name.to_string_lossy())
            } else {
                file.into()
            };
            match info.and_then(|info| info.line) {
                Some(line) => writeln!(w, "{path}:{line}")?,
                None => writeln!(w, "{path}:?")?,
            }
        }
        None => writeln!(w, "??:?")?,
    }
    Ok(())
}
