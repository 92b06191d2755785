use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    name = "addr-interval-lookup",
    version,
    about = r#"
addr-interval-lookup resolves code addresses to symbols, using a JSON symbol file.
Later entries in the symbol file take precedence over earlier ones where they overlap.

EXAMPLES:
    # Look up two addresses, printing function names and source locations:
    addr-interval-lookup -e symbols.json -f 0x1234 0x5678

    # Read addresses from stdin and print one JSON object per address:
    cat addrs.txt | addr-interval-lookup -e symbols.json --json

    # List every address range in the symbol file:
    addr-interval-lookup -e symbols.json --dump
"#
)]
pub struct Opt {
    /// Path to the JSON symbol file.
    #[arg(short = 'e', long = "symbols", value_name = "FILE")]
    pub symbols: PathBuf,

    /// Addresses to look up, in hex. If none are given, addresses are read
    /// from stdin, one per line.
    #[arg(conflicts_with = "dump")]
    pub addresses: Vec<String>,

    /// Display function names as well as file and line number information.
    #[arg(short, long)]
    pub functions: bool,

    /// Display the address before the function name, file and line number
    /// information.
    #[arg(short = 'a', long = "addresses")]
    pub print_addresses: bool,

    /// Display only the base of each file name.
    #[arg(short = 's', long)]
    pub basenames: bool,

    /// Print one JSON object per address instead of text.
    #[arg(long, conflicts_with_all = ["functions", "print_addresses", "basenames"])]
    pub json: bool,

    /// Print every address range of the symbol file, in ascending order.
    #[arg(long)]
    pub dump: bool,

    /// Print debugging output.
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Opt::command().debug_assert();
    }

    #[test]
    fn parse_lookup_args() {
        let opt = Opt::parse_from(["addr-interval-lookup", "-e", "syms.json", "-fa", "0x10", "20"]);
        assert_eq!(opt.symbols, PathBuf::from("syms.json"));
        assert_eq!(opt.addresses, vec!["0x10", "20"]);
        assert!(opt.functions);
        assert!(opt.print_addresses);
        assert!(!opt.json);

        let opt_res =
            Opt::try_parse_from(["addr-interval-lookup", "-e", "syms.json", "--dump", "0x10"]);
        assert!(opt_res.is_err(), "--dump doesn't take addresses");

        let opt_res =
            Opt::try_parse_from(["addr-interval-lookup", "-e", "syms.json", "--json", "-f"]);
        assert!(opt_res.is_err(), "--json can't be combined with text options");

        let opt_res = Opt::try_parse_from(["addr-interval-lookup", "0x10"]);
        assert!(opt_res.is_err(), "the symbol file is required");
    }
}
