//! retail-oms CLI entry point
//!
//! Parses arguments, delegates to the CLI module and exits non-zero on
//! failure.

use retail_oms::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}: {}", e.code(), e);
        std::process::exit(1);
    }
}
