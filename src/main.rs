//! blockverify CLI entry point
//!
//! Parses arguments and runs via `cli::run`, prints the error to stderr and
//! exits non-zero on failure. Mismatching blocks are not a failure.

use blockverify::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}: {}", e.code(), e);
        std::process::exit(1);
    }
}
