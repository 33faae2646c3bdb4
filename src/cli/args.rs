//! CLI argument definitions using clap
//!
//! blockverify --open <path> [--seed <text>] [--bs <bytes>] [--start <block>]
//!             [--checkonly] [--config <file>]

use clap::Parser;
use std::path::PathBuf;

use crate::config::PartialConfig;

/// Write a deterministic hash-chain pattern to a block device, then read it
/// back and report every block that does not match
#[derive(Parser, Debug)]
#[command(name = "blockverify")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Seed for the unique pattern to write [default: random]
    #[arg(long)]
    pub seed: Option<String>,

    /// Block device or file to open for writing and reading
    #[arg(long)]
    pub open: Option<PathBuf>,

    /// Block size in bytes, a multiple of 64 [default: 512]
    #[arg(long)]
    pub bs: Option<u64>,

    /// First block index to process [default: 0]
    #[arg(long)]
    pub start: Option<u64>,

    /// Skip the write pass and only verify existing content
    #[arg(long)]
    pub checkonly: bool,

    /// JSON file supplying values for flags not given on the command line
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// Flags given on the command line, as the top configuration layer
    pub fn to_partial(&self) -> PartialConfig {
        PartialConfig {
            seed: self.seed.clone(),
            open: self.open.clone(),
            bs: self.bs,
            start: self.start,
            checkonly: self.checkonly.then_some(true),
        }
    }
}
