//! CLI module for blockverify
//!
//! Parses flags, resolves the run configuration and drives the write and
//! verify passes. All errors are fatal to the run.

mod args;
mod commands;

pub use args::Cli;
pub use commands::{run, run_cli, run_verification, RunSummary};
