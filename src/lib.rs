//! blockverify - deterministic data-integrity tester for block devices
//!
//! Writes a seed-derived hash-chain pattern across a device, reads it back
//! and reports every block that does not match. No checksums are stored: the
//! expected content of any block is recomputed from the seed.

pub mod chain;
pub mod cli;
pub mod config;
pub mod device;
pub mod errors;
pub mod observability;
pub mod scanner;
