//! Deterministic pattern source for blockverify
//!
//! The expected content of every block is recomputed from the seed by
//! replaying the hash chain in ascending block order. Nothing about the
//! pattern is stored on the device or elsewhere; the chain state is the only
//! checksum.
//!
//! # Invariants
//!
//! - Block size is a positive multiple of the digest width
//! - State is reset exactly once per pass and never mid-pass
//! - Two generators reset with the same seed produce identical streams

mod generator;

pub use generator::ChainGenerator;
