//! Run configuration
//!
//! Resolved once, before any I/O, from three layers in order of precedence:
//! command-line flags, an optional JSON config file, built-in defaults.
//! Immutable for the rest of the run.

mod file;

use std::path::{Path, PathBuf};

use sha2::Sha512;

use crate::chain::ChainGenerator;
use crate::errors::{VerifyError, VerifyResult};

pub use file::PartialConfig;

/// Seed absorbed when none is given
pub const DEFAULT_SEED: &str = "random";
/// Block size in bytes when none is given
pub const DEFAULT_BLOCK_SIZE: u64 = 512;

/// Fully resolved run configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub seed: String,
    pub device: PathBuf,
    pub block_size: u64,
    pub start_block: u64,
    /// Skip the write pass and only verify existing content
    pub check_only: bool,
}

impl RunConfig {
    /// Configuration for `device` with every other setting at its default
    pub fn for_device(device: impl Into<PathBuf>) -> Self {
        Self {
            seed: DEFAULT_SEED.to_string(),
            device: device.into(),
            block_size: DEFAULT_BLOCK_SIZE,
            start_block: 0,
            check_only: false,
        }
    }

    /// Resolves flags over an optional config file over defaults, then validates.
    pub fn resolve(flags: PartialConfig, config_file: Option<&Path>) -> VerifyResult<Self> {
        let layered = match config_file {
            Some(path) => flags.or(PartialConfig::load(path)?),
            None => flags,
        };

        let config = Self {
            seed: layered.seed.unwrap_or_else(|| DEFAULT_SEED.to_string()),
            device: layered.open.unwrap_or_default(),
            block_size: layered.bs.unwrap_or(DEFAULT_BLOCK_SIZE),
            start_block: layered.start.unwrap_or(0),
            check_only: layered.checkonly.unwrap_or(false),
        };
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings that would make the run meaningless.
    ///
    /// Device-size divisibility needs the opened device and is checked later,
    /// still before any block I/O.
    pub fn validate(&self) -> VerifyResult<()> {
        if self.device.as_os_str().is_empty() {
            return Err(VerifyError::MissingDevicePath);
        }
        if self.block_size == 0 {
            return Err(VerifyError::Config("bs must be > 0".to_string()));
        }
        if usize::try_from(self.block_size).is_err() {
            return Err(VerifyError::Config(format!(
                "bs {} does not fit in memory on this platform",
                self.block_size
            )));
        }
        ChainGenerator::<Sha512>::check_block_size(self.block_size)
    }
}
