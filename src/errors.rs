//! Error types for blockverify
//!
//! Every error in this module ends the run. Data anomalies found while
//! verifying (mismatching or short blocks) are not errors; they are recorded
//! in the pass report and the scan continues.
//!
//! Error codes:
//! - BV_CONFIG_INVALID
//! - BV_DEVICE_PATH_MISSING
//! - BV_DEVICE_OPEN_FAILED
//! - BV_DEVICE_SIZE_FAILED
//! - BV_BLOCK_SIZE_INVALID
//! - BV_DEVICE_SIZE_INVALID
//! - BV_SEEK_FAILED
//! - BV_WRITE_FAILED
//! - BV_READ_FAILED
//! - BV_FLUSH_FAILED

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for blockverify operations
pub type VerifyResult<T> = Result<T, VerifyError>;

/// Which stage of the run an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Bad flags, bad geometry, unopenable device. Raised before any block I/O.
    Configuration,
    /// Device I/O failure during a pass
    Io,
}

impl ErrorClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorClass::Configuration => "CONFIGURATION",
            ErrorClass::Io => "IO",
        }
    }
}

/// Fatal run errors
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("'open' argument is required")]
    MissingDevicePath,

    #[error("failed to open device '{}': {source}", .path.display())]
    DeviceOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to determine size of '{}': {source}", .path.display())]
    SizeQuery {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("block size {block_size} is not an even multiple of hash size {digest_width}")]
    BlockSizeNotDigestMultiple { block_size: u64, digest_width: usize },

    #[error("block size {block_size} is not an even divisor of device size {total_bytes}")]
    DeviceSizeNotBlockMultiple { block_size: u64, total_bytes: u64 },

    #[error("failed to seek to block {block} (bs={block_size}): {source}")]
    Seek {
        block: u64,
        block_size: u64,
        #[source]
        source: io::Error,
    },

    #[error("block {block} (bs={block_size}) failed to write: {source}")]
    Write {
        block: u64,
        block_size: u64,
        #[source]
        source: io::Error,
    },

    #[error("failed to read block {block} (bs={block_size}): {source}")]
    Read {
        block: u64,
        block_size: u64,
        #[source]
        source: io::Error,
    },

    #[error("failed to flush device: {0}")]
    Flush(#[source] io::Error),
}

impl VerifyError {
    /// Stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            VerifyError::Config(_) => "BV_CONFIG_INVALID",
            VerifyError::MissingDevicePath => "BV_DEVICE_PATH_MISSING",
            VerifyError::DeviceOpen { .. } => "BV_DEVICE_OPEN_FAILED",
            VerifyError::SizeQuery { .. } => "BV_DEVICE_SIZE_FAILED",
            VerifyError::BlockSizeNotDigestMultiple { .. } => "BV_BLOCK_SIZE_INVALID",
            VerifyError::DeviceSizeNotBlockMultiple { .. } => "BV_DEVICE_SIZE_INVALID",
            VerifyError::Seek { .. } => "BV_SEEK_FAILED",
            VerifyError::Write { .. } => "BV_WRITE_FAILED",
            VerifyError::Read { .. } => "BV_READ_FAILED",
            VerifyError::Flush(_) => "BV_FLUSH_FAILED",
        }
    }

    /// Stage this error belongs to
    pub fn class(&self) -> ErrorClass {
        match self {
            VerifyError::Config(_)
            | VerifyError::MissingDevicePath
            | VerifyError::DeviceOpen { .. }
            | VerifyError::SizeQuery { .. }
            | VerifyError::BlockSizeNotDigestMultiple { .. }
            | VerifyError::DeviceSizeNotBlockMultiple { .. } => ErrorClass::Configuration,
            VerifyError::Seek { .. }
            | VerifyError::Write { .. }
            | VerifyError::Read { .. }
            | VerifyError::Flush(_) => ErrorClass::Io,
        }
    }

    /// Block index the error occurred at, if it happened mid-pass
    pub fn block(&self) -> Option<u64> {
        match self {
            VerifyError::Seek { block, .. }
            | VerifyError::Write { block, .. }
            | VerifyError::Read { block, .. } => Some(*block),
            _ => None,
        }
    }
}
