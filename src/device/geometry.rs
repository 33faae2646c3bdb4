//! Block layout of a device
//!
//! total bytes = block size × block count. A trailing short block is not
//! supported.

use crate::errors::{VerifyError, VerifyResult};

/// Fixed block layout of the store under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockGeometry {
    block_size: u64,
    block_count: u64,
}

impl BlockGeometry {
    /// Builds the layout for a store of `total_bytes` split into `block_size` blocks.
    ///
    /// # Errors
    ///
    /// - `Config` if `block_size` is zero
    /// - `DeviceSizeNotBlockMultiple` if `total_bytes` is not an exact multiple
    pub fn new(total_bytes: u64, block_size: u64) -> VerifyResult<Self> {
        if block_size == 0 {
            return Err(VerifyError::Config("block size must be > 0".to_string()));
        }
        if total_bytes % block_size != 0 {
            return Err(VerifyError::DeviceSizeNotBlockMultiple {
                block_size,
                total_bytes,
            });
        }
        Ok(Self {
            block_size,
            block_count: total_bytes / block_size,
        })
    }

    pub fn block_size(&self) -> u64 {
        self.block_size
    }

    /// Block size as an in-memory buffer length
    pub fn block_len(&self) -> usize {
        self.block_size as usize
    }

    pub fn block_count(&self) -> u64 {
        self.block_count
    }

    pub fn total_bytes(&self) -> u64 {
        self.block_size * self.block_count
    }

    /// Absolute byte offset of block `index`.
    pub fn offset_of(&self, index: u64) -> u64 {
        index * self.block_size
    }
}
