//! Block scanner
//!
//! Drives the chain generator over block indices `[start, block_count)` in
//! strictly ascending order:
//!
//! - write pass: generate each block and store it at `index * block_size`
//! - verify pass: regenerate each block and compare it with what is stored
//!
//! Both passes reset the generator from the seed before the first block, so
//! the verify pass replays exactly the stream the write pass produced.
//!
//! # Pass state
//!
//! `NOT_STARTED → SCANNING(i) → SCANNING(i+1) → … → DONE`. `DONE` is reached
//! at `block_count` or when the device signals end of range (zero-byte write,
//! end-of-stream read). Fatal errors leave the pass directly.

mod report;
mod verify_pass;
mod write_pass;

use std::io::{Seek, SeekFrom};

use sha2::{Digest, Sha512};

use crate::chain::ChainGenerator;
use crate::device::BlockGeometry;
use crate::errors::{VerifyError, VerifyResult};
use crate::observability::Logger;

pub use report::{Anomaly, VerifyPassReport, WritePassReport};

/// Owns the device and the generator for the duration of a run.
pub struct BlockScanner<S, D: Digest + Clone = Sha512> {
    device: S,
    generator: ChainGenerator<D>,
    geometry: BlockGeometry,
    seed: Vec<u8>,
    logger: Logger,
}

impl<S> BlockScanner<S, Sha512> {
    /// Creates a SHA-512 scanner over `device`.
    pub fn new(
        device: S,
        geometry: BlockGeometry,
        seed: &[u8],
        logger: Logger,
    ) -> VerifyResult<Self> {
        Self::with_digest(device, geometry, seed, logger)
    }
}

impl<S, D: Digest + Clone> BlockScanner<S, D> {
    /// Creates a scanner over digest `D`.
    ///
    /// Rejects a block size that is not a multiple of the digest width before
    /// touching the device.
    pub fn with_digest(
        device: S,
        geometry: BlockGeometry,
        seed: &[u8],
        logger: Logger,
    ) -> VerifyResult<Self> {
        ChainGenerator::<D>::check_block_size(geometry.block_size())?;

        Ok(Self {
            device,
            generator: ChainGenerator::with_digest(seed),
            geometry,
            seed: seed.to_vec(),
            logger,
        })
    }

    pub fn device_mut(&mut self) -> &mut S {
        &mut self.device
    }

    /// Releases the device
    pub fn into_device(self) -> S {
        self.device
    }

    fn restart_chain(&mut self) {
        self.generator.reset(&self.seed);
    }
}

impl<S: Seek, D: Digest + Clone> BlockScanner<S, D> {
    fn seek_to_block(&mut self, index: u64) -> VerifyResult<()> {
        let offset = self.geometry.offset_of(index);
        self.device
            .seek(SeekFrom::Start(offset))
            .map_err(|e| VerifyError::Seek {
                block: index,
                block_size: self.geometry.block_size(),
                source: e,
            })?;
        Ok(())
    }
}
