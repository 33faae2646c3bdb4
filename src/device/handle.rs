//! Device handle opened for positioned read and write
//!
//! Opens an existing file or block special file read-write. The device is
//! never created or truncated. Size is taken by seeking to the end, which
//! also works for block devices whose metadata reports a length of zero.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::errors::{VerifyError, VerifyResult};

/// Open device under test.
///
/// Exclusively owned by the scanner for the duration of a run; closed on drop.
pub struct BlockDevice {
    path: PathBuf,
    file: File,
    total_bytes: u64,
}

impl BlockDevice {
    /// Opens `path` read-write and records its total length.
    pub fn open(path: &Path) -> VerifyResult<Self> {
        if path.as_os_str().is_empty() {
            return Err(VerifyError::MissingDevicePath);
        }

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| VerifyError::DeviceOpen {
                path: path.to_path_buf(),
                source: e,
            })?;

        let total_bytes = file
            .seek(SeekFrom::End(0))
            .map_err(|e| VerifyError::SizeQuery {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(Self {
            path: path.to_path_buf(),
            file,
            total_bytes,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Total addressable length in bytes, as seen at open time.
    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }

    /// Flushes written blocks to stable storage.
    pub fn sync(&mut self) -> VerifyResult<()> {
        self.file.sync_all().map_err(VerifyError::Flush)
    }
}

impl Read for BlockDevice {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file.read(buf)
    }
}

impl Write for BlockDevice {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

impl Seek for BlockDevice {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.file.seek(pos)
    }
}
