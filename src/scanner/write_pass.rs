//! Write pass
//!
//! A zero-byte write means the device has no room past this point: the pass
//! ends there without error. Any other write failure is fatal and leaves the
//! device partially written.

use std::io::{self, Seek, Write};

use sha2::Digest;

use super::report::WritePassReport;
use super::BlockScanner;
use crate::errors::{VerifyError, VerifyResult};
use crate::observability::{Event, PassScope};

impl<S: Write + Seek, D: Digest + Clone> BlockScanner<S, D> {
    /// Writes the chain pattern to blocks `[start_block, block_count)`.
    pub fn write_pass(&mut self, start_block: u64) -> VerifyResult<WritePassReport> {
        let logger = self.logger.clone();
        let bs = self.geometry.block_size().to_string();
        let start = start_block.to_string();
        let scope = PassScope::with_fields(
            &logger,
            "WRITE_PASS",
            &[("bs", bs.as_str()), ("start", start.as_str())],
        );

        self.restart_chain();
        let mut report = WritePassReport::new(start_block);
        let range = start_block..self.geometry.block_count();
        // nothing to write: skip allocating a block buffer sized from bs
        let mut block = if range.is_empty() {
            Vec::new()
        } else {
            vec![0u8; self.geometry.block_len()]
        };

        for index in range {
            self.generator.fill_block(&mut block);
            self.seek_to_block(index)?;

            let written = write_block(&mut self.device, &block).map_err(|e| VerifyError::Write {
                block: index,
                block_size: self.geometry.block_size(),
                source: e,
            })?;

            if written < block.len() {
                let index_str = index.to_string();
                if written > 0 {
                    let written_str = written.to_string();
                    logger.event(
                        Event::WritePartialBlock,
                        &[("block", index_str.as_str()), ("written", written_str.as_str())],
                    );
                }
                logger.event(Event::WriteEndOfRange, &[("block", index_str.as_str())]);
                report.ended_early = true;
                break;
            }
            report.blocks_written += 1;
        }

        self.device.flush().map_err(VerifyError::Flush)?;

        let written = report.blocks_written.to_string();
        scope.complete_with_fields(&[("blocks_written", written.as_str())]);
        Ok(report)
    }
}

/// Writes as much of `buf` as the device accepts.
///
/// Returns fewer than `buf.len()` bytes only when the device reports a
/// zero-byte write.
fn write_block<W: Write>(writer: &mut W, buf: &[u8]) -> io::Result<usize> {
    let mut written = 0;
    while written < buf.len() {
        match writer.write(&buf[written..]) {
            Ok(0) => break,
            Ok(n) => written += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::ChainGenerator;
    use crate::device::BlockGeometry;
    use crate::observability::Logger;
    use std::io::{Cursor, SeekFrom};

    fn scanner(total: u64, bs: u64) -> BlockScanner<Cursor<Vec<u8>>> {
        let geometry = BlockGeometry::new(total, bs).unwrap();
        BlockScanner::new(
            Cursor::new(vec![0u8; total as usize]),
            geometry,
            b"random",
            Logger::with_run_id("write-pass-test"),
        )
        .unwrap()
    }

    #[test]
    fn test_writes_chain_stream_in_order() {
        let mut scanner = scanner(640, 64);
        let report = scanner.write_pass(0).unwrap();

        assert_eq!(report.blocks_written, 10);
        assert!(!report.ended_early);

        let mut generator = ChainGenerator::new(b"random");
        let expected: Vec<u8> = (0..10).flat_map(|_| generator.next_block(64)).collect();
        assert_eq!(scanner.into_device().into_inner(), expected);
    }

    #[test]
    fn test_start_block_leaves_prefix_untouched() {
        let mut scanner = scanner(640, 64);
        let report = scanner.write_pass(3).unwrap();
        assert_eq!(report.blocks_written, 7);
        assert_eq!(report.end_block(), 10);

        let data = scanner.into_device().into_inner();
        assert!(data[..192].iter().all(|b| *b == 0));

        // the stream starts at the seed regardless of the start block
        let mut generator = ChainGenerator::new(b"random");
        assert_eq!(&data[192..256], generator.next_block(64).as_slice());
    }

    #[test]
    fn test_start_past_end_writes_nothing() {
        let mut scanner = scanner(640, 64);
        let report = scanner.write_pass(10).unwrap();
        assert_eq!(report.blocks_written, 0);
        assert!(!report.ended_early);
    }

    #[test]
    fn test_zero_byte_write_ends_pass() {
        // declared 10 blocks, backing store only holds 4
        let mut backing = vec![0u8; 256];
        let geometry = BlockGeometry::new(640, 64).unwrap();
        let mut scanner = BlockScanner::new(
            Cursor::new(backing.as_mut_slice()),
            geometry,
            b"random",
            Logger::with_run_id("write-pass-test"),
        )
        .unwrap();

        let report = scanner.write_pass(0).unwrap();
        assert_eq!(report.blocks_written, 4);
        assert!(report.ended_early);
    }

    #[test]
    fn test_partial_block_write_ends_pass() {
        // backing store ends 10 bytes into block 4
        let mut backing = vec![0u8; 4 * 64 + 10];
        let geometry = BlockGeometry::new(640, 64).unwrap();
        let mut scanner = BlockScanner::new(
            Cursor::new(backing.as_mut_slice()),
            geometry,
            b"random",
            Logger::with_run_id("write-pass-test"),
        )
        .unwrap();

        let report = scanner.write_pass(0).unwrap();
        assert_eq!(report.blocks_written, 4);
        assert_eq!(report.end_block(), 4);
        assert!(report.ended_early);

        // the bytes that did fit are the start of block 4's pattern
        let mut generator = ChainGenerator::new(b"random");
        let expected: Vec<u8> = (0..5).flat_map(|_| generator.next_block(64)).collect();
        assert_eq!(backing.as_slice(), &expected[..4 * 64 + 10]);
    }

    #[test]
    fn test_empty_range_with_huge_block_size() {
        // an empty device divides evenly by any block size
        let geometry = BlockGeometry::new(0, 64 << 40).unwrap();
        let mut scanner = BlockScanner::new(
            Cursor::new(Vec::new()),
            geometry,
            b"random",
            Logger::with_run_id("write-pass-test"),
        )
        .unwrap();

        let report = scanner.write_pass(0).unwrap();
        assert_eq!(report.blocks_written, 0);
        assert!(!report.ended_early);
        assert!(scanner.into_device().into_inner().is_empty());
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only media"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Seek for FailingWriter {
        fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
            match pos {
                SeekFrom::Start(n) => Ok(n),
                _ => Ok(0),
            }
        }
    }

    #[test]
    fn test_write_failure_is_fatal() {
        let geometry = BlockGeometry::new(640, 64).unwrap();
        let mut scanner = BlockScanner::new(
            FailingWriter,
            geometry,
            b"random",
            Logger::with_run_id("write-pass-test"),
        )
        .unwrap();

        let err = scanner.write_pass(2).unwrap_err();
        assert_eq!(err.code(), "BV_WRITE_FAILED");
        assert_eq!(err.block(), Some(2));
    }

    struct InterruptOnce {
        inner: Cursor<Vec<u8>>,
        interrupted: bool,
    }

    impl Write for InterruptOnce {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if !self.interrupted {
                self.interrupted = true;
                return Err(io::Error::new(io::ErrorKind::Interrupted, "signal"));
            }
            self.inner.write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Seek for InterruptOnce {
        fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
            self.inner.seek(pos)
        }
    }

    #[test]
    fn test_interrupted_write_is_retried() {
        let geometry = BlockGeometry::new(128, 64).unwrap();
        let device = InterruptOnce {
            inner: Cursor::new(vec![0u8; 128]),
            interrupted: false,
        };
        let mut scanner =
            BlockScanner::new(device, geometry, b"random", Logger::with_run_id("t")).unwrap();

        let report = scanner.write_pass(0).unwrap();
        assert_eq!(report.blocks_written, 2);
    }
}
