//! Verify pass
//!
//! Content mismatches and short reads are recorded and the scan continues, so
//! one run reports every bad block. End-of-stream at a block boundary ends the
//! pass early without error. Other read failures are fatal.

use std::io::{self, Read, Seek};

use sha2::Digest;

use super::report::{Anomaly, VerifyPassReport};
use super::BlockScanner;
use crate::errors::{VerifyError, VerifyResult};
use crate::observability::{Event, Logger, PassScope};

impl<S: Read + Seek, D: Digest + Clone> BlockScanner<S, D> {
    /// Compares blocks `[start_block, block_count)` against the chain pattern.
    pub fn verify_pass(&mut self, start_block: u64) -> VerifyResult<VerifyPassReport> {
        let logger = self.logger.clone();
        let bs = self.geometry.block_size().to_string();
        let start = start_block.to_string();
        let scope = PassScope::with_fields(
            &logger,
            "VERIFY_PASS",
            &[("bs", bs.as_str()), ("start", start.as_str())],
        );

        self.restart_chain();
        let mut report = VerifyPassReport::new(start_block);
        let range = start_block..self.geometry.block_count();
        let buffer_len = if range.is_empty() {
            0
        } else {
            self.geometry.block_len()
        };
        let mut expected = vec![0u8; buffer_len];
        let mut observed = vec![0u8; buffer_len];

        for index in range {
            self.generator.fill_block(&mut expected);
            self.seek_to_block(index)?;

            let len = read_block(&mut self.device, &mut observed).map_err(|e| {
                VerifyError::Read {
                    block: index,
                    block_size: self.geometry.block_size(),
                    source: e,
                }
            })?;

            if len == 0 {
                let index_str = index.to_string();
                logger.event(Event::VerifyEndOfRange, &[("block", index_str.as_str())]);
                report.ended_early = true;
                break;
            }
            report.blocks_checked += 1;

            // a short block is also compared below, so it reports twice:
            // once as a short read and once as a mismatch
            if len < expected.len() {
                record(
                    &mut report,
                    &logger,
                    Anomaly::ShortRead {
                        block: index,
                        expected_len: expected.len(),
                        observed_len: len,
                    },
                );
            }

            if let Some(anomaly) = compare_block(index, &expected, &observed[..len]) {
                record(&mut report, &logger, anomaly);
            }
        }

        let checked = report.blocks_checked.to_string();
        let mismatches = report.mismatch_count().to_string();
        let short_reads = report.short_read_count().to_string();
        scope.complete_with_fields(&[
            ("blocks_checked", checked.as_str()),
            ("mismatches", mismatches.as_str()),
            ("short_reads", short_reads.as_str()),
        ]);
        Ok(report)
    }
}

fn record(report: &mut VerifyPassReport, logger: &Logger, anomaly: Anomaly) {
    let fields = anomaly.fields();
    let field_refs: Vec<(&str, &str)> = fields.iter().map(|(k, v)| (*k, v.as_str())).collect();
    logger.event(anomaly.event(), &field_refs);
    report.anomalies.push(anomaly);
}

/// Returns a mismatch anomaly if `observed` is not exactly `expected`.
fn compare_block(block: u64, expected: &[u8], observed: &[u8]) -> Option<Anomaly> {
    if expected == observed {
        return None;
    }

    let first_diff = expected
        .iter()
        .zip(observed)
        .position(|(e, o)| e != o)
        .unwrap_or_else(|| expected.len().min(observed.len()));

    Some(Anomaly::Mismatch {
        block,
        first_diff,
        expected_len: expected.len(),
        observed_len: observed.len(),
        expected_crc: crc32fast::hash(expected),
        observed_crc: crc32fast::hash(observed),
    })
}

/// Reads until `buf` is full or the device reports end-of-stream.
///
/// Returns the number of bytes read; zero means the block lies past the end.
fn read_block<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
