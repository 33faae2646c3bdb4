//! Pass results and data anomalies
//!
//! Anomalies are data-class findings: they are logged and collected, and the
//! scan carries on past them. They never turn into errors.

use crate::observability::Event;

/// A block whose stored content did not match the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Anomaly {
    /// Content differs from the expected pattern
    Mismatch {
        block: u64,
        /// Offset within the block of the first differing byte
        first_diff: usize,
        expected_len: usize,
        observed_len: usize,
        /// CRC32 fingerprints of the expected and observed bytes
        expected_crc: u32,
        observed_crc: u32,
    },
    /// Fewer bytes than a full block were available before end-of-stream
    ShortRead {
        block: u64,
        expected_len: usize,
        observed_len: usize,
    },
}

impl Anomaly {
    pub fn block(&self) -> u64 {
        match self {
            Anomaly::Mismatch { block, .. } | Anomaly::ShortRead { block, .. } => *block,
        }
    }

    pub fn is_mismatch(&self) -> bool {
        matches!(self, Anomaly::Mismatch { .. })
    }

    /// Event this anomaly is logged as
    pub fn event(&self) -> Event {
        match self {
            Anomaly::Mismatch { .. } => Event::BlockMismatch,
            Anomaly::ShortRead { .. } => Event::BlockShortRead,
        }
    }

    /// Log fields describing the anomaly
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        match self {
            Anomaly::Mismatch {
                block,
                first_diff,
                expected_len,
                observed_len,
                expected_crc,
                observed_crc,
            } => vec![
                ("block", block.to_string()),
                ("first_diff", first_diff.to_string()),
                ("expected_len", expected_len.to_string()),
                ("observed_len", observed_len.to_string()),
                ("expected_crc", format!("{:08x}", expected_crc)),
                ("observed_crc", format!("{:08x}", observed_crc)),
            ],
            Anomaly::ShortRead {
                block,
                expected_len,
                observed_len,
            } => vec![
                ("block", block.to_string()),
                ("expected_len", expected_len.to_string()),
                ("observed_len", observed_len.to_string()),
            ],
        }
    }
}

/// Outcome of a write pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WritePassReport {
    pub first_block: u64,
    pub blocks_written: u64,
    /// The device stopped accepting data before the declared block count
    pub ended_early: bool,
}

impl WritePassReport {
    pub(crate) fn new(first_block: u64) -> Self {
        Self {
            first_block,
            blocks_written: 0,
            ended_early: false,
        }
    }

    /// Index one past the last block written
    pub fn end_block(&self) -> u64 {
        self.first_block + self.blocks_written
    }
}

/// Outcome of a verify pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyPassReport {
    pub first_block: u64,
    pub blocks_checked: u64,
    /// The device returned end-of-stream before the declared block count
    pub ended_early: bool,
    pub anomalies: Vec<Anomaly>,
}

impl VerifyPassReport {
    pub(crate) fn new(first_block: u64) -> Self {
        Self {
            first_block,
            blocks_checked: 0,
            ended_early: false,
            anomalies: Vec::new(),
        }
    }

    pub fn mismatch_count(&self) -> usize {
        self.anomalies.iter().filter(|a| a.is_mismatch()).count()
    }

    pub fn short_read_count(&self) -> usize {
        self.anomalies.len() - self.mismatch_count()
    }

    /// Indices of blocks whose content did not match, ascending
    pub fn mismatched_blocks(&self) -> Vec<u64> {
        self.anomalies
            .iter()
            .filter(|a| a.is_mismatch())
            .map(Anomaly::block)
            .collect()
    }

    pub fn is_clean(&self) -> bool {
        self.anomalies.is_empty()
    }
}
