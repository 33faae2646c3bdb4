//! Observable events for a verification run
//!
//! Events are explicit and typed. Pass begin/complete lines are emitted by
//! [`PassScope`](super::PassScope) from the pass name.

use std::fmt;

use super::logger::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Run lifecycle
    /// Command line parsed; first line of every run
    RunBegin,
    /// Configuration resolved from flags and config file
    ConfigLoaded,
    /// Device opened and geometry validated
    DeviceOpened,
    /// Run finished; mismatches do not change this
    RunComplete,
    /// Run aborted on a fatal error
    RunFailed,

    // Write pass
    /// Device accepted zero bytes; the write pass stops here
    WriteEndOfRange,
    /// Device accepted part of a block before refusing more
    WritePartialBlock,

    // Verify pass
    /// Device returned end-of-stream; the verify pass stops here
    VerifyEndOfRange,
    /// Block content differs from the chain
    BlockMismatch,
    /// Fewer than a block's bytes were available
    BlockShortRead,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::RunBegin => "RUN_BEGIN",
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::DeviceOpened => "DEVICE_OPENED",
            Event::RunComplete => "RUN_COMPLETE",
            Event::RunFailed => "RUN_FAILED",
            Event::WriteEndOfRange => "WRITE_END_OF_RANGE",
            Event::WritePartialBlock => "WRITE_PARTIAL_BLOCK",
            Event::VerifyEndOfRange => "VERIFY_END_OF_RANGE",
            Event::BlockMismatch => "BLOCK_MISMATCH",
            Event::BlockShortRead => "BLOCK_SHORT_READ",
        }
    }

    /// Severity this event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::BlockMismatch | Event::BlockShortRead | Event::WritePartialBlock => {
                Severity::Warn
            }
            Event::RunFailed => Severity::Fatal,
            _ => Severity::Info,
        }
    }

    /// Returns true if this event indicates a fatal condition
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
