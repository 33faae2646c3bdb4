//! Observability for blockverify
//!
//! Diagnostics are line-oriented: one JSON object per line, synchronous,
//! deterministic key ordering. Nothing here affects scan results.
//!
//! # Usage
//!
//! ```ignore
//! use blockverify::observability::{Event, Logger, PassScope};
//!
//! let logger = Logger::new();
//! logger.event(Event::DeviceOpened, &[("path", "/dev/sdb")]);
//!
//! let scope = PassScope::new(&logger, "VERIFY_PASS");
//! // ... verify blocks ...
//! scope.complete();
//! ```

mod events;
mod logger;
mod scope;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use scope::PassScope;
