//! Device under test
//!
//! A seekable, randomly addressable byte store of fixed known length,
//! addressed in whole blocks.

mod geometry;
mod handle;

pub use geometry::BlockGeometry;
pub use handle::BlockDevice;
