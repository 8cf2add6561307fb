//! Integer geometry for chunk regions

pub mod extent;

pub use extent::{ChunkExtent, Extent};
