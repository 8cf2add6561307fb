//! Voxel storage, materials and palettes

pub mod content;
pub mod palette;
pub mod volume;

pub use content::{ContentId, MaterialDef, MaterialRegistry};
pub use palette::Palette;
pub use volume::{DenseVolume, VoxelVolume};
