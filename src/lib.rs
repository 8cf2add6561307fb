//! Vale - valley and river terrain synthesis for voxel worlds

pub mod core;
pub mod math;
pub mod voxel;
pub mod field;
pub mod terrain;
pub mod generation;
