//! Core type aliases and re-exports

pub use glam::{IVec2, IVec3, UVec2, UVec3, Vec3};

/// Standard Result type for the generator
pub type Result<T> = std::result::Result<T, crate::core::error::Error>;
