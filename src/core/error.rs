//! Error types for terrain generation

use thiserror::Error;

/// Main error type for the generator
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Missing required material: {0}")]
    MissingMaterial(String),

    #[error("Region out of bounds: {0}")]
    OutOfBounds(String),

    #[error("Invalid extent: {0}")]
    InvalidExtent(String),
}
