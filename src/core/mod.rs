//! Core types and utilities

pub mod types;
pub mod error;
pub mod logging;
pub mod metrics;

pub use types::*;
pub use error::Error;
pub use metrics::{MetricsSink, StageTimings};
