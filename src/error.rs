//! Error types for the simulation core.

use thiserror::Error;

/// Errors produced by terrain, noise and settings operations.
#[derive(Debug, Error)]
pub enum SimError {
    /// Width or height was zero when creating a grid or noise field.
    #[error("invalid dimensions {width}x{height}: both must be non-zero")]
    InvalidDimensions { width: usize, height: usize },

    /// A buffer had a different length than the grid it feeds.
    #[error("length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// A terrain cell was addressed outside the grid.
    #[error("cell ({x}, {y}) out of bounds for terrain of size ({width}, {height})")]
    OutOfBounds {
        x: i64,
        y: i64,
        width: usize,
        height: usize,
    },

    /// A noise sample or seed index was outside the field.
    #[error("index {index} out of range for noise field of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// Settings failed validation.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// Settings could not be (de)serialized.
    #[error("settings json: {0}")]
    Json(#[from] serde_json::Error),
}
