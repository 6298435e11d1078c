//! Geometry error types

use thiserror::Error;

/// Errors raised while reading or deriving geometry
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// A node has not been measured or laid out yet
    #[error("node {node} has not been laid out")]
    NotMeasured { node: String },

    /// Bounds with zero area where a division by size is required
    #[error("degenerate bounds: {0}")]
    Degenerate(String),

    /// Corner radii index outside `0..8`
    #[error("corner index {index} out of range (expected 0..8)")]
    CornerIndex { index: usize },
}

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, GeometryError>;
