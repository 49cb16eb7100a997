//! Error types for invalid geometry handed to the core.

use core::fmt;

/// Rejected construction parameters.
///
/// Runtime outcomes such as an out-of-region insert or a zero-length vector are
/// not errors; they are signalled by `false` or the zero vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeometryError {
    /// A half extent (or width/height) was zero, negative or not finite.
    InvalidExtent { width: f32, height: f32 },
    /// A coordinate was NaN or infinite.
    NonFiniteCoordinate { x: f32, y: f32 },
    /// A quadtree node must hold at least one point.
    ZeroCapacity,
    /// Flow field cells must have a positive, finite size.
    InvalidResolution(f32),
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryError::InvalidExtent { width, height } => {
                write!(f, "extent must be positive and finite, got {} x {}", width, height)
            }
            GeometryError::NonFiniteCoordinate { x, y } => {
                write!(f, "coordinate ({}, {}) is not finite", x, y)
            }
            GeometryError::ZeroCapacity => write!(f, "quadtree capacity must be at least 1"),
            GeometryError::InvalidResolution(resolution) => {
                write!(f, "flow field resolution must be positive, got {}", resolution)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for GeometryError {}
