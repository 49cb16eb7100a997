use alloc::vec::Vec;

use crate::error::GeometryError;
use crate::math;
use crate::vector::Vector2;

/// A grid of direction vectors covering a `width x height` world.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowField {
    resolution: f32,
    cols: usize,
    rows: usize,
    // row-major
    cells: Vec<Vector2>,
}

impl FlowField {
    /// Builds a field by calling `direction(col, row)` once per cell.
    pub fn from_fn<F>(
        width: f32,
        height: f32,
        resolution: f32,
        mut direction: F,
    ) -> Result<Self, GeometryError>
    where
        F: FnMut(usize, usize) -> Vector2,
    {
        if !resolution.is_finite() || resolution <= 0.0 {
            return Err(GeometryError::InvalidResolution(resolution));
        }
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(GeometryError::InvalidExtent { width, height });
        }

        let cols = (math::floor(width / resolution) as usize).max(1);
        let rows = (math::floor(height / resolution) as usize).max(1);
        let mut cells = Vec::with_capacity(cols * rows);
        for row in 0..rows {
            for col in 0..cols {
                cells.push(direction(col, row));
            }
        }

        Ok(Self {
            resolution,
            cols,
            rows,
            cells,
        })
    }

    pub fn uniform(
        width: f32,
        height: f32,
        resolution: f32,
        direction: Vector2,
    ) -> Result<Self, GeometryError> {
        Self::from_fn(width, height, resolution, |_, _| direction)
    }

    pub fn resolution(&self) -> f32 {
        self.resolution
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn get(&self, col: usize, row: usize) -> Option<Vector2> {
        if col < self.cols && row < self.rows {
            Some(self.cells[row * self.cols + col])
        } else {
            None
        }
    }

    /// Direction of the cell under `position`. Positions off the grid use the
    /// nearest edge cell.
    pub fn lookup(&self, position: Vector2) -> Vector2 {
        let col = Self::clamp_index(position.x / self.resolution, self.cols);
        let row = Self::clamp_index(position.y / self.resolution, self.rows);
        self.cells[row * self.cols + col]
    }

    fn clamp_index(scaled: f32, len: usize) -> usize {
        let index = math::floor(scaled);
        if index.is_nan() || index < 0.0 {
            0
        } else {
            (index as usize).min(len - 1)
        }
    }
}
