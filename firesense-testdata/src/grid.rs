// FireSense Testdata - Regular grid
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Regular square-cell grid over projected coordinates.
//!
//! Cells are numbered row-major from the origin corner. A point belongs
//! to the cell whose half-open square `[x0, x0 + size) x [y0, y0 + size)`
//! contains it.

use crate::error::{FieldError, Result};
use firesense::Location;
use serde::{Deserialize, Serialize};

/// Grid geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    /// Lower-left corner x (metres).
    pub origin_x: f64,
    /// Lower-left corner y (metres).
    pub origin_y: f64,
    /// Cell edge length (metres).
    pub cell_size: f64,
    /// Number of columns.
    pub cols: usize,
    /// Number of rows.
    pub rows: usize,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            origin_x: 0.0,
            origin_y: 0.0,
            cell_size: 500.0,
            cols: 20,
            rows: 20,
        }
    }
}

impl GridSpec {
    /// Create a grid.
    pub fn new(origin: Location, cell_size: f64, cols: usize, rows: usize) -> Self {
        Self {
            origin_x: origin.x,
            origin_y: origin.y,
            cell_size,
            cols,
            rows,
        }
    }

    /// Check the geometry is usable.
    pub fn validate(&self) -> Result<()> {
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(FieldError::InvalidConfig {
                name: "cell_size",
                message: format!("must be positive, got {}", self.cell_size),
            });
        }
        if !(self.origin_x.is_finite() && self.origin_y.is_finite()) {
            return Err(FieldError::InvalidConfig {
                name: "origin",
                message: "must be finite".to_string(),
            });
        }
        if self.cols == 0 || self.rows == 0 {
            return Err(FieldError::InvalidConfig {
                name: "dimensions",
                message: format!("{}x{} grid has no cells", self.cols, self.rows),
            });
        }
        Ok(())
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.cols * self.rows
    }

    /// Index of the cell containing `location`, if inside the grid.
    pub fn cell_at(&self, location: Location) -> Option<usize> {
        let dx = (location.x - self.origin_x) / self.cell_size;
        let dy = (location.y - self.origin_y) / self.cell_size;
        if !(dx.is_finite() && dy.is_finite()) || dx < 0.0 || dy < 0.0 {
            return None;
        }

        let col = dx.floor() as usize;
        let row = dy.floor() as usize;
        if col >= self.cols || row >= self.rows {
            return None;
        }
        Some(row * self.cols + col)
    }

    /// Centre of a cell.
    pub fn cell_center(&self, cell: usize) -> Option<Location> {
        if cell >= self.cell_count() {
            return None;
        }
        let col = (cell % self.cols) as f64;
        let row = (cell / self.cols) as f64;
        Some(Location::new(
            self.origin_x + (col + 0.5) * self.cell_size,
            self.origin_y + (row + 0.5) * self.cell_size,
        ))
    }

    /// Centre of the whole grid.
    pub fn center(&self) -> Location {
        Location::new(
            self.origin_x + self.cols as f64 * self.cell_size / 2.0,
            self.origin_y + self.rows as f64 * self.cell_size / 2.0,
        )
    }

    /// Upper-right corner.
    pub fn far_corner(&self) -> Location {
        Location::new(
            self.origin_x + self.cols as f64 * self.cell_size,
            self.origin_y + self.rows as f64 * self.cell_size,
        )
    }
}
