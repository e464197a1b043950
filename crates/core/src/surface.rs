//! The render surface particles live on.
//!
//! Coordinates are in surface pixels with the origin at the top-left. The
//! surface is a torus: leaving one edge re-enters at the opposite edge.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::error::StudioError;

/// Width and height of the simulation surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    width: f64,
    height: f64,
}

impl Surface {
    /// Returns `StudioError::InvalidDimensions` unless both extents are
    /// finite and positive.
    pub fn new(width: f64, height: f64) -> Result<Self, StudioError> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(width) || !valid(height) {
            return Err(StudioError::InvalidDimensions);
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Whether `p` lies in `[0, width) × [0, height)`.
    pub fn contains(&self, p: DVec2) -> bool {
        (0.0..self.width).contains(&p.x) && (0.0..self.height).contains(&p.y)
    }

    /// Toroidal wrap, each axis independently.
    pub fn wrap(&self, p: DVec2) -> DVec2 {
        DVec2::new(wrap_axis(p.x, self.width), wrap_axis(p.y, self.height))
    }

    /// Maps `p` to an `(column, row)` cell of a `resolution × resolution` grid.
    ///
    /// Returns `None` when `p` lies off the surface.
    pub fn cell_of(&self, p: DVec2, resolution: usize) -> Option<(usize, usize)> {
        let to_cell = |v: f64, extent: f64| {
            let idx = (v / extent * resolution as f64).floor();
            (idx >= 0.0 && idx < resolution as f64).then_some(idx as usize)
        };
        Some((to_cell(p.x, self.width)?, to_cell(p.y, self.height)?))
    }
}

/// Wraps one coordinate into `[0, extent)`.
///
/// `rem_euclid` of a tiny negative value can round up to exactly `extent`;
/// that case lands on 0 so the half-open invariant holds.
pub fn wrap_axis(v: f64, extent: f64) -> f64 {
    if (0.0..extent).contains(&v) {
        return v;
    }
    if !v.is_finite() {
        return 0.0;
    }
    let wrapped = v.rem_euclid(extent);
    if wrapped >= extent {
        0.0
    } else {
        wrapped
    }
}
