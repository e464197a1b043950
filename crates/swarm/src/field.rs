//! Per-cell direction field covering the surface.
//!
//! The field is an `N × N` grid of independent random directions. Every
//! regenerate call redraws every angle; neighbouring cells share nothing, so
//! the flow has no spatial smoothness.

use flow_studio_core::error::StudioError;
use flow_studio_core::params::NOISE_SCALE;
use flow_studio_core::prng::Xorshift64;
use flow_studio_core::surface::Surface;
use glam::DVec2;
use log::{debug, trace};

/// One grid cell: an angle and its direction scaled by the field speed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldCell {
    angle: f64,
    direction: DVec2,
}

impl FieldCell {
    fn new(angle: f64, speed: f64) -> Self {
        Self {
            angle,
            direction: DVec2::from_angle(angle) * speed,
        }
    }

    /// Angle in radians, in [0, 2π).
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// `(cos(angle), sin(angle)) * speed`.
    pub fn direction(&self) -> DVec2 {
        self.direction
    }
}

/// Fixed-resolution grid of direction cells.
#[derive(Debug, Clone)]
pub struct VectorField {
    surface: Surface,
    resolution: usize,
    /// Row-major: `cells[row * resolution + column]`.
    cells: Vec<FieldCell>,
    noise_scale: f64,
    speed_factor: f64,
    rng: Xorshift64,
}

impl VectorField {
    /// Allocates `resolution × resolution` cells with uniform random angles.
    ///
    /// Returns `StudioError::InvalidDimensions` if `resolution` is zero or
    /// its square overflows.
    pub fn new(
        surface: Surface,
        resolution: usize,
        speed_factor: f64,
        mut rng: Xorshift64,
    ) -> Result<Self, StudioError> {
        if resolution == 0 {
            return Err(StudioError::InvalidDimensions);
        }
        let len = resolution
            .checked_mul(resolution)
            .ok_or(StudioError::InvalidDimensions)?;
        let cells = (0..len)
            .map(|_| FieldCell::new(rng.next_angle(), speed_factor))
            .collect();
        debug!("vector field {resolution}x{resolution}, speed {speed_factor}");
        Ok(Self {
            surface,
            resolution,
            cells,
            noise_scale: NOISE_SCALE.default,
            speed_factor,
            rng,
        })
    }

    /// Redraws every cell's angle independently.
    pub fn regenerate(&mut self) {
        let speed = self.speed_factor;
        for cell in &mut self.cells {
            *cell = FieldCell::new(self.rng.next_angle(), speed);
        }
        trace!("regenerated {} cells", self.cells.len());
    }

    /// Direction of the cell under `p`, or `None` when `p` is off the surface.
    pub fn sample(&self, p: DVec2) -> Option<DVec2> {
        let (col, row) = self.surface.cell_of(p, self.resolution)?;
        Some(self.cells[row * self.resolution + col].direction)
    }

    /// The cell at `(column, row)`, if it exists.
    pub fn cell(&self, col: usize, row: usize) -> Option<&FieldCell> {
        if col >= self.resolution || row >= self.resolution {
            return None;
        }
        self.cells.get(row * self.resolution + col)
    }

    /// Row-major cell data.
    pub fn cells(&self) -> &[FieldCell] {
        &self.cells
    }

    /// Sets every cell to the same angle. Used to pin the field for
    /// scripted runs; the next `regenerate` randomizes it again.
    pub fn fill(&mut self, angle: f64) {
        let speed = self.speed_factor;
        self.cells.fill(FieldCell::new(angle, speed));
    }

    /// Sets the speed factor and rescales every existing direction.
    pub fn set_speed_factor(&mut self, speed_factor: f64) {
        self.speed_factor = speed_factor;
        for cell in &mut self.cells {
            *cell = FieldCell::new(cell.angle, speed_factor);
        }
    }

    pub fn speed_factor(&self) -> f64 {
        self.speed_factor
    }

    /// Stored for callers that expose it; sampling does not read it.
    pub fn set_noise_scale(&mut self, noise_scale: f64) {
        self.noise_scale = noise_scale;
    }

    pub fn noise_scale(&self) -> f64 {
        self.noise_scale
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn surface(&self) -> Surface {
        self.surface
    }
}
