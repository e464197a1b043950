//! Startup configuration for a studio session.
//!
//! A [`StudioConfig`] carries everything needed to build a session: surface
//! size, field resolution, optional PRNG seed, the four controls and the color
//! mode. It is plain JSON so a session can be described in a file and
//! overridden from the command line. No simulation state is stored here.

use serde::{Deserialize, Serialize};

use crate::color::ColorMode;
use crate::error::StudioError;
use crate::params::StudioParams;
use crate::surface::Surface;

pub const DEFAULT_WIDTH: usize = 1200;
pub const DEFAULT_HEIGHT: usize = 800;
pub const DEFAULT_RESOLUTION: usize = 20;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StudioConfig {
    pub width: usize,
    pub height: usize,
    /// Cells per side of the direction grid.
    pub resolution: usize,
    /// `None` seeds from entropy.
    pub seed: Option<u64>,
    pub params: StudioParams,
    pub color_mode: ColorMode,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            resolution: DEFAULT_RESOLUTION,
            seed: None,
            params: StudioParams::default(),
            color_mode: ColorMode::default(),
        }
    }
}

impl StudioConfig {
    /// Parses a config from JSON. Missing keys take their defaults.
    pub fn from_json(text: &str) -> Result<Self, StudioError> {
        serde_json::from_str(text).map_err(|e| StudioError::invalid_parameter("config", e))
    }

    /// Validates that the surface and grid are non-empty and that
    /// `width * height` does not overflow.
    pub fn validate(&self) -> Result<(), StudioError> {
        if self.width == 0 || self.height == 0 || self.resolution == 0 {
            return Err(StudioError::InvalidDimensions);
        }
        self.width
            .checked_mul(self.height)
            .ok_or(StudioError::InvalidDimensions)?;
        Ok(())
    }

    /// The configured surface.
    pub fn surface(&self) -> Result<Surface, StudioError> {
        self.validate()?;
        Surface::new(self.width as f64, self.height as f64)
    }
}
