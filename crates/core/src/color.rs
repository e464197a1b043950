//! Trail colors.
//!
//! [`Srgb`] is the color type handed to renderers. [`ColorMode`] is the
//! swarm-wide palette selector: every particle's color is a pure function of
//! the current mode.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StudioError;

/// sRGB color with components in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Srgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Srgb {
    /// Builds a color from 8-bit channels.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
        }
    }

    /// Quantizes to 8-bit channels with rounding.
    pub fn to_rgb8(self) -> [u8; 3] {
        let q = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b)]
    }
}

/// Swarm-wide trail palette.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    #[default]
    White,
    Ice,
    Rose,
}

const COLOR_MODE_NAMES: &[&str] = &["white", "ice", "rose"];

impl ColorMode {
    /// Trail color for this mode.
    pub fn color(self) -> Srgb {
        match self {
            ColorMode::White => Srgb::from_rgb8(255, 255, 255),
            ColorMode::Ice => Srgb::from_rgb8(100, 200, 255),
            ColorMode::Rose => Srgb::from_rgb8(255, 100, 200),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ColorMode::White => "white",
            ColorMode::Ice => "ice",
            ColorMode::Rose => "rose",
        }
    }

    /// Parses a mode by name (case insensitive).
    pub fn from_name(name: &str) -> Result<Self, StudioError> {
        match name.to_ascii_lowercase().as_str() {
            "white" => Ok(ColorMode::White),
            "ice" => Ok(ColorMode::Ice),
            "rose" => Ok(ColorMode::Rose),
            _ => Err(StudioError::UnknownColorMode(name.to_owned())),
        }
    }

    pub fn list_names() -> &'static [&'static str] {
        COLOR_MODE_NAMES
    }
}

impl FromStr for ColorMode {
    type Err = StudioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ColorMode::from_name(s)
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
