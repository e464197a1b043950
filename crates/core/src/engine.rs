//! The `Engine` trait that drivers and renderers program against.
//!
//! The trait is object-safe so a driver can hold a `Box<dyn Engine>` and a
//! renderer can take `&dyn Engine` without knowing the concrete simulation.

use std::collections::VecDeque;

use glam::DVec2;
use serde_json::Value;

use crate::color::Srgb;
use crate::error::StudioError;
use crate::surface::Surface;

/// Read-only view of one particle's trail for a render pass.
///
/// `points` is ordered oldest first, newest last.
#[derive(Debug, Clone, Copy)]
pub struct TrailView<'a> {
    pub points: &'a VecDeque<DVec2>,
    pub color: Srgb,
}

impl TrailView<'_> {
    /// Number of drawable line segments.
    pub fn segment_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }
}

/// Core trait for a frame-driven trail simulation.
pub trait Engine {
    /// Advance the simulation by one tick.
    fn step(&mut self) -> Result<(), StudioError>;

    /// The surface every trail point lies on.
    fn surface(&self) -> Surface;

    /// Current parameter values as a JSON object.
    fn params(&self) -> Value;

    /// Schema describing all available parameters, their types, ranges, and defaults.
    fn param_schema(&self) -> Value;

    /// One view per particle, in swarm order.
    fn trails(&self) -> Vec<TrailView<'_>>;
}
