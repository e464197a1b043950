//! A single advected particle and its trail.

use std::collections::VecDeque;

use flow_studio_core::color::ColorMode;
use flow_studio_core::prng::Xorshift64;
use flow_studio_core::surface::Surface;
use glam::DVec2;

/// Position, velocity and bounded position history of one particle.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    id: u64,
    position: DVec2,
    velocity: DVec2,
    age: u64,
    /// Oldest first, newest last.
    trail: VecDeque<DVec2>,
    color: ColorMode,
}

impl Particle {
    /// A particle at rest at `position` with an empty trail.
    pub fn new(id: u64, position: DVec2, color: ColorMode) -> Self {
        Self {
            id,
            position,
            velocity: DVec2::ZERO,
            age: 0,
            trail: VecDeque::new(),
            color,
        }
    }

    /// A particle at rest at a uniform random point of `surface`.
    pub fn spawn(id: u64, surface: &Surface, rng: &mut Xorshift64, color: ColorMode) -> Self {
        let position = DVec2::new(
            rng.next_range(0.0, surface.width()),
            rng.next_range(0.0, surface.height()),
        );
        Self::new(id, position, color)
    }

    /// Moves by `velocity`, wraps onto `surface`, records the new position
    /// and ages by one tick.
    ///
    /// The oldest entry is evicted when the trail overflows. A trail already
    /// over a lowered `trail_capacity` also sheds a share of that excess,
    /// oldest first, sized so that it fits after `ticks_to_fit` calls. With a
    /// countdown of `trail_capacity, .., 1` the trail fits within
    /// `trail_capacity` ticks and shrinks gradually rather than in one cut.
    pub fn advance(
        &mut self,
        velocity: DVec2,
        surface: &Surface,
        trail_capacity: usize,
        ticks_to_fit: usize,
    ) {
        self.velocity = velocity;
        self.position = surface.wrap(self.position + velocity);
        let excess = self.trail.len().saturating_sub(trail_capacity);
        self.trail.push_back(self.position);
        let evictions = 1 + excess.div_ceil(ticks_to_fit.max(1));
        for _ in 0..evictions {
            if self.trail.len() <= trail_capacity {
                break;
            }
            self.trail.pop_front();
        }
        self.age += 1;
    }

    pub(crate) fn set_color(&mut self, color: ColorMode) {
        self.color = color;
    }

    /// Stable identity, unique within a swarm.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn position(&self) -> DVec2 {
        self.position
    }

    pub fn velocity(&self) -> DVec2 {
        self.velocity
    }

    /// Ticks since creation.
    pub fn age(&self) -> u64 {
        self.age
    }

    pub fn trail(&self) -> &VecDeque<DVec2> {
        &self.trail
    }

    pub fn color(&self) -> ColorMode {
        self.color
    }
}
