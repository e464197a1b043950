//! The particle population and its per-tick update.

use flow_studio_core::color::ColorMode;
use flow_studio_core::engine::TrailView;
use flow_studio_core::error::StudioError;
use flow_studio_core::prng::Xorshift64;
use flow_studio_core::surface::Surface;
use log::{debug, trace};

use crate::field::VectorField;
use crate::particle::Particle;

/// Owns every particle; grows, shrinks and advects them.
///
/// Particle order is stable: growth appends to the end and shrinking
/// truncates the tail, so survivors keep their identity and position in
/// the sequence.
#[derive(Debug, Clone)]
pub struct ParticleSwarm {
    surface: Surface,
    particles: Vec<Particle>,
    max_particles: usize,
    trail_capacity: usize,
    /// Steps left for over-long trails to fit `trail_capacity`.
    shrink_ticks_left: usize,
    color_mode: ColorMode,
    next_id: u64,
    rng: Xorshift64,
}

impl ParticleSwarm {
    /// Spawns `initial_count` particles at random positions, at rest, with
    /// empty trails.
    pub fn new(
        surface: Surface,
        initial_count: usize,
        trail_capacity: usize,
        rng: Xorshift64,
    ) -> Self {
        let mut swarm = Self {
            surface,
            particles: Vec::with_capacity(initial_count),
            max_particles: 0,
            trail_capacity,
            shrink_ticks_left: 0,
            color_mode: ColorMode::default(),
            next_id: 0,
            rng,
        };
        swarm.grow_to(initial_count);
        swarm
    }

    /// Resizes the swarm to exactly `n` particles.
    ///
    /// Growth appends fresh particles; shrinking drops the tail along with
    /// its trails. Returns `StudioError::InvalidParameter` for negative `n`,
    /// leaving the swarm untouched.
    pub fn set_target_count(&mut self, n: i64) -> Result<(), StudioError> {
        let target =
            usize::try_from(n).map_err(|_| StudioError::invalid_parameter("particle_count", n))?;
        let current = self.particles.len();
        if target > current {
            self.grow_to(target);
        } else if target < current {
            self.particles.truncate(target);
            self.max_particles = target;
        }
        if target != current {
            debug!("swarm resized {current} -> {target}");
        }
        Ok(())
    }

    fn grow_to(&mut self, target: usize) {
        self.particles.reserve(target.saturating_sub(self.particles.len()));
        while self.particles.len() < target {
            let particle =
                Particle::spawn(self.next_id, &self.surface, &mut self.rng, self.color_mode);
            self.next_id += 1;
            self.particles.push(particle);
        }
        self.max_particles = target;
    }

    /// Stores a new trail cap.
    ///
    /// Existing trails are not cut here. Over-long trails shrink on later
    /// steps and fit the new cap within `capacity` steps (one step for a
    /// zero cap).
    pub fn set_trail_capacity(&mut self, capacity: usize) {
        if capacity != self.trail_capacity {
            debug!("trail capacity {} -> {capacity}", self.trail_capacity);
            self.shrink_ticks_left = capacity.max(1);
        }
        self.trail_capacity = capacity;
    }

    /// Stores a new color mode. Particles pick it up on the next step.
    pub fn set_color_mode(&mut self, mode: ColorMode) {
        self.color_mode = mode;
    }

    /// Advects every particle one tick through `field`.
    ///
    /// Each particle samples the cell under it and moves along that
    /// direction scaled by a fresh uniform factor in [0, 1). A particle
    /// whose cell cannot be resolved keeps its previous velocity.
    pub fn step(&mut self, field: &VectorField) {
        for particle in &mut self.particles {
            let velocity = match field.sample(particle.position()) {
                Some(direction) => direction * self.rng.next_f64(),
                None => particle.velocity(),
            };
            particle.advance(
                velocity,
                &self.surface,
                self.trail_capacity,
                self.shrink_ticks_left,
            );
            particle.set_color(self.color_mode);
        }
        self.shrink_ticks_left = self.shrink_ticks_left.saturating_sub(1);
        trace!("stepped {} particles", self.particles.len());
    }

    /// Read-only render views, one per particle.
    pub fn trails(&self) -> Vec<TrailView<'_>> {
        self.particles
            .iter()
            .map(|p| TrailView {
                points: p.trail(),
                color: p.color().color(),
            })
            .collect()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Target population size.
    pub fn max_particles(&self) -> usize {
        self.max_particles
    }

    pub fn trail_capacity(&self) -> usize {
        self.trail_capacity
    }

    pub fn color_mode(&self) -> ColorMode {
        self.color_mode
    }

    pub fn surface(&self) -> Surface {
        self.surface
    }
}
