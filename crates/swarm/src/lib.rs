#![deny(unsafe_code)]
//! Particle advection for flow-studio.
//!
//! A [`VectorField`] holds one random direction per grid cell. A
//! [`ParticleSwarm`] samples the cell under each particle every tick, moves
//! the particle along it with per-particle jitter, wraps it around the
//! surface and records a bounded trail. [`FlowStudio`] owns one of each plus
//! the live controls and implements the core `Engine` trait.

pub mod field;
pub mod particle;
pub mod studio;
pub mod swarm;

pub use field::{FieldCell, VectorField};
pub use particle::Particle;
pub use studio::FlowStudio;
pub use swarm::ParticleSwarm;
