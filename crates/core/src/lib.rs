#![deny(unsafe_code)]
//! Core types and traits for flow-studio.
//!
//! Provides the `Engine` trait and `TrailView` render query, the toroidal
//! `Surface`, `StudioError`, the `Xorshift64` PRNG, trail colors, the four
//! live controls (`StudioParams`) and session configuration (`StudioConfig`).

pub mod color;
pub mod config;
pub mod engine;
pub mod error;
pub mod params;
pub mod prng;
pub mod surface;

pub use color::{ColorMode, Srgb};
pub use config::StudioConfig;
pub use engine::{Engine, TrailView};
pub use error::StudioError;
pub use params::StudioParams;
pub use prng::Xorshift64;
pub use surface::Surface;
