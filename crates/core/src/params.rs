//! Control parameters.
//!
//! The studio exposes four externally tunable controls. Each has a fixed
//! [`ParamRange`]; values arriving from a UI, a config file or the command
//! line are clamped into range before they reach the simulation.

use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::StudioError;
use crate::prng::Xorshift64;

/// Inclusive numeric range for a control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRange {
    pub name: &'static str,
    pub min: f64,
    pub max: f64,
    pub default: f64,
}

impl ParamRange {
    /// Clamps `value` into the range, logging when it had to move.
    ///
    /// NaN maps to the default.
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            warn!("{} is NaN, using default {}", self.name, self.default);
            return self.default;
        }
        let clamped = value.clamp(self.min, self.max);
        if clamped != value {
            warn!(
                "{} = {value} outside [{}, {}], clamped to {clamped}",
                self.name, self.min, self.max
            );
        }
        clamped
    }

    /// Draws a uniform value in [min, max).
    pub fn sample(&self, rng: &mut Xorshift64) -> f64 {
        rng.next_range(self.min, self.max)
    }

    /// Returns whether `value` lies inside the range.
    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

pub const NOISE_SCALE: ParamRange = ParamRange {
    name: "noise_scale",
    min: 0.01,
    max: 0.5,
    default: 0.1,
};

pub const PARTICLE_SPEED: ParamRange = ParamRange {
    name: "particle_speed",
    min: 0.1,
    max: 5.0,
    default: 1.0,
};

pub const PARTICLE_COUNT: ParamRange = ParamRange {
    name: "particle_count",
    min: 100.0,
    max: 5000.0,
    default: 1000.0,
};

pub const TRAIL_LENGTH: ParamRange = ParamRange {
    name: "trail_length",
    min: 10.0,
    max: 200.0,
    default: 50.0,
};

/// The four live controls of the studio.
///
/// Integer controls are stored as integers; a slider producing 1234.7 feeds
/// 1234 particles, matching truncation toward zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudioParams {
    /// Retained for interface compatibility; field sampling ignores it.
    pub noise_scale: f64,
    /// Magnitude of every field cell's direction.
    pub particle_speed: f64,
    /// Target swarm size.
    pub particle_count: usize,
    /// Per-particle trail capacity.
    pub trail_length: usize,
}

impl Default for StudioParams {
    fn default() -> Self {
        Self {
            noise_scale: NOISE_SCALE.default,
            particle_speed: PARTICLE_SPEED.default,
            particle_count: PARTICLE_COUNT.default as usize,
            trail_length: TRAIL_LENGTH.default as usize,
        }
    }
}

impl StudioParams {
    /// Returns a copy with the control `name` moved to `value`, as a slider
    /// drag would. The value is clamped into the control's range and integer
    /// controls truncate toward zero.
    ///
    /// Returns `StudioError::ParamNotFound` for an unknown control and
    /// `StudioError::InvalidParameter` for NaN or a negative particle count.
    pub fn with_control(self, name: &str, value: f64) -> Result<Self, StudioError> {
        if value.is_nan() {
            return Err(StudioError::invalid_parameter(name, value));
        }
        let mut p = self;
        match name {
            n if n == NOISE_SCALE.name => p.noise_scale = NOISE_SCALE.clamp(value),
            n if n == PARTICLE_SPEED.name => p.particle_speed = PARTICLE_SPEED.clamp(value),
            n if n == PARTICLE_COUNT.name => {
                if value < 0.0 {
                    return Err(StudioError::invalid_parameter(name, value));
                }
                p.particle_count = PARTICLE_COUNT.clamp(value) as usize;
            }
            n if n == TRAIL_LENGTH.name => p.trail_length = TRAIL_LENGTH.clamp(value) as usize,
            _ => return Err(StudioError::ParamNotFound(name.to_owned())),
        }
        Ok(p)
    }

    /// Returns a copy with every control clamped into its range.
    pub fn clamped(self) -> Self {
        Self {
            noise_scale: NOISE_SCALE.clamp(self.noise_scale),
            particle_speed: PARTICLE_SPEED.clamp(self.particle_speed),
            particle_count: PARTICLE_COUNT.clamp(self.particle_count as f64) as usize,
            trail_length: TRAIL_LENGTH.clamp(self.trail_length as f64) as usize,
        }
    }

    /// Draws every control uniformly within its range.
    pub fn randomized(rng: &mut Xorshift64) -> Self {
        Self {
            noise_scale: NOISE_SCALE.sample(rng),
            particle_speed: PARTICLE_SPEED.sample(rng),
            particle_count: PARTICLE_COUNT.sample(rng) as usize,
            trail_length: TRAIL_LENGTH.sample(rng) as usize,
        }
    }

    /// Current values as a JSON object.
    pub fn to_json(&self) -> Value {
        json!({
            NOISE_SCALE.name: self.noise_scale,
            PARTICLE_SPEED.name: self.particle_speed,
            PARTICLE_COUNT.name: self.particle_count,
            TRAIL_LENGTH.name: self.trail_length,
        })
    }

    /// Schema describing every control: type, range, default, description.
    pub fn schema() -> Value {
        json!({
            NOISE_SCALE.name: {
                "type": "number",
                "default": NOISE_SCALE.default,
                "min": NOISE_SCALE.min,
                "max": NOISE_SCALE.max,
                "description": "Noise scale (kept for compatibility, does not affect the field)"
            },
            PARTICLE_SPEED.name: {
                "type": "number",
                "default": PARTICLE_SPEED.default,
                "min": PARTICLE_SPEED.min,
                "max": PARTICLE_SPEED.max,
                "description": "Magnitude of every field direction"
            },
            PARTICLE_COUNT.name: {
                "type": "integer",
                "default": PARTICLE_COUNT.default,
                "min": PARTICLE_COUNT.min,
                "max": PARTICLE_COUNT.max,
                "description": "Number of particles in the swarm"
            },
            TRAIL_LENGTH.name: {
                "type": "integer",
                "default": TRAIL_LENGTH.default,
                "min": TRAIL_LENGTH.min,
                "max": TRAIL_LENGTH.max,
                "description": "Positions kept per particle trail"
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_control_defaults() {
        let p = StudioParams::default();
        assert!((p.noise_scale - 0.1).abs() < f64::EPSILON);
        assert!((p.particle_speed - 1.0).abs() < f64::EPSILON);
        assert_eq!(p.particle_count, 1000);
        assert_eq!(p.trail_length, 50);
    }

    #[test]
    fn clamp_pulls_values_into_range() {
        let p = StudioParams {
            noise_scale: 3.0,
            particle_speed: 0.0,
            particle_count: 10,
            trail_length: 10_000,
        }
        .clamped();
        assert!((p.noise_scale - 0.5).abs() < f64::EPSILON);
        assert!((p.particle_speed - 0.1).abs() < f64::EPSILON);
        assert_eq!(p.particle_count, 100);
        assert_eq!(p.trail_length, 200);
    }

    #[test]
    fn clamp_leaves_in_range_values_alone() {
        let p = StudioParams {
            noise_scale: 0.2,
            particle_speed: 2.5,
            particle_count: 321,
            trail_length: 77,
        };
        assert_eq!(p.clamped(), p);
    }

    #[test]
    fn nan_clamps_to_default() {
        assert!((PARTICLE_SPEED.clamp(f64::NAN) - PARTICLE_SPEED.default).abs() < f64::EPSILON);
    }

    #[test]
    fn randomized_stays_in_range() {
        let mut rng = Xorshift64::new(3);
        for _ in 0..1000 {
            let p = StudioParams::randomized(&mut rng);
            assert!(NOISE_SCALE.contains(p.noise_scale));
            assert!(PARTICLE_SPEED.contains(p.particle_speed));
            assert!(PARTICLE_COUNT.contains(p.particle_count as f64));
            assert!(TRAIL_LENGTH.contains(p.trail_length as f64));
        }
    }

    #[test]
    fn schema_lists_all_four_controls_with_ranges() {
        let schema = StudioParams::schema();
        for key in ["noise_scale", "particle_speed", "particle_count", "trail_length"] {
            let entry = &schema[key];
            for field in ["type", "default", "min", "max", "description"] {
                assert!(entry.get(field).is_some(), "{key} missing '{field}'");
            }
        }
    }

    #[test]
    fn to_json_lists_every_control() {
        let v = StudioParams::default().to_json();
        assert_eq!(v["particle_count"], 1000);
        assert_eq!(v["trail_length"], 50);
        assert!((v["particle_speed"].as_f64().unwrap() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn with_control_clamps_into_range() {
        let p = StudioParams::default();
        assert_eq!(p.with_control("trail_length", -5.0).unwrap().trail_length, 10);
        assert_eq!(p.with_control("trail_length", 1e9).unwrap().trail_length, 200);
        assert_eq!(p.with_control("particle_count", 1234.7).unwrap().particle_count, 1234);
        assert_eq!(p.with_control("particle_count", 3.0).unwrap().particle_count, 100);
        let fast = p.with_control("particle_speed", 9.0).unwrap();
        assert!((fast.particle_speed - 5.0).abs() < f64::EPSILON);
        assert_eq!(fast.trail_length, p.trail_length, "other controls moved");
    }

    #[test]
    fn with_control_rejects_nan_and_negative_count() {
        let p = StudioParams::default();
        for name in ["noise_scale", "particle_speed", "particle_count", "trail_length"] {
            assert!(matches!(
                p.with_control(name, f64::NAN),
                Err(StudioError::InvalidParameter { .. })
            ));
        }
        assert!(matches!(
            p.with_control("particle_count", -1.0),
            Err(StudioError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn with_control_unknown_name() {
        assert!(matches!(
            StudioParams::default().with_control("warp", 1.0),
            Err(StudioError::ParamNotFound(name)) if name == "warp"
        ));
    }
}
