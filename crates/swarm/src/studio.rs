//! Session context: one field, one swarm, the live controls.
//!
//! A driver builds a [`FlowStudio`] once, forwards control changes into it
//! and calls [`Engine::step`] once per frame. Renderers read it through the
//! [`Engine`] trait.

use flow_studio_core::color::ColorMode;
use flow_studio_core::config::StudioConfig;
use flow_studio_core::engine::{Engine, TrailView};
use flow_studio_core::error::StudioError;
use flow_studio_core::params::StudioParams;
use flow_studio_core::prng::Xorshift64;
use flow_studio_core::surface::Surface;
use log::{debug, info};
use serde_json::{json, Value};

use crate::field::VectorField;
use crate::swarm::ParticleSwarm;

pub struct FlowStudio {
    field: VectorField,
    swarm: ParticleSwarm,
    params: StudioParams,
    /// Drives the randomize action.
    rng: Xorshift64,
    ticks: u64,
}

impl FlowStudio {
    /// Builds a session from `config`.
    ///
    /// Parameters are clamped into their ranges. Returns
    /// `StudioError::InvalidDimensions` for an empty surface or grid.
    pub fn new(config: &StudioConfig) -> Result<Self, StudioError> {
        let surface = config.surface()?;
        let params = config.params.clamped();
        let mut rng = Xorshift64::from_optional_seed(config.seed);

        let mut field =
            VectorField::new(surface, config.resolution, params.particle_speed, rng.split())?;
        field.set_noise_scale(params.noise_scale);

        let mut swarm = ParticleSwarm::new(
            surface,
            params.particle_count,
            params.trail_length,
            rng.split(),
        );
        swarm.set_color_mode(config.color_mode);

        info!(
            "studio {}x{} grid {}, {} particles",
            config.width, config.height, config.resolution, params.particle_count
        );
        Ok(Self {
            field,
            swarm,
            params,
            rng,
            ticks: 0,
        })
    }

    /// Clamps and applies all four controls.
    ///
    /// The swarm is resized before returning; the new speed rescales the
    /// current field directions; the trail cap converges over later ticks.
    pub fn set_params(&mut self, params: StudioParams) -> Result<(), StudioError> {
        let params = params.clamped();
        let count = i64::try_from(params.particle_count)
            .map_err(|_| StudioError::invalid_parameter("particle_count", params.particle_count))?;
        self.swarm.set_target_count(count)?;
        self.swarm.set_trail_capacity(params.trail_length);
        self.field.set_speed_factor(params.particle_speed);
        self.field.set_noise_scale(params.noise_scale);
        if params != self.params {
            debug!("params applied: {params:?}");
        }
        self.params = params;
        Ok(())
    }

    /// Draws every control uniformly in range, applies them and regenerates
    /// the field right away.
    pub fn randomize(&mut self) -> Result<StudioParams, StudioError> {
        let params = StudioParams::randomized(&mut self.rng);
        self.set_params(params)?;
        self.field.regenerate();
        debug!("randomized controls: {:?}", self.params);
        Ok(self.params)
    }

    pub fn set_color_mode(&mut self, mode: ColorMode) {
        self.swarm.set_color_mode(mode);
    }

    /// One frame: regenerate the field, then advect the swarm through it.
    pub fn tick(&mut self) {
        self.field.regenerate();
        self.swarm.step(&self.field);
        self.ticks += 1;
    }

    pub fn field(&self) -> &VectorField {
        &self.field
    }

    pub fn swarm(&self) -> &ParticleSwarm {
        &self.swarm
    }

    pub fn current_params(&self) -> StudioParams {
        self.params
    }

    pub fn color_mode(&self) -> ColorMode {
        self.swarm.color_mode()
    }

    /// Frames stepped since construction.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

impl Engine for FlowStudio {
    fn step(&mut self) -> Result<(), StudioError> {
        self.tick();
        Ok(())
    }

    fn surface(&self) -> Surface {
        self.swarm.surface()
    }

    fn params(&self) -> Value {
        let mut value = self.params.to_json();
        value["color_mode"] = json!(self.color_mode().name());
        value
    }

    fn param_schema(&self) -> Value {
        let mut schema = StudioParams::schema();
        schema["color_mode"] = json!({
            "type": "string",
            "default": ColorMode::default().name(),
            "values": ColorMode::list_names(),
            "description": "Trail palette applied to every particle"
        });
        schema
    }

    fn trails(&self) -> Vec<TrailView<'_>> {
        self.swarm.trails()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(seed: u64) -> StudioConfig {
        StudioConfig {
            seed: Some(seed),
            ..StudioConfig::default()
        }
    }

    fn studio(seed: u64) -> FlowStudio {
        FlowStudio::new(&config(seed)).unwrap()
    }

    #[test]
    fn new_builds_default_session() {
        let s = studio(42);
        assert_eq!(s.swarm().len(), 1000);
        assert_eq!(s.swarm().trail_capacity(), 50);
        assert_eq!(s.field().resolution(), 20);
        assert!((s.field().speed_factor() - 1.0).abs() < f64::EPSILON);
        assert!((s.field().noise_scale() - 0.1).abs() < f64::EPSILON);
        assert_eq!(s.ticks(), 0);
    }

    #[test]
    fn new_rejects_empty_surface() {
        let c = StudioConfig {
            width: 0,
            ..config(1)
        };
        assert!(matches!(
            FlowStudio::new(&c),
            Err(StudioError::InvalidDimensions)
        ));
    }

    #[test]
    fn new_clamps_out_of_range_params() {
        let mut c = config(1);
        c.params.particle_count = 10;
        c.params.particle_speed = 50.0;
        let s = FlowStudio::new(&c).unwrap();
        assert_eq!(s.swarm().len(), 100);
        assert!((s.field().speed_factor() - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn new_applies_configured_color_mode() {
        let c = StudioConfig {
            color_mode: ColorMode::Ice,
            ..config(1)
        };
        let s = FlowStudio::new(&c).unwrap();
        assert_eq!(s.color_mode(), ColorMode::Ice);
        assert!(s.swarm().particles().iter().all(|p| p.color() == ColorMode::Ice));
    }

    #[test]
    fn tick_steps_field_and_swarm() {
        let mut s = studio(7);
        let before: Vec<_> = s.field().cells().to_vec();
        s.tick();
        assert_eq!(s.ticks(), 1);
        assert_ne!(s.field().cells(), &before[..]);
        assert!(s.swarm().particles().iter().all(|p| p.age() == 1));
    }

    #[test]
    fn set_params_resizes_and_rescales() {
        let mut s = studio(3);
        let p = StudioParams {
            noise_scale: 0.3,
            particle_speed: 2.5,
            particle_count: 150,
            trail_length: 20,
        };
        s.set_params(p).unwrap();
        assert_eq!(s.swarm().len(), 150);
        assert_eq!(s.swarm().trail_capacity(), 20);
        assert!((s.field().noise_scale() - 0.3).abs() < f64::EPSILON);
        for c in s.field().cells() {
            assert!((c.direction().length() - 2.5).abs() < 1e-12);
        }
        assert_eq!(s.current_params(), p);
    }

    #[test]
    fn set_params_clamps_before_applying() {
        let mut s = studio(3);
        s.set_params(StudioParams {
            particle_count: 9000,
            trail_length: 1,
            ..StudioParams::default()
        })
        .unwrap();
        assert_eq!(s.swarm().len(), 5000);
        assert_eq!(s.swarm().trail_capacity(), 10);
    }

    #[test]
    fn randomize_draws_in_range_and_regenerates() {
        let mut s = studio(11);
        let before: Vec<_> = s.field().cells().to_vec();
        let p = s.randomize().unwrap();
        assert_eq!(p, p.clamped());
        assert_eq!(s.current_params(), p);
        assert_eq!(s.swarm().len(), p.particle_count);
        assert_ne!(s.field().cells(), &before[..]);
        for c in s.field().cells() {
            assert!((c.direction().length() - p.particle_speed).abs() < 1e-12);
        }
    }

    #[test]
    fn same_seed_same_session() {
        let mut a = studio(99);
        let mut b = studio(99);
        a.randomize().unwrap();
        b.randomize().unwrap();
        for _ in 0..10 {
            a.tick();
            b.tick();
        }
        assert_eq!(a.swarm().particles(), b.swarm().particles());
    }

    #[test]
    fn engine_params_include_color_mode() {
        let mut s = studio(1);
        s.set_color_mode(ColorMode::Rose);
        let p = Engine::params(&s);
        assert_eq!(p["color_mode"], "rose");
        assert_eq!(p["particle_count"], 1000);
    }

    #[test]
    fn param_schema_covers_controls_and_color_mode() {
        let s = studio(1);
        let schema = s.param_schema();
        for key in ["noise_scale", "particle_speed", "particle_count", "trail_length", "color_mode"] {
            assert!(schema.get(key).is_some(), "schema missing {key}");
        }
    }

    #[test]
    fn engine_step_is_a_tick() {
        let mut s = studio(5);
        let engine: &mut dyn Engine = &mut s;
        engine.step().unwrap();
        engine.step().unwrap();
        assert_eq!(engine.trails().len(), 1000);
        assert!(engine.trails().iter().all(|t| t.points.len() == 2));
        assert_eq!(s.ticks(), 2);
    }

    #[test]
    fn surface_matches_config() {
        let s = studio(5);
        let surface = Engine::surface(&s);
        assert!((surface.width() - 1200.0).abs() < f64::EPSILON);
        assert!((surface.height() - 800.0).abs() < f64::EPSILON);
    }
}
