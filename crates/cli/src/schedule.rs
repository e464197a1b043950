//! Scripted control changes for headless runs.
//!
//! Stands in for an interactive user dragging sliders or pressing buttons:
//! `--at 120:particle_count=150` resizes the swarm before tick 120,
//! `--at 300:color=ice` switches palette, `--at 50:randomize` presses the
//! randomize button.

use std::str::FromStr;

use flow_studio_core::color::ColorMode;
use flow_studio_core::params::{NOISE_SCALE, PARTICLE_COUNT, PARTICLE_SPEED, TRAIL_LENGTH};
use flow_studio_core::StudioError;
use flow_studio_swarm::FlowStudio;
use log::info;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Move one slider to a value.
    Set { key: String, value: f64 },
    Color(ColorMode),
    Randomize,
}

/// An [`Action`] applied just before the given tick runs.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledAction {
    pub tick: u64,
    pub action: Action,
}

const CONTROL_KEYS: [&str; 4] = [
    NOISE_SCALE.name,
    PARTICLE_SPEED.name,
    PARTICLE_COUNT.name,
    TRAIL_LENGTH.name,
];

impl FromStr for ScheduledAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (tick, rest) = s
            .split_once(':')
            .ok_or_else(|| format!("expected TICK:ACTION, got '{s}'"))?;
        let tick = tick
            .trim()
            .parse::<u64>()
            .map_err(|e| format!("bad tick '{tick}': {e}"))?;
        let rest = rest.trim();
        let action = if rest == "randomize" {
            Action::Randomize
        } else {
            let (key, value) = rest
                .split_once('=')
                .ok_or_else(|| format!("expected KEY=VALUE or 'randomize', got '{rest}'"))?;
            let (key, value) = (key.trim(), value.trim());
            if key == "color" || key == "color_mode" {
                Action::Color(ColorMode::from_name(value).map_err(|e| e.to_string())?)
            } else if CONTROL_KEYS.contains(&key) {
                let value = value
                    .parse::<f64>()
                    .map_err(|e| format!("bad value for {key}: {e}"))?;
                if value.is_nan() {
                    return Err(format!("bad value for {key}: NaN"));
                }
                Action::Set {
                    key: key.to_owned(),
                    value,
                }
            } else {
                return Err(format!(
                    "unknown control '{key}' (expected one of {}, color)",
                    CONTROL_KEYS.join(", ")
                ));
            }
        };
        Ok(ScheduledAction { tick, action })
    }
}

impl ScheduledAction {
    /// Applies the action to `studio`.
    ///
    /// Slider values are clamped into range, except a negative particle
    /// count, which is rejected with `StudioError::InvalidParameter`.
    pub fn apply(&self, studio: &mut FlowStudio) -> Result<(), StudioError> {
        match &self.action {
            Action::Randomize => {
                let p = studio.randomize()?;
                info!("tick {}: randomized to {p:?}", self.tick);
            }
            Action::Color(mode) => {
                studio.set_color_mode(*mode);
                info!("tick {}: color mode {mode}", self.tick);
            }
            Action::Set { key, value } => {
                let params = studio.current_params().with_control(key, *value)?;
                studio.set_params(params)?;
                info!("tick {}: {key} = {value}", self.tick);
            }
        }
        Ok(())
    }
}
