//! Error types for the flow-studio core.

use thiserror::Error;

/// Errors produced by field, swarm and export operations.
#[derive(Debug, Error)]
pub enum StudioError {
    /// Surface width/height or field resolution was zero, or their product overflowed.
    #[error("invalid dimensions: width, height and resolution must be non-zero")]
    InvalidDimensions,

    /// A control value was outside the domain the operation accepts.
    #[error("invalid parameter '{name}': {value}")]
    InvalidParameter { name: String, value: String },

    /// A control name did not match any known control.
    #[error("unknown control: {0}")]
    ParamNotFound(String),

    /// A color mode name did not match any known mode.
    #[error("unknown color mode: {0}")]
    UnknownColorMode(String),

    /// Writing an exported frame failed.
    #[error("i/o error: {0}")]
    Io(String),
}

impl StudioError {
    /// Shorthand for [`StudioError::InvalidParameter`].
    pub fn invalid_parameter(name: &str, value: impl ToString) -> Self {
        StudioError::InvalidParameter {
            name: name.to_owned(),
            value: value.to_string(),
        }
    }
}
