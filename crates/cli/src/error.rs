//! Structured CLI errors with meaningful exit codes.
//!
//! Exit code scheme:
//! - 0:  success
//! - 2:  clap arg parse error (automatic, before our code runs)
//! - 10: studio error (bad dimensions, bad parameter)
//! - 11: I/O error (config read, PNG export)
//! - 12: input error (bad color mode, bad scheduled action)
//! - 13: serialization error

use flow_studio_core::StudioError;
use std::fmt;

/// Errors produced by CLI operations, each mapped to a distinct exit code.
#[derive(Debug)]
pub enum CliError {
    Studio(StudioError),
    Io(String),
    Input(String),
    Serialization(String),
}

impl CliError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Studio(_) => 10,
            CliError::Io(_) => 11,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Studio(e) => write!(f, "{e}"),
            CliError::Io(msg) | CliError::Input(msg) | CliError::Serialization(msg) => {
                write!(f, "{msg}")
            }
        }
    }
}

impl From<StudioError> for CliError {
    fn from(e: StudioError) -> Self {
        match e {
            StudioError::Io(msg) => CliError::Io(msg),
            StudioError::UnknownColorMode(_) => CliError::Input(e.to_string()),
            other => CliError::Studio(other),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialization(e.to_string())
    }
}
