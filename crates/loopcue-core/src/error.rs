//! Core error types for loopcue-core.
//!
//! The engine has no I/O and therefore no fatal failure mode: everything it
//! can reject is an [`EngineError`], returned synchronously with the state
//! untouched. The settings layer owns the only fallible I/O in the crate.

use std::path::PathBuf;
use thiserror::Error;

use crate::timer::TimerState;

/// Core error type for loopcue-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Rejected engine operation
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    /// Settings persistence errors
    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Synchronous rejection of an engine operation. State is left untouched
/// and no events are emitted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The operation is not legal in the current state
    #[error("invalid transition: {op} while {state:?}")]
    InvalidTransition { op: &'static str, state: TimerState },

    /// A profile index outside the configured bank
    #[error("profile index {index} out of range (bank holds {len})")]
    ProfileIndex { index: usize, len: usize },
}

/// Settings-layer errors.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// Failed to create the settings directory
    #[error("failed to create settings directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to read the settings file
    #[error("failed to read settings from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the settings file
    #[error("failed to write settings to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The settings file exists but is not valid TOML for this schema
    #[error("failed to parse settings at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Settings could not be serialized
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A dot-path key that does not name a settings field
    #[error("unknown settings key: {0}")]
    UnknownKey(String),

    /// A value that cannot be coerced into the field's type
    #[error("cannot apply '{value}' to key '{key}': {message}")]
    InvalidValue {
        key: String,
        value: String,
        message: String,
    },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
