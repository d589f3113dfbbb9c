//! Errors returned by state machine operations and configuration loading.

use thiserror::Error;

/// Errors that can occur when registering or firing states and transitions.
///
/// None of these are fatal: the machine is left exactly as it was before the
/// failed call, and a matching diagnostic has already been sent to the sink.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MachineError {
    #[error("State '{0}' is already registered")]
    DuplicateState(String),

    #[error("Transition '{0}' is already registered")]
    DuplicateTransition(String),

    #[error("State '{0}' not found")]
    StateNotFound(String),

    #[error("Transition '{0}' not found")]
    TransitionNotFound(String),

    #[error("Wrong entry state for transition '{transition}': expected '{expected}', current is '{actual}'")]
    WrongOrigin {
        transition: String,
        expected: String,
        actual: String,
    },

    #[error("No current state set; call start_with first")]
    NoCurrentState,

    #[error("No transition from '{from}' to '{to}'")]
    UnmatchedTarget { from: String, to: String },
}

/// Errors that can occur when loading a [`MachineConfig`](crate::MachineConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse machine config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid update interval '{value}': {reason}")]
    InvalidInterval { value: String, reason: String },
}
