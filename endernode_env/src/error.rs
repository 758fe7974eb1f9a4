//! Error types for the environment abstraction.

use thiserror::Error;

/// Errors that can occur in the environment abstraction layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvError {
    /// A location name did not match any known location
    #[error("Unknown location: {0}")]
    UnknownLocation(String),

    /// A face direction name did not match any of the six directions
    #[error("Unknown direction: {0}")]
    UnknownDirection(String),
}

impl EnvError {
    /// Creates an unknown-location error.
    pub fn unknown_location(name: impl Into<String>) -> Self {
        Self::UnknownLocation(name.into())
    }

    /// Creates an unknown-direction error.
    pub fn unknown_direction(name: impl Into<String>) -> Self {
        Self::UnknownDirection(name.into())
    }
}
