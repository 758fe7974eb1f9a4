//! Error types for the detector crate.
//!
//! The detection pass itself never fails; these cover configuration loading
//! and the ingress runtime.

use thiserror::Error;

/// Errors surfaced by configuration loading and the runtime handle.
#[derive(Debug, Error)]
pub enum DetectorError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {reason}")]
    InvalidConfig {
        /// What is wrong with the configuration
        reason: String,
    },

    #[error("Detector runtime has shut down")]
    ChannelClosed,
}

impl DetectorError {
    /// Creates an invalid-config error.
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }
}
