//! Errors raised by the simulation harness and CLI.

use endernode_core::DetectorError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("Unknown scenario: {0}")]
    UnknownScenario(String),

    #[error("Export failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Export serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] DetectorError),
}
