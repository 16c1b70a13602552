// Typed errors with thiserror. Surfaced to JS as Error values by the facades.
// Runtime guards (missing elements, locked rotations) are not errors.

use thiserror::Error;

/// Engine error types.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid page layout: {0}")]
    InvalidLayout(String),

    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    #[error("Elements not found: {}", .0.join(", "))]
    MissingElements(Vec<String>),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::Serialization(err.to_string())
    }
}
