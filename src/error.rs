//! Error types shared across the engine.

use thiserror::Error;

use crate::modules::store::StoreError;

pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Missing or malformed caller input.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller does not own the resource it tried to modify.
    #[error("Not authorized: {0}")]
    Authorization(String),

    /// A modality classifier failed or timed out.
    #[error("Upstream classifier error: {0}")]
    Upstream(String),

    /// Session already closed, or an update kept losing the race.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl EngineError {
    /// HTTP-style status reported to callers of the API layer.
    pub fn status_code(&self) -> u16 {
        match self {
            EngineError::Validation(_) | EngineError::Serialization(_) => 400,
            EngineError::Authorization(_) => 403,
            EngineError::NotFound(_) => 404,
            EngineError::Conflict(_) => 409,
            EngineError::Upstream(_) => 502,
            EngineError::Config(_) | EngineError::Internal(_) => 500,
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, EngineError::Conflict(_) | EngineError::Upstream(_))
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(error: serde_json::Error) -> Self {
        EngineError::Serialization(error.to_string())
    }
}

impl From<toml::de::Error> for EngineError {
    fn from(error: toml::de::Error) -> Self {
        EngineError::Config(error.to_string())
    }
}

impl From<std::io::Error> for EngineError {
    fn from(error: std::io::Error) -> Self {
        EngineError::Internal(format!("IO error: {}", error))
    }
}

impl From<StoreError> for EngineError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound(key) => EngineError::NotFound(key),
            StoreError::AlreadyExists(_) | StoreError::VersionConflict { .. } => {
                EngineError::Conflict(error.to_string())
            }
            StoreError::LockPoisoned => EngineError::Internal(error.to_string()),
        }
    }
}
