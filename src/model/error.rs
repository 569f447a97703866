//! Error types for model providers and the provider registry.

use thiserror::Error;

/// Errors raised by model providers and the provider registry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// No provider is registered under this name.
    #[error("Unknown model provider: {0}")]
    UnknownProvider(String),

    /// A provider with this name is already registered.
    #[error("Model provider already registered: {0}")]
    DuplicateProvider(String),

    /// Provider names must not be blank.
    #[error("Model provider name must not be blank")]
    InvalidName,

    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    Json(String),

    /// YAML parsing or serialization error.
    #[error("YAML error: {0}")]
    Yaml(String),
}

impl ModelError {
    /// Create a JSON error.
    pub fn json(message: impl Into<String>) -> Self {
        Self::Json(message.into())
    }

    /// Create a YAML error.
    pub fn yaml(message: impl Into<String>) -> Self {
        Self::Yaml(message.into())
    }
}
