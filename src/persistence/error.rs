//! Error types for document persistence.

use thiserror::Error;

use crate::model::ModelError;

/// Errors that can occur while loading or saving a document.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// XML parsing or serialization error.
    #[error("XML error: {0}")]
    Xml(String),

    /// IO error during read/write.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The document names a provider the registry does not know.
    #[error("Unknown model provider: {0}")]
    UnknownProvider(String),

    /// The model provider failed to encode or decode the model.
    #[error("Model provider '{provider}' failed: {source}")]
    Model {
        provider: String,
        #[source]
        source: ModelError,
    },

    /// Neither an explicit target nor the document's filename is set.
    #[error("No destination: no target given and the document has no filename")]
    NoDestination,

    /// The document's provider has no registered name.
    #[error("Model provider has no registered name")]
    UnnamedProvider,

    /// A metadata key cannot be written as an element name.
    #[error("Invalid metadata key: {0:?}")]
    InvalidMetadataKey(String),

    /// Text could not be decoded or encoded with the configured encoding.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// No document source accepts the input or target.
    #[error("Unsupported document source: {0}")]
    UnsupportedSource(String),
}

impl PersistenceError {
    /// Create an XML error.
    pub fn xml(message: impl Into<String>) -> Self {
        Self::Xml(message.into())
    }

    /// Create an encoding error.
    pub fn encoding(message: impl Into<String>) -> Self {
        Self::Encoding(message.into())
    }

    /// Wrap a provider failure, naming the provider.
    pub fn model(provider: impl Into<String>, source: ModelError) -> Self {
        match source {
            ModelError::UnknownProvider(name) => Self::UnknownProvider(name),
            source => Self::Model {
                provider: provider.into(),
                source,
            },
        }
    }
}
