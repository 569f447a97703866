//! The model provider capability and the handle a document holds.

use std::fmt;

use serde_json::Value;

use super::ModelError;

/// A strategy for encoding a document's data model as text.
///
/// Every provider keeps its model as a [`serde_json::Value`] so callers can
/// inspect and edit the model without knowing how it is written to disk.
/// Providers differ only in the text representation produced by
/// [`serialize`](ModelProvider::serialize) and accepted by
/// [`deserialize`](ModelProvider::deserialize).
pub trait ModelProvider: fmt::Debug + Send + Sync {
    /// The current model.
    fn model(&self) -> &Value;

    /// Replace the current model.
    fn set_model(&mut self, model: Value);

    /// Encode the current model as text.
    fn serialize(&self) -> Result<String, ModelError>;

    /// Replace the current model with one decoded from `text`.
    ///
    /// Empty or whitespace-only text yields an empty object.
    fn deserialize(&mut self, text: &str) -> Result<(), ModelError>;
}

/// A provider instance bound to the name it was registered under.
///
/// Handles created by [`ModelProviders::create`](super::ModelProviders::create)
/// carry their registered name, which is how the registry answers inverse
/// lookups. Handles built with [`ModelHandle::detached`] have no name.
pub struct ModelHandle {
    name: Option<String>,
    provider: Box<dyn ModelProvider>,
}

impl ModelHandle {
    pub(crate) fn registered(name: impl Into<String>, provider: Box<dyn ModelProvider>) -> Self {
        Self {
            name: Some(name.into()),
            provider,
        }
    }

    /// Wrap a provider that did not come from a registry.
    pub fn detached(provider: Box<dyn ModelProvider>) -> Self {
        Self {
            name: None,
            provider,
        }
    }

    /// The name recorded when the handle was created, if any.
    ///
    /// Prefer [`ModelProviders::name_of`](super::ModelProviders::name_of),
    /// which also checks the name is still registered.
    pub fn recorded_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn provider(&self) -> &dyn ModelProvider {
        self.provider.as_ref()
    }

    pub fn provider_mut(&mut self) -> &mut dyn ModelProvider {
        self.provider.as_mut()
    }

    pub fn model(&self) -> &Value {
        self.provider.model()
    }

    pub fn set_model(&mut self, model: Value) {
        self.provider.set_model(model);
    }

    pub fn serialize(&self) -> Result<String, ModelError> {
        self.provider.serialize()
    }

    pub fn deserialize(&mut self, text: &str) -> Result<(), ModelError> {
        self.provider.deserialize(text)
    }
}

impl fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelHandle")
            .field("name", &self.name)
            .field("provider", &self.provider)
            .finish()
    }
}

/// An empty model, used for blank model text.
pub(crate) fn empty_model() -> Value {
    Value::Object(serde_json::Map::new())
}
