//! Name-indexed registry of model provider factories.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use super::{JSON_PROVIDER, JsonModelProvider, ModelError, ModelHandle, ModelProvider};

/// Builds a fresh provider instance.
pub type ProviderFactory = Arc<dyn Fn() -> Box<dyn ModelProvider> + Send + Sync>;

/// Maps provider names to factories, and handles back to their names.
///
/// Names are case-sensitive. Lookups of unknown names fail with
/// [`ModelError::UnknownProvider`]; the registry never substitutes a default.
#[derive(Clone)]
pub struct ModelProviders {
    factories: IndexMap<String, ProviderFactory>,
}

impl Default for ModelProviders {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl ModelProviders {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            factories: IndexMap::new(),
        }
    }

    /// A registry holding the built-in providers.
    pub fn with_defaults() -> Self {
        let mut providers = Self::new();
        providers.insert(JSON_PROVIDER, || Box::new(JsonModelProvider::new()));
        #[cfg(feature = "yaml")]
        providers.insert(super::YAML_PROVIDER, || {
            Box::new(super::YamlModelProvider::new())
        });
        providers
    }

    fn insert<F>(&mut self, name: &str, factory: F)
    where
        F: Fn() -> Box<dyn ModelProvider> + Send + Sync + 'static,
    {
        self.factories.insert(name.to_string(), Arc::new(factory));
    }

    /// Register a provider factory under `name`.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F) -> Result<(), ModelError>
    where
        F: Fn() -> Box<dyn ModelProvider> + Send + Sync + 'static,
    {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ModelError::InvalidName);
        }
        if self.factories.contains_key(&name) {
            return Err(ModelError::DuplicateProvider(name));
        }

        self.factories.insert(name, Arc::new(factory));
        Ok(())
    }

    /// Create a provider instance bound to `name`.
    pub fn create(&self, name: &str) -> Result<ModelHandle, ModelError> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| ModelError::UnknownProvider(name.to_string()))?;
        Ok(ModelHandle::registered(name, factory()))
    }

    /// The registered name of the provider behind `handle`.
    ///
    /// Returns `None` for detached handles and for names this registry does
    /// not know.
    pub fn name_of<'a>(&'a self, handle: &ModelHandle) -> Option<&'a str> {
        let name = handle.recorded_name()?;
        self.factories
            .get_key_value(name)
            .map(|(registered, _)| registered.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl fmt::Debug for ModelProviders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelProviders")
            .field("names", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}
