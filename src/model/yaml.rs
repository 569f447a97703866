//! YAML model provider.
//!
//! Holds the same model as the JSON provider but writes it in YAML syntax,
//! which reads better for hand-edited documents.
//!
//! ```yaml
//! Name: World
//! Items:
//!   - 1
//!   - 2
//! ```

use serde_json::Value;

use super::provider::empty_model;
use super::{ModelError, ModelProvider};

/// Registered name of the YAML provider.
pub const YAML_PROVIDER: &str = "Yaml";

/// Model provider that reads and writes YAML text.
#[derive(Debug, Clone, PartialEq)]
pub struct YamlModelProvider {
    model: Value,
}

impl Default for YamlModelProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl YamlModelProvider {
    pub fn new() -> Self {
        Self {
            model: empty_model(),
        }
    }

    pub fn with_model(model: Value) -> Self {
        Self { model }
    }
}

impl ModelProvider for YamlModelProvider {
    fn model(&self) -> &Value {
        &self.model
    }

    fn set_model(&mut self, model: Value) {
        self.model = model;
    }

    fn serialize(&self) -> Result<String, ModelError> {
        serde_yaml::to_string(&self.model)
            .map_err(|e| ModelError::yaml(format!("YAML write error: {e}")))
    }

    fn deserialize(&mut self, text: &str) -> Result<(), ModelError> {
        if text.trim().is_empty() {
            self.model = empty_model();
            return Ok(());
        }

        // Non-string mapping keys have no JSON equivalent and are rejected here.
        self.model = serde_yaml::from_str(text)
            .map_err(|e| ModelError::yaml(format!("YAML parse error: {e}")))?;
        Ok(())
    }
}
