//! JSON model provider.
//!
//! ```json
//! {
//!   "Name": "World",
//!   "Items": [1, 2, 3]
//! }
//! ```

use serde_json::Value;

use super::provider::empty_model;
use super::{ModelError, ModelProvider};

/// Registered name of the JSON provider. Also the provider assumed when a
/// document does not name one.
pub const JSON_PROVIDER: &str = "Json";

/// Model provider that reads and writes JSON text.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonModelProvider {
    model: Value,
}

impl Default for JsonModelProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonModelProvider {
    pub fn new() -> Self {
        Self {
            model: empty_model(),
        }
    }

    pub fn with_model(model: Value) -> Self {
        Self { model }
    }
}

impl ModelProvider for JsonModelProvider {
    fn model(&self) -> &Value {
        &self.model
    }

    fn set_model(&mut self, model: Value) {
        self.model = model;
    }

    fn serialize(&self) -> Result<String, ModelError> {
        serde_json::to_string_pretty(&self.model)
            .map_err(|e| ModelError::json(format!("JSON write error: {e}")))
    }

    fn deserialize(&mut self, text: &str) -> Result<(), ModelError> {
        if text.trim().is_empty() {
            self.model = empty_model();
            return Ok(());
        }

        self.model = serde_json::from_str(text)
            .map_err(|e| ModelError::json(format!("JSON parse error: {e}")))?;
        Ok(())
    }
}
