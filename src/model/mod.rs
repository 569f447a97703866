//! Pluggable encodings for a document's data model.
//!
//! A document's model is owned by a [`ModelProvider`]. Providers are created
//! by name through the [`ModelProviders`] registry, and the registry can map
//! a provider handle back to its name when the document is saved.
//!
//! ```text
//! ┌────────────────┐   create("Json")   ┌─────────────────────────┐
//! │ ModelProviders │ ─────────────────▶ │ ModelHandle             │
//! │ name → factory │ ◀───────────────── │  { name, provider }     │
//! └────────────────┘   name_of(handle)  └─────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```
//! use razorpad::model::ModelProviders;
//!
//! let providers = ModelProviders::default();
//! let mut handle = providers.create("Json")?;
//! handle.deserialize(r#"{"Name":"World"}"#)?;
//! assert_eq!(providers.name_of(&handle), Some("Json"));
//! # Ok::<(), razorpad::model::ModelError>(())
//! ```

mod error;
mod json;
mod provider;
mod registry;
#[cfg(feature = "yaml")]
mod yaml;

pub use error::ModelError;
pub use json::{JSON_PROVIDER, JsonModelProvider};
pub use provider::{ModelHandle, ModelProvider};
pub use registry::{ModelProviders, ProviderFactory};
#[cfg(feature = "yaml")]
pub use yaml::{YAML_PROVIDER, YamlModelProvider};
