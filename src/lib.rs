//! # razorpad-core
//!
//! Document persistence for the RazorPad template editor.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! persistence → Document sources: XML codec, sniffing, source selection
//!   ↓
//! document    → RazorDocument, DocumentKind
//!   ↓
//! model       → ModelProvider trait, JSON/YAML providers, registry
//! ```

// ============================================================================
// MODULES (dependency order: model → document → persistence)
// ============================================================================

/// Model providers: pluggable encodings for a document's data model
pub mod model;

/// The in-memory template document
pub mod document;

/// Loading and saving documents
pub mod persistence;

pub use document::{DocumentKind, RazorDocument};
pub use model::{ModelError, ModelHandle, ModelProvider, ModelProviders};
pub use persistence::{DocumentSource, DocumentSources, PersistenceError, XmlDocumentSource};
