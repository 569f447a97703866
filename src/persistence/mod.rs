//! Document persistence.
//!
//! Converts between [`RazorDocument`](crate::document::RazorDocument) and the
//! XML document file format. The document's model is encoded by its
//! [`ModelProvider`](crate::model::ModelProvider); the envelope only records
//! the provider's name and its output.
//!
//! ## Architecture
//!
//! ```text
//!   text / file / stream
//!           │ parse
//!           ▼
//! ┌────────────────────┐     create(name)    ┌────────────────┐
//! │  XmlElement tree   │ ──────────────────▶ │ ModelProviders │
//! └─────────┬──────────┘                     └───────┬────────┘
//!           │ sections                               │ ModelHandle
//!           ▼                                        ▼
//! ┌──────────────────────────────────────────────────────────┐
//! │                      RazorDocument                       │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```no_run
//! use std::path::Path;
//! use razorpad::persistence::{DocumentSource, XmlDocumentSource};
//!
//! let source = XmlDocumentSource::default();
//! if source.can_load("hello.razorpad") {
//!     if let Some(mut document) = source.load_path(Path::new("hello.razorpad"))? {
//!         document.template.push_str("\n@Model.Footer");
//!         source.save_path(&mut document, None)?;
//!     }
//! }
//! # Ok::<(), razorpad::persistence::PersistenceError>(())
//! ```

mod error;
mod options;
pub mod sniff;
mod source;
mod sources;
pub mod tree;
mod xml;

pub use error::PersistenceError;
pub use options::{CodecOptions, TextEncoding};
pub use source::{DocumentSource, ReadSeek};
pub use sources::DocumentSources;
pub use xml::{XmlDocumentSource, names};

/// Supported document file extensions.
pub fn supported_extensions() -> &'static [&'static str] {
    xml::EXTENSIONS
}
