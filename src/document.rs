//! The in-memory template document.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::model::ModelHandle;

/// File kind, derived from a file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DocumentKind {
    /// `.razorpad`
    RazorPad,
    /// `.xml`
    Xml,
    #[default]
    Unknown,
}

impl DocumentKind {
    /// Kind for `path`'s extension, compared case-insensitively.
    pub fn from_path(path: &Path) -> Self {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return Self::Unknown;
        };
        match ext.to_ascii_lowercase().as_str() {
            "razorpad" => Self::RazorPad,
            "xml" => Self::Xml,
            _ => Self::Unknown,
        }
    }
}

/// A template together with its model, references and metadata.
#[derive(Debug)]
pub struct RazorDocument {
    /// Template source.
    pub template: String,
    /// Base class the template compiles against; `None` means the default.
    pub template_base_class: Option<String>,
    /// Assemblies or modules the template needs at execution time.
    pub references: Vec<String>,
    /// Free-form annotations.
    pub metadata: IndexMap<String, String>,
    /// Provider owning the template's data model.
    pub model: ModelHandle,
    /// Where the document was loaded from or last saved to.
    pub filename: Option<PathBuf>,
    pub kind: DocumentKind,
}

impl RazorDocument {
    /// An empty document whose model is owned by `model`.
    pub fn new(model: ModelHandle) -> Self {
        Self {
            template: String::new(),
            template_base_class: None,
            references: Vec::new(),
            metadata: IndexMap::new(),
            model,
            filename: None,
            kind: DocumentKind::Unknown,
        }
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }

    pub fn with_base_class(mut self, base_class: impl Into<String>) -> Self {
        self.template_base_class = Some(base_class.into());
        self
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.references.push(reference.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Record `filename` and derive the document kind from it.
    pub fn with_filename(mut self, filename: impl Into<PathBuf>) -> Self {
        self.set_filename(filename);
        self
    }

    pub fn set_filename(&mut self, filename: impl Into<PathBuf>) {
        let filename = filename.into();
        self.kind = DocumentKind::from_path(&filename);
        self.filename = Some(filename);
    }
}
