//! Selection among the available document sources.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use super::source::{DocumentSource, ReadSeek, is_blank_path};
use super::{PersistenceError, XmlDocumentSource};
use crate::document::RazorDocument;
use crate::model::ModelProviders;

/// An ordered set of document sources. The first applicable source wins.
pub struct DocumentSources {
    sources: Vec<Box<dyn DocumentSource>>,
}

impl Default for DocumentSources {
    fn default() -> Self {
        Self::with_defaults(Arc::new(ModelProviders::default()))
    }
}

impl DocumentSources {
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// The built-in sources, sharing `providers`.
    pub fn with_defaults(providers: Arc<ModelProviders>) -> Self {
        let mut sources = Self::new();
        sources.add(XmlDocumentSource::new(providers));
        sources
    }

    pub fn add(&mut self, source: impl DocumentSource + 'static) {
        self.sources.push(Box::new(source));
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn DocumentSource> {
        self.sources.iter().map(|source| source.as_ref())
    }

    /// First source whose extensions match `path`.
    pub fn for_path(&self, path: &Path) -> Option<&dyn DocumentSource> {
        self.iter().find(|source| source.can_load_path(path))
    }

    /// First source recognizing the start of `input`. The stream position is
    /// unchanged afterwards.
    pub fn for_content(&self, input: &mut dyn ReadSeek) -> Option<&dyn DocumentSource> {
        self.iter().find(|source| source.can_load_content(&mut *input))
    }

    /// Load `path` with the source matching its extension, or failing that,
    /// its content.
    pub fn load_path(&self, path: &Path) -> Result<Option<RazorDocument>, PersistenceError> {
        if let Some(source) = self.for_path(path) {
            return source.load_path(path);
        }

        let mut input = BufReader::new(File::open(path)?);
        match self.for_content(&mut input) {
            Some(source) => {
                tracing::debug!(
                    "Sniffed {} as {} document",
                    path.display(),
                    source.name()
                );
                drop(input);
                source.load_path(path)
            }
            None => Err(PersistenceError::UnsupportedSource(
                path.display().to_string(),
            )),
        }
    }

    /// Save with the first source that accepts `target` (or the document's
    /// filename when `target` is `None`).
    pub fn save_path(
        &self,
        document: &mut RazorDocument,
        target: Option<&Path>,
    ) -> Result<(), PersistenceError> {
        let destination = target
            .or(document.filename.as_deref())
            .filter(|path| !is_blank_path(path))
            .ok_or(PersistenceError::NoDestination)?;

        let source = self
            .iter()
            .find(|source| source.can_save(Some(&*document), destination))
            .ok_or_else(|| PersistenceError::UnsupportedSource(destination.display().to_string()))?;

        let destination = destination.to_path_buf();
        source.save_path(document, Some(&destination))
    }
}
