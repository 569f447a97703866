//! Common trait for document sources.

use std::io::{Read, Seek, Write};
use std::path::Path;

use super::PersistenceError;
use crate::document::RazorDocument;

/// A readable, seekable stream, usable as a trait object.
pub trait ReadSeek: Read + Seek {}

impl<T: Read + Seek> ReadSeek for T {}

/// Whether `path` is empty or whitespace-only, and so names no destination.
pub(crate) fn is_blank_path(path: &Path) -> bool {
    path.to_str().is_some_and(|p| p.trim().is_empty())
}

/// A file format documents can be loaded from and saved to.
///
/// Applicability checks never fail: they answer `false` for anything they
/// cannot inspect. Loading and saving fail hard on data or configuration
/// problems.
pub trait DocumentSource: Send + Sync {
    /// Human-readable name of the format.
    fn name(&self) -> &'static str;

    /// File extensions handled by this source, without the leading dot.
    fn extensions(&self) -> &'static [&'static str];

    /// Whether `identifier` (a file name or path) ends with one of this
    /// source's extensions, compared case-insensitively.
    fn can_load(&self, identifier: &str) -> bool {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return false;
        }

        let identifier = identifier.to_lowercase();
        self.extensions().iter().any(|ext| {
            identifier
                .strip_suffix(ext)
                .is_some_and(|stem| stem.ends_with('.'))
        })
    }

    fn can_load_path(&self, path: &Path) -> bool {
        path.to_str().is_some_and(|p| self.can_load(p))
    }

    /// Sniff the start of `input`. The stream position is left unchanged.
    fn can_load_content(&self, input: &mut dyn ReadSeek) -> bool;

    /// Whether `document` could be saved to `target`. A target is only
    /// accepted if it would also be loadable.
    fn can_save(&self, document: Option<&RazorDocument>, target: &Path) -> bool {
        document.is_some() && self.can_load_path(target)
    }

    /// Whether `document` could be saved to a stream, judged by the
    /// document's own filename.
    fn can_save_to_stream(&self, document: Option<&RazorDocument>) -> bool {
        document
            .and_then(|doc| doc.filename.as_deref())
            .is_some_and(|filename| self.can_load_path(filename))
    }

    /// Load a document from text. `Ok(None)` if the text has no root.
    fn parse(&self, text: &str) -> Result<Option<RazorDocument>, PersistenceError>;

    /// Load a document from a file.
    fn load_path(&self, path: &Path) -> Result<Option<RazorDocument>, PersistenceError>;

    /// Load a document from a stream, reading it to the end.
    fn load_reader(&self, input: &mut dyn Read) -> Result<Option<RazorDocument>, PersistenceError>;

    /// Save to `target`, or to the document's filename when `target` is
    /// `None`.
    fn save_path(
        &self,
        document: &mut RazorDocument,
        target: Option<&Path>,
    ) -> Result<(), PersistenceError>;

    /// Save to a stream.
    fn save_to_writer(
        &self,
        document: &RazorDocument,
        output: &mut dyn Write,
    ) -> Result<(), PersistenceError>;
}
