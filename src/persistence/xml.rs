//! XML document format.
//!
//! ## Structure
//!
//! ```xml
//! <RazorDocument>
//!   <Metadata>
//!     <Author>Jane</Author>
//!   </Metadata>
//!   <References>
//!     <Reference>System.Core</Reference>
//!   </References>
//!   <Model Provider="Json"><![CDATA[{ "Name": "World" }]]></Model>
//!   <Template BaseClass="My.TemplateBase"><![CDATA[Hello @Model.Name]]></Template>
//! </RazorDocument>
//! ```
//!
//! All four sections are optional on read. `Provider` defaults to `"Json"`;
//! `BaseClass` is only written when a base class is set.

use std::fs::File;
use std::io::{Cursor, Read, Write};
use std::path::Path;
use std::sync::Arc;

use indexmap::IndexMap;

use super::options::CodecOptions;
use super::source::{DocumentSource, ReadSeek, is_blank_path};
use super::tree::{self, XmlElement};
use super::{PersistenceError, sniff};
use crate::document::{DocumentKind, RazorDocument};
use crate::model::{JSON_PROVIDER, ModelProviders};

/// File extensions handled by [`XmlDocumentSource`], without the dot.
pub(crate) const EXTENSIONS: &[&str] = &["razorpad", "xml"];

/// Element and attribute names of the document format.
pub mod names {
    pub const ROOT: &str = "RazorDocument";
    pub const METADATA: &str = "Metadata";
    pub const REFERENCES: &str = "References";
    pub const REFERENCE: &str = "Reference";
    pub const MODEL: &str = "Model";
    pub const PROVIDER: &str = "Provider";
    pub const TEMPLATE: &str = "Template";
    pub const BASE_CLASS: &str = "BaseClass";
}

/// Reads and writes `.razorpad` / `.xml` document files.
///
/// Holds no per-document state; one instance can be shared across threads.
/// Concurrent saves to the same destination are not coordinated.
#[derive(Debug, Clone)]
pub struct XmlDocumentSource {
    providers: Arc<ModelProviders>,
    options: CodecOptions,
}

impl Default for XmlDocumentSource {
    fn default() -> Self {
        Self::new(Arc::new(ModelProviders::default()))
    }
}

impl XmlDocumentSource {
    pub fn new(providers: Arc<ModelProviders>) -> Self {
        Self {
            providers,
            options: CodecOptions::default(),
        }
    }

    pub fn with_options(mut self, options: CodecOptions) -> Self {
        self.options = options;
        self
    }

    pub fn providers(&self) -> &ModelProviders {
        &self.providers
    }

    pub fn options(&self) -> &CodecOptions {
        &self.options
    }

    /// Render `document` to bytes in the configured encoding.
    pub fn to_bytes(&self, document: &RazorDocument) -> Result<Vec<u8>, PersistenceError> {
        let text = XmlWriter::new(&self.providers, &self.options).write(document)?;
        self.options.encoding.encode(text)
    }

    fn load_bytes(&self, bytes: &[u8]) -> Result<Option<RazorDocument>, PersistenceError> {
        let text = self.options.encoding.decode(bytes)?;
        self.parse(&text)
    }
}

impl DocumentSource for XmlDocumentSource {
    fn name(&self) -> &'static str {
        "XML"
    }

    fn extensions(&self) -> &'static [&'static str] {
        EXTENSIONS
    }

    fn can_load_content(&self, input: &mut dyn ReadSeek) -> bool {
        match sniff::first_line(input, self.options.encoding) {
            Ok(Some(line)) => {
                let matched = sniff::is_document_marker(&line);
                tracing::trace!("Sniffed first line {line:?}: match={matched}");
                matched
            }
            Ok(None) => false,
            Err(e) => {
                tracing::trace!("Stream not sniffable: {e}");
                false
            }
        }
    }

    fn parse(&self, text: &str) -> Result<Option<RazorDocument>, PersistenceError> {
        match tree::parse(text)? {
            Some(root) => XmlReader::new(&self.providers).read(&root).map(Some),
            None => Ok(None),
        }
    }

    fn load_path(&self, path: &Path) -> Result<Option<RazorDocument>, PersistenceError> {
        tracing::debug!("Loading document from {}", path.display());
        let bytes = std::fs::read(path)?;
        let document = self.load_bytes(&bytes)?.map(|mut document| {
            document.set_filename(path);
            document
        });
        Ok(document)
    }

    fn load_reader(&self, input: &mut dyn Read) -> Result<Option<RazorDocument>, PersistenceError> {
        let mut bytes = Vec::new();
        input.read_to_end(&mut bytes)?;
        self.load_bytes(&bytes)
    }

    fn save_path(
        &self,
        document: &mut RazorDocument,
        target: Option<&Path>,
    ) -> Result<(), PersistenceError> {
        let destination = target
            .or(document.filename.as_deref())
            .filter(|path| !is_blank_path(path))
            .map(Path::to_path_buf)
            .ok_or(PersistenceError::NoDestination)?;

        // Render first so a model failure leaves an existing file untouched.
        let bytes = self.to_bytes(document)?;

        tracing::debug!("Saving document to {}", destination.display());
        let mut file = File::create(&destination)?;
        file.write_all(&bytes)?;
        if let Err(e) = file.flush().and_then(|()| file.sync_all()) {
            tracing::warn!("Error flushing {}: {e}", destination.display());
        }

        document.kind = DocumentKind::from_path(&destination);
        Ok(())
    }

    fn save_to_writer(
        &self,
        document: &RazorDocument,
        output: &mut dyn Write,
    ) -> Result<(), PersistenceError> {
        let bytes = self.to_bytes(document)?;
        output.write_all(&bytes)?;
        if let Err(e) = output.flush() {
            tracing::warn!("Error flushing document stream: {e}");
        }
        Ok(())
    }
}

// ============================================================================
// READER
// ============================================================================

struct XmlReader<'a> {
    providers: &'a ModelProviders,
}

impl<'a> XmlReader<'a> {
    fn new(providers: &'a ModelProviders) -> Self {
        Self { providers }
    }

    fn read(&self, root: &XmlElement) -> Result<RazorDocument, PersistenceError> {
        if root.name != names::ROOT {
            tracing::debug!("Unexpected root element <{}>, reading anyway", root.name);
        }

        let empty = XmlElement::default();
        let metadata_el = root.element(names::METADATA).unwrap_or(&empty);
        let references_el = root.element(names::REFERENCES).unwrap_or(&empty);
        let model_el = root.element(names::MODEL).unwrap_or(&empty);
        let template_el = root.element(names::TEMPLATE).unwrap_or(&empty);

        let provider_name = non_blank(model_el.attribute(names::PROVIDER)).unwrap_or(JSON_PROVIDER);
        let mut model = self
            .providers
            .create(provider_name)
            .map_err(|e| PersistenceError::model(provider_name, e))?;
        model
            .deserialize(&model_el.text())
            .map_err(|e| PersistenceError::model(provider_name, e))?;

        let references = references_el
            .elements()
            .map(XmlElement::text)
            .filter(|reference| !reference.trim().is_empty())
            .collect();

        let mut metadata = IndexMap::new();
        for entry in metadata_el.elements() {
            if metadata.insert(entry.name.clone(), entry.text()).is_some() {
                tracing::warn!("Duplicate metadata key {:?}, keeping the last value", entry.name);
            }
        }

        let mut document = RazorDocument::new(model);
        document.template = template_el.text();
        document.template_base_class =
            non_blank(template_el.attribute(names::BASE_CLASS)).map(str::to_string);
        document.references = references;
        document.metadata = metadata;

        tracing::debug!(
            "Read document: provider={provider_name}, {} references, {} metadata entries",
            document.references.len(),
            document.metadata.len()
        );
        Ok(document)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

// ============================================================================
// WRITER
// ============================================================================

mod writer {
    use super::*;
    use quick_xml::Writer;
    use quick_xml::events::{BytesCData, BytesEnd, BytesStart, BytesText, Event};

    /// Document writer producing the indented envelope.
    pub(super) struct XmlWriter<'a> {
        providers: &'a ModelProviders,
        options: &'a CodecOptions,
    }

    impl<'a> XmlWriter<'a> {
        pub(super) fn new(providers: &'a ModelProviders, options: &'a CodecOptions) -> Self {
            Self { providers, options }
        }

        pub(super) fn write(&self, document: &RazorDocument) -> Result<String, PersistenceError> {
            // Resolve the model before emitting anything.
            let provider_name = self.provider_name(document)?;
            let serialized_model = document
                .model
                .serialize()
                .map_err(|e| PersistenceError::model(provider_name.unwrap_or("<unnamed>"), e))?;

            let mut writer = Writer::new_with_indent(
                Cursor::new(Vec::new()),
                b' ',
                self.options.indent_size,
            );

            write_event(&mut writer, Event::Start(BytesStart::new(names::ROOT)))?;
            self.write_metadata(&mut writer, document)?;
            self.write_references(&mut writer, document)?;

            let mut model_start = BytesStart::new(names::MODEL);
            if let Some(name) = provider_name {
                model_start.push_attribute((names::PROVIDER, name));
            }
            write_cdata_element(&mut writer, model_start, names::MODEL, &serialized_model)?;

            let mut template_start = BytesStart::new(names::TEMPLATE);
            if let Some(base_class) = non_blank(document.template_base_class.as_deref()) {
                template_start.push_attribute((names::BASE_CLASS, base_class));
            }
            write_cdata_element(&mut writer, template_start, names::TEMPLATE, &document.template)?;

            write_event(&mut writer, Event::End(BytesEnd::new(names::ROOT)))?;

            let mut output = writer.into_inner().into_inner();
            output.push(b'\n');
            String::from_utf8(output)
                .map_err(|e| PersistenceError::xml(format!("Writer produced invalid UTF-8: {e}")))
        }

        fn provider_name(&self, document: &RazorDocument) -> Result<Option<&'a str>, PersistenceError> {
            match self.providers.name_of(&document.model) {
                Some(name) => Ok(Some(name)),
                None if self.options.strict_provider_names => Err(PersistenceError::UnnamedProvider),
                None => {
                    tracing::warn!("Model provider has no registered name, omitting Provider attribute");
                    Ok(None)
                }
            }
        }

        fn write_metadata<W: Write>(
            &self,
            writer: &mut Writer<W>,
            document: &RazorDocument,
        ) -> Result<(), PersistenceError> {
            if document.metadata.is_empty() {
                return write_event(writer, Event::Empty(BytesStart::new(names::METADATA)));
            }

            write_event(writer, Event::Start(BytesStart::new(names::METADATA)))?;
            for (key, value) in &document.metadata {
                if !is_xml_name(key) {
                    return Err(PersistenceError::InvalidMetadataKey(key.clone()));
                }
                write_text_element(writer, key, value)?;
            }
            write_event(writer, Event::End(BytesEnd::new(names::METADATA)))
        }

        fn write_references<W: Write>(
            &self,
            writer: &mut Writer<W>,
            document: &RazorDocument,
        ) -> Result<(), PersistenceError> {
            if document.references.is_empty() {
                return Ok(());
            }

            write_event(writer, Event::Start(BytesStart::new(names::REFERENCES)))?;
            for reference in &document.references {
                write_text_element(writer, names::REFERENCE, reference)?;
            }
            write_event(writer, Event::End(BytesEnd::new(names::REFERENCES)))
        }
    }

    fn write_event<W: Write>(
        writer: &mut Writer<W>,
        event: Event<'_>,
    ) -> Result<(), PersistenceError> {
        writer
            .write_event(event)
            .map_err(|e| PersistenceError::xml(format!("Write error: {e}")))
    }

    fn write_text_element<W: Write>(
        writer: &mut Writer<W>,
        name: &str,
        text: &str,
    ) -> Result<(), PersistenceError> {
        write_event(writer, Event::Start(BytesStart::new(name)))?;
        write_event(writer, Event::Text(BytesText::new(text)))?;
        write_event(writer, Event::End(BytesEnd::new(name)))
    }

    fn write_cdata_element<W: Write>(
        writer: &mut Writer<W>,
        start: BytesStart<'_>,
        name: &str,
        text: &str,
    ) -> Result<(), PersistenceError> {
        write_event(writer, Event::Start(start))?;
        for section in cdata_sections(text) {
            write_event(writer, Event::CData(BytesCData::new(section)))?;
        }
        write_event(writer, Event::End(BytesEnd::new(name)))
    }

    /// Split `text` so no piece contains the CDATA terminator `]]>`.
    /// Concatenating the pieces gives back `text`.
    pub(super) fn cdata_sections(text: &str) -> Vec<&str> {
        let mut sections = Vec::new();
        let mut rest = text;
        while let Some(pos) = rest.find("]]>") {
            sections.push(&rest[..pos + 2]);
            rest = &rest[pos + 2..];
        }
        sections.push(rest);
        sections
    }

    /// Whether `name` can be written as an unprefixed element name.
    pub(super) fn is_xml_name(name: &str) -> bool {
        let mut chars = name.chars();
        let Some(first) = chars.next() else {
            return false;
        };
        (first.is_alphabetic() || first == '_')
            && chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
    }
}

use writer::XmlWriter;
