//! Save/load round trips through real files.
//!
//! Verifies that a saved document loads back with the same template, base
//! class, metadata, references, provider name and model, and that saving is
//! deterministic.
#![allow(clippy::unwrap_used)]

use std::fs;
use std::io::{self, Cursor, Write};
use std::path::Path;
use std::sync::Arc;

use razorpad::model::{JsonModelProvider, ModelError, ModelHandle, ModelProvider, ModelProviders};
use razorpad::persistence::{DocumentSource, PersistenceError, XmlDocumentSource};
use razorpad::{DocumentKind, RazorDocument};
use rstest::rstest;
use serde_json::{Value, json};
use tempfile::TempDir;

fn sample_document(source: &XmlDocumentSource, provider: &str) -> RazorDocument {
    let mut model = source.providers().create(provider).unwrap();
    model.set_model(json!({
        "Name": "World",
        "Items": [1, 2, 3],
        "Nested": { "Flag": true, "Note": "a < b" }
    }));

    RazorDocument::new(model)
        .with_template("<h1>Hello @Model.Name</h1>\n@foreach (var i in Model.Items) { <p>@i</p> }")
        .with_base_class("RazorPad.Templates.TemplateBase")
        .with_reference("System.Core")
        .with_reference("System.Web.Mvc")
        .with_metadata("Author", "Jane")
        .with_metadata("Created", "2026-10-18")
}

fn assert_same_document(actual: &RazorDocument, expected: &RazorDocument, providers: &ModelProviders) {
    assert_eq!(actual.template, expected.template);
    assert_eq!(actual.template_base_class, expected.template_base_class);
    assert_eq!(actual.references, expected.references);
    assert_eq!(actual.metadata, expected.metadata);
    assert_eq!(providers.name_of(&actual.model), providers.name_of(&expected.model));
    assert_eq!(actual.model.model(), expected.model.model());
}

fn assert_file_roundtrip(provider: &str, filename: &str) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(filename);
    let source = XmlDocumentSource::default();

    let mut document = sample_document(&source, provider);
    source.save_path(&mut document, Some(&path)).unwrap();
    assert_eq!(document.kind, DocumentKind::from_path(&path));

    let loaded = source.load_path(&path).unwrap().expect("document has a root");
    assert_same_document(&loaded, &document, source.providers());
    assert_eq!(loaded.filename.as_deref(), Some(path.as_path()));
    assert_eq!(loaded.kind, DocumentKind::from_path(&path));
}

#[rstest]
#[case("template.razorpad")]
#[case("template.xml")]
#[case("Template.RAZORPAD")]
fn test_json_file_roundtrip(#[case] filename: &str) {
    assert_file_roundtrip("Json", filename);
}

#[cfg(feature = "yaml")]
#[test]
fn test_yaml_file_roundtrip() {
    assert_file_roundtrip("Yaml", "template.razorpad");
}

#[test]
fn test_whitespace_metadata_roundtrip() {
    let source = XmlDocumentSource::default();
    let model = source.providers().create("Json").unwrap();
    let document = RazorDocument::new(model)
        .with_template("   ")
        .with_metadata("Indent", "    ")
        .with_metadata("Padded", "  x  ")
        .with_metadata("Lines", "a\nb");

    let bytes = source.to_bytes(&document).unwrap();
    let loaded = source.load_reader(&mut Cursor::new(bytes)).unwrap().unwrap();
    assert_eq!(loaded.metadata, document.metadata);
    assert_eq!(loaded.template, "   ");
}

#[test]
fn test_save_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("same.razorpad");
    let source = XmlDocumentSource::default();
    let mut document = sample_document(&source, "Json");

    source.save_path(&mut document, Some(&path)).unwrap();
    let first = fs::read(&path).unwrap();
    source.save_path(&mut document, Some(&path)).unwrap();
    let second = fs::read(&path).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_resave_of_loaded_document_is_stable() {
    let source = XmlDocumentSource::default();
    let bytes = source.to_bytes(&sample_document(&source, "Json")).unwrap();

    let loaded = source.load_reader(&mut Cursor::new(bytes.clone())).unwrap().unwrap();
    assert_eq!(source.to_bytes(&loaded).unwrap(), bytes);
}

#[test]
fn test_save_uses_document_filename() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("named.xml");
    let source = XmlDocumentSource::default();
    let mut document = sample_document(&source, "Json").with_filename(&path);

    source.save_path(&mut document, None).unwrap();
    assert!(path.exists());
    assert_eq!(document.kind, DocumentKind::Xml);
}

#[test]
fn test_save_truncates_existing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("old.razorpad");
    fs::write(&path, "x".repeat(64 * 1024)).unwrap();

    let source = XmlDocumentSource::default();
    let mut document = sample_document(&source, "Json");
    source.save_path(&mut document, Some(&path)).unwrap();

    let written = fs::read(&path).unwrap();
    assert_eq!(written, source.to_bytes(&document).unwrap());
}

#[test]
fn test_save_without_destination_writes_nothing() {
    let source = XmlDocumentSource::default();
    let mut document = sample_document(&source, "Json");
    let err = source.save_path(&mut document, None).unwrap_err();
    assert!(matches!(err, PersistenceError::NoDestination));
}

#[test]
fn test_save_to_blank_destination_writes_nothing() {
    let source = XmlDocumentSource::default();
    let mut document = sample_document(&source, "Json");
    let err = source
        .save_path(&mut document, Some(Path::new("   ")))
        .unwrap_err();
    assert!(matches!(err, PersistenceError::NoDestination));
    assert!(!Path::new("   ").exists());
    assert_eq!(document.kind, DocumentKind::Unknown);
}

/// Writer that accepts every write but cannot flush.
#[derive(Default)]
struct NoFlushWriter {
    buffer: Vec<u8>,
}

impl Write for NoFlushWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Err(io::Error::other("flush not supported"))
    }
}

#[test]
fn test_flush_failure_is_not_fatal() {
    let source = XmlDocumentSource::default();
    let document = sample_document(&source, "Json");

    let mut out = NoFlushWriter::default();
    source.save_to_writer(&document, &mut out).unwrap();
    assert_eq!(out.buffer, source.to_bytes(&document).unwrap());
}

#[test]
fn test_save_to_missing_directory_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing").join("doc.razorpad");
    let source = XmlDocumentSource::default();
    let mut document = sample_document(&source, "Json");

    let err = source.save_path(&mut document, Some(&path)).unwrap_err();
    assert!(matches!(err, PersistenceError::Io(_)));
}

#[test]
fn test_load_missing_file_fails() {
    let source = XmlDocumentSource::default();
    let err = source
        .load_path(Path::new("/definitely/not/here.razorpad"))
        .unwrap_err();
    assert!(matches!(err, PersistenceError::Io(_)));
}

/// Provider whose serializer always fails.
#[derive(Debug, Default)]
struct BrokenProvider {
    model: Value,
}

impl ModelProvider for BrokenProvider {
    fn model(&self) -> &Value {
        &self.model
    }

    fn set_model(&mut self, model: Value) {
        self.model = model;
    }

    fn serialize(&self) -> Result<String, ModelError> {
        Err(ModelError::json("cannot serialize"))
    }

    fn deserialize(&mut self, _text: &str) -> Result<(), ModelError> {
        Err(ModelError::json("cannot deserialize"))
    }
}

fn registry_with_broken() -> Arc<ModelProviders> {
    let mut providers = ModelProviders::default();
    providers
        .register("Broken", || Box::new(BrokenProvider::default()))
        .unwrap();
    Arc::new(providers)
}

#[test]
fn test_serialize_failure_leaves_existing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("keep.razorpad");
    fs::write(&path, "<RazorDocument/>").unwrap();

    let source = XmlDocumentSource::new(registry_with_broken());
    let model = source.providers().create("Broken").unwrap();
    let mut document = RazorDocument::new(model).with_template("t");

    let err = source.save_path(&mut document, Some(&path)).unwrap_err();
    assert!(matches!(err, PersistenceError::Model { ref provider, .. } if provider == "Broken"));
    assert_eq!(fs::read_to_string(&path).unwrap(), "<RazorDocument/>");
    assert_eq!(document.kind, DocumentKind::Unknown);
}

#[test]
fn test_deserialize_failure_propagates() {
    let source = XmlDocumentSource::new(registry_with_broken());
    let err = source
        .parse(r#"<RazorDocument><Model Provider="Broken">x</Model></RazorDocument>"#)
        .unwrap_err();
    assert!(matches!(err, PersistenceError::Model { .. }));
}

#[test]
fn test_unknown_provider_does_not_default() {
    let source = XmlDocumentSource::default();
    let err = source
        .parse(r#"<RazorDocument><Model Provider="DoesNotExist"><![CDATA[{}]]></Model></RazorDocument>"#)
        .unwrap_err();
    assert!(matches!(err, PersistenceError::UnknownProvider(ref name) if name == "DoesNotExist"));
}

#[test]
fn test_detached_provider_is_save_error() {
    let source = XmlDocumentSource::default();
    let model = ModelHandle::detached(Box::new(JsonModelProvider::new()));
    let mut out = Vec::new();
    let err = source
        .save_to_writer(&RazorDocument::new(model), &mut out)
        .unwrap_err();
    assert!(matches!(err, PersistenceError::UnnamedProvider));
    assert!(out.is_empty());
}

#[test]
fn test_load_tolerates_declaration_and_comments() {
    let input = "\u{FEFF}<?xml version=\"1.0\" encoding=\"utf-8\"?>\n\
        <!-- saved by hand -->\n\
        <RazorDocument>\n\
        \x20 <Template><![CDATA[@Model.Name]]></Template>\n\
        </RazorDocument>\n";
    let source = XmlDocumentSource::default();
    let document = source
        .load_reader(&mut Cursor::new(input.as_bytes().to_vec()))
        .unwrap()
        .unwrap();
    assert_eq!(document.template, "@Model.Name");
}
