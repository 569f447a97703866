//! Minimal XML element tree.
//!
//! Every load path (text, file, stream) parses into an [`XmlElement`] before
//! sections are resolved, so section handling only exists once.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::PersistenceError;

/// Child content of an element, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    Element(XmlElement),
    /// Character data, from text or CDATA.
    Text(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    /// Local name (namespace prefix stripped).
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Child elements, skipping text.
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(element) => Some(element),
            XmlNode::Text(_) => None,
        })
    }

    /// First child element named `name`.
    pub fn element(&self, name: &str) -> Option<&XmlElement> {
        self.elements().find(|element| element.name == name)
    }

    /// All descendant character data, concatenated in document order.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for node in &self.children {
            match node {
                XmlNode::Text(text) => out.push_str(text),
                XmlNode::Element(element) => element.collect_text(out),
            }
        }
    }
}

/// Parse `input` and return its root element, or `None` if it has none.
///
/// Whitespace-only text is dropped from elements that also hold child
/// elements or CDATA; a text-only element keeps it. Comments, processing
/// instructions, the XML declaration and DOCTYPE are ignored.
pub fn parse(input: &str) -> Result<Option<XmlElement>, PersistenceError> {
    let mut reader = Reader::from_str(input);
    let mut stack: Vec<OpenElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        let event = reader.read_event().map_err(|e| {
            PersistenceError::xml(format!(
                "XML parse error at position {}: {e}",
                reader.error_position()
            ))
        })?;

        match event {
            Event::Start(ref e) => {
                ensure_single_root(&root, &stack, reader.buffer_position())?;
                stack.push(OpenElement::new(start_element(e)?));
            }
            Event::Empty(ref e) => {
                ensure_single_root(&root, &stack, reader.buffer_position())?;
                let element = start_element(e)?;
                close_element(element, &mut stack, &mut root);
            }
            Event::End(_) => {
                // quick-xml has already checked the end tag matches.
                if let Some(open) = stack.pop() {
                    close_element(open.finish(), &mut stack, &mut root);
                }
            }
            Event::Text(e) => {
                let text = e.unescape().map_err(|e| {
                    PersistenceError::xml(format!(
                        "Text error at position {}: {e}",
                        reader.buffer_position()
                    ))
                })?;
                match stack.last_mut() {
                    Some(parent) => parent.content.push(Content::Text(text.into_owned())),
                    None if text.trim().is_empty() => {}
                    None => {
                        return Err(PersistenceError::xml(format!(
                            "Text outside the root element at position {}",
                            reader.buffer_position()
                        )));
                    }
                }
            }
            Event::CData(e) => {
                let text = std::str::from_utf8(&e)
                    .map_err(|e| PersistenceError::xml(format!("Invalid CDATA: {e}")))?;
                match stack.last_mut() {
                    Some(parent) => parent.content.push(Content::CData(text.to_string())),
                    None => return Err(PersistenceError::xml("CDATA outside the root element")),
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(PersistenceError::xml(format!(
            "Unclosed element <{}>",
            open.element.name
        )));
    }

    Ok(root)
}

/// Raw content of an element that is still open.
enum Content {
    Element(XmlElement),
    Text(String),
    CData(String),
}

struct OpenElement {
    element: XmlElement,
    content: Vec<Content>,
}

impl OpenElement {
    fn new(element: XmlElement) -> Self {
        Self {
            element,
            content: Vec::new(),
        }
    }

    /// Resolve the raw content into children, joining adjacent text and CDATA
    /// into one run.
    fn finish(self) -> XmlElement {
        let Self {
            mut element,
            content,
        } = self;
        let mixed = content
            .iter()
            .any(|item| matches!(item, Content::Element(_) | Content::CData(_)));

        for item in content {
            match item {
                Content::Element(child) => element.children.push(XmlNode::Element(child)),
                Content::Text(text) if mixed && text.trim().is_empty() => {}
                Content::Text(text) | Content::CData(text) => append_text(&mut element, &text),
            }
        }
        element
    }
}

fn ensure_single_root(
    root: &Option<XmlElement>,
    stack: &[OpenElement],
    position: impl std::fmt::Display,
) -> Result<(), PersistenceError> {
    if root.is_some() && stack.is_empty() {
        return Err(PersistenceError::xml(format!(
            "Multiple root elements at position {position}"
        )));
    }
    Ok(())
}

fn start_element(e: &BytesStart<'_>) -> Result<XmlElement, PersistenceError> {
    let name = std::str::from_utf8(e.local_name().into_inner())
        .map_err(|e| PersistenceError::xml(format!("Invalid tag name: {e}")))?;
    let mut element = XmlElement::new(name);

    for attr_result in e.attributes() {
        let attr =
            attr_result.map_err(|e| PersistenceError::xml(format!("Attribute error: {e}")))?;
        let key = std::str::from_utf8(attr.key.local_name().into_inner())
            .map_err(|e| PersistenceError::xml(format!("Attribute key error: {e}")))?;
        let value = attr
            .unescape_value()
            .map_err(|e| PersistenceError::xml(format!("Attribute value error: {e}")))?;
        element.attributes.push((key.to_string(), value.into_owned()));
    }

    Ok(element)
}

fn close_element(element: XmlElement, stack: &mut [OpenElement], root: &mut Option<XmlElement>) {
    match stack.last_mut() {
        Some(parent) => parent.content.push(Content::Element(element)),
        None => *root = Some(element),
    }
}

fn append_text(element: &mut XmlElement, text: &str) {
    if let Some(XmlNode::Text(last)) = element.children.last_mut() {
        last.push_str(text);
    } else {
        element.children.push(XmlNode::Text(text.to_string()));
    }
}
