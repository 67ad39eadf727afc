//! HTML and XML decoding into an owned element tree.
//!
//! Both formats produce the same [`Element`] tree so callers can walk either
//! the same way. HTML goes through `scraper`'s error-tolerant parser; XML is
//! read with `quick_xml` and must be well formed. Whitespace-only text is
//! dropped and surrounding whitespace is trimmed.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use scraper::{ElementRef, Html};

use super::{Content, Decoder};
use crate::error::DecodeError;

// ============================================================================
// Element Tree
// ============================================================================

/// A child of an [`Element`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A nested element.
    Element(Element),
    /// Character data.
    Text(String),
}

/// An element with its attributes and children, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Tag name as written (XML) or lowercased (HTML).
    pub name: String,
    /// Attributes in document order.
    pub attributes: Vec<(String, String)>,
    /// Child nodes.
    pub children: Vec<Node>,
}

impl Element {
    /// Creates an element with no attributes or children.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Returns an attribute value by name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Iterates over child elements, skipping text.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    /// Returns the first descendant (depth first) with the given name.
    pub fn find(&self, name: &str) -> Option<&Element> {
        self.elements()
            .find_map(|child| if child.name == name { Some(child) } else { child.find(name) })
    }

    /// Concatenated descendant text, separated by single spaces.
    pub fn text(&self) -> String {
        let mut parts = Vec::new();
        self.collect_text(&mut parts);
        parts.join(" ")
    }

    fn collect_text<'a>(&'a self, parts: &mut Vec<&'a str>) {
        for node in &self.children {
            match node {
                Node::Text(text) => parts.push(text),
                Node::Element(element) => element.collect_text(parts),
            }
        }
    }
}

// ============================================================================
// HTML
// ============================================================================

/// Parses HTML leniently, as a browser would.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlDecoder;

impl Decoder for HtmlDecoder {
    fn name(&self) -> &'static str {
        "html"
    }

    fn decode(&self, body: &[u8]) -> Result<Content, DecodeError> {
        let source = String::from_utf8_lossy(body);
        let document = Html::parse_document(&source);
        Ok(Content::Markup(convert_html(document.root_element())))
    }
}

fn convert_html(element: ElementRef<'_>) -> Element {
    let value = element.value();
    let mut converted = Element::new(value.name());
    converted.attributes = value
        .attrs()
        .map(|(key, val)| (key.to_string(), val.to_string()))
        .collect();

    for child in element.children() {
        match child.value() {
            scraper::Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    converted.children.push(Node::Element(convert_html(child)));
                }
            }
            scraper::Node::Text(text) => {
                let text = text.trim();
                if !text.is_empty() {
                    converted.children.push(Node::Text(text.to_string()));
                }
            }
            _ => {}
        }
    }

    converted
}

// ============================================================================
// XML
// ============================================================================

/// Parses well-formed XML.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlDecoder;

impl Decoder for XmlDecoder {
    fn name(&self) -> &'static str {
        "xml"
    }

    fn decode(&self, body: &[u8]) -> Result<Content, DecodeError> {
        let source = std::str::from_utf8(body)?;
        let mut reader = Reader::from_str(source);
        reader.trim_text(true);

        let mut open: Vec<Element> = Vec::new();
        let mut root = None;

        loop {
            match reader.read_event()? {
                Event::Start(start) => open.push(xml_element(&start)?),
                Event::Empty(start) => attach(&mut open, &mut root, xml_element(&start)?)?,
                Event::End(_) => {
                    let element = open.pop().ok_or_else(|| {
                        DecodeError::Malformed("closing tag without an open element".to_string())
                    })?;
                    attach(&mut open, &mut root, element)?;
                }
                Event::Text(text) => {
                    if let Some(parent) = open.last_mut() {
                        parent.children.push(Node::Text(text.unescape()?.into_owned()));
                    }
                }
                Event::CData(data) => {
                    if let Some(parent) = open.last_mut() {
                        let text = std::str::from_utf8(&data)?;
                        parent.children.push(Node::Text(text.to_string()));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(unclosed) = open.last() {
            return Err(DecodeError::Malformed(format!(
                "unclosed element <{}>",
                unclosed.name
            )));
        }

        root.map(Content::Markup)
            .ok_or_else(|| DecodeError::Malformed("document has no root element".to_string()))
    }
}

fn xml_element(start: &BytesStart<'_>) -> Result<Element, DecodeError> {
    let mut element = Element::new(String::from_utf8_lossy(start.name().as_ref()));
    for attribute in start.attributes() {
        let attribute = attribute.map_err(quick_xml::Error::from)?;
        element.attributes.push((
            String::from_utf8_lossy(attribute.key.as_ref()).into_owned(),
            attribute.unescape_value()?.into_owned(),
        ));
    }
    Ok(element)
}

fn attach(
    open: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), DecodeError> {
    if let Some(parent) = open.last_mut() {
        parent.children.push(Node::Element(element));
        return Ok(());
    }
    if root.is_some() {
        return Err(DecodeError::Malformed("multiple root elements".to_string()));
    }
    *root = Some(element);
    Ok(())
}
