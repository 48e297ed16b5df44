use std::io::BufRead;

use quick_xml::encoding::Decoder;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::extract::ExtractError;

// ============================================================================
// Minimal element tree built from quick-xml pull events
// ============================================================================

/// An XML element with its attributes, direct text and child elements.
///
/// JUnit reports are small and shallow, so the parser materializes the whole
/// document and then walks it, instead of driving a state machine over the
/// event stream.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    /// Concatenated text and CDATA directly inside this element
    pub text: String,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    /// Attribute value by name, if present.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Direct children with the given element name, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// First direct child with the given element name.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|child| child.name == name)
    }
}

/// Parse a complete XML document held in a string into its root element.
///
/// The text is already decoded, so any `encoding` in the declaration is
/// ignored. Fails on syntax errors, mismatched or unclosed tags, a second
/// top-level element, and documents without a root element.
pub fn parse_document(xml: &str) -> Result<XmlElement, ExtractError> {
    build_tree(Reader::from_str(xml))
}

/// Parse raw document bytes, decoding them with the encoding named in the
/// XML declaration (or BOM), defaulting to UTF-8.
pub fn parse_document_bytes(bytes: &[u8]) -> Result<XmlElement, ExtractError> {
    build_tree(Reader::from_reader(bytes))
}

fn build_tree<R: BufRead>(mut reader: Reader<R>) -> Result<XmlElement, ExtractError> {
    let mut buf = Vec::new();
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        let event = reader.read_event_into(&mut buf)?;
        // The decoder switches once the declaration has been read
        let decoder = reader.decoder();
        match event {
            Event::Start(start) => stack.push(element_from(&start, decoder)?),
            Event::Empty(start) => {
                let element = element_from(&start, decoder)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| ExtractError::Malformed("unexpected closing tag".to_string()))?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(text) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&text.unescape()?);
                }
            }
            Event::CData(cdata) => {
                if let Some(current) = stack.last_mut() {
                    let raw = cdata.into_inner();
                    current.text.push_str(&decode(decoder, &raw)?);
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(ExtractError::Malformed(format!(
            "unclosed element <{}>",
            open.name
        )));
    }

    root.ok_or_else(|| ExtractError::Malformed("no root element".to_string()))
}

fn decode(decoder: Decoder, raw: &[u8]) -> Result<String, ExtractError> {
    let text = decoder.decode(raw).map_err(quick_xml::Error::from)?;
    Ok(text.into_owned())
}

fn element_from(start: &BytesStart<'_>, decoder: Decoder) -> Result<XmlElement, ExtractError> {
    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let key = decode(decoder, attr.key.as_ref())?;
        let value = attr.decode_and_unescape_value(decoder)?.into_owned();
        attributes.push((key, value));
    }

    Ok(XmlElement {
        name: decode(decoder, start.name().as_ref())?,
        attributes,
        text: String::new(),
        children: Vec::new(),
    })
}

/// Hang a finished element under its parent, or make it the root.
fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<(), ExtractError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_some() => {
            return Err(ExtractError::Malformed(format!(
                "unexpected second top-level element <{}>",
                element.name
            )));
        }
        None => *root = Some(element),
    }
    Ok(())
}
