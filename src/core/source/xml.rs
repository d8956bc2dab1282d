//! Minimal element tree over quick-xml
//!
//! The chart export is small and read once, so the whole document is loaded
//! into an owned tree before the typed model is built from it.

use quick_xml::escape::resolve_xml_entity;
use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::trace;

use crate::utils::diagnostics::{compute_line_offsets, offset_to_location};
use crate::utils::error::{ConversionError, ConversionResult};

/// A node of the element tree
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
}

/// An owned XML element with its attributes and children in document order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        XmlElement {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Attribute value by local name
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Child elements in document order
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(el) => Some(el),
            XmlNode::Text(_) => None,
        })
    }

    /// First child element with the given name
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.elements().find(|el| el.name == name)
    }

    /// All child elements with the given name
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.elements().filter(move |el| el.name == name)
    }

    /// Concatenated text content of this element and its descendants
    pub fn text(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }

    fn push_text(&mut self, text: &str) {
        if let Some(XmlNode::Text(last)) = self.children.last_mut() {
            last.push_str(text);
        } else {
            self.children.push(XmlNode::Text(text.to_string()));
        }
    }
}

fn collect_text(el: &XmlElement, out: &mut String) {
    for node in &el.children {
        match node {
            XmlNode::Text(t) => out.push_str(t),
            XmlNode::Element(child) => collect_text(child, out),
        }
    }
}

/// Parse a whole document and return its root element
pub fn parse_document(input: &str) -> ConversionResult<XmlElement> {
    let mut reader = Reader::from_str(input);
    // Entity references arrive as separate events; trimming would eat the
    // spaces around them.
    reader.config_mut().trim_text(false);

    let line_offsets = compute_line_offsets(input);
    let error_at = |message: String, offset: usize| {
        let (line, column) = offset_to_location(offset.min(input.len()), &line_offsets);
        ConversionError::parse_at(message, line, column)
    };

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        let offset = reader.buffer_position() as usize;
        let event = reader
            .read_event()
            .map_err(|e| error_at(e.to_string(), offset))?;

        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let name = std::str::from_utf8(e.local_name().as_ref())
                    .map_err(|e| error_at(e.to_string(), offset))?
                    .to_string();

                let mut element = XmlElement::new(name);
                for attr in e.attributes() {
                    let attr = attr.map_err(|e| error_at(e.to_string(), offset))?;
                    let key = std::str::from_utf8(attr.key.local_name().as_ref())
                        .map_err(|e| error_at(e.to_string(), offset))?
                        .to_string();
                    let value = attr
                        .unescape_value()
                        .map_err(|e| error_at(e.to_string(), offset))?
                        .into_owned();
                    element.attributes.push((key, value));
                }

                if matches!(event, Event::Start(_)) {
                    stack.push(element);
                } else {
                    attach(&mut stack, element, &mut root)
                        .map_err(|message| error_at(message, offset))?;
                }
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| error_at("unbalanced closing tag".to_string(), offset))?;
                attach(&mut stack, element, &mut root)
                    .map_err(|message| error_at(message, offset))?;
            }
            Event::Text(e) => {
                if let Some(current) = stack.last_mut() {
                    let text = e.decode().map_err(|e| error_at(e.to_string(), offset))?;
                    current.push_text(&text);
                }
            }
            Event::CData(e) => {
                if let Some(current) = stack.last_mut() {
                    let text = std::str::from_utf8(e.as_ref())
                        .map_err(|e| error_at(e.to_string(), offset))?;
                    current.push_text(text);
                }
            }
            Event::GeneralRef(e) => {
                if let Some(current) = stack.last_mut() {
                    let raw = e.decode().map_err(|e| error_at(e.to_string(), offset))?;
                    let resolved = resolve_entity(&raw).map_err(|m| error_at(m, offset))?;
                    current.push_text(&resolved);
                }
            }
            Event::Decl(_) | Event::Comment(_) | Event::PI(_) | Event::DocType(_) => {}
            Event::Eof => break,
        }
    }

    if let Some(open) = stack.last() {
        return Err(error_at(
            format!("unclosed element <{}>", open.name),
            input.len(),
        ));
    }

    let root = root.ok_or_else(|| ConversionError::parse("document has no root element"))?;
    trace!(root = %root.name, "parsed source document");
    Ok(root)
}

fn attach(
    stack: &mut [XmlElement],
    element: XmlElement,
    root: &mut Option<XmlElement>,
) -> Result<(), String> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(XmlNode::Element(element));
        Ok(())
    } else if root.is_none() {
        *root = Some(element);
        Ok(())
    } else {
        Err(format!("second root element <{}>", element.name))
    }
}

/// Resolve a general entity reference such as `amp` or `#x2019`
fn resolve_entity(raw: &str) -> Result<String, String> {
    if let Some(resolved) = resolve_xml_entity(raw) {
        return Ok(resolved.into());
    }

    if let Some(rest) = raw.strip_prefix('#') {
        let code = if let Some(hex) = rest.strip_prefix('x').or_else(|| rest.strip_prefix('X')) {
            u32::from_str_radix(hex, 16).map_err(|_| format!("invalid hex entity: #{}", rest))?
        } else {
            rest.parse::<u32>()
                .map_err(|_| format!("invalid decimal entity: #{}", rest))?
        };

        let ch = char::from_u32(code).ok_or_else(|| format!("invalid code point: {}", code))?;
        return Ok(ch.to_string());
    }

    Ok(format!("&{};", raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested_elements() {
        let root = parse_document(r#"<doc><chart><row type="normal" id="1a"/></chart></doc>"#)
            .unwrap();
        assert_eq!(root.name, "doc");
        let row = root.child("chart").and_then(|c| c.child("row")).unwrap();
        assert_eq!(row.attr("type"), Some("normal"));
        assert_eq!(row.attr("id"), Some("1a"));
        assert_eq!(row.attr("missing"), None);
    }

    #[test]
    fn test_entities_keep_surrounding_spaces() {
        let root = parse_document("<w>tom &amp; jerry &#x2019;s</w>").unwrap();
        assert_eq!(root.text(), "tom & jerry \u{2019}s");
    }

    #[test]
    fn test_cdata_and_attributes_unescaped() {
        let root = parse_document(r#"<w note="a &lt; b"><![CDATA[x<y]]></w>"#).unwrap();
        assert_eq!(root.attr("note"), Some("a < b"));
        assert_eq!(root.text(), "x<y");
    }

    #[test]
    fn test_children_in_document_order() {
        let root = parse_document("<m><word>a</word><lit>,</lit><word>b</word></m>").unwrap();
        let names: Vec<&str> = root.elements().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["word", "lit", "word"]);
        assert_eq!(root.children_named("word").count(), 2);
    }

    #[test]
    fn test_unclosed_element_is_error() {
        let err = parse_document("<doc>\n<chart>").unwrap_err();
        match err {
            ConversionError::ParseError { line, .. } => assert!(line.is_some()),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_mismatched_tag_is_error() {
        assert!(parse_document("<a><b></a>").is_err());
    }
}
