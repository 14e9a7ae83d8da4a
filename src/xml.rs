//! The XML boundary.
//!
//! Nullable values travel through XML as single elements. Presence is an
//! attribute concern, not a content concern: an element carrying a `nil`
//! attribute (any namespace prefix, any value) represents SQL NULL, and its
//! text content is still decoded so malformed documents are rejected rather
//! than silently absorbed into the null state.
//!
//! [`XmlElement`] is the parsed form the typed decoders work on: the
//! element's local name, its attributes, and its unescaped text content.
//! Each nullable type implements `TryFrom<&XmlElement>` with its own text
//! decoding; this module only gets the element off the wire.

use quick_xml::events::attributes::AttrError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;

/// Errors raised while parsing XML input or decoding element content.
#[derive(Debug, Error)]
pub enum XmlError {
    /// The input is not well-formed XML.
    #[error("malformed XML: {0}")]
    Parse(#[from] quick_xml::Error),

    /// An attribute is not well-formed.
    #[error("malformed XML attribute: {0}")]
    Attribute(#[from] AttrError),

    /// The input ended without containing an element.
    #[error("no element found in XML input")]
    NoElement,

    /// The input ended before the element was closed.
    #[error("unexpected end of input inside element {0:?}")]
    UnexpectedEof(String),

    /// The element's text content does not decode as the target type.
    #[error("cannot decode element text {text:?} as {target}")]
    Decode {
        text: String,
        target: &'static str,
    },
}

/// A single XML element, parsed down to what the typed decoders need: its
/// local name, its attributes as written, and its text content.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    text: String,
}

impl XmlElement {
    /// Parse the first element found in `input`.
    ///
    /// Anything before the element (an XML declaration, comments,
    /// whitespace) is skipped. Text content is the concatenated, unescaped
    /// character data of the element, including CDATA sections and text
    /// held inside nested markup. Self-closing elements have empty text.
    pub fn parse(input: &str) -> Result<Self, XmlError> {
        let mut reader = Reader::from_str(input);
        loop {
            match reader.read_event()? {
                Event::Start(start) => return Self::read_element(&mut reader, start),
                Event::Empty(start) => {
                    return Ok(XmlElement {
                        name: local_name(&start),
                        attributes: collect_attributes(&start)?,
                        text: String::new(),
                    })
                }
                Event::Eof => return Err(XmlError::NoElement),
                _ => {}
            }
        }
    }

    fn read_element(reader: &mut Reader<&[u8]>, start: BytesStart<'_>) -> Result<Self, XmlError> {
        let name = local_name(&start);
        let attributes = collect_attributes(&start)?;
        let mut text = String::new();
        let mut depth = 0usize;
        loop {
            match reader.read_event()? {
                Event::Start(_) => depth += 1,
                Event::End(_) => {
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                }
                Event::Text(t) => text.push_str(&t.unescape()?),
                Event::CData(c) => text.push_str(&String::from_utf8_lossy(&c.into_inner())),
                Event::Eof => return Err(XmlError::UnexpectedEof(name)),
                _ => {}
            }
        }
        Ok(XmlElement {
            name,
            attributes,
            text,
        })
    }

    /// The element's local name, namespace prefix stripped.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The element's text content, entity references resolved.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Look up an attribute value by its name exactly as written in the
    /// document, prefix included.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Whether the element carries a `nil` attribute.
    ///
    /// The match is on the attribute's local name, so namespaced spellings
    /// such as `xsi:nil` qualify. Only presence counts: `nil="false"` still
    /// marks the element nil. Consumers of the long-standing wire format
    /// rely on that, so the attribute value is deliberately ignored.
    pub fn is_nil(&self) -> bool {
        self.attributes
            .iter()
            .any(|(key, _)| key.rsplit(':').next().unwrap_or(key) == "nil")
    }
}

fn local_name(start: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(start.name().local_name().as_ref()).into_owned()
}

fn collect_attributes(start: &BytesStart<'_>) -> Result<Vec<(String, String)>, XmlError> {
    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        attributes.push((key, value));
    }
    Ok(attributes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_element_with_text() {
        let element = XmlElement::parse("<active>true</active>").unwrap();
        assert_eq!(element.name(), "active");
        assert_eq!(element.text(), "true");
        assert!(!element.is_nil());
    }

    #[test]
    fn test_parse_self_closing_element() {
        let element = XmlElement::parse(r#"<active nil="true"/>"#).unwrap();
        assert_eq!(element.name(), "active");
        assert_eq!(element.text(), "");
        assert!(element.is_nil());
    }

    #[test]
    fn test_prolog_and_comments_are_skipped() {
        let input = "<?xml version=\"1.0\"?><!-- flag --><active>1</active>";
        let element = XmlElement::parse(input).unwrap();
        assert_eq!(element.name(), "active");
        assert_eq!(element.text(), "1");
    }

    #[test]
    fn test_text_is_unescaped_and_cdata_is_included() {
        let element = XmlElement::parse("<note>a &amp; b</note>").unwrap();
        assert_eq!(element.text(), "a & b");

        let element = XmlElement::parse("<note><![CDATA[<raw>]]></note>").unwrap();
        assert_eq!(element.text(), "<raw>");
    }

    #[test]
    fn test_nested_markup_text_is_concatenated() {
        let element = XmlElement::parse("<note>one<b>two</b>three</note>").unwrap();
        assert_eq!(element.name(), "note");
        assert_eq!(element.text(), "onetwothree");
    }

    #[test]
    fn test_nil_matches_on_local_name_only() {
        let element = XmlElement::parse(r#"<flag xsi:nil="true">false</flag>"#).unwrap();
        assert!(element.is_nil());
        assert_eq!(element.attr("xsi:nil"), Some("true"));
        assert_eq!(element.attr("nil"), None);
    }

    #[test]
    fn test_nil_ignores_attribute_value() {
        let element = XmlElement::parse(r#"<flag nil="false">true</flag>"#).unwrap();
        assert!(element.is_nil());
    }

    #[test]
    fn test_attribute_values_are_unescaped() {
        let element = XmlElement::parse(r#"<a href="x&amp;y"/>"#).unwrap();
        assert_eq!(element.attr("href"), Some("x&y"));
    }

    #[test]
    fn test_empty_input_has_no_element() {
        assert!(matches!(
            XmlElement::parse("   "),
            Err(XmlError::NoElement)
        ));
    }

    #[test]
    fn test_unclosed_element_is_an_error() {
        assert!(XmlElement::parse("<active>true").is_err());
    }
}
