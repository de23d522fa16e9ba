//! Raw XML tree reading.
//!
//! Tokenizing is delegated to quick-xml; this module only assembles the
//! events into an owned element tree the interpreter can walk. Namespace
//! prefixes are stripped from tag and attribute names, so `xs:element` and
//! `xsd:element` both surface as `element`.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::{Result, SchemaError};

/// One element of the raw schema document.
#[derive(Debug, Clone, Default)]
pub struct RawElement {
    /// Local tag name, prefix stripped.
    pub name: String,
    /// Attributes in document order, names prefix-stripped.
    pub attributes: Vec<(String, String)>,
    /// Child elements in document order.
    pub children: Vec<RawElement>,
    /// Concatenated non-whitespace text content.
    pub text: String,
}

impl RawElement {
    /// Attribute value by local name.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// First child with the given local name.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&RawElement> {
        self.children.iter().find(|child| child.name == name)
    }

    /// All children with the given local name, in document order.
    ///
    /// A single child and many children come out the same way, so callers
    /// never need to care about the one-or-many distinction.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a RawElement> {
        self.children.iter().filter(move |child| child.name == name)
    }
}

fn local_part(qualified: &[u8]) -> String {
    let raw = String::from_utf8_lossy(qualified);
    match raw.rsplit_once(':') {
        Some((_, local)) => local.to_string(),
        None => raw.into_owned(),
    }
}

fn element_from_start(start: &BytesStart<'_>) -> Result<RawElement> {
    let mut node = RawElement {
        name: local_part(start.name().as_ref()),
        ..RawElement::default()
    };
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|err| SchemaError::Malformed(err.to_string()))?;
        let value = attribute
            .unescape_value()
            .map_err(|err| SchemaError::Malformed(err.to_string()))?;
        node.attributes
            .push((local_part(attribute.key.as_ref()), value.into_owned()));
    }
    Ok(node)
}

fn attach(stack: &mut Vec<RawElement>, root: &mut Option<RawElement>, node: RawElement) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
    } else if root.is_none() {
        *root = Some(node);
    } else {
        return Err(SchemaError::Malformed(
            "multiple document roots".to_string(),
        ));
    }
    Ok(())
}

/// Parses schema text into an owned raw tree rooted at the document element.
pub fn parse_document(text: &str) -> Result<RawElement> {
    let mut reader = Reader::from_str(text);
    let mut stack: Vec<RawElement> = Vec::new();
    let mut root: Option<RawElement> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|err| SchemaError::Malformed(err.to_string()))?;
        match event {
            Event::Start(start) => stack.push(element_from_start(&start)?),
            Event::Empty(start) => {
                let node = element_from_start(&start)?;
                attach(&mut stack, &mut root, node)?;
            }
            Event::End(_) => {
                let node = stack
                    .pop()
                    .ok_or_else(|| SchemaError::Malformed("unbalanced end tag".to_string()))?;
                attach(&mut stack, &mut root, node)?;
            }
            Event::Text(text) => {
                let value = text
                    .decode()
                    .map_err(|err| SchemaError::Malformed(err.to_string()))?;
                let trimmed = value.trim();
                if !trimmed.is_empty() {
                    if let Some(parent) = stack.last_mut() {
                        parent.text.push_str(trimmed);
                    }
                }
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions and CDATA
            // carry nothing the interpreter reads.
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(SchemaError::Malformed("unclosed element".to_string()));
    }
    root.ok_or_else(|| SchemaError::Malformed("empty document".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_elements_with_attributes() {
        let doc = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema" targetNamespace="ESFA/ILR/2025-26">
            <xs:element name="Message"/>
        </xs:schema>"#;
        let root = parse_document(doc).expect("parse");
        assert_eq!(root.name, "schema");
        assert_eq!(root.attr("targetNamespace"), Some("ESFA/ILR/2025-26"));
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[0].name, "element");
        assert_eq!(root.children[0].attr("name"), Some("Message"));
    }

    #[test]
    fn strips_prefixes_from_names() {
        let root = parse_document(r#"<xsd:schema><xsd:element name="A"/></xsd:schema>"#).expect("parse");
        assert_eq!(root.name, "schema");
        assert_eq!(root.children[0].name, "element");
    }

    #[test]
    fn children_named_yields_all_in_order() {
        let root = parse_document(
            r#"<restriction>
                <enumeration value="1"/>
                <pattern value="x"/>
                <enumeration value="2"/>
            </restriction>"#,
        )
        .expect("parse");
        let values: Vec<_> = root
            .children_named("enumeration")
            .filter_map(|child| child.attr("value"))
            .collect();
        assert_eq!(values, vec!["1", "2"]);
    }

    #[test]
    fn collects_text_content() {
        let root = parse_document("<doc><note>hello</note></doc>").expect("parse");
        assert_eq!(root.children[0].text, "hello");
    }

    #[test]
    fn unbalanced_document_is_malformed() {
        assert!(matches!(
            parse_document("<a><b></a>"),
            Err(SchemaError::Malformed(_))
        ));
        assert!(matches!(
            parse_document(""),
            Err(SchemaError::Malformed(_))
        ));
    }
}
