//! Owned XML element tree.
//!
//! Names are kept qualified (`adlcp:scormType`, `imsss:sequencing`) so that
//! callers can tell the SCORM 1.2 and 2004 vocabularies apart, while the
//! `*_local` helpers let them match regardless of which prefix an authoring
//! tool picked.

use serde::{Deserialize, Serialize};

/// A node in the generic tree: either an element or a run of text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum XmlNode {
    /// Element with attributes and ordered children
    Element(XmlElement),
    /// Trimmed text content
    Text(String),
}

/// A single attribute, name kept qualified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XmlAttribute {
    pub name: String,
    pub value: String,
}

/// An XML element with attributes and children in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct XmlElement {
    /// Qualified element name, e.g. `imscp:manifest`
    pub name: String,
    /// Attributes in document order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<XmlAttribute>,
    /// Child elements and text in document order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<XmlNode>,
}

/// Strip the namespace prefix from a qualified name.
///
/// ```
/// use scorm_manifest::common::xml::local_part;
/// assert_eq!(local_part("adlcp:scormType"), "scormType");
/// assert_eq!(local_part("href"), "href");
/// ```
#[inline]
pub fn local_part(qname: &str) -> &str {
    qname.rsplit_once(':').map_or(qname, |(_, local)| local)
}

#[inline]
fn is_namespace_declaration(name: &str) -> bool {
    name == "xmlns" || name.starts_with("xmlns:")
}

impl XmlElement {
    /// Create an element without attributes or children.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Parse a document and return its root element.
    pub fn parse(xml: &str) -> crate::common::Result<Self> {
        super::reader::parse_document(xml)
    }

    /// Local part of the element name.
    #[inline]
    pub fn local_name(&self) -> &str {
        local_part(&self.name)
    }

    /// Namespace prefix of the element name, if any.
    #[inline]
    pub fn prefix(&self) -> Option<&str> {
        self.name.rsplit_once(':').map(|(prefix, _)| prefix)
    }

    /// Whether the local name equals `local`.
    #[inline]
    pub fn is(&self, local: &str) -> bool {
        self.local_name() == local
    }

    /// Attribute value by exact qualified name.
    pub fn attr(&self, qname: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == qname)
            .map(|a| a.value.as_str())
    }

    /// Attribute value by local name, whatever its prefix.
    ///
    /// Namespace declarations are never matched.
    pub fn attr_local(&self, local: &str) -> Option<&str> {
        self.attributes
            .iter()
            .filter(|a| !is_namespace_declaration(&a.name))
            .find(|a| local_part(&a.name) == local)
            .map(|a| a.value.as_str())
    }

    /// Like [`attr_local`](Self::attr_local) but treats an empty value as absent.
    pub fn attr_non_empty(&self, local: &str) -> Option<&str> {
        self.attr_local(local).filter(|v| !v.is_empty())
    }

    /// Attribute value by local name compared ASCII case-insensitively.
    pub fn attr_ignore_case(&self, local: &str) -> Option<&str> {
        self.attributes
            .iter()
            .filter(|a| !is_namespace_declaration(&a.name))
            .find(|a| local_part(&a.name).eq_ignore_ascii_case(local))
            .map(|a| a.value.as_str())
    }

    /// `xmlns` / `xmlns:*` declarations as `(prefix, uri)`; the default
    /// namespace has an empty prefix.
    pub fn namespace_declarations(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .filter(|a| is_namespace_declaration(&a.name))
            .map(|a| {
                let prefix = a.name.strip_prefix("xmlns:").unwrap_or("");
                (prefix, a.value.as_str())
            })
    }

    /// Child elements in document order.
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(el) => Some(el),
            XmlNode::Text(_) => None,
        })
    }

    /// All child elements with the given local name. Zero, one or many
    /// matches all come back the same way.
    pub fn children_named<'a>(&'a self, local: &'a str) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.elements().filter(move |el| el.is(local))
    }

    /// First child element with the given local name.
    pub fn child(&self, local: &str) -> Option<&XmlElement> {
        self.elements().find(|el| el.is(local))
    }

    /// First child element whose local name matches ASCII case-insensitively.
    pub fn child_ignore_case(&self, local: &str) -> Option<&XmlElement> {
        self.elements()
            .find(|el| el.local_name().eq_ignore_ascii_case(local))
    }

    /// Whether a child element with the given local name exists.
    #[inline]
    pub fn has_child(&self, local: &str) -> bool {
        self.child(local).is_some()
    }

    /// Direct text content, concatenated and trimmed; `None` when empty.
    pub fn text(&self) -> Option<String> {
        let mut out = String::new();
        for node in &self.children {
            if let XmlNode::Text(t) = node {
                if !out.is_empty() {
                    out.push(' ');
                }
                out.push_str(t);
            }
        }
        let trimmed = out.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == out.len() {
            Some(out)
        } else {
            Some(trimmed.to_string())
        }
    }

    /// This element and every element below it, depth-first in document order.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// Text of the first child element with the given local name.
    pub fn child_text(&self, local: &str) -> Option<String> {
        self.child(local).and_then(XmlElement::text)
    }

    /// Append a child element (builder style, used to assemble trees in code).
    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(XmlNode::Element(child));
        self
    }

    /// Append an attribute (builder style).
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push(XmlAttribute {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Append a text node (builder style).
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(XmlNode::Text(text.into()));
        self
    }
}

/// Pre-order iterator returned by [`XmlElement::descendants`].
#[derive(Debug, Clone)]
pub struct Descendants<'a> {
    stack: Vec<&'a XmlElement>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a XmlElement;

    fn next(&mut self) -> Option<Self::Item> {
        let element = self.stack.pop()?;
        let start = self.stack.len();
        self.stack.extend(element.elements());
        self.stack[start..].reverse();
        Some(element)
    }
}
