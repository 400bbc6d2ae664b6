//! quick-xml driven tree builder.
//!
//! Streams events into a stack of open elements. Adjacent text, CDATA and
//! entity references are merged into one text node before trimming, so
//! `A &amp; B` stays `A & B` rather than losing its spaces.

use super::escape::unescape_xml;
use super::node::{XmlAttribute, XmlElement, XmlNode};
use crate::common::{Error, Result};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// Parse an XML document into its root element.
///
/// Fails when the text is not well-formed XML (mismatched or unclosed tags,
/// broken attributes) or contains no element at all. Comments, processing
/// instructions and DOCTYPE declarations are skipped; elements after the
/// first root are ignored.
pub fn parse_document(xml: &str) -> Result<XmlElement> {
    let mut reader = Reader::from_str(xml);
    let config = reader.config_mut();
    config.check_end_names = true;
    // authoring tools emit `Q & A` unescaped
    config.allow_dangling_amp = true;

    let mut buf = Vec::new();
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        let event = reader.read_event_into(&mut buf).map_err(|e| {
            Error::Xml(format!("{} at position {}", e, reader.buffer_position()))
        })?;

        match event {
            Event::Start(ref e) => stack.push(start_element(e)?),
            Event::Empty(ref e) => {
                let element = start_element(e)?;
                attach(&mut stack, &mut root, element);
            },
            Event::End(_) => {
                let mut element = stack
                    .pop()
                    .ok_or_else(|| Error::Xml("closing tag without matching opening tag".to_string()))?;
                finish(&mut element);
                attach(&mut stack, &mut root, element);
            },
            Event::Text(ref t) => {
                // references arrive as separate `GeneralRef` events
                push_text(&mut stack, std::str::from_utf8(t)?);
            },
            Event::CData(ref c) => {
                push_text(&mut stack, std::str::from_utf8(c)?);
            },
            Event::GeneralRef(ref r) => {
                if let Some(ch) = r.resolve_char_ref()? {
                    let mut tmp = [0u8; 4];
                    push_text(&mut stack, ch.encode_utf8(&mut tmp));
                } else {
                    let name = std::str::from_utf8(r)?;
                    match quick_xml::escape::resolve_predefined_entity(name) {
                        Some(resolved) => push_text(&mut stack, resolved),
                        // unknown (usually HTML) entity: keep it verbatim
                        None => push_text(&mut stack, &format!("&{};", name)),
                    }
                }
            },
            Event::Eof => break,
            _ => {},
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(Error::Xml(format!(
            "unexpected end of document: <{}> is never closed",
            open.name
        )));
    }

    root.ok_or_else(|| Error::Xml("document contains no elements".to_string()))
}

fn start_element(e: &BytesStart<'_>) -> Result<XmlElement> {
    let name = std::str::from_utf8(e.name().as_ref())?.to_string();
    let mut attributes = Vec::new();

    for attr in e.attributes() {
        let attr = attr?;
        let key = std::str::from_utf8(attr.key.as_ref())?.to_string();
        let value = match attr.unescape_value() {
            Ok(v) => v.into_owned(),
            Err(_) => unescape_xml(std::str::from_utf8(&attr.value)?),
        };
        attributes.push(XmlAttribute { name: key, value });
    }

    Ok(XmlElement {
        name,
        attributes,
        children: Vec::new(),
    })
}

/// Append text to the innermost open element, merging with a preceding text run.
fn push_text(stack: &mut [XmlElement], text: &str) {
    let Some(current) = stack.last_mut() else {
        // text outside the root element
        return;
    };
    if let Some(XmlNode::Text(last)) = current.children.last_mut() {
        last.push_str(text);
    } else {
        current.children.push(XmlNode::Text(text.to_string()));
    }
}

/// Trim text runs and drop whitespace-only ones.
fn finish(element: &mut XmlElement) {
    element.children.retain_mut(|node| match node {
        XmlNode::Text(t) => {
            let trimmed = t.trim();
            if trimmed.len() != t.len() {
                *t = trimmed.to_string();
            }
            !t.is_empty()
        },
        XmlNode::Element(_) => true,
    });
}

fn attach(stack: &mut [XmlElement], root: &mut Option<XmlElement>, element: XmlElement) {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(XmlNode::Element(element));
    } else if root.is_none() {
        *root = Some(element);
    }
}
