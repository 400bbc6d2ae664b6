//! Manifest-level descriptive fields.
//!
//! Authoring tools fill metadata inconsistently, so title and description
//! are looked up along a fallback chain: LOM `general` block, then a flat
//! `<metadata>` field, then (for the title) the first organization.

use crate::common::XmlElement;

/// Title used when no source provides one
pub const UNTITLED_PACKAGE: &str = "Untitled SCORM Package";

/// Text of a LOM value, unwrapping `<langstring>` (1.2) or `<string>` (2004).
///
/// The first non-empty localized string wins; an element without wrappers
/// yields its own text.
pub fn langstring_text(element: &XmlElement) -> Option<String> {
    element
        .elements()
        .filter(|el| el.is("langstring") || el.is("string"))
        .find_map(XmlElement::text)
        .or_else(|| element.text())
}

/// Title of an organization or item: `<title>` child, then `title` attribute.
pub fn element_title(element: &XmlElement) -> Option<String> {
    element
        .child("title")
        .and_then(langstring_text)
        .or_else(|| element.attr_non_empty("title").map(str::to_string))
}

fn lom_general_field(manifest: &XmlElement, field: &str) -> Option<String> {
    manifest
        .child("metadata")?
        .child("lom")?
        .child("general")?
        .child(field)
        .and_then(langstring_text)
}

fn flat_metadata_field(manifest: &XmlElement, field: &str) -> Option<String> {
    manifest
        .child("metadata")?
        .child(field)
        .and_then(langstring_text)
}

/// Package title, never empty.
pub fn extract_title(manifest: &XmlElement) -> String {
    lom_general_field(manifest, "title")
        .or_else(|| flat_metadata_field(manifest, "title"))
        .or_else(|| {
            manifest
                .child("organizations")?
                .child("organization")
                .and_then(element_title)
        })
        .unwrap_or_else(|| UNTITLED_PACKAGE.to_string())
}

/// Package description, if any source provides one.
pub fn extract_description(manifest: &XmlElement) -> Option<String> {
    lom_general_field(manifest, "description")
        .or_else(|| flat_metadata_field(manifest, "description"))
}

/// The `<metadata>` block, passed through uninterpreted.
pub fn extract_metadata(manifest: &XmlElement) -> Option<XmlElement> {
    manifest.child("metadata").cloned()
}

/// `<metadata><schema>`, e.g. `ADL SCORM`.
pub fn schema(manifest: &XmlElement) -> Option<String> {
    manifest.child("metadata")?.child_text("schema")
}

/// `<metadata><schemaversion>`, e.g. `1.2` or `2004 4th Edition`.
pub fn schema_version(manifest: &XmlElement) -> Option<String> {
    manifest.child("metadata")?.child_text("schemaversion")
}
