//! SCORM standard detection and version refinement.
//!
//! No single attribute announces the standard across authoring tools, so
//! detection tries a fixed list of signals in priority order and falls back
//! to SCORM 1.2 when none of them fire.

use super::metadata::schema_version;
use crate::common::XmlElement;
use aho_corasick::{AhoCorasick, AhoCorasickBuilder};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sequencing vocabulary marker (IMS Simple Sequencing)
const SEQUENCING_NAMESPACE_MARKER: &str = "imsss";

/// The SCORM generation a manifest was authored against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Standard {
    #[serde(rename = "SCORM 1.2")]
    Scorm12,
    #[serde(rename = "SCORM 2004")]
    Scorm2004,
}

impl Standard {
    /// Display name, `SCORM 1.2` or `SCORM 2004`.
    pub fn as_str(self) -> &'static str {
        match self {
            Standard::Scorm12 => "SCORM 1.2",
            Standard::Scorm2004 => "SCORM 2004",
        }
    }

    #[inline]
    pub fn is_2004(self) -> bool {
        self == Standard::Scorm2004
    }

    /// Version reported when nothing more specific is known.
    pub fn bare_version(self) -> &'static str {
        match self {
            Standard::Scorm12 => "1.2",
            Standard::Scorm2004 => "2004",
        }
    }
}

impl fmt::Display for Standard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which evidence classified a manifest as SCORM 2004.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionSignal {
    /// An `xmlns` declaration points at the sequencing vocabulary
    SequencingNamespace,
    /// `schemaLocation` mentions the sequencing vocabulary or `2004`
    SchemaLocation,
    /// An organization carries a `<sequencing>` block
    SequencingBlock,
    /// A resource carries the camel-cased `adlcp:scormType`
    ScormTypeAttribute,
    /// `<schemaversion>` names a 2004 edition
    SchemaVersion,
}

/// `schemaLocation` of the manifest element, whatever its prefix.
pub fn schema_location(manifest: &XmlElement) -> Option<&str> {
    manifest.attr_non_empty("schemaLocation")
}

/// Classify the manifest as SCORM 1.2 or SCORM 2004.
pub fn detect_standard(manifest: &XmlElement) -> Standard {
    match detection_signal(manifest) {
        Some(signal) => {
            tracing::debug!(?signal, "detected SCORM 2004");
            Standard::Scorm2004
        },
        None => Standard::Scorm12,
    }
}

/// First 2004 signal found, checked in priority order.
pub fn detection_signal(manifest: &XmlElement) -> Option<DetectionSignal> {
    let declares_sequencing = manifest.descendants().any(|el| {
        el.namespace_declarations()
            .any(|(_, uri)| uri.contains(SEQUENCING_NAMESPACE_MARKER))
    });
    if declares_sequencing {
        return Some(DetectionSignal::SequencingNamespace);
    }

    if let Some(location) = schema_location(manifest)
        && (location.contains(SEQUENCING_NAMESPACE_MARKER) || location.contains("2004"))
    {
        return Some(DetectionSignal::SchemaLocation);
    }

    let has_sequencing = manifest
        .children_named("organizations")
        .flat_map(|orgs| orgs.children_named("organization"))
        .any(|org| org.descendants().skip(1).any(|el| el.is("sequencing")));
    if has_sequencing {
        return Some(DetectionSignal::SequencingBlock);
    }

    // 1.2 spells it `adlcp:scormtype`; only 2004 uses the camel case
    let has_2004_scorm_type = manifest
        .children_named("resources")
        .flat_map(|res| res.children_named("resource"))
        .any(|r| r.attr_local("scormType").is_some());
    if has_2004_scorm_type {
        return Some(DetectionSignal::ScormTypeAttribute);
    }

    if let Some(version) = schema_version(manifest)
        && (version.contains("2004") || version.eq_ignore_ascii_case("CAM 1.3"))
    {
        return Some(DetectionSignal::SchemaVersion);
    }

    None
}

/// Edition markers, most recent first. Pattern index maps into `EDITIONS`.
static EDITION_MARKERS: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasickBuilder::new()
        .ascii_case_insensitive(true)
        .build([
            "2004_4th",
            "4th edition",
            "2004_3rd",
            "3rd edition",
            "2004_2nd",
            "2nd edition",
            "cam 1.3",
        ])
        .expect("Failed to build edition matcher")
});

const EDITIONS: [&str; 7] = [
    "2004 4th Edition",
    "2004 4th Edition",
    "2004 3rd Edition",
    "2004 3rd Edition",
    "2004 2nd Edition",
    "2004 2nd Edition",
    "2004 2nd Edition",
];

fn edition_in(text: &str) -> Option<&'static str> {
    EDITION_MARKERS
        .find_overlapping_iter(text)
        .map(|m| m.pattern().as_usize())
        .min()
        .map(|idx| EDITIONS[idx])
}

/// Refine the standard into a version string.
///
/// SCORM 2004 editions come from `schemaLocation` first, then from
/// `<schemaversion>`; without a marker the bare `2004` / `1.2` is returned.
pub fn extract_version(manifest: &XmlElement, standard: Standard) -> String {
    if standard.is_2004() {
        let edition = schema_location(manifest)
            .and_then(edition_in)
            .or_else(|| schema_version(manifest).as_deref().and_then(edition_in));
        if let Some(edition) = edition {
            return edition.to_string();
        }
    }
    standard.bare_version().to_string()
}
