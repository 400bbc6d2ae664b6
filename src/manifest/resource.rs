//! Resource parsing.
//!
//! Manifests populate either the generic `scormtype` or the 2004
//! `adlcp:scormType` (sometimes both), so the two are kept apart.

use super::types::ManifestResource;
use crate::common::XmlElement;

/// Default resource `type`
pub const DEFAULT_RESOURCE_TYPE: &str = "webcontent";

/// Parse one `<resource>` element.
pub fn parse_resource(resource: &XmlElement) -> ManifestResource {
    let base = resource.attr("xml:base").filter(|b| !b.is_empty());
    // the lower-case spelling is 1.2's, whatever prefix it carries
    let generic = resource.attr_non_empty("scormtype");
    let adlcp = resource.attr_non_empty("scormType");

    ManifestResource {
        identifier: resource.attr_local("identifier").unwrap_or_default().to_string(),
        resource_type: resource
            .attr_non_empty("type")
            .unwrap_or(DEFAULT_RESOURCE_TYPE)
            .to_string(),
        href: resource
            .attr_non_empty("href")
            .or(base)
            .unwrap_or_default()
            .to_string(),
        base: base.map(str::to_string),
        scorm_type: generic.or(adlcp).map(str::to_string),
        adlcp_scorm_type: adlcp.map(str::to_string),
        files: resource
            .children_named("file")
            .filter_map(|f| f.attr_non_empty("href"))
            .map(str::to_string)
            .collect(),
        dependencies: resource
            .children_named("dependency")
            .filter_map(|d| d.attr_non_empty("identifierref"))
            .map(str::to_string)
            .collect(),
        metadata: resource.child("metadata").cloned(),
    }
}

/// Parse every `<resource>` under `<resources>`, in document order.
pub fn parse_resources(manifest: &XmlElement) -> Vec<ManifestResource> {
    manifest
        .child("resources")
        .map(|resources| resources.children_named("resource").map(parse_resource).collect())
        .unwrap_or_default()
}
