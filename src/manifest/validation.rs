//! Structural validation of the raw manifest tree.
//!
//! Runs on the XML tree, independently of extraction, and never fails:
//! findings are collected as errors (the manifest is unreliable for
//! playback) or warnings (degraded but usable).

use super::organization::{item_data, item_identifier, parse_number};
use crate::common::XmlElement;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Outcome of structural validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// True iff `errors` is empty
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// Build a report; validity is derived from the errors.
    pub fn new(errors: Vec<String>, warnings: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }

    /// Append warnings produced outside validation proper.
    pub fn extend_warnings(&mut self, warnings: impl IntoIterator<Item = String>) {
        self.warnings.extend(warnings);
    }
}

#[derive(Default)]
struct Findings {
    errors: Vec<String>,
    warnings: Vec<String>,
}

/// Validate the raw `<manifest>` element.
pub fn validate_manifest(manifest: &XmlElement) -> ValidationReport {
    let mut findings = Findings::default();

    if manifest.attr_non_empty("identifier").is_none() {
        findings
            .errors
            .push("Manifest missing required identifier attribute".to_string());
    }

    let organizations = manifest.child("organizations");
    let resources = manifest.child("resources");

    if organizations.is_none() {
        findings
            .errors
            .push("Manifest missing organizations element".to_string());
    }
    if resources.is_none() {
        findings
            .errors
            .push("Manifest missing resources element".to_string());
    }

    if let Some(organizations) = organizations
        && !organizations.has_child("organization")
    {
        findings
            .errors
            .push("Organizations element contains no organization".to_string());
    }

    let resource_elements: Vec<&XmlElement> = resources
        .map(|r| r.children_named("resource").collect())
        .unwrap_or_default();

    if resources.is_some() && resource_elements.is_empty() {
        findings
            .warnings
            .push("Resources element contains no resource".to_string());
    }

    let mut resource_ids = HashSet::with_capacity(resource_elements.len());
    for resource in &resource_elements {
        if let Some(id) = resource.attr_non_empty("identifier")
            && !resource_ids.insert(id)
        {
            findings
                .warnings
                .push(format!("Duplicate resource identifier '{}'", id));
        }
    }

    for resource in &resource_elements {
        let owner = resource.attr_non_empty("identifier").unwrap_or("");
        for dependency in resource
            .children_named("dependency")
            .filter_map(|d| d.attr_non_empty("identifierref"))
        {
            if !resource_ids.contains(dependency) {
                findings.warnings.push(format!(
                    "Resource '{}' depends on unknown resource '{}'",
                    owner, dependency
                ));
            }
        }
    }

    if let Some(organizations) = organizations {
        check_default_organization(organizations, &mut findings);
        for org in organizations.children_named("organization") {
            check_items(org, &resource_ids, &mut findings);
        }
    }

    ValidationReport::new(findings.errors, findings.warnings)
}

fn check_default_organization(organizations: &XmlElement, findings: &mut Findings) {
    let Some(default) = organizations.attr_non_empty("default") else {
        return;
    };
    let known = organizations
        .children_named("organization")
        .any(|org| org.attr_non_empty("identifier") == Some(default));
    if !known {
        findings.warnings.push(format!(
            "Default organization '{}' is not declared",
            default
        ));
    }
}

/// Check every item below `organization`, pre-order in document order.
///
/// Uses an explicit stack: the raw tree is not depth-limited, so nesting
/// depth must not translate into call depth.
fn check_items<'a>(
    organization: &'a XmlElement,
    resource_ids: &HashSet<&str>,
    findings: &mut Findings,
) {
    let mut item_ids: HashSet<&'a str> = HashSet::new();
    let mut pending = child_items(organization, 0);

    while let Some((item, depth, index)) = pending.pop() {
        let identifier = item_identifier(item, depth, index);

        if let Some(reference) = item.attr_non_empty("identifierref")
            && !resource_ids.contains(reference)
        {
            findings.errors.push(format!(
                "Item '{}' references unknown resource '{}'",
                identifier, reference
            ));
        }

        if let Some(id) = item.attr_non_empty("identifier")
            && !item_ids.insert(id)
        {
            findings.warnings.push(format!(
                "Duplicate item identifier '{}' within organization",
                id
            ));
        }

        if let Some(score) = item_data(item, "masteryscore").as_deref().and_then(parse_number)
            && !(0.0..=100.0).contains(&score)
        {
            findings.warnings.push(format!(
                "Item '{}' mastery score {} is outside 0-100",
                identifier, score
            ));
        }

        pending.extend(child_items(item, depth + 1));
    }
}

/// `<item>` children of `parent` with their position, reversed for popping.
fn child_items(parent: &XmlElement, depth: usize) -> Vec<(&XmlElement, usize, usize)> {
    let mut items: Vec<_> = parent
        .children_named("item")
        .enumerate()
        .map(|(index, item)| (item, depth, index))
        .collect();
    items.reverse();
    items
}
