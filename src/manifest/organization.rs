//! Organization and item tree parsing.
//!
//! Every item gets an identifier and a title even when the source omits
//! them: identifiers are synthesized from depth and position, titles from
//! position. Synthesized identifiers are stable only for an unchanged
//! manifest.

use super::detection::Standard;
use super::metadata::element_title;
use super::options::ParseOptions;
use super::types::{ManifestItem, ManifestOrganization};
use crate::common::XmlElement;

/// Default `structure` attribute value
pub const DEFAULT_STRUCTURE: &str = "hierarchical";

/// Parse a number the way authoring tools write them: leading numeric
/// prefix, surrounding whitespace ignored. Non-finite values are rejected.
pub(crate) fn parse_number(value: &str) -> Option<f64> {
    let value = value.trim();
    match fast_float2::parse_partial::<f64, _>(value) {
        Ok((number, consumed)) if consumed > 0 && number.is_finite() => Some(number),
        _ => None,
    }
}

/// Split a comma-separated prerequisite list, dropping empty entries.
pub(crate) fn split_prerequisites(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// Item data that 1.2 writes as `<adlcp:foo>` children and some tools write
/// as attributes. Local name is compared case-insensitively.
pub(crate) fn item_data(item: &XmlElement, name: &str) -> Option<String> {
    item.child_ignore_case(name)
        .and_then(XmlElement::text)
        .or_else(|| {
            item.attr_ignore_case(name)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        })
}

/// Identifier of the item at `index` among its siblings at `depth`.
pub(crate) fn item_identifier(item: &XmlElement, depth: usize, index: usize) -> String {
    item.attr_non_empty("identifier")
        .map(str::to_string)
        .unwrap_or_else(|| format!("item_{}_{}", depth, index))
}

fn completion_threshold(item: &XmlElement) -> Option<f64> {
    if let Some(threshold) = item.child_ignore_case("completionThreshold") {
        // 4th edition moved the value into an attribute
        return threshold
            .text()
            .as_deref()
            .and_then(parse_number)
            .or_else(|| threshold.attr_local("minProgressMeasure").and_then(parse_number));
    }
    item.attr_ignore_case("completionThreshold").and_then(parse_number)
}

struct ItemParser<'a> {
    standard: Standard,
    options: &'a ParseOptions,
    warnings: &'a mut Vec<String>,
}

impl ItemParser<'_> {
    fn parse_items<'e>(
        &mut self,
        items: impl Iterator<Item = &'e XmlElement>,
        depth: usize,
    ) -> Vec<ManifestItem> {
        items
            .enumerate()
            .map(|(index, item)| self.parse_item(item, depth, index))
            .collect()
    }

    fn parse_item(&mut self, item: &XmlElement, depth: usize, index: usize) -> ManifestItem {
        let identifier = item_identifier(item, depth, index);

        let has_children = item.has_child("item");
        let children = if has_children && depth + 1 >= self.options.max_item_depth.max(1) {
            self.warnings.push(format!(
                "Item '{}' nests deeper than {} levels; its descendants were ignored",
                identifier, self.options.max_item_depth
            ));
            Vec::new()
        } else {
            self.parse_items(item.children_named("item"), depth + 1)
        };

        ManifestItem {
            title: element_title(item).unwrap_or_else(|| format!("Item {}", index + 1)),
            identifierref: item.attr_non_empty("identifierref").map(str::to_string),
            is_visible: item.attr_local("isvisible") != Some("false"),
            parameters: item.attr_non_empty("parameters").map(str::to_string),
            mastery_score: item_data(item, "masteryscore").as_deref().and_then(parse_number),
            prerequisites: item_data(item, "prerequisites")
                .map(|p| split_prerequisites(&p))
                .unwrap_or_default(),
            children,
            sequencing: self.sequencing(item),
            completion_threshold: completion_threshold(item),
            time_limit_action: item_data(item, "timelimitaction"),
            data_from_lms: item_data(item, "datafromlms"),
            max_time_allowed: item_data(item, "maxtimeallowed"),
            identifier,
        }
    }

    fn sequencing(&self, element: &XmlElement) -> Option<XmlElement> {
        if self.standard.is_2004() {
            element.child("sequencing").cloned()
        } else {
            None
        }
    }
}

/// Parse every `<organization>` under `<organizations>`, in document order.
///
/// Depth-limit findings are appended to `warnings`.
pub fn parse_organizations(
    manifest: &XmlElement,
    standard: Standard,
    options: &ParseOptions,
    warnings: &mut Vec<String>,
) -> Vec<ManifestOrganization> {
    let Some(organizations) = manifest.child("organizations") else {
        return Vec::new();
    };

    let mut parser = ItemParser {
        standard,
        options,
        warnings,
    };

    organizations
        .children_named("organization")
        .enumerate()
        .map(|(index, org)| ManifestOrganization {
            identifier: org
                .attr_non_empty("identifier")
                .map(str::to_string)
                .unwrap_or_else(|| format!("org_{}", index)),
            title: element_title(org).unwrap_or_else(|| format!("Organization {}", index + 1)),
            structure: org
                .attr_non_empty("structure")
                .unwrap_or(DEFAULT_STRUCTURE)
                .to_string(),
            items: parser.parse_items(org.children_named("item"), 0),
            objectives: org.child("objectives").cloned(),
            sequencing: parser.sequencing(org),
        })
        .collect()
}
