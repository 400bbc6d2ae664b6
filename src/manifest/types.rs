//! Typed manifest model.
//!
//! Everything here is built once per parse and never mutated afterwards.
//! Items own their children outright; resources are linked to items only
//! by identifier.

use super::detection::Standard;
use super::options::{ParseOptions, PublishPolicy};
use super::sco::{Sco, extract_scos};
use super::validation::ValidationReport;
use crate::common::{Error, Result, XmlElement};
use serde::{Deserialize, Serialize};

/// One declared content asset from `<resources>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestResource {
    pub identifier: String,
    /// Free-form type, `webcontent` when the attribute is absent
    #[serde(rename = "type")]
    pub resource_type: String,
    /// Entry file, relative to the package root
    pub href: String,
    /// `xml:base` of the resource, if declared
    pub base: Option<String>,
    /// Generic scorm type, falling back to the 2004 `adlcp:scormType`
    pub scorm_type: Option<String>,
    /// The 2004 `adlcp:scormType` attribute alone
    pub adlcp_scorm_type: Option<String>,
    /// `<file href>` entries in document order
    pub files: Vec<String>,
    /// `<dependency identifierref>` entries in document order
    pub dependencies: Vec<String>,
    pub metadata: Option<XmlElement>,
}

/// One node of an organization's item tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestItem {
    pub identifier: String,
    pub title: String,
    /// Target resource; folders have none
    pub identifierref: Option<String>,
    pub is_visible: bool,
    /// Query string appended to the resource href at launch
    pub parameters: Option<String>,
    pub mastery_score: Option<f64>,
    pub prerequisites: Vec<String>,
    pub children: Vec<ManifestItem>,
    /// SCORM 2004 only, kept verbatim
    pub sequencing: Option<XmlElement>,
    pub completion_threshold: Option<f64>,
    pub time_limit_action: Option<String>,
    pub data_from_lms: Option<String>,
    pub max_time_allowed: Option<String>,
}

impl ManifestItem {
    /// Whether this item is a pure folder (no resource reference).
    #[inline]
    pub fn is_folder(&self) -> bool {
        self.identifierref.is_none()
    }

    /// This item followed by all its descendants, depth-first in document order.
    pub fn walk(&self) -> ItemWalk<'_> {
        ItemWalk { stack: vec![self] }
    }
}

/// Depth-first, pre-order iterator over item trees.
#[derive(Debug, Clone)]
pub struct ItemWalk<'a> {
    stack: Vec<&'a ManifestItem>,
}

impl<'a> ItemWalk<'a> {
    /// Walk a forest of item trees in document order.
    pub fn over(items: &'a [ManifestItem]) -> Self {
        Self {
            stack: items.iter().rev().collect(),
        }
    }
}

impl<'a> Iterator for ItemWalk<'a> {
    type Item = &'a ManifestItem;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.stack.pop()?;
        self.stack.extend(item.children.iter().rev());
        Some(item)
    }
}

/// One `<organization>`: a table-of-contents variant of the package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestOrganization {
    pub identifier: String,
    pub title: String,
    /// Topology hint, `hierarchical` by default
    pub structure: String,
    /// Top-level items (tree roots)
    pub items: Vec<ManifestItem>,
    pub objectives: Option<XmlElement>,
    /// SCORM 2004 only, kept verbatim
    pub sequencing: Option<XmlElement>,
}

impl ManifestOrganization {
    /// All items of this organization, depth-first in document order.
    pub fn walk_items(&self) -> ItemWalk<'_> {
        ItemWalk::over(&self.items)
    }
}

/// Result of parsing one `imsmanifest.xml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedManifest {
    pub standard: Standard,
    /// Refined version, e.g. `2004 4th Edition`
    pub version: String,
    pub identifier: String,
    pub title: String,
    pub description: Option<String>,
    pub metadata: Option<XmlElement>,
    /// `<metadata><schema>`
    pub schema: Option<String>,
    /// `<metadata><schemaversion>`
    pub schema_version: Option<String>,
    /// `schemaLocation` of the manifest element
    pub schema_location: Option<String>,
    pub organizations: Vec<ManifestOrganization>,
    pub resources: Vec<ManifestResource>,
    /// Flattened play sequence, derived from `organizations` and `resources`
    pub scos: Vec<Sco>,
    pub default_organization: Option<String>,
    pub validation: ValidationReport,
}

impl ParsedManifest {
    /// Recompute the SCO sequence from `organizations` and `resources` alone.
    pub fn rebuild_scos(&self, options: &ParseOptions) -> Vec<Sco> {
        extract_scos(&self.organizations, &self.resources, self.standard, options)
    }

    /// Organization with the given identifier.
    pub fn organization(&self, identifier: &str) -> Option<&ManifestOrganization> {
        self.organizations.iter().find(|o| o.identifier == identifier)
    }

    /// The organization named by `default_organization`, else the first one.
    pub fn primary_organization(&self) -> Option<&ManifestOrganization> {
        self.default_organization
            .as_deref()
            .and_then(|id| self.organization(id))
            .or_else(|| self.organizations.first())
    }

    /// First resource with the given identifier.
    pub fn resource(&self, identifier: &str) -> Option<&ManifestResource> {
        self.resources.iter().find(|r| r.identifier == identifier)
    }

    /// SCO entries that may actually be launched, in play order.
    pub fn launchable_scos(&self) -> impl Iterator<Item = &Sco> {
        self.scos.iter().filter(|s| s.is_launchable)
    }

    /// SCO entries belonging to one organization, in play order.
    pub fn scos_for<'a>(&'a self, organization: &'a str) -> impl Iterator<Item = &'a Sco> + 'a {
        self.scos.iter().filter(move |s| s.organization == organization)
    }

    /// Apply a publish policy to the validation outcome.
    ///
    /// `Block` turns validation errors into [`Error::Unpublishable`]; `Warn`
    /// only logs them.
    pub fn check_publishable(&self, policy: PublishPolicy) -> Result<()> {
        if self.validation.is_valid {
            return Ok(());
        }
        match policy {
            PublishPolicy::Block => Err(Error::Unpublishable {
                errors: self.validation.errors.clone(),
            }),
            PublishPolicy::Warn => {
                tracing::warn!(
                    manifest = %self.identifier,
                    errors = self.validation.errors.len(),
                    "publishing manifest despite validation errors"
                );
                Ok(())
            },
        }
    }
}
