//! SCO extraction: resolving items against resources and flattening the
//! organizations into one play sequence.
//!
//! The walk is a fold. A [`ScoSequence`] accumulator is threaded through
//! every organization and item in document order and carries the next
//! `seq_order`, so numbering is global across organizations without any
//! captured counter.

use super::detection::Standard;
use super::options::ParseOptions;
use super::types::{ManifestItem, ManifestOrganization, ManifestResource};
use crate::common::XmlElement;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Literal scorm type of a launchable resource
pub const SCO: &str = "sco";

/// One entry of the flattened play sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sco {
    /// `{organization}_{item}`, unique across organizations
    pub id: String,
    /// Organization the source item belongs to
    pub organization: String,
    pub identifier: String,
    pub title: String,
    pub launch_href: String,
    pub parameters: Option<String>,
    pub mastery_score: Option<f64>,
    pub prerequisites: Vec<String>,
    /// 1-based position in the whole-manifest sequence
    pub seq_order: u32,
    pub resource_type: String,
    pub scorm_type: Option<String>,
    pub is_launchable: bool,
    pub sequencing: Option<XmlElement>,
}

impl Sco {
    /// `launch_href` with `parameters` appended.
    ///
    /// A leading `?` or `&` on the parameters is dropped and the right
    /// separator chosen for the href; fragments (`#...`) are appended as is.
    pub fn launch_url(&self) -> String {
        let Some(params) = self.parameters.as_deref().map(str::trim).filter(|p| !p.is_empty()) else {
            return self.launch_href.clone();
        };
        if params.starts_with('#') {
            return format!("{}{}", self.launch_href, params);
        }
        let params = params.trim_start_matches(['?', '&']);
        if params.is_empty() {
            return self.launch_href.clone();
        }
        let separator = if self.launch_href.contains('?') { '&' } else { '?' };
        format!("{}{}{}", self.launch_href, separator, params)
    }
}

/// Whether a resource may be launched under the given standard.
///
/// SCORM 1.2 treats `webcontent` as launchable even without a scorm type,
/// because 1.2 tools fill that attribute so unreliably. SCORM 2004 requires
/// an explicit `sco`; assets never launch.
pub fn is_launchable(resource: &ManifestResource, standard: Standard) -> bool {
    match standard {
        Standard::Scorm12 => {
            resource.scorm_type.as_deref() == Some(SCO) || resource.resource_type == "webcontent"
        },
        Standard::Scorm2004 => {
            resource.adlcp_scorm_type.as_deref() == Some(SCO)
                || resource.scorm_type.as_deref() == Some(SCO)
        },
    }
}

/// Accumulator threaded through the traversal.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoSequence {
    /// `seq_order` the next emitted entry receives
    pub next_order: u32,
    pub scos: Vec<Sco>,
}

impl Default for ScoSequence {
    fn default() -> Self {
        Self {
            next_order: 1,
            scos: Vec::new(),
        }
    }
}

impl ScoSequence {
    fn push(mut self, sco: Sco) -> Self {
        self.next_order += 1;
        self.scos.push(sco);
        self
    }
}

/// Lookup from resource identifier to resource; the first declaration wins.
struct ResourceIndex<'a> {
    by_id: HashMap<&'a str, &'a ManifestResource>,
}

impl<'a> ResourceIndex<'a> {
    fn new(resources: &'a [ManifestResource]) -> Self {
        let mut by_id = HashMap::with_capacity(resources.len());
        for resource in resources {
            by_id.entry(resource.identifier.as_str()).or_insert(resource);
        }
        Self { by_id }
    }

    fn get(&self, identifier: &str) -> Option<&'a ManifestResource> {
        self.by_id.get(identifier).copied()
    }
}

struct Extraction<'a> {
    resources: ResourceIndex<'a>,
    standard: Standard,
    include_non_launchable: bool,
}

impl Extraction<'_> {
    fn entry(&self, org: &ManifestOrganization, item: &ManifestItem, seq_order: u32) -> Option<Sco> {
        let reference = item.identifierref.as_deref()?;
        let Some(resource) = self.resources.get(reference) else {
            tracing::trace!(item = %item.identifier, reference, "item references no declared resource");
            return None;
        };

        let is_launchable = is_launchable(resource, self.standard);
        if !is_launchable && !self.include_non_launchable {
            return None;
        }

        Some(Sco {
            id: format!("{}_{}", org.identifier, item.identifier),
            organization: org.identifier.clone(),
            identifier: item.identifier.clone(),
            title: item.title.clone(),
            launch_href: resource.href.clone(),
            parameters: item.parameters.clone(),
            mastery_score: item.mastery_score,
            prerequisites: item.prerequisites.clone(),
            seq_order,
            resource_type: resource.resource_type.clone(),
            scorm_type: resource.scorm_type.clone(),
            is_launchable,
            sequencing: item.sequencing.clone(),
        })
    }

    fn fold_items(&self, org: &ManifestOrganization, items: &[ManifestItem], acc: ScoSequence) -> ScoSequence {
        items.iter().fold(acc, |acc, item| {
            // folders emit nothing but their descendants still count
            let acc = match self.entry(org, item, acc.next_order) {
                Some(sco) => acc.push(sco),
                None => acc,
            };
            self.fold_items(org, &item.children, acc)
        })
    }
}

/// Flatten all organizations into the play sequence.
///
/// Depends only on its arguments, so the same organizations and resources
/// always yield the same sequence.
pub fn extract_scos(
    organizations: &[ManifestOrganization],
    resources: &[ManifestResource],
    standard: Standard,
    options: &ParseOptions,
) -> Vec<Sco> {
    let extraction = Extraction {
        resources: ResourceIndex::new(resources),
        standard,
        include_non_launchable: options.include_non_launchable,
    };

    organizations
        .iter()
        .fold(ScoSequence::default(), |acc, org| {
            extraction.fold_items(org, &org.items, acc)
        })
        .scos
}
