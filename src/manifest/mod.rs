//! SCORM manifest ingestion.
//!
//! Parses `imsmanifest.xml` for both SCORM 1.2 and SCORM 2004 into one
//! standard-agnostic model, flattens its organizations into the play
//! sequence, and reports structural problems without failing.

// Submodule declarations
pub mod detection;
pub mod metadata;
pub mod options;
pub mod organization;
pub mod parser;
pub mod resource;
pub mod sco;
pub mod types;
pub mod validation;

#[cfg(test)]
mod tests;

// Re-exports
pub use detection::{DetectionSignal, Standard, detect_standard, extract_version};
pub use options::{ParseOptions, PublishPolicy};
pub use parser::{ScormManifestParser, parse_manifest};
pub use sco::{Sco, ScoSequence, extract_scos, is_launchable};
pub use types::{ItemWalk, ManifestItem, ManifestOrganization, ManifestResource, ParsedManifest};
pub use validation::{ValidationReport, validate_manifest};
