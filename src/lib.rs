//! SCORM manifest parser
//!
//! This library turns a SCORM package's `imsmanifest.xml` into a typed,
//! validated model and derives the ordered list of launchable content
//! (SCOs) a course player navigates through.
//!
//! # Features
//!
//! - **Two standards**: SCORM 1.2 and SCORM 2004 (2nd-4th edition) manifests
//! - **Item hierarchy**: Organizations with arbitrarily nested items
//! - **SCO sequence**: Depth-first, manifest-wide `seq_order`
//! - **Best-effort parsing**: Structural defects become validation findings
//! - **Opaque sequencing**: SCORM 2004 `<sequencing>` blocks passed through as XML trees
//!
//! # Example - Parsing a manifest
//!
//! ```no_run
//! use scorm_manifest::parse_manifest;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let xml = std::fs::read_to_string("imsmanifest.xml")?;
//! let manifest = parse_manifest(&xml)?;
//!
//! println!("{} ({})", manifest.title, manifest.version);
//! for sco in manifest.launchable_scos() {
//!     println!("{:>3}. {} -> {}", sco.seq_order, sco.title, sco.launch_url());
//! }
//!
//! if !manifest.validation.is_valid {
//!     for error in &manifest.validation.errors {
//!         eprintln!("error: {}", error);
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Publish gate
//!
//! ```no_run
//! use scorm_manifest::{ParseOptions, PublishPolicy, ScormManifestParser};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! # let xml = String::new();
//! let parser = ScormManifestParser::with_options(
//!     ParseOptions::new().with_publish_policy(PublishPolicy::Block),
//! );
//! // Fails with `Error::Unpublishable` when validation found errors
//! let manifest = parser.parse_for_publish(&xml)?;
//! # let _ = manifest;
//! # Ok(())
//! # }
//! ```

/// Shared infrastructure: error type and the generic XML tree.
pub mod common;

/// SCORM manifest model, parser, SCO extraction and validation.
pub mod manifest;

// Re-export commonly used types for convenience
pub use common::{Error, Result, XmlElement, XmlNode};
pub use manifest::{
    ManifestItem, ManifestOrganization, ManifestResource, ParseOptions, ParsedManifest,
    PublishPolicy, Sco, ScormManifestParser, Standard, ValidationReport, parse_manifest,
};
