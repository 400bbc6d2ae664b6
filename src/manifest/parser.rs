//! The manifest parsing pipeline.
//!
//! XML text → generic tree → typed model → SCO sequence + validation report.
//! Only unreadable XML or a missing `manifest` root is fatal.

use super::detection::{detect_standard, extract_version, schema_location};
use super::metadata::{extract_description, extract_metadata, extract_title, schema, schema_version};
use super::options::ParseOptions;
use super::organization::parse_organizations;
use super::resource::parse_resources;
use super::sco::extract_scos;
use super::types::ParsedManifest;
use super::validation::validate_manifest;
use crate::common::{Error, Result, XmlElement};

/// Identifier reported when the manifest has none
pub const UNKNOWN_IDENTIFIER: &str = "unknown";

/// SCORM manifest parser.
///
/// Holds only configuration; parsing is pure, so one parser can be shared
/// across threads.
///
/// # Examples
///
/// ```rust
/// use scorm_manifest::{ScormManifestParser, Standard};
///
/// let xml = r#"<manifest identifier="course">
///   <organizations default="org">
///     <organization identifier="org">
///       <title>Course</title>
///       <item identifier="intro" identifierref="res"><title>Intro</title></item>
///     </organization>
///   </organizations>
///   <resources>
///     <resource identifier="res" type="webcontent" adlcp:scormtype="sco" href="index.html"/>
///   </resources>
/// </manifest>"#;
///
/// let manifest = ScormManifestParser::new().parse_manifest(xml)?;
/// assert_eq!(manifest.standard, Standard::Scorm12);
/// assert_eq!(manifest.scos[0].launch_href, "index.html");
/// assert!(manifest.validation.is_valid);
/// # Ok::<(), scorm_manifest::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScormManifestParser {
    options: ParseOptions,
}

impl ScormManifestParser {
    /// Parser with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parser with the given options.
    pub fn with_options(options: ParseOptions) -> Self {
        Self { options }
    }

    #[inline]
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parse manifest XML into a [`ParsedManifest`].
    ///
    /// Structural defects are reported in `validation`, not returned as errors.
    pub fn parse_manifest(&self, xml_content: &str) -> Result<ParsedManifest> {
        let root = XmlElement::parse(xml_content)?;
        if !root.is("manifest") {
            return Err(Error::MissingManifest);
        }
        Ok(self.build(&root))
    }

    /// Parse and apply the configured publish policy.
    pub fn parse_for_publish(&self, xml_content: &str) -> Result<ParsedManifest> {
        let manifest = self.parse_manifest(xml_content)?;
        manifest.check_publishable(self.options.publish_policy)?;
        Ok(manifest)
    }

    fn build(&self, root: &XmlElement) -> ParsedManifest {
        let mut validation = validate_manifest(root);
        let standard = detect_standard(root);
        let version = extract_version(root, standard);

        let mut parse_warnings = Vec::new();
        let organizations = parse_organizations(root, standard, &self.options, &mut parse_warnings);
        let resources = parse_resources(root);
        let scos = extract_scos(&organizations, &resources, standard, &self.options);
        validation.extend_warnings(parse_warnings);

        let default_organization = root
            .child("organizations")
            .and_then(|orgs| orgs.attr_non_empty("default"))
            .map(str::to_string)
            .or_else(|| organizations.first().map(|org| org.identifier.clone()));

        let identifier = root
            .attr_non_empty("identifier")
            .unwrap_or(UNKNOWN_IDENTIFIER)
            .to_string();

        tracing::debug!(
            manifest = %identifier,
            %standard,
            %version,
            organizations = organizations.len(),
            resources = resources.len(),
            scos = scos.len(),
            "parsed SCORM manifest"
        );
        if !validation.is_valid {
            tracing::warn!(
                manifest = %identifier,
                errors = ?validation.errors,
                "manifest failed structural validation"
            );
        }

        ParsedManifest {
            standard,
            version,
            title: extract_title(root),
            description: extract_description(root),
            metadata: extract_metadata(root),
            schema: schema(root),
            schema_version: schema_version(root),
            schema_location: schema_location(root).map(str::to_string),
            identifier,
            organizations,
            resources,
            scos,
            default_organization,
            validation,
        }
    }
}

/// Parse manifest XML with default options.
pub fn parse_manifest(xml_content: &str) -> Result<ParsedManifest> {
    ScormManifestParser::new().parse_manifest(xml_content)
}
