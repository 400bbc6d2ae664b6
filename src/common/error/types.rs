//! Error type for manifest parsing.
use thiserror::Error;

/// Main error type for manifest operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The input could not be read as XML
    #[error("Failed to parse manifest: {0}")]
    Xml(String),

    /// The document has no `manifest` root element
    #[error("Failed to parse manifest: No manifest element found in XML")]
    MissingManifest,

    /// The publish gate refused an invalid manifest
    #[error("Manifest failed validation with {} error(s): {}", errors.len(), errors.join("; "))]
    Unpublishable { errors: Vec<String> },
}

/// Result type for manifest operations.
pub type Result<T> = std::result::Result<T, Error>;
