//! Shared infrastructure used by the manifest pipeline.
//!
//! This module provides the error type and the generic XML tree that the
//! manifest stages are written against.

// Submodule declarations
pub mod error;
pub mod xml;

// Re-exports for convenience
pub use error::{Error, Result};
pub use xml::{XmlAttribute, XmlElement, XmlNode};
