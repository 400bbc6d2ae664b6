//! Generic XML tree used by the manifest pipeline.
//!
//! The reader turns `imsmanifest.xml` text into an owned [`XmlElement`] tree.
//! All one-or-many normalization lives on [`XmlElement`]: domain code only
//! ever sees iterators over children, never a "bare object or list" shape.

// Submodule declarations
pub mod escape;
pub mod node;
pub mod reader;

// Re-exports
pub use escape::unescape_xml;
pub use node::{Descendants, XmlAttribute, XmlElement, XmlNode, local_part};
pub use reader::parse_document;
