//! Error types for manifest parsing.
//!
//! Only input that is not a SCORM manifest at all is reported through
//! [`Error`]; structural defects in an otherwise readable manifest are
//! collected into the validation report instead.

// Submodule declarations
pub mod conversions;
pub mod types;

// Re-exports
pub use types::{Error, Result};
