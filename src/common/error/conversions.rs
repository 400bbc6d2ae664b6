//! Error conversion implementations.
//!
//! Converts quick-xml's reader, attribute and escape errors into the
//! fatal [`Error::Xml`] variant.

use super::types::Error;

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Xml(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::Xml(format!("invalid attribute: {}", err))
    }
}

impl From<quick_xml::escape::EscapeError> for Error {
    fn from(err: quick_xml::escape::EscapeError) -> Self {
        Error::Xml(format!("invalid escape sequence: {}", err))
    }
}

impl From<std::str::Utf8Error> for Error {
    fn from(err: std::str::Utf8Error) -> Self {
        Error::Xml(format!("invalid UTF-8: {}", err))
    }
}
