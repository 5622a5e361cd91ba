//! FILENAME: jrxml/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum JrxmlParseError {
    #[error("invalid XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("invalid attribute: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("empty template source")]
    EmptySource,
}
