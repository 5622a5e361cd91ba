//! FILENAME: jrxml/src/lib.rs
//! JRXML template parser.
//!
//! Turns report template source text into an immutable `model::Template`.
//! Parsing is purely structural: expression correctness and field
//! references are checked later by report validation, never here.
//!
//! Tolerances, all deliberate:
//! - Element and attribute lookup is by local name, so documents with a
//!   declared namespace and documents without one parse identically.
//! - Unknown elements and attributes are skipped (forward-compatible).
//! - Missing or malformed numeric attributes take the documented
//!   defaults (page 595x842, margins 20, band height 0, font size 10).
//! - CDATA-wrapped query and expression bodies are stored unwrapped.
//!
//! The only fatal condition is a document that is not well-formed XML.

mod error;
mod parse;

pub use error::JrxmlParseError;
pub use parse::parse;
