//! FILENAME: render/src/format.rs
//! Output format identifiers.

use crate::error::RenderError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The output formats a report can be generated into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Html,
    Pdf,
    Csv,
    Xlsx,
}

impl OutputFormat {
    /// All supported formats.
    pub fn all() -> [OutputFormat; 4] {
        [
            OutputFormat::Html,
            OutputFormat::Pdf,
            OutputFormat::Csv,
            OutputFormat::Xlsx,
        ]
    }

    /// The conventional file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Html => "html",
            OutputFormat::Pdf => "pdf",
            OutputFormat::Csv => "csv",
            OutputFormat::Xlsx => "xlsx",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = RenderError;

    /// Accepts the conventional names, case-insensitive; "excel" is an
    /// alias for xlsx.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "html" => Ok(OutputFormat::Html),
            "pdf" => Ok(OutputFormat::Pdf),
            "csv" => Ok(OutputFormat::Csv),
            "xlsx" | "excel" => Ok(OutputFormat::Xlsx),
            other => Err(RenderError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_conventional_names() {
        assert_eq!("html".parse::<OutputFormat>().unwrap(), OutputFormat::Html);
        assert_eq!("PDF".parse::<OutputFormat>().unwrap(), OutputFormat::Pdf);
        assert_eq!("excel".parse::<OutputFormat>().unwrap(), OutputFormat::Xlsx);
        assert!("docx".parse::<OutputFormat>().is_err());
    }
}
