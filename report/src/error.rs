//! FILENAME: report/src/error.rs

use crate::datasource::DataSourceError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("template parse error: {0}")]
    Parse(#[from] jrxml::JrxmlParseError),

    #[error("data source error: {0}")]
    DataSource(#[from] DataSourceError),

    #[error("render error: {0}")]
    Render(#[from] render::RenderError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid data: {0}")]
    InvalidData(String),
}
