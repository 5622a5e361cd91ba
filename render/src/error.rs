//! FILENAME: render/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("unsupported output format: {0}")]
    UnsupportedFormat(String),

    #[error("spreadsheet write error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
