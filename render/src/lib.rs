//! FILENAME: render/src/lib.rs
//! Output backends for rendered reports.
//!
//! Every backend implements the same `Renderer` capability: walk the
//! template's bands in the fixed order, combine each band's elements
//! with evaluated expressions and computed aggregates, and produce the
//! bytes of one output format. Backends are selected by `OutputFormat`,
//! never by branching inside a shared renderer.
//!
//! A renderer never fails on a single bad cell: expression failures
//! degrade inside the evaluator, and a missing band is a no-op, not an
//! error. `RenderError` covers real output failures (workbook assembly,
//! writer errors, an unknown format name).

mod common;
mod csv_output;
mod error;
mod format;
mod html;
mod pdf;
mod xlsx;

pub use csv_output::CsvRenderer;
pub use error::RenderError;
pub use format::OutputFormat;
pub use html::HtmlRenderer;
pub use pdf::PdfRenderer;
pub use xlsx::XlsxRenderer;

use engine::{Row, Value};
use model::Template;
use std::collections::HashMap;

/// The one capability every output backend provides.
pub trait Renderer {
    /// Renders the template bound to `rows` and `parameters` into the
    /// backend's byte format.
    fn render(
        &self,
        template: &Template,
        rows: &[Row],
        parameters: &HashMap<String, Value>,
    ) -> Result<Vec<u8>, RenderError>;
}

/// Selects the backend for an output format.
pub fn renderer_for(format: OutputFormat) -> Box<dyn Renderer> {
    match format {
        OutputFormat::Html => Box::new(HtmlRenderer::new()),
        OutputFormat::Pdf => Box::new(PdfRenderer::new()),
        OutputFormat::Csv => Box::new(CsvRenderer::new()),
        OutputFormat::Xlsx => Box::new(XlsxRenderer::new()),
    }
}
