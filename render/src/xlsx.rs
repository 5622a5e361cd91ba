//! FILENAME: render/src/xlsx.rs
//! Spreadsheet output backend.
//!
//! One populated worksheet: an optional bold title cell from the title
//! band, a bold header row, then one data row per bound row in
//! `Template.fields` order. Currency columns stay numeric and carry a
//! native number format derived from the shared formatting rules, so the
//! application formats them exactly as the text backends do.

use crate::common::{field_values, header_labels, title_text};
use crate::error::RenderError;
use crate::Renderer;
use engine::{FormatRules, NumberFormat, Row, Value};
use model::Template;
use rust_xlsxwriter::{Format, Workbook};
use std::collections::HashMap;

pub struct XlsxRenderer {
    rules: FormatRules,
}

impl XlsxRenderer {
    pub fn new() -> Self {
        XlsxRenderer {
            rules: FormatRules::default(),
        }
    }

    pub fn with_rules(rules: FormatRules) -> Self {
        XlsxRenderer { rules }
    }
}

impl Default for XlsxRenderer {
    fn default() -> Self {
        XlsxRenderer::new()
    }
}

impl Renderer for XlsxRenderer {
    fn render(
        &self,
        template: &Template,
        rows: &[Row],
        _parameters: &HashMap<String, Value>,
    ) -> Result<Vec<u8>, RenderError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("Report")?;

        let title_format = Format::new().set_bold().set_font_size(16.0);
        let header_format = Format::new().set_bold();

        let mut row_index: u32 = 0;

        if let Some(title) = title_text(template) {
            worksheet.write_string_with_format(row_index, 0, &title, &title_format)?;
            row_index += 2;
        }

        for (col, label) in header_labels(template).iter().enumerate() {
            worksheet.write_string_with_format(row_index, col as u16, label, &header_format)?;
        }
        row_index += 1;

        // Column formats from the shared rule list, built once.
        let column_formats: Vec<Option<Format>> = template
            .fields
            .iter()
            .map(|field| match self.rules.format_for(&field.name) {
                NumberFormat::General => None,
                format => format
                    .spreadsheet_format()
                    .map(|f| Format::new().set_num_format(&f)),
            })
            .collect();

        for row in rows {
            for (col, value) in field_values(template, row).into_iter().enumerate() {
                let col_u16 = col as u16;
                match (value.as_number(), &column_formats[col]) {
                    (Some(n), Some(format)) => {
                        worksheet.write_number_with_format(row_index, col_u16, n, format)?;
                    }
                    (Some(n), None) => match &value {
                        // Keep genuinely numeric cells numeric; text that
                        // merely parses stays text.
                        Value::Number(_) | Value::Boolean(_) => {
                            worksheet.write_number(row_index, col_u16, n)?;
                        }
                        _ => {
                            worksheet.write_string(row_index, col_u16, &value.as_text())?;
                        }
                    },
                    (None, _) => {
                        let text = value.as_text();
                        if !text.is_empty() {
                            worksheet.write_string(row_index, col_u16, &text)?;
                        }
                    }
                }
            }
            row_index += 1;
        }

        Ok(workbook.save_to_buffer()?)
    }
}
