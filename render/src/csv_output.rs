//! FILENAME: render/src/csv_output.rs
//! CSV output backend.
//!
//! One header row of field display names, then one record per bound row
//! in `Template.fields` order. Values go through the same formatting
//! rules as every other backend, so a currency column reads identically
//! in CSV and HTML.

use crate::common::field_values;
use crate::error::RenderError;
use crate::Renderer;
use engine::{FormatRules, Row, Value};
use model::Template;
use std::collections::HashMap;

pub struct CsvRenderer {
    rules: FormatRules,
}

impl CsvRenderer {
    pub fn new() -> Self {
        CsvRenderer {
            rules: FormatRules::default(),
        }
    }

    pub fn with_rules(rules: FormatRules) -> Self {
        CsvRenderer { rules }
    }
}

impl Default for CsvRenderer {
    fn default() -> Self {
        CsvRenderer::new()
    }
}

impl Renderer for CsvRenderer {
    fn render(
        &self,
        template: &Template,
        rows: &[Row],
        _parameters: &HashMap<String, Value>,
    ) -> Result<Vec<u8>, RenderError> {
        let mut writer = csv::Writer::from_writer(Vec::new());

        let headers: Vec<String> = template.fields.iter().map(|f| f.display_name()).collect();
        writer.write_record(&headers)?;

        for row in rows {
            let record: Vec<String> = template
                .fields
                .iter()
                .zip(field_values(template, row))
                .map(|(field, value)| self.rules.apply(&field.name, &value))
                .collect();
            writer.write_record(&record)?;
        }

        writer
            .into_inner()
            .map_err(|e| RenderError::Io(e.into_error()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::{Field, ValueType};

    fn row(pairs: &[(&str, Value)]) -> Row {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    fn template() -> Template {
        let mut template = Template::new("items");
        template.fields.push(Field::new("name", ValueType::String));
        template.fields.push(Field::new("amount", ValueType::Decimal));
        template
    }

    #[test]
    fn header_plus_one_record_per_row() {
        let rows = vec![
            row(&[("name", Value::Text("Item 1".into())), ("amount", Value::Number(100.5))]),
            row(&[("name", Value::Text("Item 2".into())), ("amount", Value::Number(250.75))]),
        ];

        let bytes = CsvRenderer::new().render(&template(), &rows, &HashMap::new()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Name,Amount");
        assert_eq!(lines[1], "Item 1,$100.50");
        assert_eq!(lines[2], "Item 2,$250.75");
    }

    #[test]
    fn missing_columns_render_empty() {
        let rows = vec![row(&[("name", Value::Text("only name".into()))])];
        let bytes = CsvRenderer::new().render(&template(), &rows, &HashMap::new()).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert_eq!(text.lines().nth(1), Some("only name,"));
    }

    #[test]
    fn empty_data_still_yields_header() {
        let bytes = CsvRenderer::new().render(&template(), &[], &HashMap::new()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text.trim_end(), "Name,Amount");
    }
}
