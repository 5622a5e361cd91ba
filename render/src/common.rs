//! FILENAME: render/src/common.rs
//! Shared rendering helpers.
//!
//! The grouping walk and the tabular data preparation are identical
//! across backends; only the byte emission differs. Keeping them here is
//! what keeps the four formats behaviorally consistent.

use engine::{partition_adjacent, Row, Value};
use model::{BandKind, Template};
use std::collections::HashMap;
use std::ops::Range;

/// One contiguous run of detail rows, with the group key that produced
/// it. A template without a group yields a single keyless run covering
/// every row.
#[derive(Debug, Clone)]
pub struct DetailRun {
    pub key: Option<Value>,
    pub rows: Range<usize>,
}

/// Splits the bound rows into detail runs following the template's
/// active group (adjacent-equal partitioning; rows are not sorted).
pub fn detail_runs(
    template: &Template,
    rows: &[Row],
    parameters: &HashMap<String, Value>,
) -> Vec<DetailRun> {
    match template.active_group() {
        Some(group) => partition_adjacent(rows, &group.expression, parameters)
            .into_iter()
            .map(|p| DetailRun {
                key: Some(p.key),
                rows: p.rows,
            })
            .collect(),
        None => {
            if rows.is_empty() {
                Vec::new()
            } else {
                vec![DetailRun {
                    key: None,
                    rows: 0..rows.len(),
                }]
            }
        }
    }
}

/// Header labels for tabular output: the column-header band's static
/// texts when present, otherwise the field display names.
pub fn header_labels(template: &Template) -> Vec<String> {
    if let Some(band) = template.band(BandKind::ColumnHeader) {
        let texts = band.static_texts();
        if !texts.is_empty() {
            return texts.into_iter().map(String::from).collect();
        }
    }
    template.fields.iter().map(|f| f.display_name()).collect()
}

/// One output row of raw values, in `Template.fields` order. Missing
/// columns yield `Value::Empty`.
pub fn field_values(template: &Template, row: &Row) -> Vec<Value> {
    template
        .fields
        .iter()
        .map(|f| row.get(&f.name).cloned().unwrap_or(Value::Empty))
        .collect()
}

/// The first static text of the title band, if any. Tabular backends use
/// it as the document heading.
pub fn title_text(template: &Template) -> Option<String> {
    template
        .band(BandKind::Title)
        .and_then(|band| band.static_texts().first().map(|s| s.to_string()))
}

/// The page footer band in effect: `lastPageFooter` supersedes
/// `pageFooter` when both are declared (the engine renders one logical
/// page sequence).
pub fn effective_page_footer(template: &Template) -> Option<&model::Band> {
    template
        .band(BandKind::LastPageFooter)
        .or_else(|| template.band(BandKind::PageFooter))
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::{Band, Element, Field, Group, ValueType};

    fn row(pairs: &[(&str, Value)]) -> Row {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn ungrouped_rows_are_one_run() {
        let template = Template::new("t");
        let rows = vec![row(&[("a", Value::Number(1.0))]), row(&[("a", Value::Number(2.0))])];
        let runs = detail_runs(&template, &rows, &HashMap::new());
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].rows, 0..2);
        assert!(runs[0].key.is_none());
    }

    #[test]
    fn grouped_rows_partition_by_adjacency() {
        let mut template = Template::new("t");
        template.groups.push(Group::new("g", "$F{g}"));
        let rows = vec![
            row(&[("g", Value::Text("x".into()))]),
            row(&[("g", Value::Text("y".into()))]),
            row(&[("g", Value::Text("x".into()))]),
        ];
        let runs = detail_runs(&template, &rows, &HashMap::new());
        assert_eq!(runs.len(), 3);
        assert_eq!(runs[1].key, Some(Value::Text("y".into())));
    }

    #[test]
    fn header_labels_prefer_column_header_band() {
        let mut template = Template::new("t");
        template.fields.push(Field::new("employee_name", ValueType::String));

        assert_eq!(header_labels(&template), vec!["Employee Name"]);

        let mut band = Band::new(BandKind::ColumnHeader, 25);
        band.elements.push(Element::static_text(0, 0, 100, 20, "Employee"));
        template.bands.insert(BandKind::ColumnHeader, band);

        assert_eq!(header_labels(&template), vec!["Employee"]);
    }

    #[test]
    fn last_page_footer_supersedes_page_footer() {
        let mut template = Template::new("t");
        let mut footer = Band::new(BandKind::PageFooter, 20);
        footer.elements.push(Element::static_text(0, 0, 10, 10, "plain"));
        template.bands.insert(BandKind::PageFooter, footer);

        assert_eq!(
            effective_page_footer(&template).map(|b| b.kind),
            Some(BandKind::PageFooter)
        );

        let mut last = Band::new(BandKind::LastPageFooter, 20);
        last.elements.push(Element::static_text(0, 0, 10, 10, "last"));
        template.bands.insert(BandKind::LastPageFooter, last);

        assert_eq!(
            effective_page_footer(&template).map(|b| b.kind),
            Some(BandKind::LastPageFooter)
        );
    }
}
