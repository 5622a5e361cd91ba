//! FILENAME: tests/test_validation.rs
//! Integration tests for validation, preview, and report info.

mod common;

use common::{employee_rows, EMPLOYEE_TEMPLATE};
use report::{FailingDataSource, MemoryDataSource, OutputFormat, Report};

#[test]
fn dangling_field_reference_is_an_issue() {
    let source = r#"<jasperReport name="broken">
    <detail>
        <band height="20">
            <textField>
                <reportElement x="0" y="0" width="100" height="20"/>
                <textFieldExpression><![CDATA[$F{missing}]]></textFieldExpression>
            </textField>
        </band>
    </detail>
</jasperReport>"#;

    let mut report = Report::from_source(source).unwrap();
    report.set_data(Vec::new());

    let validation = report.validate();
    assert!(!validation.valid);
    assert!(validation.issues.iter().any(|i| i.contains("missing")));
}

#[test]
fn complete_template_validates_cleanly() {
    let mut report = Report::from_source(EMPLOYEE_TEMPLATE).unwrap();
    report.set_data(employee_rows());

    let validation = report.validate();
    assert!(validation.valid, "unexpected issues: {:?}", validation.issues);
    assert!(validation.warnings.is_empty());
}

#[test]
fn rendering_works_even_when_validation_reports_issues() {
    let source = r#"<jasperReport name="broken">
    <field name="name" class="java.lang.String"/>
    <detail>
        <band height="20">
            <textField>
                <reportElement x="0" y="0" width="100" height="20"/>
                <textFieldExpression><![CDATA[$F{name}]]></textFieldExpression>
            </textField>
            <textField>
                <reportElement x="100" y="0" width="100" height="20"/>
                <textFieldExpression><![CDATA[$F{missing}]]></textFieldExpression>
            </textField>
        </band>
    </detail>
</jasperReport>"#;

    let mut report = Report::from_source(source).unwrap();
    report.set_data(vec![common::row(&[(
        "name",
        report::Value::Text("still renders".to_string()),
    )])]);

    assert!(!report.validate().valid);

    // The dangling reference degrades to an empty cell, not a failure.
    let html = String::from_utf8(report.generate(OutputFormat::Html).unwrap()).unwrap();
    assert!(html.contains("still renders"));
}

#[test]
fn preview_truncates_bound_data() {
    let mut report = Report::from_source(EMPLOYEE_TEMPLATE).unwrap();
    report.set_data(employee_rows());

    assert_eq!(report.preview(2).len(), 2);
    assert_eq!(report.preview(10).len(), 3);
}

#[test]
fn preview_runs_a_row_limited_query() {
    let mut report = Report::from_source(EMPLOYEE_TEMPLATE).unwrap();
    report.set_data_source(Box::new(MemoryDataSource::with_rows(employee_rows())));

    let preview = report.preview(1);
    assert_eq!(preview.len(), 1);
}

#[test]
fn preview_degrades_to_empty_on_source_failure() {
    let mut report = Report::from_source(EMPLOYEE_TEMPLATE).unwrap();
    report.set_data_source(Box::new(FailingDataSource));

    assert!(report.preview(5).is_empty());
}

#[test]
fn preview_without_data_or_source_is_empty() {
    let report = Report::from_source(EMPLOYEE_TEMPLATE).unwrap();
    assert!(report.preview(5).is_empty());
}

#[test]
fn info_reports_the_template_surface() {
    let report = Report::from_source(EMPLOYEE_TEMPLATE).unwrap();
    let info = report.info();

    assert_eq!(info.name, "employee_report");
    assert_eq!((info.page_width, info.page_height), (595, 842));
    assert!(info.has_query);

    let field_names: Vec<&str> = info.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(field_names, vec!["department", "name", "salary"]);

    assert_eq!(info.variables.len(), 2);
    assert_eq!(info.groups.len(), 1);
    assert_eq!(info.parameters.len(), 1);
    assert!(info.bands.contains(&"detail".to_string()));
    assert!(info.bands.contains(&"groupHeader".to_string()));

    // The info payload is what a web layer serializes.
    let json = serde_json::to_string(&info).unwrap();
    assert!(json.contains("employee_report"));
}
