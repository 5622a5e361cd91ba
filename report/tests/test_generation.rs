//! FILENAME: tests/test_generation.rs
//! Integration tests for report generation across output formats.

mod common;

use common::{employee_rows, row, EMPLOYEE_TEMPLATE};
use report::{MemoryDataSource, OutputFormat, Report, Value};

#[test]
fn end_to_end_html_scenario() {
    let source = r#"<jasperReport name="items">
    <field name="name" class="java.lang.String"/>
    <field name="amount" class="java.math.BigDecimal"/>
    <detail>
        <band height="20">
            <textField>
                <reportElement x="0" y="0" width="200" height="20"/>
                <textFieldExpression><![CDATA[$F{name}]]></textFieldExpression>
            </textField>
            <textField>
                <reportElement x="200" y="0" width="100" height="20"/>
                <textFieldExpression><![CDATA[$F{amount}]]></textFieldExpression>
            </textField>
        </band>
    </detail>
</jasperReport>"#;

    let mut report = Report::from_source(source).unwrap();
    report.set_data(vec![
        row(&[("name", Value::Text("Item 1".to_string())), ("amount", Value::Number(100.5))]),
        row(&[("name", Value::Text("Item 2".to_string())), ("amount", Value::Number(250.75))]),
    ]);

    let html = String::from_utf8(report.generate(OutputFormat::Html).unwrap()).unwrap();
    assert!(html.contains("Item 1"));
    assert!(html.contains("Item 2"));
    assert!(html.contains("$100.50"));
    assert!(html.contains("$250.75"));
}

#[test]
fn every_format_handles_empty_data() {
    for format in OutputFormat::all() {
        let mut report = Report::from_source(EMPLOYEE_TEMPLATE).unwrap();
        report.set_data(Vec::new());

        let bytes = report.generate(format).unwrap();
        assert!(!bytes.is_empty(), "{} output was empty", format);

        match format {
            OutputFormat::Html => {
                let text = String::from_utf8(bytes).unwrap();
                assert!(text.starts_with("<!DOCTYPE html>"));
                assert!(text.contains("</html>"));
            }
            OutputFormat::Pdf => {
                assert!(bytes.starts_with(b"%PDF-"));
            }
            OutputFormat::Csv => {
                let text = String::from_utf8(bytes).unwrap();
                assert_eq!(text.lines().count(), 1);
            }
            OutputFormat::Xlsx => {
                assert_eq!(&bytes[0..4], b"PK\x03\x04");
            }
        }
    }
}

#[test]
fn identical_input_generates_identical_html() {
    let render = || {
        let mut report = Report::from_source(EMPLOYEE_TEMPLATE).unwrap();
        report.set_data(employee_rows());
        report.generate(OutputFormat::Html).unwrap()
    };

    assert_eq!(render(), render());
}

#[test]
fn group_subtotals_and_grand_total_in_html() {
    let mut report = Report::from_source(EMPLOYEE_TEMPLATE).unwrap();
    report.set_data(employee_rows());

    let html = String::from_utf8(report.generate(OutputFormat::Html).unwrap()).unwrap();
    // IT subtotal 9500, Sales subtotal 3800, grand total 13300.
    assert!(html.contains(">9500<"));
    assert!(html.contains(">3800<"));
    assert!(html.contains("Grand total: 13300"));
    // Parameter default feeds the title.
    assert!(html.contains("Employee Report"));
    assert!(html.contains("Page 1 of 1"));
}

#[test]
fn salary_column_formats_as_currency_in_csv() {
    let mut report = Report::from_source(EMPLOYEE_TEMPLATE).unwrap();
    report.set_data(employee_rows());

    let csv = String::from_utf8(report.generate(OutputFormat::Csv).unwrap()).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "Department,Name,Salary");
    assert_eq!(lines[1], "IT,Alice,$5000.00");
    assert_eq!(lines.len(), 4);
}

#[test]
fn generation_binds_through_the_data_source() {
    let mut report = Report::from_source(EMPLOYEE_TEMPLATE).unwrap();
    report.set_data_source(Box::new(MemoryDataSource::with_rows(employee_rows())));

    let html = String::from_utf8(report.generate(OutputFormat::Html).unwrap()).unwrap();
    assert!(html.contains("Alice"));
    assert!(html.contains("Carol"));
}

#[test]
fn generation_fails_cleanly_when_the_source_is_down() {
    let mut report = Report::from_source(EMPLOYEE_TEMPLATE).unwrap();
    report.set_data_source(Box::new(report::FailingDataSource));

    assert!(report.generate(OutputFormat::Html).is_err());
}

#[test]
fn unknown_format_name_is_a_render_error() {
    let mut report = Report::from_source(EMPLOYEE_TEMPLATE).unwrap();
    report.set_data(Vec::new());

    assert!(report.generate_as("docx").is_err());
    assert!(report.generate_as("excel").is_ok());
}

#[test]
fn parameters_override_defaults() {
    let mut report = Report::from_source(EMPLOYEE_TEMPLATE).unwrap();
    report.set_data(employee_rows());
    report.set_parameters(
        [("report_title".to_string(), Value::Text("Q3 Payroll".to_string()))]
            .into_iter()
            .collect(),
    );

    let html = String::from_utf8(report.generate(OutputFormat::Html).unwrap()).unwrap();
    assert!(html.contains("Q3 Payroll"));
    assert!(!html.contains("Employee Report</div>"));
}

#[test]
fn save_writes_the_generated_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.html");

    let mut report = Report::from_source(EMPLOYEE_TEMPLATE).unwrap();
    report.set_data(employee_rows());
    report.save(&path, OutputFormat::Html).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("Alice"));
}

#[test]
fn json_rows_bind_directly() {
    let mut report = Report::from_source(EMPLOYEE_TEMPLATE).unwrap();
    report
        .set_data_json(
            r#"[{"department": "IT", "name": "Dana", "salary": 1200.5}]"#,
        )
        .unwrap();

    let html = String::from_utf8(report.generate(OutputFormat::Html).unwrap()).unwrap();
    assert!(html.contains("Dana"));
    assert!(html.contains("$1200.50"));

    let mut bad = Report::from_source(EMPLOYEE_TEMPLATE).unwrap();
    assert!(bad.set_data_json("not json").is_err());
}
