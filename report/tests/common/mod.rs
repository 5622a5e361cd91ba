//! FILENAME: tests/common/mod.rs
//! Shared fixtures for facade integration tests.

use report::{Row, Value};

/// A template exercising most of the surface: query, fields, a group
/// with header and footer, group- and report-scoped sum variables,
/// title, column header, page footer, and summary.
pub const EMPLOYEE_TEMPLATE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<jasperReport xmlns="http://jasperreports.sourceforge.net/jasperreports"
              name="employee_report" pageWidth="595" pageHeight="842"
              leftMargin="20" rightMargin="20" topMargin="20" bottomMargin="20">
    <parameter name="report_title" class="java.lang.String">
        <defaultValueExpression><![CDATA["Employee Report"]]></defaultValueExpression>
    </parameter>
    <queryString>
        <![CDATA[SELECT department, name, salary FROM employees ORDER BY department]]>
    </queryString>
    <field name="department" class="java.lang.String"/>
    <field name="name" class="java.lang.String"/>
    <field name="salary" class="java.math.BigDecimal"/>
    <variable name="dept_total" class="java.math.BigDecimal" calculation="Sum"
              resetType="Group" resetGroup="department">
        <variableExpression><![CDATA[$F{salary}]]></variableExpression>
    </variable>
    <variable name="grand_total" class="java.math.BigDecimal" calculation="Sum" resetType="Report">
        <variableExpression><![CDATA[$F{salary}]]></variableExpression>
    </variable>
    <group name="department">
        <groupExpression><![CDATA[$F{department}]]></groupExpression>
        <groupHeader>
            <band height="25">
                <textField>
                    <reportElement x="0" y="2" width="300" height="20"/>
                    <textElement>
                        <font size="12" isBold="true"/>
                    </textElement>
                    <textFieldExpression><![CDATA[$F{department}]]></textFieldExpression>
                </textField>
            </band>
        </groupHeader>
        <groupFooter>
            <band height="22">
                <staticText>
                    <reportElement x="200" y="2" width="100" height="18"/>
                    <text><![CDATA[Subtotal:]]></text>
                </staticText>
                <textField>
                    <reportElement x="300" y="2" width="120" height="18"/>
                    <textFieldExpression><![CDATA[$V{dept_total}]]></textFieldExpression>
                </textField>
            </band>
        </groupFooter>
    </group>
    <title>
        <band height="50">
            <textField>
                <reportElement x="0" y="10" width="555" height="30"/>
                <textElement textAlignment="Center">
                    <font size="18" isBold="true"/>
                </textElement>
                <textFieldExpression><![CDATA[$P{report_title}]]></textFieldExpression>
            </textField>
        </band>
    </title>
    <columnHeader>
        <band height="22">
            <staticText>
                <reportElement x="0" y="2" width="180" height="18"/>
                <textElement>
                    <font isBold="true"/>
                </textElement>
                <text><![CDATA[Department]]></text>
            </staticText>
            <staticText>
                <reportElement x="180" y="2" width="180" height="18"/>
                <textElement>
                    <font isBold="true"/>
                </textElement>
                <text><![CDATA[Name]]></text>
            </staticText>
            <staticText>
                <reportElement x="360" y="2" width="120" height="18"/>
                <textElement>
                    <font isBold="true"/>
                </textElement>
                <text><![CDATA[Salary]]></text>
            </staticText>
        </band>
    </columnHeader>
    <detail>
        <band height="20">
            <textField>
                <reportElement x="0" y="0" width="180" height="18"/>
                <textFieldExpression><![CDATA[$F{department}]]></textFieldExpression>
            </textField>
            <textField>
                <reportElement x="180" y="0" width="180" height="18"/>
                <textFieldExpression><![CDATA[$F{name}]]></textFieldExpression>
            </textField>
            <textField>
                <reportElement x="360" y="0" width="120" height="18"/>
                <textElement textAlignment="Right"/>
                <textFieldExpression><![CDATA[$F{salary}]]></textFieldExpression>
            </textField>
        </band>
    </detail>
    <pageFooter>
        <band height="20">
            <textField>
                <reportElement x="0" y="0" width="200" height="18"/>
                <textFieldExpression><![CDATA["Page " + $V{PAGE_NUMBER} + " of " + $V{PAGE_COUNT}]]></textFieldExpression>
            </textField>
        </band>
    </pageFooter>
    <summary>
        <band height="25">
            <textField>
                <reportElement x="300" y="2" width="200" height="20"/>
                <textElement>
                    <font isBold="true"/>
                </textElement>
                <textFieldExpression><![CDATA["Grand total: " + $V{grand_total}]]></textFieldExpression>
            </textField>
        </band>
    </summary>
</jasperReport>"#;

/// Builds a row from column/value pairs.
pub fn row(pairs: &[(&str, Value)]) -> Row {
    pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
}

/// Employees pre-sorted by department, matching the template query.
pub fn employee_rows() -> Vec<Row> {
    vec![
        row(&[
            ("department", Value::Text("IT".to_string())),
            ("name", Value::Text("Alice".to_string())),
            ("salary", Value::Number(5000.0)),
        ]),
        row(&[
            ("department", Value::Text("IT".to_string())),
            ("name", Value::Text("Bob".to_string())),
            ("salary", Value::Number(4500.0)),
        ]),
        row(&[
            ("department", Value::Text("Sales".to_string())),
            ("name", Value::Text("Carol".to_string())),
            ("salary", Value::Number(3800.0)),
        ]),
    ]
}
