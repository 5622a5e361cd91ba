//! FILENAME: report/src/builder.rs
//! Programmatic report construction.
//!
//! Builds JRXML source from a fluent configuration, then parses it into
//! a regular `Report`. Going through the template source keeps the
//! builder honest: whatever it emits must survive the same parser as a
//! hand-written template.

use crate::error::ReportError;
use crate::report::Report;

/// Fluent builder for simple tabular reports: a title, a query, fields,
/// and optional column headers.
pub struct ReportBuilder {
    name: String,
    fields: Vec<(String, String)>,
    query: Option<String>,
    title: Option<String>,
    column_headers: Vec<(String, u32)>,
    page_width: u32,
    page_height: u32,
    margins: (u32, u32, u32, u32),
}

impl ReportBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        ReportBuilder {
            name: name.into(),
            fields: Vec::new(),
            query: None,
            title: None,
            column_headers: Vec::new(),
            page_width: 595,
            page_height: 842,
            margins: (20, 20, 20, 20),
        }
    }

    /// Adds a field with its declared Java class name.
    pub fn field(mut self, name: impl Into<String>, class_name: impl Into<String>) -> Self {
        self.fields.push((name.into(), class_name.into()));
        self
    }

    /// Adds a string field.
    pub fn string_field(self, name: impl Into<String>) -> Self {
        self.field(name, "java.lang.String")
    }

    /// Adds a decimal field.
    pub fn decimal_field(self, name: impl Into<String>) -> Self {
        self.field(name, "java.math.BigDecimal")
    }

    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn page_size(mut self, width: u32, height: u32) -> Self {
        self.page_width = width;
        self.page_height = height;
        self
    }

    /// Margins in left, right, top, bottom order.
    pub fn margins(mut self, left: u32, right: u32, top: u32, bottom: u32) -> Self {
        self.margins = (left, right, top, bottom);
        self
    }

    /// Adds a column header cell with its width.
    pub fn column_header(mut self, text: impl Into<String>, width: u32) -> Self {
        self.column_headers.push((text.into(), width));
        self
    }

    /// Emits the JRXML source for the configured report.
    pub fn build_source(&self) -> String {
        let (left, right, top, bottom) = self.margins;
        let column_width = self.page_width.saturating_sub(left + right);

        let mut out = format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<jasperReport xmlns=\"http://jasperreports.sourceforge.net/jasperreports\"\n              name=\"{}\" pageWidth=\"{}\" pageHeight=\"{}\"\n              columnWidth=\"{}\"\n              leftMargin=\"{}\" rightMargin=\"{}\" topMargin=\"{}\" bottomMargin=\"{}\">\n\n",
            escape_attr(&self.name),
            self.page_width,
            self.page_height,
            column_width,
            left,
            right,
            top,
            bottom
        );

        if let Some(query) = &self.query {
            out.push_str(&format!(
                "    <queryString>\n        <![CDATA[{}]]>\n    </queryString>\n\n",
                query
            ));
        }

        for (name, class_name) in &self.fields {
            out.push_str(&format!(
                "    <field name=\"{}\" class=\"{}\"/>\n",
                escape_attr(name),
                escape_attr(class_name)
            ));
        }
        if !self.fields.is_empty() {
            out.push('\n');
        }

        if let Some(title) = &self.title {
            out.push_str(&format!(
                "    <title>\n        <band height=\"60\">\n            <staticText>\n                <reportElement x=\"0\" y=\"20\" width=\"{}\" height=\"30\"/>\n                <textElement textAlignment=\"Center\">\n                    <font size=\"18\" isBold=\"true\"/>\n                </textElement>\n                <text><![CDATA[{}]]></text>\n            </staticText>\n        </band>\n    </title>\n\n",
                column_width, title
            ));
        }

        if !self.column_headers.is_empty() {
            out.push_str("    <columnHeader>\n        <band height=\"25\">\n");
            let mut x = 0;
            for (text, width) in &self.column_headers {
                out.push_str(&format!(
                    "            <staticText>\n                <reportElement x=\"{}\" y=\"5\" width=\"{}\" height=\"15\"/>\n                <textElement>\n                    <font isBold=\"true\"/>\n                </textElement>\n                <text><![CDATA[{}]]></text>\n            </staticText>\n",
                    x, width, text
                ));
                x += width;
            }
            out.push_str("        </band>\n    </columnHeader>\n\n");
        }

        if !self.fields.is_empty() {
            let field_width = column_width / self.fields.len() as u32;
            out.push_str("    <detail>\n        <band height=\"20\">\n");
            let mut x = 0;
            for (name, _) in &self.fields {
                out.push_str(&format!(
                    "            <textField>\n                <reportElement x=\"{}\" y=\"0\" width=\"{}\" height=\"20\"/>\n                <textElement/>\n                <textFieldExpression><![CDATA[$F{{{}}}]]></textFieldExpression>\n            </textField>\n",
                    x, field_width, name
                ));
                x += field_width;
            }
            out.push_str("        </band>\n    </detail>\n\n");
        }

        out.push_str("</jasperReport>\n");
        out
    }

    /// Builds a `Report` by parsing the emitted source.
    pub fn build(&self) -> Result<Report, ReportError> {
        Report::from_source(&self.build_source())
    }
}

/// Minimal escaping for attribute values the builder interpolates.
fn escape_attr(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
