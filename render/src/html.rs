//! FILENAME: render/src/html.rs
//! HTML output backend.
//!
//! Emits one self-contained UTF-8 document. Each band becomes a
//! container div sized to the band height; elements are absolutely
//! positioned at their (x, y) within it, replicating the template's
//! layout coordinates. Styling comes only from the template.

use crate::common::{detail_runs, effective_page_footer};
use crate::error::RenderError;
use crate::Renderer;
use engine::{
    evaluate, resolve_parameters, EvalContext, FormatRules, RenderContext, Row, Value,
};
use model::{Band, BandKind, Element, ElementKind, Template, TextAlign};
use std::collections::HashMap;

pub struct HtmlRenderer {
    rules: FormatRules,
}

impl HtmlRenderer {
    pub fn new() -> Self {
        HtmlRenderer {
            rules: FormatRules::default(),
        }
    }

    pub fn with_rules(rules: FormatRules) -> Self {
        HtmlRenderer { rules }
    }
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        HtmlRenderer::new()
    }
}

impl Renderer for HtmlRenderer {
    fn render(
        &self,
        template: &Template,
        rows: &[Row],
        parameters: &HashMap<String, Value>,
    ) -> Result<Vec<u8>, RenderError> {
        let parameters = resolve_parameters(template, parameters);
        let mut ctx = RenderContext::new(template, parameters);
        let mut body = String::new();

        // Fixed band order: title, page header, column header, content,
        // column footer, page footer, summary.
        self.render_rowless_band(template, BandKind::Title, &ctx, &mut body);
        self.render_rowless_band(template, BandKind::PageHeader, &ctx, &mut body);
        self.render_rowless_band(template, BandKind::ColumnHeader, &ctx, &mut body);

        self.render_content(template, rows, &mut ctx, &mut body);

        self.render_rowless_band(template, BandKind::ColumnFooter, &ctx, &mut body);
        self.render_page_footer(template, &ctx, &mut body);
        self.render_summary(template, &ctx, &mut body);

        let document = format!(
            "<!DOCTYPE html>\n<html>\n<head>\n    <meta charset=\"UTF-8\">\n    <title>{}</title>\n    <style>{}</style>\n</head>\n<body>\n    <div class=\"report-container\">\n{}    </div>\n</body>\n</html>\n",
            escape_html(&template.name),
            generate_css(template),
            body
        );

        Ok(document.into_bytes())
    }
}

impl HtmlRenderer {
    /// Renders the grouped or plain detail content.
    fn render_content(
        &self,
        template: &Template,
        rows: &[Row],
        ctx: &mut RenderContext,
        out: &mut String,
    ) {
        let runs = detail_runs(template, rows, &ctx.parameters);
        let grouped = template.active_group().is_some();
        let group_name = template.active_group().map(|g| g.name.clone());

        for run in runs {
            if let Some(name) = &group_name {
                ctx.variables.reset_group(name);
            }

            // Group header sees the first row of its partition.
            if grouped {
                if let Some(band) = content_band(template, BandKind::GroupHeader) {
                    let first = rows[run.rows.clone()].first();
                    self.render_band(band, first, &ctx.variable_values(), &ctx.parameters, out);
                }
            }

            for row in &rows[run.rows.clone()] {
                ctx.variables.update(row, &ctx.parameters);
                if let Some(band) = content_band(template, BandKind::Detail) {
                    self.render_band(band, Some(row), &ctx.variable_values(), &ctx.parameters, out);
                }
            }

            // Group footer sees the partition's final accumulator values.
            if grouped {
                if let Some(band) = content_band(template, BandKind::GroupFooter) {
                    self.render_band(band, None, &ctx.variable_values(), &ctx.parameters, out);
                }
            }
        }
    }

    /// Renders a band evaluated against an empty/row-less context.
    fn render_rowless_band(
        &self,
        template: &Template,
        kind: BandKind,
        ctx: &RenderContext,
        out: &mut String,
    ) {
        if let Some(band) = content_band(template, kind) {
            self.render_band(band, None, &ctx.variable_values(), &ctx.parameters, out);
        }
    }

    /// Renders the effective page footer with the page pseudo-variables.
    fn render_page_footer(&self, template: &Template, ctx: &RenderContext, out: &mut String) {
        if let Some(band) = effective_page_footer(template).filter(|b| !b.is_empty()) {
            self.render_band(band, None, &ctx.footer_variable_values(), &ctx.parameters, out);
        }
    }

    /// Renders the summary band with the report-scope accumulator values.
    fn render_summary(&self, template: &Template, ctx: &RenderContext, out: &mut String) {
        if let Some(band) = content_band(template, BandKind::Summary) {
            self.render_band(band, None, &ctx.variable_values(), &ctx.parameters, out);
        }
    }

    fn render_band(
        &self,
        band: &Band,
        row: Option<&Row>,
        variables: &HashMap<String, Value>,
        parameters: &HashMap<String, Value>,
        out: &mut String,
    ) {
        out.push_str(&format!(
            "        <div class=\"band {}-band\" style=\"height: {}px;\">\n",
            band.kind.as_str(),
            band.height
        ));

        let ctx = EvalContext::new(row, variables, parameters);
        for element in &band.elements {
            out.push_str(&self.render_element(element, &ctx));
        }

        out.push_str("        </div>\n");
    }

    fn render_element(&self, element: &Element, ctx: &EvalContext) -> String {
        let content = match &element.kind {
            ElementKind::StaticText { content } => content.clone(),
            ElementKind::TextField { expression } => {
                let value = evaluate(expression, ctx);
                self.rules.apply(expression, &value)
            }
        };

        let mut style_parts = vec![
            format!("left: {}px", element.x),
            format!("top: {}px", element.y),
            format!("width: {}px", element.width),
            format!("height: {}px", element.height),
            format!("font-size: {}px", element.style.font_size),
        ];

        if element.style.bold {
            style_parts.push("font-weight: bold".to_string());
        }
        if element.style.italic {
            style_parts.push("font-style: italic".to_string());
        }
        if element.style.underline {
            style_parts.push("text-decoration: underline".to_string());
        }
        match element.style.align {
            TextAlign::Left => {}
            TextAlign::Center => style_parts.push("text-align: center".to_string()),
            TextAlign::Right => style_parts.push("text-align: right".to_string()),
            TextAlign::Justified => style_parts.push("text-align: justify".to_string()),
        }

        let css_class = match &element.kind {
            ElementKind::StaticText { .. } => "element static-text",
            ElementKind::TextField { .. } => "element text-field",
        };

        format!(
            "            <div class=\"{}\" style=\"{}\">{}</div>\n",
            css_class,
            style_parts.join("; "),
            escape_html(&content)
        )
    }
}

/// A band worth emitting: declared and with at least one element.
fn content_band(template: &Template, kind: BandKind) -> Option<&Band> {
    template.band(kind).filter(|b| !b.is_empty())
}

/// Document CSS derived from the template geometry.
fn generate_css(template: &Template) -> String {
    format!(
        "\n        body {{\n            font-family: 'Times New Roman', serif;\n            margin: 0;\n            padding: 0;\n            background-color: white;\n        }}\n        .report-container {{\n            max-width: {}px;\n            margin: 0 auto;\n            background-color: white;\n            padding: {}px {}px {}px {}px;\n        }}\n        .band {{\n            width: 100%;\n            position: relative;\n        }}\n        .element {{\n            position: absolute;\n            overflow: hidden;\n            box-sizing: border-box;\n            padding: 2px;\n        }}\n        @media print {{\n            body {{ background-color: white; padding: 0; }}\n        }}\n        ",
        template.page.width,
        template.page.margin_top,
        template.page.margin_right,
        template.page.margin_bottom,
        template.page.margin_left
    )
}

/// Minimal HTML escaping for text content and attribute values.
fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}
