//! FILENAME: render/src/pdf.rs
//! PDF output backend.
//!
//! Emits a flowing document (not a pixel-faithful layout): title and
//! header text, then the detail data as bordered tables with a bold
//! header row, group labels and footers between partitions, summary
//! lines, and a page footer carrying the page pseudo-variables.
//!
//! The byte stream is assembled directly — catalog, page tree, the two
//! built-in Helvetica fonts, one content stream per page, and a
//! correctly offset xref table. Keeping the writer in-crate avoids any
//! platform font machinery; the report engine only ever needs text and
//! rectangles.

use crate::common::{detail_runs, effective_page_footer, field_values, header_labels};
use crate::error::RenderError;
use crate::Renderer;
use engine::{
    evaluate, resolve_parameters, EvalContext, FormatRules, RenderContext, Row, Value,
};
use model::{display_case, Band, BandKind, ElementKind, PageGeometry, Template, TextAlign};
use std::collections::HashMap;

pub struct PdfRenderer {
    rules: FormatRules,
}

impl PdfRenderer {
    pub fn new() -> Self {
        PdfRenderer {
            rules: FormatRules::default(),
        }
    }

    pub fn with_rules(rules: FormatRules) -> Self {
        PdfRenderer { rules }
    }
}

impl Default for PdfRenderer {
    fn default() -> Self {
        PdfRenderer::new()
    }
}

impl Renderer for PdfRenderer {
    fn render(
        &self,
        template: &Template,
        rows: &[Row],
        parameters: &HashMap<String, Value>,
    ) -> Result<Vec<u8>, RenderError> {
        let parameters = resolve_parameters(template, parameters);
        let mut ctx = RenderContext::new(template, parameters);
        let mut doc = PdfDocument::new(&template.page);

        self.render_band_text(template, BandKind::Title, &ctx, &mut doc);
        self.render_band_text(template, BandKind::PageHeader, &ctx, &mut doc);

        self.render_content(template, rows, &mut ctx, &mut doc);

        self.render_band_text(template, BandKind::ColumnFooter, &ctx, &mut doc);
        self.render_band_text(template, BandKind::Summary, &ctx, &mut doc);

        self.render_page_footers(template, &mut ctx, &mut doc);

        Ok(doc.finish())
    }
}

impl PdfRenderer {
    /// Renders a band's elements as flowing paragraphs: static text
    /// verbatim, text fields evaluated row-less against the current
    /// accumulator snapshot.
    fn render_band_text(
        &self,
        template: &Template,
        kind: BandKind,
        ctx: &RenderContext,
        doc: &mut PdfDocument,
    ) {
        let Some(band) = template.band(kind).filter(|b| !b.is_empty()) else {
            return;
        };
        let variables = ctx.variable_values();
        let eval_ctx = EvalContext::new(None, &variables, &ctx.parameters);
        self.band_paragraphs(band, &eval_ctx, doc);
        doc.spacer(6.0);
    }

    fn band_paragraphs(&self, band: &Band, eval_ctx: &EvalContext, doc: &mut PdfDocument) {
        for element in &band.elements {
            let text = match &element.kind {
                ElementKind::StaticText { content } => content.clone(),
                ElementKind::TextField { expression } => {
                    let value = evaluate(expression, eval_ctx);
                    self.rules.apply(expression, &value)
                }
            };
            if text.is_empty() {
                continue;
            }
            doc.paragraph(
                &text,
                element.style.font_size as f64,
                element.style.bold,
                element.style.align,
            );
        }
    }

    /// Tabular detail content: one bordered table per group partition
    /// (or a single table when no group is declared), with group labels
    /// and footer lines between partitions.
    fn render_content(
        &self,
        template: &Template,
        rows: &[Row],
        ctx: &mut RenderContext,
        doc: &mut PdfDocument,
    ) {
        if rows.is_empty() || template.fields.is_empty() {
            return;
        }

        let headers = header_labels(template);
        let runs = detail_runs(template, rows, &ctx.parameters);
        let group = template.active_group().cloned();

        for run in runs {
            if let Some(group) = &group {
                ctx.variables.reset_group(&group.name);
                if let Some(key) = &run.key {
                    doc.paragraph(&group_label(group, key), 12.0, true, TextAlign::Left);
                }
            }

            let mut table_rows: Vec<Vec<String>> = Vec::new();
            for row in &rows[run.rows.clone()] {
                ctx.variables.update(row, &ctx.parameters);
                let cells: Vec<String> = template
                    .fields
                    .iter()
                    .zip(field_values(template, row))
                    .map(|(field, value)| self.rules.apply(&field.name, &value))
                    .collect();
                table_rows.push(cells);
            }

            doc.table(&headers, &table_rows);

            if group.is_some() {
                if let Some(band) = template.band(BandKind::GroupFooter).filter(|b| !b.is_empty())
                {
                    let variables = ctx.variable_values();
                    let eval_ctx = EvalContext::new(None, &variables, &ctx.parameters);
                    self.band_paragraphs(band, &eval_ctx, doc);
                }
            }
            doc.spacer(8.0);
        }
    }

    /// Writes the effective page footer at the bottom of every page,
    /// with PAGE_NUMBER/PAGE_COUNT resolved per page.
    fn render_page_footers(
        &self,
        template: &Template,
        ctx: &mut RenderContext,
        doc: &mut PdfDocument,
    ) {
        let Some(band) = effective_page_footer(template).filter(|b| !b.is_empty()) else {
            return;
        };

        let page_count = doc.page_count();
        ctx.page_count = page_count as u32;

        for page in 0..page_count {
            ctx.page_number = page as u32 + 1;
            let variables = ctx.footer_variable_values();
            let eval_ctx = EvalContext::new(None, &variables, &ctx.parameters);

            for element in &band.elements {
                let text = match &element.kind {
                    ElementKind::StaticText { content } => content.clone(),
                    ElementKind::TextField { expression } => {
                        let value = evaluate(expression, &eval_ctx);
                        self.rules.apply(expression, &value)
                    }
                };
                if text.is_empty() {
                    continue;
                }
                doc.footer_text(page, element.x as f64, &text, element.style.font_size as f64);
            }
        }
    }
}

/// Label for a group partition: the grouping field's display name and
/// the key value ("Department: Sales").
fn group_label(group: &model::Group, key: &Value) -> String {
    let name = parser::extract_field_refs(&group.expression)
        .into_iter()
        .next()
        .map(|field| display_case(&field))
        .unwrap_or_else(|| display_case(&group.name));
    format!("{}: {}", name, key.as_text())
}

// ============================================================================
// PDF DOCUMENT WRITER
// ============================================================================

const ROW_HEIGHT: f64 = 18.0;
const CELL_PADDING: f64 = 3.0;
/// Rough advance width of Helvetica as a fraction of the font size.
const CHAR_WIDTH: f64 = 0.5;

/// A minimal PDF 1.4 document: text and rectangles on a sequence of
/// pages, flowing top to bottom with automatic page breaks.
struct PdfDocument {
    page_width: f64,
    page_height: f64,
    margin_left: f64,
    margin_right: f64,
    margin_top: f64,
    margin_bottom: f64,
    /// Content stream operators, one string per page.
    pages: Vec<String>,
    /// Distance from the top of the current page to the next free line.
    cursor_y: f64,
}

impl PdfDocument {
    fn new(page: &PageGeometry) -> Self {
        PdfDocument {
            page_width: page.width as f64,
            page_height: page.height as f64,
            margin_left: page.margin_left as f64,
            margin_right: page.margin_right as f64,
            margin_top: page.margin_top as f64,
            margin_bottom: page.margin_bottom as f64,
            pages: vec![String::new()],
            cursor_y: page.margin_top as f64,
        }
    }

    fn usable_width(&self) -> f64 {
        self.page_width - self.margin_left - self.margin_right
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Starts a new page when fewer than `needed` points remain.
    fn ensure_room(&mut self, needed: f64) {
        if self.cursor_y + needed > self.page_height - self.margin_bottom {
            self.pages.push(String::new());
            self.cursor_y = self.margin_top;
        }
    }

    fn spacer(&mut self, height: f64) {
        self.cursor_y += height;
    }

    /// Emits one line of text at the cursor, advancing it.
    fn paragraph(&mut self, text: &str, size: f64, bold: bool, align: TextAlign) {
        let line_height = size * 1.4;
        self.ensure_room(line_height);

        let width = text.chars().count() as f64 * size * CHAR_WIDTH;
        let x = match align {
            TextAlign::Center => self.margin_left + ((self.usable_width() - width) / 2.0).max(0.0),
            TextAlign::Right => self.margin_left + (self.usable_width() - width).max(0.0),
            TextAlign::Left | TextAlign::Justified => self.margin_left,
        };

        let baseline = self.cursor_y + size;
        let y = self.page_height - baseline;
        let page = self.pages.len() - 1;
        Self::text_op(&mut self.pages[page], x, y, size, bold, text);
        self.cursor_y += line_height;
    }

    /// Emits a bordered table with a bold header row. Cell text is
    /// truncated to the column width.
    fn table(&mut self, headers: &[String], rows: &[Vec<String>]) {
        let columns = headers.len().max(rows.iter().map(Vec::len).max().unwrap_or(0));
        if columns == 0 {
            return;
        }
        let col_width = self.usable_width() / columns as f64;

        if !headers.is_empty() {
            self.table_row(headers, columns, col_width, true);
        }
        for row in rows {
            self.table_row(row, columns, col_width, false);
        }
    }

    fn table_row(&mut self, cells: &[String], columns: usize, col_width: f64, bold: bool) {
        self.ensure_room(ROW_HEIGHT);
        let size = if bold { 11.0 } else { 10.0 };
        let max_chars = ((col_width - 2.0 * CELL_PADDING) / (size * CHAR_WIDTH)).max(1.0) as usize;

        let top = self.cursor_y;
        let page = self.pages.len() - 1;

        for col in 0..columns {
            let x = self.margin_left + col as f64 * col_width;
            // Cell border
            let rect_y = self.page_height - top - ROW_HEIGHT;
            self.pages[page].push_str(&format!(
                "{:.2} {:.2} {:.2} {:.2} re S\n",
                x, rect_y, col_width, ROW_HEIGHT
            ));

            let text = cells.get(col).map(String::as_str).unwrap_or("");
            if text.is_empty() {
                continue;
            }
            let truncated: String = text.chars().take(max_chars).collect();
            let baseline = top + ROW_HEIGHT - 5.0;
            Self::text_op(
                &mut self.pages[page],
                x + CELL_PADDING,
                self.page_height - baseline,
                size,
                bold,
                &truncated,
            );
        }

        self.cursor_y += ROW_HEIGHT;
    }

    /// Writes text inside the bottom margin of an existing page.
    fn footer_text(&mut self, page: usize, x_offset: f64, text: &str, size: f64) {
        if page >= self.pages.len() {
            return;
        }
        let y = self.margin_bottom - size;
        Self::text_op(
            &mut self.pages[page],
            self.margin_left + x_offset,
            y.max(2.0),
            size,
            false,
            text,
        );
    }

    fn text_op(page: &mut String, x: f64, y: f64, size: f64, bold: bool, text: &str) {
        let font = if bold { "F2" } else { "F1" };
        page.push_str(&format!(
            "BT /{} {:.2} Tf {:.2} {:.2} Td ({}) Tj ET\n",
            font,
            size,
            x,
            y,
            escape_pdf_text(text)
        ));
    }

    /// Assembles the final byte stream: header, objects, xref, trailer.
    fn finish(self) -> Vec<u8> {
        let mut out: Vec<u8> = Vec::new();
        out.extend_from_slice(b"%PDF-1.4\n");
        // Binary marker comment per the PDF convention
        out.extend_from_slice(&[b'%', 0xE2, 0xE3, 0xCF, 0xD3, b'\n']);

        let page_count = self.pages.len();
        let object_count = 4 + 2 * page_count;
        let mut offsets: Vec<usize> = vec![0; object_count + 1];

        let kids: Vec<String> = (0..page_count).map(|i| format!("{} 0 R", 5 + 2 * i)).collect();

        push_object(
            &mut out,
            &mut offsets,
            1,
            b"<< /Type /Catalog /Pages 2 0 R >>",
        );
        push_object(
            &mut out,
            &mut offsets,
            2,
            format!(
                "<< /Type /Pages /Kids [{}] /Count {} >>",
                kids.join(" "),
                page_count
            )
            .as_bytes(),
        );
        push_object(
            &mut out,
            &mut offsets,
            3,
            b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>",
        );
        push_object(
            &mut out,
            &mut offsets,
            4,
            b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold >>",
        );

        for (i, content) in self.pages.iter().enumerate() {
            let page_id = 5 + 2 * i;
            let content_id = page_id + 1;

            push_object(
                &mut out,
                &mut offsets,
                page_id,
                format!(
                    "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] /Resources << /Font << /F1 3 0 R /F2 4 0 R >> >> /Contents {} 0 R >>",
                    self.page_width, self.page_height, content_id
                )
                .as_bytes(),
            );

            let stream_body = content.as_bytes();
            offsets[content_id] = out.len();
            out.extend_from_slice(format!("{} 0 obj\n", content_id).as_bytes());
            out.extend_from_slice(format!("<< /Length {} >>\nstream\n", stream_body.len()).as_bytes());
            out.extend_from_slice(stream_body);
            out.extend_from_slice(b"\nendstream\nendobj\n");
        }

        let xref_offset = out.len();
        out.extend_from_slice(format!("xref\n0 {}\n", object_count + 1).as_bytes());
        out.extend_from_slice(b"0000000000 65535 f \n");
        for id in 1..=object_count {
            out.extend_from_slice(format!("{:010} 00000 n \n", offsets[id]).as_bytes());
        }
        out.extend_from_slice(
            format!(
                "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
                object_count + 1,
                xref_offset
            )
            .as_bytes(),
        );

        out
    }
}

fn push_object(out: &mut Vec<u8>, offsets: &mut [usize], id: usize, body: &[u8]) {
    offsets[id] = out.len();
    out.extend_from_slice(format!("{} 0 obj\n", id).as_bytes());
    out.extend_from_slice(body);
    out.extend_from_slice(b"\nendobj\n");
}

/// Escapes text for a PDF literal string. Characters outside the
/// standard Latin range are replaced; the built-in fonts cannot encode
/// them anyway.
fn escape_pdf_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '(' => out.push_str("\\("),
            ')' => out.push_str("\\)"),
            '\\' => out.push_str("\\\\"),
            '\n' | '\r' | '\t' => out.push(' '),
            c if c.is_ascii() => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::{Band, Element, Field, Group, ValueType};

    fn row(pairs: &[(&str, Value)]) -> Row {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    fn template() -> Template {
        let mut template = Template::new("items");
        template.fields.push(Field::new("name", ValueType::String));
        template.fields.push(Field::new("amount", ValueType::Decimal));
        template
    }

    fn render(template: &Template, rows: &[Row]) -> Vec<u8> {
        PdfRenderer::new().render(template, rows, &HashMap::new()).unwrap()
    }

    #[test]
    fn output_is_a_pdf_byte_stream() {
        let rows = vec![row(&[("name", Value::Text("Item 1".into())), ("amount", Value::Number(100.5))])];
        let bytes = render(&template(), &rows);

        assert!(bytes.starts_with(b"%PDF-1.4"));
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.trim_end().ends_with("%%EOF"));
        assert!(text.contains("xref"));
        assert!(text.contains("/Type /Catalog"));
    }

    #[test]
    fn page_size_comes_from_template_geometry() {
        let mut t = template();
        t.page.width = 612;
        t.page.height = 792;
        let bytes = render(&t, &[]);
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("/MediaBox [0 0 612.00 792.00]"));
    }

    #[test]
    fn detail_rows_appear_with_currency_formatting() {
        let rows = vec![
            row(&[("name", Value::Text("Item 1".into())), ("amount", Value::Number(100.5))]),
            row(&[("name", Value::Text("Item 2".into())), ("amount", Value::Number(250.75))]),
        ];
        let bytes = render(&template(), &rows);
        let text = String::from_utf8_lossy(&bytes);

        assert!(text.contains("(Item 1)"));
        assert!(text.contains("(Item 2)"));
        assert!(text.contains("($100.50)"));
        // Header row from field display names, in bold
        assert!(text.contains("(Name)"));
        assert!(text.contains("(Amount)"));
        assert!(text.contains("/F2"));
    }

    #[test]
    fn empty_data_yields_a_valid_document() {
        let bytes = render(&template(), &[]);
        assert!(bytes.starts_with(b"%PDF-1.4"));
        assert!(String::from_utf8_lossy(&bytes).contains("/Count 1"));
    }

    #[test]
    fn group_labels_appear_between_tables() {
        let mut t = template();
        t.fields.insert(0, Field::new("department", ValueType::String));
        t.groups.push(Group::new("department", "$F{department}"));

        let rows = vec![
            row(&[
                ("department", Value::Text("Sales".into())),
                ("name", Value::Text("a".into())),
                ("amount", Value::Number(1.0)),
            ]),
            row(&[
                ("department", Value::Text("IT".into())),
                ("name", Value::Text("b".into())),
                ("amount", Value::Number(2.0)),
            ]),
        ];
        let bytes = render(&t, &rows);
        let text = String::from_utf8_lossy(&bytes);

        assert!(text.contains("(Department: Sales)"));
        assert!(text.contains("(Department: IT)"));
    }

    #[test]
    fn title_static_text_is_rendered() {
        let mut t = template();
        let mut title = Band::new(BandKind::Title, 60);
        let mut heading = Element::static_text(0, 0, 300, 30, "Sales (Q1)");
        heading.style.font_size = 18;
        heading.style.bold = true;
        title.elements.push(heading);
        t.bands.insert(BandKind::Title, title);

        let bytes = render(&t, &[]);
        let text = String::from_utf8_lossy(&bytes);
        // Parentheses are escaped inside the literal string
        assert!(text.contains("(Sales \\(Q1\\))"));
    }

    #[test]
    fn long_tables_break_across_pages() {
        let mut rows = Vec::new();
        for i in 0..120 {
            rows.push(row(&[
                ("name", Value::Text(format!("Item {}", i))),
                ("amount", Value::Number(i as f64)),
            ]));
        }
        let bytes = render(&template(), &rows);
        let text = String::from_utf8_lossy(&bytes);
        // 120 rows at 18pt cannot fit one A4 page
        assert!(!text.contains("/Count 1"));
    }

    #[test]
    fn page_footer_carries_page_numbers() {
        let mut t = template();
        let mut footer = Band::new(BandKind::PageFooter, 20);
        footer
            .elements
            .push(Element::text_field(0, 0, 200, 20, "\"Page \" + $V{PAGE_NUMBER} + \" of \" + $V{PAGE_COUNT}"));
        t.bands.insert(BandKind::PageFooter, footer);

        let rows = vec![row(&[("name", Value::Text("a".into())), ("amount", Value::Number(1.0))])];
        let bytes = render(&t, &rows);
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("(Page 1 of 1)"));
    }
}
