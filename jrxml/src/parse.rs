//! FILENAME: jrxml/src/parse.rs
//! Streaming JRXML parse over quick-xml events.
//!
//! A single forward pass with an element-name stack. Matching is on
//! local names throughout, which makes the parser indifferent to whether
//! the document declares the report namespace. Text and CDATA events
//! both feed the pending text slot, so CDATA wrappers are gone by
//! construction.

use crate::error::JrxmlParseError;
use model::{
    Band, BandKind, Calculation, Element, ElementKind, Field, Group, ParameterSpec, ResetScope,
    Template, TextAlign, TextStyle, ValueType,
};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;

/// Parses JRXML source text into a `Template`.
pub fn parse(source: &str) -> Result<Template, JrxmlParseError> {
    TemplateReader::new().parse(source)
}

/// Which definition slot the next text/CDATA content belongs to.
#[derive(Debug, Clone, Copy, PartialEq)]
enum TextTarget {
    Query,
    StaticContent,
    FieldExpression,
    FieldDescription,
    VariableExpression,
    VariableInitialValue,
    GroupExpression,
    ParameterDefault,
}

/// A text field or static text being assembled.
struct PendingElement {
    element: Element,
    is_static: bool,
}

/// A group being assembled, along with its header/footer bands.
struct PendingGroup {
    group: Group,
    header_band: Option<Band>,
    footer_band: Option<Band>,
}

struct TemplateReader {
    template: Template,
    /// Local names of open elements, root first.
    stack: Vec<String>,
    saw_root: bool,
    current_field: Option<Field>,
    current_variable: Option<model::Variable>,
    current_parameter: Option<ParameterSpec>,
    current_group: Option<PendingGroup>,
    /// Band currently collecting elements, with its kind.
    current_band: Option<Band>,
    current_element: Option<PendingElement>,
    text_target: Option<TextTarget>,
    text_buffer: String,
}

impl TemplateReader {
    fn new() -> Self {
        TemplateReader {
            template: Template::new("Report"),
            stack: Vec::new(),
            saw_root: false,
            current_field: None,
            current_variable: None,
            current_parameter: None,
            current_group: None,
            current_band: None,
            current_element: None,
            text_target: None,
            text_buffer: String::new(),
        }
    }

    fn parse(mut self, source: &str) -> Result<Template, JrxmlParseError> {
        let mut reader = Reader::from_str(source);

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    let name = local_name(&e);
                    self.handle_start(&name, &e)?;
                    self.stack.push(name);
                }
                Event::Empty(e) => {
                    let name = local_name(&e);
                    // Self-closing element: open and close in one step.
                    self.handle_start(&name, &e)?;
                    self.stack.push(name.clone());
                    self.handle_end(&name);
                    self.stack.pop();
                }
                Event::End(_) => {
                    if let Some(name) = self.stack.pop() {
                        self.handle_end(&name);
                    }
                }
                Event::Text(t) => {
                    if self.text_target.is_some() {
                        self.text_buffer.push_str(&t.unescape()?);
                    }
                }
                Event::CData(c) => {
                    if self.text_target.is_some() {
                        self.text_buffer
                            .push_str(&String::from_utf8_lossy(c.into_inner().as_ref()));
                    }
                }
                Event::Eof => break,
                // Declarations, comments, processing instructions
                _ => {}
            }
        }

        if !self.saw_root {
            return Err(JrxmlParseError::EmptySource);
        }

        Ok(self.template)
    }

    fn handle_start(&mut self, name: &str, e: &BytesStart) -> Result<(), JrxmlParseError> {
        let attrs = read_attributes(e)?;

        if !self.saw_root {
            // The first element is the report root, whatever its tag.
            self.saw_root = true;
            self.read_root_attributes(&attrs);
            return Ok(());
        }

        match name {
            "queryString" => self.begin_text(TextTarget::Query),
            "field" => {
                if let Some(field_name) = attrs.get("name") {
                    let class = attrs.get("class").map(String::as_str).unwrap_or("");
                    self.current_field =
                        Some(Field::new(field_name.clone(), ValueType::from_class_name(class)));
                }
            }
            "fieldDescription" => {
                if self.current_field.is_some() {
                    self.begin_text(TextTarget::FieldDescription);
                }
            }
            "variable" => {
                if let Some(var_name) = attrs.get("name") {
                    let class = attrs.get("class").map(String::as_str).unwrap_or("");
                    let calculation = attrs
                        .get("calculation")
                        .map(|c| Calculation::from_attr(c))
                        .unwrap_or_default();
                    let reset = match attrs.get("resetType").map(String::as_str) {
                        Some("Group") => match attrs.get("resetGroup") {
                            Some(group) => ResetScope::Group(group.clone()),
                            None => ResetScope::Report,
                        },
                        _ => ResetScope::Report,
                    };

                    let mut variable = model::Variable::new(var_name.clone(), calculation);
                    variable.value_type = ValueType::from_class_name(class);
                    variable.reset = reset;
                    self.current_variable = Some(variable);
                }
            }
            "variableExpression" => {
                if self.current_variable.is_some() {
                    self.begin_text(TextTarget::VariableExpression);
                }
            }
            "initialValueExpression" => {
                if self.current_variable.is_some() {
                    self.begin_text(TextTarget::VariableInitialValue);
                }
            }
            "parameter" => {
                if let Some(param_name) = attrs.get("name") {
                    let class = attrs.get("class").map(String::as_str).unwrap_or("");
                    self.current_parameter = Some(ParameterSpec {
                        name: param_name.clone(),
                        value_type: ValueType::from_class_name(class),
                        default_value: None,
                    });
                }
            }
            "defaultValueExpression" => {
                if self.current_parameter.is_some() {
                    self.begin_text(TextTarget::ParameterDefault);
                }
            }
            "group" => {
                if let Some(group_name) = attrs.get("name") {
                    self.current_group = Some(PendingGroup {
                        group: Group::new(group_name.clone(), ""),
                        header_band: None,
                        footer_band: None,
                    });
                }
            }
            "groupExpression" => {
                if self.current_group.is_some() {
                    self.begin_text(TextTarget::GroupExpression);
                }
            }
            "band" => self.begin_band(&attrs),
            "staticText" | "textField" => {
                if self.current_band.is_some() {
                    let is_static = name == "staticText";
                    let kind = if is_static {
                        ElementKind::StaticText {
                            content: String::new(),
                        }
                    } else {
                        ElementKind::TextField {
                            expression: String::new(),
                        }
                    };
                    self.current_element = Some(PendingElement {
                        element: Element {
                            x: 0,
                            y: 0,
                            width: 0,
                            height: 0,
                            kind,
                            style: TextStyle::default(),
                        },
                        is_static,
                    });
                }
            }
            "reportElement" => {
                if let Some(pending) = self.current_element.as_mut() {
                    pending.element.x = attr_u32(&attrs, "x", 0);
                    pending.element.y = attr_u32(&attrs, "y", 0);
                    pending.element.width = attr_u32(&attrs, "width", 0);
                    pending.element.height = attr_u32(&attrs, "height", 0);
                }
            }
            "textElement" => {
                if let Some(pending) = self.current_element.as_mut() {
                    if let Some(align) = attrs.get("textAlignment") {
                        pending.element.style.align = TextAlign::from_attr(align);
                    }
                }
            }
            "font" => {
                if let Some(pending) = self.current_element.as_mut() {
                    pending.element.style.font_size = attr_u32(&attrs, "size", 10);
                    pending.element.style.bold = attr_bool(&attrs, "isBold");
                    pending.element.style.italic = attr_bool(&attrs, "isItalic");
                    pending.element.style.underline = attr_bool(&attrs, "isUnderline");
                }
            }
            "text" => {
                if self.current_element.is_some() {
                    self.begin_text(TextTarget::StaticContent);
                }
            }
            "textFieldExpression" => {
                if self.current_element.is_some() {
                    self.begin_text(TextTarget::FieldExpression);
                }
            }
            _ => {}
        }

        Ok(())
    }

    fn handle_end(&mut self, name: &str) {
        // Commit any pending text first; its target closes with its tag.
        if self.text_target.is_some() {
            self.commit_text(name);
        }

        match name {
            "field" => {
                if let Some(field) = self.current_field.take() {
                    self.template.fields.push(field);
                }
            }
            "variable" => {
                if let Some(variable) = self.current_variable.take() {
                    self.template.variables.push(variable);
                }
            }
            "parameter" => {
                if let Some(parameter) = self.current_parameter.take() {
                    self.template.parameters.push(parameter);
                }
            }
            "group" => {
                if let Some(pending) = self.current_group.take() {
                    // Only the first declared group contributes header and
                    // footer bands; later groups are definition-only.
                    if self.template.groups.is_empty() {
                        if let Some(band) = pending.header_band {
                            self.template.bands.entry(BandKind::GroupHeader).or_insert(band);
                        }
                        if let Some(band) = pending.footer_band {
                            self.template.bands.entry(BandKind::GroupFooter).or_insert(band);
                        }
                    }
                    self.template.groups.push(pending.group);
                }
            }
            "band" => {
                if let Some(band) = self.current_band.take() {
                    match band.kind {
                        BandKind::GroupHeader => {
                            if let Some(pending) = self.current_group.as_mut() {
                                pending.group.header_height = band.height;
                                pending.header_band = Some(band);
                            }
                        }
                        BandKind::GroupFooter => {
                            if let Some(pending) = self.current_group.as_mut() {
                                pending.group.footer_height = band.height;
                                pending.footer_band = Some(band);
                            }
                        }
                        kind => {
                            // First band per kind wins.
                            self.template.bands.entry(kind).or_insert(band);
                        }
                    }
                }
            }
            "staticText" | "textField" => {
                if let (Some(pending), Some(band)) =
                    (self.current_element.take(), self.current_band.as_mut())
                {
                    band.elements.push(pending.element);
                }
            }
            _ => {}
        }
    }

    fn read_root_attributes(&mut self, attrs: &HashMap<String, String>) {
        if let Some(name) = attrs.get("name") {
            self.template.name = name.clone();
        }
        self.template.page.width = attr_u32(attrs, "pageWidth", 595);
        self.template.page.height = attr_u32(attrs, "pageHeight", 842);
        self.template.page.margin_left = attr_u32(attrs, "leftMargin", 20);
        self.template.page.margin_right = attr_u32(attrs, "rightMargin", 20);
        self.template.page.margin_top = attr_u32(attrs, "topMargin", 20);
        self.template.page.margin_bottom = attr_u32(attrs, "bottomMargin", 20);
    }

    /// Opens a band when the enclosing element names a band kind.
    fn begin_band(&mut self, attrs: &HashMap<String, String>) {
        let Some(parent) = self.stack.last() else {
            return;
        };

        let kind = match (BandKind::from_tag(parent), self.current_group.is_some()) {
            // groupHeader/groupFooter tags only open bands inside a group.
            (Some(BandKind::GroupHeader), true) => BandKind::GroupHeader,
            (Some(BandKind::GroupFooter), true) => BandKind::GroupFooter,
            (Some(BandKind::GroupHeader), false) | (Some(BandKind::GroupFooter), false) => return,
            (Some(kind), _) => kind,
            (None, _) => return,
        };

        self.current_band = Some(Band::new(kind, attr_u32(attrs, "height", 0)));
    }

    fn begin_text(&mut self, target: TextTarget) {
        self.text_target = Some(target);
        self.text_buffer.clear();
    }

    /// Routes buffered text to its slot when the owning tag closes.
    fn commit_text(&mut self, closing: &str) {
        let expected = match self.text_target {
            Some(TextTarget::Query) => "queryString",
            Some(TextTarget::StaticContent) => "text",
            Some(TextTarget::FieldExpression) => "textFieldExpression",
            Some(TextTarget::FieldDescription) => "fieldDescription",
            Some(TextTarget::VariableExpression) => "variableExpression",
            Some(TextTarget::VariableInitialValue) => "initialValueExpression",
            Some(TextTarget::GroupExpression) => "groupExpression",
            Some(TextTarget::ParameterDefault) => "defaultValueExpression",
            None => return,
        };
        if closing != expected {
            return;
        }

        let Some(target) = self.text_target.take() else {
            return;
        };
        let text = self.text_buffer.trim().to_string();
        self.text_buffer.clear();

        match target {
            TextTarget::Query => {
                if !text.is_empty() {
                    self.template.query = Some(text);
                }
            }
            TextTarget::StaticContent => {
                if let Some(pending) = self.current_element.as_mut() {
                    pending.element.kind = ElementKind::StaticText { content: text };
                }
            }
            TextTarget::FieldExpression => {
                if let Some(pending) = self.current_element.as_mut() {
                    if !pending.is_static {
                        pending.element.kind = ElementKind::TextField { expression: text };
                    }
                }
            }
            TextTarget::FieldDescription => {
                if let Some(field) = self.current_field.as_mut() {
                    if !text.is_empty() {
                        field.description = Some(text);
                    }
                }
            }
            TextTarget::VariableExpression => {
                if let Some(variable) = self.current_variable.as_mut() {
                    if !text.is_empty() {
                        variable.expression = Some(text);
                    }
                }
            }
            TextTarget::VariableInitialValue => {
                if let Some(variable) = self.current_variable.as_mut() {
                    if !text.is_empty() {
                        variable.initial_value = Some(text);
                    }
                }
            }
            TextTarget::GroupExpression => {
                if let Some(pending) = self.current_group.as_mut() {
                    pending.group.expression = text;
                }
            }
            TextTarget::ParameterDefault => {
                if let Some(parameter) = self.current_parameter.as_mut() {
                    if !text.is_empty() {
                        parameter.default_value = Some(text);
                    }
                }
            }
        }
    }
}

// ============================================================================
// ATTRIBUTE HELPERS
// ============================================================================

fn local_name(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

/// Reads all attributes into a map keyed by local name.
fn read_attributes(e: &BytesStart) -> Result<HashMap<String, String>, JrxmlParseError> {
    let mut attrs = HashMap::new();
    for attr in e.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        attrs.insert(key, value);
    }
    Ok(attrs)
}

/// Integer attribute with a default for missing or malformed values.
fn attr_u32(attrs: &HashMap<String, String>, name: &str, default: u32) -> u32 {
    attrs
        .get(name)
        .and_then(|v| v.trim().parse::<u32>().ok())
        .unwrap_or(default)
}

/// Boolean-ish attribute: the source spells flags "true"/"false".
fn attr_bool(attrs: &HashMap<String, String>, name: &str) -> bool {
    attrs
        .get(name)
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}
