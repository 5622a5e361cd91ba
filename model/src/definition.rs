//! FILENAME: model/src/definition.rs
//! Report Definition - The serializable template model.
//!
//! This module contains all the types needed to DESCRIBE a report:
//! page geometry, input fields, accumulator variables, groups, and
//! report parameters. These structures are immutable once parsing
//! completes; all mutable render state lives elsewhere.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::band::{Band, BandKind};

// ============================================================================
// VALUE TYPE TAGS
// ============================================================================

/// Declared value type of a field, variable, or parameter.
///
/// Informational only: used for formatting hints and schema display,
/// never enforced against bound row data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ValueType {
    #[default]
    String,
    Integer,
    Decimal,
    Date,
}

impl ValueType {
    /// Maps a Java class name from the template source to a type tag.
    /// Unknown class names map to `String`.
    pub fn from_class_name(class_name: &str) -> Self {
        match class_name {
            "java.lang.Integer" | "java.lang.Long" | "java.lang.Short" => ValueType::Integer,
            "java.math.BigDecimal" | "java.lang.Double" | "java.lang.Float" => ValueType::Decimal,
            "java.util.Date" | "java.sql.Date" | "java.sql.Timestamp" => ValueType::Date,
            _ => ValueType::String,
        }
    }
}

// ============================================================================
// FIELDS
// ============================================================================

/// A named input column expected in bound row data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    /// Field name, unique within the template.
    pub name: String,

    /// Declared value type tag.
    pub value_type: ValueType,

    /// Optional free-text description from the template source.
    pub description: Option<String>,
}

impl Field {
    pub fn new(name: impl Into<String>, value_type: ValueType) -> Self {
        Field {
            name: name.into(),
            value_type,
            description: None,
        }
    }

    /// Display form of the field name for tabular headers:
    /// underscores become spaces and each word is title-cased,
    /// so "net_amount" renders as "Net Amount".
    pub fn display_name(&self) -> String {
        display_case(&self.name)
    }
}

/// Title-cases a snake_case identifier for display.
pub fn display_case(name: &str) -> String {
    name.split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(|c| c.to_lowercase())).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// ============================================================================
// VARIABLES
// ============================================================================

/// Aggregate calculation applied to a variable's expression per row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Calculation {
    /// No accumulation; the variable holds its last evaluated value.
    #[default]
    None,
    Sum,
    Count,
    Average,
    Min,
    Max,
}

impl Calculation {
    /// Maps the template source attribute to a calculation kind.
    /// The source spells the no-op calculation "Nothing".
    pub fn from_attr(attr: &str) -> Self {
        match attr {
            "Sum" => Calculation::Sum,
            "Count" => Calculation::Count,
            "Average" => Calculation::Average,
            "Min" => Calculation::Min,
            "Max" => Calculation::Max,
            _ => Calculation::None,
        }
    }
}

/// When a variable's accumulator is reset to its initial value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResetScope {
    /// Reset once, at the start of the report.
    Report,
    /// Reset at every boundary of the named group.
    Group(String),
}

impl Default for ResetScope {
    fn default() -> Self {
        ResetScope::Report
    }
}

/// A named accumulator computed from row data during rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variable {
    /// Variable name, unique within the template.
    pub name: String,

    /// Declared value type tag.
    pub value_type: ValueType,

    /// How row values are accumulated.
    pub calculation: Calculation,

    /// The per-row expression whose result feeds the accumulator.
    /// Required unless `calculation` is `None`.
    pub expression: Option<String>,

    /// Optional expression for the accumulator's starting value.
    pub initial_value: Option<String>,

    /// When the accumulator resets.
    pub reset: ResetScope,
}

impl Variable {
    pub fn new(name: impl Into<String>, calculation: Calculation) -> Self {
        Variable {
            name: name.into(),
            value_type: ValueType::default(),
            calculation,
            expression: None,
            initial_value: None,
            reset: ResetScope::Report,
        }
    }
}

// ============================================================================
// GROUPS
// ============================================================================

/// A partitioning of contiguous rows sharing an evaluated key.
///
/// A group boundary occurs whenever the evaluated key changes from the
/// previous row. Rows are assumed pre-sorted by this key; the engine does
/// not sort. Only the first declared group is evaluated during rendering
/// (single-level grouping); later groups are carried in the template for
/// informational purposes only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    /// Group name, unique within the template.
    pub name: String,

    /// Grouping-key expression, evaluated per row.
    pub expression: String,

    /// Height of the group header band.
    pub header_height: u32,

    /// Height of the group footer band.
    pub footer_height: u32,
}

impl Group {
    pub fn new(name: impl Into<String>, expression: impl Into<String>) -> Self {
        Group {
            name: name.into(),
            expression: expression.into(),
            header_height: 0,
            footer_height: 0,
        }
    }
}

// ============================================================================
// PARAMETERS
// ============================================================================

/// Declaration of a report parameter: a type tag plus an optional
/// default-value expression evaluated when the caller binds no value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterSpec {
    pub name: String,
    pub value_type: ValueType,
    pub default_value: Option<String>,
}

// ============================================================================
// PAGE GEOMETRY
// ============================================================================

/// Page dimensions and margins in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageGeometry {
    pub width: u32,
    pub height: u32,
    pub margin_left: u32,
    pub margin_right: u32,
    pub margin_top: u32,
    pub margin_bottom: u32,
}

impl Default for PageGeometry {
    fn default() -> Self {
        // A4 portrait at 72dpi, the template source defaults.
        PageGeometry {
            width: 595,
            height: 842,
            margin_left: 20,
            margin_right: 20,
            margin_top: 20,
            margin_bottom: 20,
        }
    }
}

impl PageGeometry {
    /// Width available for content between the left and right margins.
    pub fn usable_width(&self) -> u32 {
        self.width.saturating_sub(self.margin_left + self.margin_right)
    }

    /// Height available for content between the top and bottom margins.
    pub fn usable_height(&self) -> u32 {
        self.height.saturating_sub(self.margin_top + self.margin_bottom)
    }
}

// ============================================================================
// TEMPLATE
// ============================================================================

/// The complete, immutable report definition.
///
/// Constructed once from template source text and never mutated; bound
/// data and live accumulator values belong to a per-render context, not
/// to the template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Template {
    /// Report name from the template root.
    pub name: String,

    /// Page dimensions and margins.
    pub page: PageGeometry,

    /// Optional query string (CDATA wrapper already stripped).
    pub query: Option<String>,

    /// Input fields, in declaration order.
    pub fields: Vec<Field>,

    /// Accumulator variables, in declaration order.
    pub variables: Vec<Variable>,

    /// Groups, in declaration order. Only the first is evaluated.
    pub groups: Vec<Group>,

    /// Bands keyed by kind. Absent kinds are skipped during rendering.
    /// Group header/footer bands belong to the first declared group.
    pub bands: BTreeMap<BandKind, Band>,

    /// Parameter declarations, in declaration order.
    pub parameters: Vec<ParameterSpec>,
}

impl Template {
    /// Creates an empty template with default page geometry.
    pub fn new(name: impl Into<String>) -> Self {
        Template {
            name: name.into(),
            page: PageGeometry::default(),
            query: None,
            fields: Vec::new(),
            variables: Vec::new(),
            groups: Vec::new(),
            bands: BTreeMap::new(),
            parameters: Vec::new(),
        }
    }

    /// Looks up a field by name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Looks up a variable by name.
    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.name == name)
    }

    /// Looks up a group by name.
    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// The band for a kind, if the template declares one with content.
    pub fn band(&self, kind: BandKind) -> Option<&Band> {
        self.bands.get(&kind)
    }

    /// The group evaluated during rendering, if any.
    pub fn active_group(&self) -> Option<&Group> {
        self.groups.first()
    }

    /// True when the template declares a detail band with elements.
    pub fn has_detail(&self) -> bool {
        self.bands
            .get(&BandKind::Detail)
            .map(|b| !b.elements.is_empty())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_type_from_class_name() {
        assert_eq!(ValueType::from_class_name("java.lang.String"), ValueType::String);
        assert_eq!(ValueType::from_class_name("java.lang.Integer"), ValueType::Integer);
        assert_eq!(ValueType::from_class_name("java.math.BigDecimal"), ValueType::Decimal);
        assert_eq!(ValueType::from_class_name("java.util.Date"), ValueType::Date);
        assert_eq!(ValueType::from_class_name("com.example.Custom"), ValueType::String);
    }

    #[test]
    fn calculation_from_attr() {
        assert_eq!(Calculation::from_attr("Sum"), Calculation::Sum);
        assert_eq!(Calculation::from_attr("Average"), Calculation::Average);
        assert_eq!(Calculation::from_attr("Nothing"), Calculation::None);
        assert_eq!(Calculation::from_attr(""), Calculation::None);
    }

    #[test]
    fn field_display_name_title_cases() {
        assert_eq!(Field::new("net_amount", ValueType::Decimal).display_name(), "Net Amount");
        assert_eq!(Field::new("name", ValueType::String).display_name(), "Name");
        assert_eq!(Field::new("EMPLOYEE_ID", ValueType::Integer).display_name(), "Employee Id");
    }

    #[test]
    fn page_geometry_usable_dimensions() {
        let page = PageGeometry::default();
        assert_eq!(page.usable_width(), 555);
        assert_eq!(page.usable_height(), 802);
    }

    #[test]
    fn template_serializes_round_trip() {
        let mut template = Template::new("serde_test");
        template.fields.push(Field::new("amount", ValueType::Decimal));
        let mut variable = Variable::new("total", Calculation::Sum);
        variable.expression = Some("$F{amount}".to_string());
        variable.reset = ResetScope::Group("dept".to_string());
        template.variables.push(variable);

        let json = serde_json::to_string(&template).unwrap();
        let back: Template = serde_json::from_str(&json).unwrap();

        assert_eq!(back.name, "serde_test");
        assert_eq!(back.fields[0].value_type, ValueType::Decimal);
        assert_eq!(back.variables[0].reset, ResetScope::Group("dept".to_string()));
    }

    #[test]
    fn template_lookups() {
        let mut template = Template::new("test");
        template.fields.push(Field::new("name", ValueType::String));
        template.groups.push(Group::new("dept", "$F{department}"));

        assert!(template.field("name").is_some());
        assert!(template.field("missing").is_none());
        assert_eq!(template.active_group().map(|g| g.name.as_str()), Some("dept"));
        assert!(!template.has_detail());
    }
}
