//! FILENAME: engine/src/number_format.rs
//! PURPOSE: Formatting rules for displaying evaluated values.
//! CONTEXT: This module is the single source of truth every renderer
//! consults when turning a raw value into display text. The stock rule
//! set carries the currency heuristic: any field or expression whose
//! name contains "amount" or "salary" (case-insensitive) renders as
//! currency with two decimal places.

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// A display format for numeric values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub enum NumberFormat {
    /// Plain display via `Value::as_text`.
    #[default]
    General,
    /// Currency: symbol prefix, fixed decimal places.
    Currency { symbol: String, decimal_places: u8 },
}

impl NumberFormat {
    /// Formats a numeric value under this format.
    pub fn format_number(&self, value: f64) -> String {
        match self {
            NumberFormat::General => Value::Number(value).as_text(),
            NumberFormat::Currency {
                symbol,
                decimal_places,
            } => format_currency(value, *decimal_places, symbol),
        }
    }

    /// The equivalent spreadsheet number-format string, so the XLSX
    /// backend can keep cells numeric and let the application format.
    pub fn spreadsheet_format(&self) -> Option<String> {
        match self {
            NumberFormat::General => None,
            NumberFormat::Currency {
                symbol,
                decimal_places,
            } => {
                let decimal_part = if *decimal_places > 0 {
                    format!(".{}", "0".repeat(*decimal_places as usize))
                } else {
                    String::new()
                };
                Some(format!("{}#,##0{}", symbol, decimal_part))
            }
        }
    }
}

/// Format a number as currency: symbol prefix, fixed decimals.
fn format_currency(value: f64, decimal_places: u8, symbol: &str) -> String {
    format!("{}{:.prec$}", symbol, value, prec = decimal_places as usize)
}

// ============================================================================
// RULES
// ============================================================================

/// One formatting rule: a field-name predicate and the format it selects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatRule {
    /// Case-insensitive substrings; the rule matches when the name
    /// contains any of them.
    pub name_contains: Vec<String>,
    pub format: NumberFormat,
}

impl FormatRule {
    /// True when the rule applies to the given field or expression name.
    pub fn matches(&self, name: &str) -> bool {
        let lowered = name.to_lowercase();
        self.name_contains.iter().any(|s| lowered.contains(s.as_str()))
    }
}

/// An ordered rule list; the first matching rule wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatRules {
    rules: Vec<FormatRule>,
}

impl Default for FormatRules {
    /// The stock rule set: "amount"/"salary" names render as currency
    /// with a dollar prefix and two decimals.
    fn default() -> Self {
        FormatRules {
            rules: vec![FormatRule {
                name_contains: vec!["amount".to_string(), "salary".to_string()],
                format: NumberFormat::Currency {
                    symbol: "$".to_string(),
                    decimal_places: 2,
                },
            }],
        }
    }
}

impl FormatRules {
    /// An empty rule list (every value formats as General).
    pub fn none() -> Self {
        FormatRules { rules: Vec::new() }
    }

    /// Appends a rule; later rules only apply where earlier ones do not.
    pub fn push(&mut self, rule: FormatRule) {
        self.rules.push(rule);
    }

    /// The format selected for a field or expression name.
    pub fn format_for(&self, name: &str) -> NumberFormat {
        self.rules
            .iter()
            .find(|rule| rule.matches(name))
            .map(|rule| rule.format.clone())
            .unwrap_or_default()
    }

    /// Formats a value under the rule matching `name`. Non-numeric values
    /// pass through as plain text regardless of the rule.
    pub fn apply(&self, name: &str, value: &Value) -> String {
        match (self.format_for(name), value.as_number()) {
            (NumberFormat::General, _) | (_, None) => value.as_text(),
            (format, Some(n)) => format.format_number(n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_and_salary_names_format_as_currency() {
        let rules = FormatRules::default();
        assert_eq!(rules.apply("amount", &Value::Number(100.5)), "$100.50");
        assert_eq!(rules.apply("net_amount", &Value::Number(250.75)), "$250.75");
        assert_eq!(rules.apply("SALARY", &Value::Number(1500.0)), "$1500.00");
        assert_eq!(rules.apply("$F{total_amount}", &Value::Number(3.0)), "$3.00");
    }

    #[test]
    fn other_names_format_as_general() {
        let rules = FormatRules::default();
        assert_eq!(rules.apply("name", &Value::Text("Item 1".to_string())), "Item 1");
        assert_eq!(rules.apply("quantity", &Value::Number(3.0)), "3");
    }

    #[test]
    fn non_numeric_values_bypass_currency() {
        let rules = FormatRules::default();
        assert_eq!(rules.apply("amount", &Value::Text("n/a".to_string())), "n/a");
        assert_eq!(rules.apply("amount", &Value::Empty), "");
    }

    #[test]
    fn numeric_text_is_formatted() {
        let rules = FormatRules::default();
        assert_eq!(rules.apply("amount", &Value::Text("12".to_string())), "$12.00");
    }

    #[test]
    fn spreadsheet_format_for_currency() {
        let format = NumberFormat::Currency {
            symbol: "$".to_string(),
            decimal_places: 2,
        };
        assert_eq!(format.spreadsheet_format().as_deref(), Some("$#,##0.00"));
        assert_eq!(NumberFormat::General.spreadsheet_format(), None);
    }

    #[test]
    fn custom_rule_extends_the_list() {
        let mut rules = FormatRules::none();
        rules.push(FormatRule {
            name_contains: vec!["price".to_string()],
            format: NumberFormat::Currency {
                symbol: "€".to_string(),
                decimal_places: 2,
            },
        });
        assert_eq!(rules.apply("unit_price", &Value::Number(9.5)), "€9.50");
        assert_eq!(rules.apply("amount", &Value::Number(9.5)), "9.5");
    }
}
