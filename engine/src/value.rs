//! FILENAME: engine/src/value.rs
//! PURPOSE: Runtime values for bound row data and evaluation results.
//! CONTEXT: Rows supplied by callers or returned from a data source are
//! maps from column name to Value. The untagged serde representation
//! means a JSON row like {"name": "Item 1", "amount": 100.5} binds
//! directly without any wrapper syntax.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single bound data row: column name to value.
pub type Row = HashMap<String, Value>;

/// A runtime value flowing through evaluation, aggregation, and rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Absent / null. Renders as the empty string.
    Empty,
    Boolean(bool),
    Number(f64),
    Text(String),
}

impl Value {
    /// Attempts to coerce the value to a number.
    /// Returns None if coercion is not possible.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::Text(s) => s.trim().parse::<f64>().ok(),
            Value::Empty => None,
        }
    }

    /// Converts the value to its display text.
    pub fn as_text(&self) -> String {
        match self {
            Value::Empty => String::new(),
            Value::Number(n) => {
                // Format without unnecessary decimal places
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
            Value::Text(s) => s.clone(),
            Value::Boolean(b) => {
                if *b {
                    "true".to_string()
                } else {
                    "false".to_string()
                }
            }
        }
    }

    /// Returns true for `Empty`.
    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Empty)
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Empty
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}
