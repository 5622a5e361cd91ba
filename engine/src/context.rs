//! FILENAME: engine/src/context.rs
//! PURPOSE: Per-render mutable state.
//! CONTEXT: The template is immutable; everything a render mutates lives
//! here. A renderer creates one RenderContext at the start of a render
//! and discards it at the end, which is what makes concurrent renders of
//! the same template (through separate report instances) safe.

use crate::aggregate::VariableStates;
use crate::evaluator::{evaluate, EvalContext};
use crate::value::Value;
use model::Template;
use std::collections::HashMap;

/// Names of the page-scoped pseudo-variables available in page footer
/// contexts.
pub const PAGE_NUMBER: &str = "PAGE_NUMBER";
pub const PAGE_COUNT: &str = "PAGE_COUNT";

/// Mutable state scoped to a single render.
pub struct RenderContext {
    /// Live accumulators for the template's variables.
    pub variables: VariableStates,
    /// Effective parameters for this render (defaults already resolved).
    pub parameters: HashMap<String, Value>,
    /// Current page, 1-based.
    pub page_number: u32,
    /// Total pages in the rendered output.
    pub page_count: u32,
}

impl RenderContext {
    /// Builds a fresh context for one render: accumulators initialized
    /// and reset to report scope.
    pub fn new(template: &Template, parameters: HashMap<String, Value>) -> Self {
        let mut variables = VariableStates::new(&template.variables, &parameters);
        variables.reset_report();

        RenderContext {
            variables,
            parameters,
            page_number: 1,
            page_count: 1,
        }
    }

    /// Variable snapshot for ordinary band contexts.
    pub fn variable_values(&self) -> HashMap<String, Value> {
        self.variables.values()
    }

    /// Variable snapshot for page footer contexts: the ordinary snapshot
    /// plus PAGE_NUMBER and PAGE_COUNT.
    pub fn footer_variable_values(&self) -> HashMap<String, Value> {
        let mut values = self.variables.values();
        values.insert(PAGE_NUMBER.to_string(), Value::Number(self.page_number as f64));
        values.insert(PAGE_COUNT.to_string(), Value::Number(self.page_count as f64));
        values
    }
}

/// Merges the template's parameter defaults with caller-supplied values.
/// Supplied values win; default-value expressions are evaluated against a
/// row-less context.
pub fn resolve_parameters(
    template: &Template,
    supplied: &HashMap<String, Value>,
) -> HashMap<String, Value> {
    let empty_vars = HashMap::new();
    let empty_params = HashMap::new();
    let ctx = EvalContext::new(None, &empty_vars, &empty_params);

    let mut resolved: HashMap<String, Value> = template
        .parameters
        .iter()
        .filter_map(|spec| {
            spec.default_value
                .as_deref()
                .map(|expr| (spec.name.clone(), evaluate(expr, &ctx)))
        })
        .collect();

    for (name, value) in supplied {
        resolved.insert(name.clone(), value.clone());
    }

    resolved
}
