//! FILENAME: engine/src/evaluator.rs
//! PURPOSE: Evaluates report expressions against the current render state.
//! CONTEXT: After an expression is parsed into an AST, this module
//! traverses the tree and resolves references against the current row,
//! the accumulated variable values, and the bound parameters.
//!
//! FAILURE MODES (both deliberate, both load-bearing):
//! - An unknown reference name, or a `$F{}` reference outside a row
//!   context, resolves to `Value::Empty` — a template may reference a
//!   field that is absent in a particular row.
//! - An expression that does not parse evaluates to its own source text.
//!   A broken single cell must never abort rendering of the rest of the
//!   report, so evaluation has no error path at all.

use crate::value::{Row, Value};
use parser::ast::Expression;
use std::collections::HashMap;

/// The references an expression can resolve against during one render.
///
/// `row` is None outside detail context (title, headers, footers), where
/// field references resolve to empty.
pub struct EvalContext<'a> {
    pub row: Option<&'a Row>,
    pub variables: &'a HashMap<String, Value>,
    pub parameters: &'a HashMap<String, Value>,
}

impl<'a> EvalContext<'a> {
    pub fn new(
        row: Option<&'a Row>,
        variables: &'a HashMap<String, Value>,
        parameters: &'a HashMap<String, Value>,
    ) -> Self {
        EvalContext {
            row,
            variables,
            parameters,
        }
    }
}

/// Strips a `<![CDATA[...]]>` wrapper from an expression or query string.
/// Text that is not wrapped is returned unchanged.
pub fn strip_cdata(text: &str) -> &str {
    let trimmed = text.trim();
    match trimmed
        .strip_prefix("<![CDATA[")
        .and_then(|rest| rest.strip_suffix("]]>"))
    {
        Some(inner) => inner.trim(),
        None => trimmed,
    }
}

/// Evaluates an expression string against the given context.
///
/// Never fails: a parse error degrades to the literal expression text,
/// and unknown references degrade to `Value::Empty`.
pub fn evaluate(expression: &str, ctx: &EvalContext) -> Value {
    let source = strip_cdata(expression);
    if source.is_empty() {
        return Value::Empty;
    }

    match parser::parse(source) {
        Ok(ast) => evaluate_ast(&ast, ctx),
        Err(_) => Value::Text(source.to_string()),
    }
}

/// Evaluates a parsed expression tree.
fn evaluate_ast(expr: &Expression, ctx: &EvalContext) -> Value {
    match expr {
        Expression::Literal(s) => Value::Text(s.clone()),
        Expression::FieldRef(name) => ctx
            .row
            .and_then(|row| row.get(name))
            .cloned()
            .unwrap_or(Value::Empty),
        Expression::VariableRef(name) => {
            ctx.variables.get(name).cloned().unwrap_or(Value::Empty)
        }
        Expression::ParameterRef(name) => {
            ctx.parameters.get(name).cloned().unwrap_or(Value::Empty)
        }
        Expression::Concat(parts) => {
            let mut out = String::new();
            for part in parts {
                out.push_str(&evaluate_ast(part, ctx).as_text());
            }
            Value::Text(out)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, Value)]) -> Row {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn field_reference_resolves_from_row() {
        let r = row(&[("name", Value::Text("Item 1".to_string()))]);
        let vars = HashMap::new();
        let params = HashMap::new();
        let ctx = EvalContext::new(Some(&r), &vars, &params);

        assert_eq!(evaluate("$F{name}", &ctx), Value::Text("Item 1".to_string()));
    }

    #[test]
    fn numeric_field_stays_numeric() {
        let r = row(&[("amount", Value::Number(100.5))]);
        let vars = HashMap::new();
        let params = HashMap::new();
        let ctx = EvalContext::new(Some(&r), &vars, &params);

        assert_eq!(evaluate("$F{amount}", &ctx), Value::Number(100.5));
    }

    #[test]
    fn unknown_field_resolves_to_empty() {
        let r = row(&[]);
        let vars = HashMap::new();
        let params = HashMap::new();
        let ctx = EvalContext::new(Some(&r), &vars, &params);

        assert_eq!(evaluate("$F{nonexistent}", &ctx), Value::Empty);
    }

    #[test]
    fn field_reference_outside_row_context_is_empty() {
        let vars = HashMap::new();
        let params = HashMap::new();
        let ctx = EvalContext::new(None, &vars, &params);

        assert_eq!(evaluate("$F{name}", &ctx), Value::Empty);
    }

    #[test]
    fn variable_and_parameter_references_resolve() {
        let vars: HashMap<String, Value> =
            [("total".to_string(), Value::Number(22.0))].into_iter().collect();
        let params: HashMap<String, Value> =
            [("title".to_string(), Value::Text("Monthly".to_string()))].into_iter().collect();
        let ctx = EvalContext::new(None, &vars, &params);

        assert_eq!(evaluate("$V{total}", &ctx), Value::Number(22.0));
        assert_eq!(evaluate("$P{title}", &ctx), Value::Text("Monthly".to_string()));
        assert_eq!(evaluate("$V{unknown}", &ctx), Value::Empty);
    }

    #[test]
    fn concatenation_renders_parts_as_text() {
        let vars: HashMap<String, Value> =
            [("total".to_string(), Value::Number(22.0))].into_iter().collect();
        let params = HashMap::new();
        let ctx = EvalContext::new(None, &vars, &params);

        assert_eq!(
            evaluate("\"Total: \" + $V{total}", &ctx),
            Value::Text("Total: 22".to_string())
        );
    }

    #[test]
    fn unparseable_expression_degrades_to_literal_text() {
        let vars = HashMap::new();
        let params = HashMap::new();
        let ctx = EvalContext::new(None, &vars, &params);

        assert_eq!(
            evaluate("new java.util.Date()", &ctx),
            Value::Text("new java.util.Date()".to_string())
        );
    }

    #[test]
    fn cdata_wrapper_is_stripped_before_evaluation() {
        let r = row(&[("name", Value::Text("x".to_string()))]);
        let vars = HashMap::new();
        let params = HashMap::new();
        let ctx = EvalContext::new(Some(&r), &vars, &params);

        assert_eq!(
            evaluate("<![CDATA[$F{name}]]>", &ctx),
            Value::Text("x".to_string())
        );
        assert_eq!(strip_cdata("<![CDATA[SELECT * FROM t]]>"), "SELECT * FROM t");
        assert_eq!(strip_cdata("plain"), "plain");
    }

    #[test]
    fn empty_expression_is_empty() {
        let vars = HashMap::new();
        let params = HashMap::new();
        let ctx = EvalContext::new(None, &vars, &params);

        assert_eq!(evaluate("", &ctx), Value::Empty);
        assert_eq!(evaluate("   ", &ctx), Value::Empty);
    }
}
