//! FILENAME: engine/src/aggregate.rs
//! PURPOSE: Grouping and aggregation over bound row data.
//! CONTEXT: Partitions an ordered row sequence into contiguous runs that
//! share an evaluated group-key value, and maintains the running
//! accumulators behind report variables (Sum, Count, Average, Min, Max).
//!
//! Partitioning is adjacent-equal, not a hash group-by: a boundary occurs
//! exactly where the evaluated key differs from the previous row's key.
//! Callers are responsible for presenting rows pre-sorted by the group
//! key; groups reflect row order. `sort_rows_by_key` is provided for
//! callers whose data is not already sorted.

use crate::evaluator::{evaluate, EvalContext};
use crate::value::{Row, Value};
use model::{Calculation, ResetScope, Variable};
use std::collections::HashMap;
use std::ops::Range;

// ============================================================================
// PARTITIONING
// ============================================================================

/// A contiguous run of rows sharing one evaluated group-key value.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    /// The shared key value of the run.
    pub key: Value,
    /// Index range of the run within the input row slice.
    pub rows: Range<usize>,
}

/// Splits rows into contiguous runs by the evaluated key expression.
///
/// Rows are NOT sorted first; `[1, 2, 1]` yields three partitions of one
/// row each. An empty input yields no partitions.
pub fn partition_adjacent(
    rows: &[Row],
    key_expression: &str,
    parameters: &HashMap<String, Value>,
) -> Vec<Partition> {
    let empty_vars = HashMap::new();
    let mut partitions: Vec<Partition> = Vec::new();

    for (index, row) in rows.iter().enumerate() {
        let ctx = EvalContext::new(Some(row), &empty_vars, parameters);
        let key = evaluate(key_expression, &ctx);

        match partitions.last_mut() {
            Some(last) if last.key == key => {
                last.rows.end = index + 1;
            }
            _ => partitions.push(Partition {
                key,
                rows: index..index + 1,
            }),
        }
    }

    partitions
}

/// Stable-sorts rows by the evaluated key expression, comparing numbers
/// numerically and everything else as text. A convenience for callers
/// whose data is not already ordered by the group key; the partitioning
/// itself never sorts.
pub fn sort_rows_by_key(
    rows: &mut [Row],
    key_expression: &str,
    parameters: &HashMap<String, Value>,
) {
    let empty_vars = HashMap::new();
    rows.sort_by(|a, b| {
        let ka = evaluate(key_expression, &EvalContext::new(Some(a), &empty_vars, parameters));
        let kb = evaluate(key_expression, &EvalContext::new(Some(b), &empty_vars, parameters));
        match (ka.as_number(), kb.as_number()) {
            (Some(na), Some(nb)) => na.partial_cmp(&nb).unwrap_or(std::cmp::Ordering::Equal),
            _ => ka.as_text().cmp(&kb.as_text()),
        }
    });
}

// ============================================================================
// ACCUMULATORS
// ============================================================================

/// Running state for one variable's calculation.
///
/// Only numeric inputs feed Sum, Average, Min, and Max; a row whose
/// expression evaluates to something non-numeric leaves those
/// accumulators unchanged. Count counts every row.
#[derive(Debug, Clone)]
pub struct Accumulator {
    calculation: Calculation,
    initial: Value,
    count: u64,
    sum: f64,
    min: Option<f64>,
    max: Option<f64>,
    last: Value,
}

impl Accumulator {
    pub fn new(calculation: Calculation, initial: Value) -> Self {
        let mut acc = Accumulator {
            calculation,
            initial,
            count: 0,
            sum: 0.0,
            min: None,
            max: None,
            last: Value::Empty,
        };
        acc.reset();
        acc
    }

    /// Returns the accumulator to its initial state.
    pub fn reset(&mut self) {
        self.count = 0;
        self.sum = self.initial.as_number().unwrap_or(0.0);
        self.min = None;
        self.max = None;
        self.last = self.initial.clone();
    }

    /// Feeds one evaluated row value into the accumulator.
    pub fn update(&mut self, value: &Value) {
        self.count += 1;
        self.last = value.clone();

        if let Some(n) = value.as_number() {
            self.sum += n;
            self.min = Some(self.min.map_or(n, |m| m.min(n)));
            self.max = Some(self.max.map_or(n, |m| m.max(n)));
        }
    }

    /// The value the variable exposes right now.
    pub fn current(&self) -> Value {
        match self.calculation {
            Calculation::None => self.last.clone(),
            Calculation::Sum => Value::Number(self.sum),
            Calculation::Count => Value::Number(self.count as f64),
            Calculation::Average => {
                if self.count == 0 {
                    Value::Number(0.0)
                } else {
                    Value::Number(self.sum / self.count as f64)
                }
            }
            Calculation::Min => self.min.map(Value::Number).unwrap_or(Value::Empty),
            Calculation::Max => self.max.map(Value::Number).unwrap_or(Value::Empty),
        }
    }
}

// ============================================================================
// VARIABLE STATES
// ============================================================================

/// The live accumulators behind every declared variable during one render.
///
/// Created per render, reset at report start and at each relevant group
/// boundary, and discarded when rendering completes. The template's
/// variable definitions are never mutated.
#[derive(Debug, Clone)]
pub struct VariableStates {
    definitions: Vec<Variable>,
    states: HashMap<String, Accumulator>,
}

impl VariableStates {
    /// Builds accumulators for the given definitions. Initial-value
    /// expressions are evaluated once against a row-less context
    /// (parameters only).
    pub fn new(definitions: &[Variable], parameters: &HashMap<String, Value>) -> Self {
        let empty_vars = HashMap::new();
        let ctx = EvalContext::new(None, &empty_vars, parameters);

        let states = definitions
            .iter()
            .map(|def| {
                let initial = def
                    .initial_value
                    .as_deref()
                    .map(|expr| evaluate(expr, &ctx))
                    .unwrap_or(Value::Empty);
                (def.name.clone(), Accumulator::new(def.calculation, initial))
            })
            .collect();

        VariableStates {
            definitions: definitions.to_vec(),
            states,
        }
    }

    /// Resets every variable; called once at report start.
    pub fn reset_report(&mut self) {
        for acc in self.states.values_mut() {
            acc.reset();
        }
    }

    /// Resets the variables whose reset scope names the given group;
    /// called at each partition boundary.
    pub fn reset_group(&mut self, group_name: &str) {
        for def in &self.definitions {
            if matches!(&def.reset, ResetScope::Group(name) if name == group_name) {
                if let Some(acc) = self.states.get_mut(&def.name) {
                    acc.reset();
                }
            }
        }
    }

    /// Feeds one row into every variable that has an expression.
    pub fn update(&mut self, row: &Row, parameters: &HashMap<String, Value>) {
        // Variables may reference previously accumulated values, so the
        // snapshot is taken before this row's updates apply.
        let snapshot = self.values();
        let ctx = EvalContext::new(Some(row), &snapshot, parameters);

        for def in &self.definitions {
            let Some(expr) = def.expression.as_deref() else {
                continue;
            };
            let value = evaluate(expr, &ctx);
            if let Some(acc) = self.states.get_mut(&def.name) {
                acc.update(&value);
            }
        }
    }

    /// Snapshot of every variable's current value, for the evaluator.
    pub fn values(&self) -> HashMap<String, Value> {
        self.states
            .iter()
            .map(|(name, acc)| (name.clone(), acc.current()))
            .collect()
    }

    /// The current value of one variable.
    pub fn value(&self, name: &str) -> Value {
        self.states
            .get(name)
            .map(|acc| acc.current())
            .unwrap_or(Value::Empty)
    }
}
