//! FILENAME: engine/src/lib.rs
//! Report calculation engine.
//!
//! This crate provides the runtime half of the report pipeline: the value
//! type bound rows are made of, the permissive expression evaluator, the
//! grouping/aggregation engine, the formatting-rule list, and the
//! per-render context that carries mutable accumulator state.
//!
//! The template definition itself lives in `model` and is never mutated
//! here; everything stateful is scoped to one render.

pub mod aggregate;
pub mod context;
pub mod evaluator;
pub mod number_format;
pub mod value;

pub use aggregate::{partition_adjacent, sort_rows_by_key, Accumulator, Partition, VariableStates};
pub use context::{resolve_parameters, RenderContext};
pub use evaluator::{evaluate, strip_cdata, EvalContext};
pub use number_format::{FormatRule, FormatRules, NumberFormat};
pub use value::{Row, Value};
