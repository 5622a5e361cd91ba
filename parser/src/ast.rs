//! FILENAME: parser/src/ast.rs
//! PURPOSE: Defines the Abstract Syntax Tree (AST) for report expressions.
//! CONTEXT: After the Lexer tokenizes an expression string, the Parser
//! converts those tokens into this tree structure. The Evaluator then
//! traverses this tree against the current row, the accumulated variable
//! values, and the bound parameters.
//!
//! SUPPORTED EXPRESSIONS:
//! - Literals: "Total:", "Report"
//! - Field references: $F{name}
//! - Variable references: $V{total}
//! - Parameter references: $P{title}
//! - Concatenation: "Total: " + $V{total}

/// A parsed report expression.
/// This is the core data structure that the evaluator will traverse.
#[derive(Debug, PartialEq, Clone)]
pub enum Expression {
    /// A string literal.
    Literal(String),

    /// A `$F{name}` reference to the current row's field.
    FieldRef(String),

    /// A `$V{name}` reference to an accumulated variable value.
    VariableRef(String),

    /// A `$P{name}` reference to a bound parameter value.
    ParameterRef(String),

    /// Two or more terms joined with `+`, rendered as text and
    /// concatenated in order.
    Concat(Vec<Expression>),
}

impl std::fmt::Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expression::Literal(s) => write!(f, "\"{}\"", s),
            Expression::FieldRef(name) => write!(f, "$F{{{}}}", name),
            Expression::VariableRef(name) => write!(f, "$V{{{}}}", name),
            Expression::ParameterRef(name) => write!(f, "$P{{{}}}", name),
            Expression::Concat(parts) => {
                let rendered: Vec<String> = parts.iter().map(|p| p.to_string()).collect();
                write!(f, "{}", rendered.join(" + "))
            }
        }
    }
}
