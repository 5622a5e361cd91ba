//! FILENAME: parser/src/refs.rs
//! PURPOSE: Tolerant extraction of reference names from expression strings.
//! CONTEXT: Validation scans every element expression for `$F{name}` and
//! `$V{name}` tokens to check membership against the declared fields and
//! variables. The scan runs the lexer directly and skips anything it
//! cannot tokenize, so a malformed expression contributes no references
//! instead of failing the scan.

use crate::lexer::Lexer;
use crate::token::Token;

/// Collects the field names referenced via `$F{name}` in an expression.
pub fn extract_field_refs(expression: &str) -> Vec<String> {
    collect(expression, |token| match token {
        Token::FieldRef(name) => Some(name),
        _ => None,
    })
}

/// Collects the variable names referenced via `$V{name}` in an expression.
pub fn extract_variable_refs(expression: &str) -> Vec<String> {
    collect(expression, |token| match token {
        Token::VariableRef(name) => Some(name),
        _ => None,
    })
}

fn collect(expression: &str, pick: impl Fn(Token) -> Option<String>) -> Vec<String> {
    let mut lexer = Lexer::new(expression);
    let mut names = Vec::new();

    loop {
        let token = lexer.next_token();
        if token == Token::EOF {
            break;
        }
        if let Some(name) = pick(token) {
            names.push(name);
        }
    }

    names
}
