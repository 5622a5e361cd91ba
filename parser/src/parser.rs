//! FILENAME: parser/src/parser.rs
//! PURPOSE: Recursive descent parser that converts a stream of Tokens into an AST.
//! CONTEXT: This is the second stage of the parsing pipeline. It takes tokens
//! from the Lexer and builds an Expression tree that can be evaluated.
//!
//! GRAMMAR:
//!   expression --> term ( "+" term )*
//!   term       --> STRING | FIELD_REF | VARIABLE_REF | PARAMETER_REF
//!
//! Anything outside this grammar is a ParseError. Callers that evaluate
//! expressions treat a ParseError as "render the source text literally",
//! so a malformed expression never aborts rendering.

use crate::ast::Expression;
use crate::lexer::Lexer;
use crate::token::Token;

/// Parser errors with descriptive messages.
#[derive(Debug, PartialEq, Clone)]
pub struct ParseError {
    pub message: String,
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        ParseError {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Parse error: {}", self.message)
    }
}

impl std::error::Error for ParseError {}

pub type ParseResult<T> = Result<T, ParseError>;

/// The Parser struct holds the lexer and current token state.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current_token: Token,
}

impl<'a> Parser<'a> {
    /// Creates a new parser from an input string.
    /// Automatically advances to the first token.
    pub fn new(input: &'a str) -> Self {
        let mut lexer = Lexer::new(input);
        let current_token = lexer.next_token();
        Parser {
            lexer,
            current_token,
        }
    }

    /// Parses the entire input and returns the AST.
    pub fn parse(&mut self) -> ParseResult<Expression> {
        if self.current_token == Token::EOF {
            return Err(ParseError::new("Empty expression"));
        }

        let expr = self.parse_expression()?;

        // Ensure we consumed all tokens
        if self.current_token != Token::EOF {
            return Err(ParseError::new(format!(
                "Unexpected token after expression: {:?}",
                self.current_token
            )));
        }

        Ok(expr)
    }

    /// Advances to the next token.
    fn advance(&mut self) {
        self.current_token = self.lexer.next_token();
    }

    /// Parses a term, optionally followed by `+ term` repetitions.
    /// A single term stays as-is; two or more become a Concat node.
    fn parse_expression(&mut self) -> ParseResult<Expression> {
        let mut parts = vec![self.parse_term()?];

        while self.current_token == Token::Plus {
            self.advance();
            parts.push(self.parse_term()?);
        }

        if parts.len() == 1 {
            Ok(parts.remove(0))
        } else {
            Ok(Expression::Concat(parts))
        }
    }

    /// Parses a single term: literal or reference.
    fn parse_term(&mut self) -> ParseResult<Expression> {
        let expr = match &self.current_token {
            Token::String(s) => Expression::Literal(s.clone()),
            Token::FieldRef(name) => Expression::FieldRef(name.clone()),
            Token::VariableRef(name) => Expression::VariableRef(name.clone()),
            Token::ParameterRef(name) => Expression::ParameterRef(name.clone()),
            Token::Illegal(ch) => {
                return Err(ParseError::new(format!("Illegal character: {:?}", ch)));
            }
            other => {
                return Err(ParseError::new(format!("Unexpected token: {:?}", other)));
            }
        };

        self.advance();
        Ok(expr)
    }
}

/// Convenience function: parses an expression string into an AST.
pub fn parse(input: &str) -> ParseResult<Expression> {
    Parser::new(input).parse()
}
