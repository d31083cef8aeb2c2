//! Expression parse and evaluation errors.

use thiserror::Error;

/// Errors raised while tokenizing or parsing an expression.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ExprError {
    #[error("Unexpected character '{ch}' at offset {offset}")]
    UnexpectedChar { ch: char, offset: usize },

    #[error("Invalid number literal '{literal}'")]
    InvalidNumber { literal: String },

    #[error("Unexpected token '{found}', expected {expected}")]
    UnexpectedToken { found: String, expected: String },

    #[error("Unexpected end of expression, expected {expected}")]
    UnexpectedEnd { expected: String },

    #[error("Expression nests deeper than {limit} levels")]
    TooDeep { limit: usize },

    #[error("Empty expression")]
    Empty,
}

/// Errors raised while evaluating a parsed expression against a scope.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EvalError {
    #[error("Unknown variable '{name}'")]
    UnknownVariable { name: String },

    #[error("Variable '{name}' is read-only in this scope")]
    ReadOnly { name: String },

    #[error("Operator '{op}' cannot be applied to {operands}")]
    TypeMismatch { op: String, operands: String },

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Integer overflow evaluating '{op}'")]
    Overflow { op: String },

    #[error("Expression '{source_text}' evaluated to {found}, expected a boolean")]
    NotBoolean { source_text: String, found: String },
}
