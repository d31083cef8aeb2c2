//! Restricted expression language for textual guards and actions.
//!
//! Guards and actions may be written as short expressions instead of
//! closures. The language is deliberately small: numeric and boolean
//! literals, variables resolved through a [`Scope`], arithmetic,
//! comparisons and boolean logic. There are no function calls, no
//! attribute access and no way to reach anything the scope does not expose.
//!
//! # Example
//!
//! ```rust
//! use guardfsm::expr::{Expr, Script, Value, Variables};
//!
//! let guard = Expr::parse("a % 10 == 0 and not done").unwrap();
//! let mut vars = Variables::new().with("a", 20).with("done", false);
//! assert_eq!(guard.evaluate(&vars), Ok(Value::Bool(true)));
//!
//! let action = Script::parse("a = a + 1; done = a > 20").unwrap();
//! action.execute(&mut vars).unwrap();
//! assert_eq!(vars.get("done"), Some(Value::Bool(true)));
//! ```

mod error;
mod eval;
mod lexer;
mod parser;
mod value;

pub use error::{EvalError, ExprError};
pub use value::{Scope, Value, Variables};

use parser::{Ast, Parser, Statement};
use std::fmt;

/// A parsed expression that can be evaluated against any [`Scope`].
#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    source: String,
    ast: Ast,
}

impl Expr {
    /// Parse source text, rejecting anything outside the grammar.
    pub fn parse(source: &str) -> Result<Self, ExprError> {
        let ast = Parser::new(lexer::tokenize(source)?).parse_expression()?;
        Ok(Self {
            source: source.trim().to_string(),
            ast,
        })
    }

    /// Source text as given.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Evaluate against a scope.
    pub fn evaluate<S: Scope + ?Sized>(&self, scope: &S) -> Result<Value, EvalError> {
        eval::evaluate(&self.ast, scope)
    }

    /// Evaluate and require a boolean result.
    pub fn evaluate_bool<S: Scope + ?Sized>(&self, scope: &S) -> Result<bool, EvalError> {
        let value = self.evaluate(scope)?;
        value.as_bool().ok_or_else(|| EvalError::NotBoolean {
            source_text: self.source.clone(),
            found: value.type_name().to_string(),
        })
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// A parsed sequence of `;`-separated statements.
///
/// Each statement is either an assignment (`name = expr`) or a bare
/// expression evaluated for its errors only.
#[derive(Clone, Debug, PartialEq)]
pub struct Script {
    source: String,
    statements: Vec<Statement>,
}

impl Script {
    /// Parse source text, rejecting anything outside the grammar.
    pub fn parse(source: &str) -> Result<Self, ExprError> {
        let statements = Parser::new(lexer::tokenize(source)?).parse_script()?;
        Ok(Self {
            source: source.trim().to_string(),
            statements,
        })
    }

    /// Source text as given.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Run every statement in order, stopping at the first failure.
    pub fn execute<S: Scope + ?Sized>(&self, scope: &mut S) -> Result<(), EvalError> {
        eval::execute(&self.statements, scope)
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
