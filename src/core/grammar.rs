//! Transition statement grammar.
//!
//! A statement has the form `origin <sep> destination : label` where
//! `<sep>` is one of `->`, `=>` or `,`. Names are made of ASCII letters,
//! digits and underscores; surrounding whitespace is ignored.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

static STATEMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(?P<origin>[A-Za-z0-9_]+)\s*(?P<sep>->|=>|,)\s*(?P<dest>[A-Za-z0-9_]+)\s*:\s*(?P<label>[A-Za-z0-9_]+)\s*$",
    )
    .expect("transition statement pattern is valid")
});

/// The token separating origin and destination.
///
/// All statements of one machine must use the same separator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Separator {
    /// `->`
    Arrow,
    /// `=>`
    DoubleArrow,
    /// `,`
    Comma,
}

impl Separator {
    /// Separator as written in statements.
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Arrow => "->",
            Self::DoubleArrow => "=>",
            Self::Comma => ",",
        }
    }

    fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "->" => Some(Self::Arrow),
            "=>" => Some(Self::DoubleArrow),
            "," => Some(Self::Comma),
            _ => None,
        }
    }
}

impl fmt::Display for Separator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Raised when a line does not match the statement grammar.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Statement '{statement}' does not match 'origin {{->|=>|,}} destination : label'")]
pub struct SyntaxError {
    pub statement: String,
}

/// One parsed transition statement.
///
/// # Example
///
/// ```rust
/// use guardfsm::core::{parse_statement, Separator};
///
/// let statement = parse_statement("  idle => busy : start ").unwrap();
/// assert_eq!(statement.origin, "idle");
/// assert_eq!(statement.destination, "busy");
/// assert_eq!(statement.label, "start");
/// assert_eq!(statement.separator, Separator::DoubleArrow);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionStatement {
    pub origin: String,
    pub separator: Separator,
    pub destination: String,
    pub label: String,
}

impl fmt::Display for TransitionStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} : {}",
            self.origin, self.separator, self.destination, self.label
        )
    }
}

impl FromStr for TransitionStatement {
    type Err = SyntaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_statement(s)
    }
}

/// Parse one transition statement. Nothing is recorded on failure.
pub fn parse_statement(line: &str) -> Result<TransitionStatement, SyntaxError> {
    let syntax_error = || SyntaxError {
        statement: line.to_string(),
    };
    let captures = STATEMENT.captures(line).ok_or_else(syntax_error)?;

    let separator = Separator::from_symbol(&captures["sep"]).ok_or_else(syntax_error)?;
    Ok(TransitionStatement {
        origin: captures["origin"].to_string(),
        separator,
        destination: captures["dest"].to_string(),
        label: captures["label"].to_string(),
    })
}
