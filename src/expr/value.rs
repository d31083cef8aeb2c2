//! Values and variable scopes that expressions are evaluated against.

use super::error::EvalError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A value produced or consumed by an expression.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
}

impl Value {
    /// Name of the value's type, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
        }
    }

    /// The boolean, if this is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Numeric value widened to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            Self::Bool(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

/// Variable context that textual guards and actions are evaluated against.
///
/// The context is always passed explicitly to the machine on each step;
/// expressions can only see what the scope chooses to expose.
///
/// # Example
///
/// ```rust
/// use guardfsm::expr::{EvalError, Scope, Value};
///
/// struct Counter {
///     ticks: i64,
/// }
///
/// impl Scope for Counter {
///     fn lookup(&self, name: &str) -> Option<Value> {
///         (name == "ticks").then_some(Value::Int(self.ticks))
///     }
///
///     fn assign(&mut self, name: &str, value: Value) -> Result<(), EvalError> {
///         match (name, value) {
///             ("ticks", Value::Int(v)) => {
///                 self.ticks = v;
///                 Ok(())
///             }
///             _ => Err(EvalError::ReadOnly { name: name.to_string() }),
///         }
///     }
/// }
/// ```
pub trait Scope {
    /// Resolve a variable by name.
    fn lookup(&self, name: &str) -> Option<Value>;

    /// Store a value under `name`.
    ///
    /// Default implementation rejects every assignment.
    fn assign(&mut self, name: &str, value: Value) -> Result<(), EvalError> {
        let _ = value;
        Err(EvalError::ReadOnly {
            name: name.to_string(),
        })
    }
}

/// The empty scope. Every lookup misses and every assignment fails.
impl Scope for () {
    fn lookup(&self, _name: &str) -> Option<Value> {
        None
    }
}

/// Map-backed scope with freely assignable variables.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Variables {
    values: BTreeMap<String, Value>,
}

impl Variables {
    /// Create an empty scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// Bind `name`, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    /// Value bound to `name`.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.values.get(name).copied()
    }

    /// Unbind `name`, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.values.remove(name)
    }

    /// Number of bound variables.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no variable is bound.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Scope for Variables {
    fn lookup(&self, name: &str) -> Option<Value> {
        self.get(name)
    }

    fn assign(&mut self, name: &str, value: Value) -> Result<(), EvalError> {
        self.set(name, value);
        Ok(())
    }
}
