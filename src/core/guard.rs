//! Guard conditions deciding whether a labeled transition fires.
//!
//! A guard is evaluated against the caller's context on every step while
//! the machine sits in the transition's origin state. It is either a
//! restricted textual expression or a predicate closure.

use super::CallbackError;
use crate::expr::{Expr, ExprError, Scope};
use std::fmt;

enum Condition<C> {
    Expression(Expr),
    Predicate {
        name: Option<String>,
        check: Box<dyn Fn(&C) -> Result<bool, CallbackError> + Send + Sync>,
    },
}

/// Predicate that determines if a transition can fire.
///
/// # Example
///
/// ```rust
/// use guardfsm::core::Guard;
/// use guardfsm::expr::Variables;
///
/// let every_tenth: Guard<Variables> = Guard::expr("a % 10 == 0").unwrap();
/// let positive = Guard::new(|vars: &Variables| {
///     vars.get("a").and_then(|v| v.as_f64()).is_some_and(|a| a > 0.0)
/// });
///
/// let vars = Variables::new().with("a", 20);
/// assert!(every_tenth.check(&vars).unwrap());
/// assert!(positive.check(&vars).unwrap());
/// ```
pub struct Guard<C> {
    condition: Condition<C>,
}

impl<C> Guard<C> {
    /// Create a guard from an infallible predicate.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        Self::try_new(move |ctx: &C| Ok::<_, CallbackError>(predicate(ctx)))
    }

    /// Create a guard from a predicate that may fail.
    ///
    /// A failure aborts the step with a transition evaluation error.
    pub fn try_new<F, E>(predicate: F) -> Self
    where
        F: Fn(&C) -> Result<bool, E> + Send + Sync + 'static,
        E: Into<CallbackError>,
    {
        Guard {
            condition: Condition::Predicate {
                name: None,
                check: Box::new(move |ctx| predicate(ctx).map_err(Into::into)),
            },
        }
    }

    /// Parse a textual guard. It must evaluate to a boolean.
    pub fn expr(source: &str) -> Result<Self, ExprError> {
        Ok(Guard {
            condition: Condition::Expression(Expr::parse(source)?),
        })
    }

    /// Guard that always holds.
    pub fn always() -> Self {
        Self::new(|_| true)
    }

    /// Guard that never holds.
    pub fn never() -> Self {
        Self::new(|_| false)
    }

    /// Attach a name shown in diagnostics instead of `<predicate>`.
    pub fn named(mut self, label: impl Into<String>) -> Self {
        if let Condition::Predicate { name, .. } = &mut self.condition {
            *name = Some(label.into());
        }
        self
    }

    /// Human-readable form: the expression text or the predicate name.
    pub fn describe(&self) -> String {
        match &self.condition {
            Condition::Expression(expr) => expr.source().to_string(),
            Condition::Predicate { name: Some(n), .. } => format!("{n}()"),
            Condition::Predicate { name: None, .. } => "<predicate>".to_string(),
        }
    }
}

impl<C: Scope> Guard<C> {
    /// Evaluate the guard against the caller context.
    pub fn check(&self, ctx: &C) -> Result<bool, CallbackError> {
        match &self.condition {
            Condition::Expression(expr) => Ok(expr.evaluate_bool(ctx)?),
            Condition::Predicate { check, .. } => check(ctx),
        }
    }
}

impl<C> fmt::Debug for Guard<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Guard").field(&self.describe()).finish()
    }
}
