//! Errors raised while defining and compiling a machine.

use crate::core::{Separator, SyntaxError};
use crate::expr::ExprError;
use thiserror::Error;

/// Errors that can occur when registering transitions, conditions and
/// actions, or when compiling them into a machine.
#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error(transparent)]
    InvalidSyntax(#[from] SyntaxError),

    #[error("Condition for transition '{label}' is already registered. Delete it before registering again")]
    RedundantCondition { label: String },

    #[error("Inconsistent transition symbol '{found}' in '{statement}': machine uses '{expected}'")]
    InconsistentTransition {
        expected: Separator,
        found: Separator,
        statement: String,
    },

    #[error("Transition '{label}' in '{statement}' has no registered condition")]
    UndefinedTransition { label: String, statement: String },

    #[error("No transitions defined. Add at least one transition")]
    NoTransitions,

    #[error("States '{origin}' and '{destination}' are already joined by '{existing}', cannot add '{label}'")]
    ParallelTransition {
        origin: String,
        destination: String,
        existing: String,
        label: String,
    },

    #[error("Label '{label}' is used by more than one transition")]
    DuplicateLabel { label: String },

    #[error("Unknown state '{name}'")]
    UnknownState { name: String },

    #[error("Unknown transition '{label}'")]
    UnknownTransition { label: String },

    #[error("Invalid expression '{text}': {source}")]
    InvalidExpression {
        text: String,
        #[source]
        source: ExprError,
    },

    #[error("Compilation failed: {source}")]
    UnknownCompileFailure {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl DefinitionError {
    pub(crate) fn compile_failure(
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::UnknownCompileFailure {
            source: source.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn syntax_error_is_transparent() {
        let err = DefinitionError::from(SyntaxError {
            statement: "A B".to_string(),
        });
        assert!(err.to_string().contains("'A B'"));
    }

    #[test]
    fn compile_failure_keeps_cause() {
        let err = DefinitionError::compile_failure("state index lost");
        assert_eq!(err.to_string(), "Compilation failed: state index lost");
        assert_eq!(err.source().unwrap().to_string(), "state index lost");
    }

    #[test]
    fn inconsistent_transition_names_both_symbols() {
        let err = DefinitionError::InconsistentTransition {
            expected: Separator::Arrow,
            found: Separator::Comma,
            statement: "B , C : t1".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("'->'"));
        assert!(message.contains("','"));
        assert!(message.contains("B , C : t1"));
    }
}
