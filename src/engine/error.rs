//! Errors raised by a single step.

use crate::core::CallbackError;
use thiserror::Error;

/// Errors that abort a step.
///
/// Guard failures and nondisjoint guards leave the machine where it was.
/// Action failures after a transition fired leave the machine in the new
/// state with the remaining actions skipped.
#[derive(Debug, Error)]
pub enum StepError {
    #[error("Transitions from '{state}' are not disjoint: {} all hold", .labels.join(", "))]
    NondisjointTransitions { state: String, labels: Vec<String> },

    #[error("Condition '{condition}' of transition '{label}' from '{state}' failed: {source}")]
    TransitionEvalError {
        state: String,
        label: String,
        condition: String,
        #[source]
        source: CallbackError,
    },

    #[error("on_entry action of state '{state}' failed: {source}")]
    OnEntryActionError {
        state: String,
        #[source]
        source: CallbackError,
    },

    #[error("on_exit action of state '{state}' failed: {source}")]
    OnExitActionError {
        state: String,
        #[source]
        source: CallbackError,
    },

    #[error("on_transition action of '{label}' failed: {source}")]
    OnTransitionActionError {
        label: String,
        #[source]
        source: CallbackError,
    },

    #[error("on_state action of state '{state}' failed: {source}")]
    OnStateActionError {
        state: String,
        #[source]
        source: CallbackError,
    },
}

impl StepError {
    /// Whether the machine had already moved when the error was raised.
    pub fn after_transition(&self) -> bool {
        matches!(
            self,
            Self::OnEntryActionError { .. }
                | Self::OnExitActionError { .. }
                | Self::OnTransitionActionError { .. }
        )
    }
}
