//! Non-fatal findings produced while compiling a machine.

use crate::builder::registry::ActionKind;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Structural issue that does not prevent compilation.
///
/// Diagnostics are kept on the compiled machine and can be queried or
/// serialized; they are never raised.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum Diagnostic {
    #[error("Unused transitions: {}", .labels.join(", "))]
    UnusedTransitions { labels: Vec<String> },

    #[error("Dead states unreachable from '{entry}': {}", .states.join(", "))]
    DeadStates { entry: String, states: Vec<String> },

    #[error("Invalid {kind} actions: {}", .keys.join(", "))]
    InvalidActions { kind: ActionKind, keys: Vec<String> },
}

impl Diagnostic {
    /// Names the diagnostic is about.
    pub fn names(&self) -> &[String] {
        match self {
            Self::UnusedTransitions { labels } => labels,
            Self::DeadStates { states, .. } => states,
            Self::InvalidActions { keys, .. } => keys,
        }
    }

    /// Serialized category tag.
    pub fn category(&self) -> &'static str {
        match self {
            Self::UnusedTransitions { .. } => "unused_transitions",
            Self::DeadStates { .. } => "dead_states",
            Self::InvalidActions { .. } => "invalid_actions",
        }
    }
}

/// Log a diagnostic at `warn` when warnings are surfaced, `debug` otherwise.
pub(crate) fn report(diagnostic: &Diagnostic, surface_warnings: bool) {
    if surface_warnings {
        warn!(category = diagnostic.category(), "{diagnostic}");
    } else {
        debug!(category = diagnostic.category(), "{diagnostic}");
    }
}
