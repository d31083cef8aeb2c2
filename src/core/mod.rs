//! Core machine types and algorithms.
//!
//! This module holds the pure building blocks of a compiled machine:
//! - Statement grammar and the sorted state table derived from it
//! - The labeled transition matrix and its accessibility analysis
//! - The bounded state history and cycle detectors over it
//! - Guard predicates and lifecycle actions
//!
//! Nothing here performs I/O or keeps global state.

mod action;
mod cycles;
mod grammar;
mod guard;
mod history;
mod matrix;
mod reachability;
mod state;

pub use action::Action;
pub use cycles::{detect_closed_cycle, detect_windowed_cycles, WindowedCycle};
pub use grammar::{parse_statement, Separator, SyntaxError, TransitionStatement};
pub use guard::Guard;
pub use history::{HistorySlot, StateHistory, TransitionRecord, DEFAULT_HISTORY_LEN};
pub use matrix::{Cell, TransitionMatrix};
pub use reachability::Accessibility;
pub use state::StateTable;

/// Error type returned by caller-supplied guards and actions.
pub type CallbackError = Box<dyn std::error::Error + Send + Sync>;
