//! Bounded history of visited states.
//!
//! The machine keeps the indices of the most recently visited states in a
//! fixed-capacity ring buffer. The buffer starts out filled with
//! [`HistorySlot::Empty`]; once full, the oldest entry is evicted on each
//! push. Analysis only ever sees the filtered, padding-free view.

use super::grammar::Separator;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Default number of states kept in the history.
pub const DEFAULT_HISTORY_LEN: usize = 10;

/// Record of the most recent fired transition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// The state being left
    pub from: String,
    /// The state being entered
    pub to: String,
    /// Label of the transition that fired
    pub label: String,
    /// Separator the machine was written with
    pub separator: Separator,
    /// When the transition occurred
    pub timestamp: DateTime<Utc>,
}

impl std::fmt::Display for TransitionRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {} : {}",
            self.from, self.separator, self.to, self.label
        )
    }
}

/// One slot of the history ring.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HistorySlot {
    Empty,
    State(usize),
}

/// Fixed-capacity, oldest-first ring of visited state indices.
///
/// # Example
///
/// ```rust
/// use guardfsm::core::StateHistory;
///
/// let mut history = StateHistory::new(3);
/// assert!(history.states().is_empty());
///
/// for state in [0, 1, 2, 3] {
///     history.record(state);
/// }
///
/// // Capacity 3: the first visit has been evicted.
/// assert_eq!(history.states(), vec![1, 2, 3]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateHistory {
    slots: VecDeque<HistorySlot>,
    capacity: usize,
}

impl Default for StateHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LEN)
    }
}

impl StateHistory {
    /// Create a history pre-filled with empty slots.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: VecDeque::from(vec![HistorySlot::Empty; capacity]),
            capacity,
        }
    }

    /// Number of slots in the ring.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append a visited state, evicting the oldest slot when full.
    pub fn record(&mut self, state: usize) {
        if self.capacity == 0 {
            return;
        }
        if self.slots.len() == self.capacity {
            self.slots.pop_front();
        }
        self.slots.push_back(HistorySlot::State(state));
    }

    /// Drop every entry and refill with empty slots.
    pub fn clear(&mut self) {
        self.slots = VecDeque::from(vec![HistorySlot::Empty; self.capacity]);
    }

    /// Raw slots, oldest first, padding included.
    pub fn slots(&self) -> impl Iterator<Item = &HistorySlot> {
        self.slots.iter()
    }

    /// Visited states, oldest first, with empty slots filtered out.
    pub fn states(&self) -> Vec<usize> {
        self.slots
            .iter()
            .filter_map(|slot| match slot {
                HistorySlot::State(i) => Some(*i),
                HistorySlot::Empty => None,
            })
            .collect()
    }

    /// Most recently recorded state.
    pub fn latest(&self) -> Option<usize> {
        self.states().last().copied()
    }

    /// The state visited before the latest one.
    pub fn previous(&self) -> Option<usize> {
        let states = self.states();
        states.len().checked_sub(2).map(|i| states[i])
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| matches!(slot, HistorySlot::State(_)))
            .count()
    }

    /// Whether no state has been recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
