//! Label-keyed guard map and state/label-keyed action maps.
//!
//! Registration performs no cross-checking; keys are validated against
//! the compiled machine when it is built.

use crate::builder::error::DefinitionError;
use crate::core::{Action, Guard};
use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;

/// Conditions keyed by transition label.
pub struct GuardRegistry<C> {
    guards: BTreeMap<String, Guard<C>>,
}

impl<C> GuardRegistry<C> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            guards: BTreeMap::new(),
        }
    }

    /// Register a condition. A label already present is rejected.
    pub fn insert_unique(
        &mut self,
        label: impl Into<String>,
        guard: Guard<C>,
    ) -> Result<(), DefinitionError> {
        match self.guards.entry(label.into()) {
            Entry::Occupied(entry) => Err(DefinitionError::RedundantCondition {
                label: entry.key().clone(),
            }),
            Entry::Vacant(entry) => {
                entry.insert(guard);
                Ok(())
            }
        }
    }

    /// Swap in a condition, returning the one it replaces.
    pub fn replace(&mut self, label: impl Into<String>, guard: Guard<C>) -> Option<Guard<C>> {
        self.guards.insert(label.into(), guard)
    }

    /// Remove and return the condition for `label`.
    pub fn remove(&mut self, label: &str) -> Option<Guard<C>> {
        self.guards.remove(label)
    }

    /// Condition registered for `label`.
    pub fn get(&self, label: &str) -> Option<&Guard<C>> {
        self.guards.get(label)
    }

    /// Whether a condition is registered for `label`.
    pub fn contains(&self, label: &str) -> bool {
        self.guards.contains_key(label)
    }

    /// Registered labels in sorted order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.guards.keys().map(String::as_str)
    }

    /// Labels and conditions in label order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Guard<C>)> {
        self.guards.iter().map(|(label, guard)| (label.as_str(), guard))
    }

    /// Number of registered entries.
    pub fn len(&self) -> usize {
        self.guards.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }
}

impl<C> Default for GuardRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for GuardRegistry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.guards.iter()).finish()
    }
}

/// Lifecycle moment an action is bound to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Keyed by the state being entered
    OnEntry,
    /// Keyed by the state being left
    OnExit,
    /// Keyed by the current state, run before guards on every step
    OnState,
    /// Keyed by the label of the fired transition
    OnTransition,
}

impl ActionKind {
    pub const ALL: [ActionKind; 4] = [
        ActionKind::OnEntry,
        ActionKind::OnExit,
        ActionKind::OnState,
        ActionKind::OnTransition,
    ];

    /// Whether keys of this kind name transition labels rather than states.
    pub fn keyed_by_label(&self) -> bool {
        matches!(self, Self::OnTransition)
    }

    /// Snake-case name, as used in diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OnEntry => "on_entry",
            Self::OnExit => "on_exit",
            Self::OnState => "on_state",
            Self::OnTransition => "on_transition",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Actions for each [`ActionKind`], keyed by state name or label.
pub struct ActionRegistry<C> {
    bindings: BTreeMap<ActionKind, BTreeMap<String, Action<C>>>,
}

impl<C> ActionRegistry<C> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            bindings: BTreeMap::new(),
        }
    }

    /// Bind an action, returning the one previously bound to the key.
    pub fn insert(
        &mut self,
        kind: ActionKind,
        key: impl Into<String>,
        action: Action<C>,
    ) -> Option<Action<C>> {
        self.bindings
            .entry(kind)
            .or_default()
            .insert(key.into(), action)
    }

    /// Unbind and return the action for `key`.
    pub fn remove(&mut self, kind: ActionKind, key: &str) -> Option<Action<C>> {
        self.bindings.get_mut(&kind)?.remove(key)
    }

    /// Action bound to `key` for this kind.
    pub fn get(&self, kind: ActionKind, key: &str) -> Option<&Action<C>> {
        self.bindings.get(&kind)?.get(key)
    }

    /// Bound keys of one kind in sorted order.
    pub fn keys(&self, kind: ActionKind) -> Vec<&str> {
        self.bindings
            .get(&kind)
            .map(|map| map.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Number of registered entries.
    pub fn len(&self) -> usize {
        self.bindings.values().map(BTreeMap::len).sum()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<C> Default for ActionRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for ActionRegistry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.bindings.iter()).finish()
    }
}
