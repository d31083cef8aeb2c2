//! The ordered set of states derived from transition statements.
//!
//! States are never declared on their own. The table holds exactly the
//! origins and destinations of the accepted statements, sorted
//! lexicographically and indexed `0..N`.

use super::grammar::TransitionStatement;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Sorted state names with a reverse index.
///
/// # Example
///
/// ```rust
/// use guardfsm::core::{parse_statement, StateTable};
///
/// let statements = vec![
///     parse_statement("Idle -> Busy : start").unwrap(),
///     parse_statement("Busy -> Idle : finish").unwrap(),
///     parse_statement("Busy -> Error : fail").unwrap(),
/// ];
///
/// let table = StateTable::from_statements(&statements);
/// assert_eq!(table.names(), ["Busy", "Error", "Idle"]);
/// assert_eq!(table.index_of("Idle"), Some(2));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct StateTable {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl StateTable {
    /// Collect every origin and destination, sorted and deduplicated.
    pub fn from_statements(statements: &[TransitionStatement]) -> Self {
        let unique: BTreeSet<&str> = statements
            .iter()
            .flat_map(|s| [s.origin.as_str(), s.destination.as_str()])
            .collect();
        Self::from_sorted(unique.into_iter().map(str::to_string).collect())
    }

    fn from_sorted(names: Vec<String>) -> Self {
        let index = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();
        Self { names, index }
    }

    /// Number of states.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether there are no states.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Index of `name` in the sorted state list.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Name of the state at `index`. Panics on an out-of-range index, which
    /// only happens if an index from another table is used.
    pub fn name(&self, index: usize) -> &str {
        &self.names[index]
    }

    /// Whether `name` is a known state.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// State names in sorted order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Indices and names in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.names.iter().enumerate().map(|(i, n)| (i, n.as_str()))
    }
}

impl From<Vec<String>> for StateTable {
    fn from(mut names: Vec<String>) -> Self {
        names.sort();
        names.dedup();
        Self::from_sorted(names)
    }
}

impl From<StateTable> for Vec<String> {
    fn from(table: StateTable) -> Self {
        table.names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::grammar::parse_statement;

    fn statements(lines: &[&str]) -> Vec<TransitionStatement> {
        lines.iter().map(|l| parse_statement(l).unwrap()).collect()
    }

    #[test]
    fn states_are_union_of_origins_and_destinations() {
        let table = StateTable::from_statements(&statements(&[
            "A => B : t0",
            "B => C : t1",
            "C => A : t3",
            "D => A : t4",
            "D => D : t2",
        ]));

        assert_eq!(table.len(), 4);
        assert_eq!(table.names(), ["A", "B", "C", "D"]);
    }

    #[test]
    fn ordering_is_lexicographic_not_declaration_order() {
        let table = StateTable::from_statements(&statements(&["zeta -> alpha : t0"]));
        assert_eq!(table.name(0), "alpha");
        assert_eq!(table.name(1), "zeta");
        assert_eq!(table.index_of("zeta"), Some(1));
    }

    #[test]
    fn unknown_names_have_no_index() {
        let table = StateTable::from_statements(&statements(&["A -> B : t0"]));
        assert!(table.contains("A"));
        assert!(!table.contains("C"));
        assert_eq!(table.index_of("C"), None);
    }

    #[test]
    fn empty_statement_list_gives_empty_table() {
        let table = StateTable::from_statements(&[]);
        assert!(table.is_empty());
        assert_eq!(table.iter().count(), 0);
    }

    #[test]
    fn serializes_as_name_list() {
        let table = StateTable::from_statements(&statements(&["B -> A : t0"]));
        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(json, r#"["A","B"]"#);

        let back: StateTable = serde_json::from_str(&json).unwrap();
        assert_eq!(back, table);
    }
}
