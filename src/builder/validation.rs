//! Compile-time structural checks using Validation.
//!
//! Every check runs; all findings are accumulated rather than stopping at
//! the first one.

use crate::builder::diagnostics::Diagnostic;
use crate::builder::registry::ActionKind;
use crate::core::{Accessibility, StateTable};
use std::collections::BTreeSet;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

pub(crate) type Check = Validation<(), NonEmptyVec<Diagnostic>>;

fn finding(names: Vec<String>, diagnostic: impl FnOnce(Vec<String>) -> Diagnostic) -> Check {
    if names.is_empty() {
        Validation::success(())
    } else {
        Validation::fail(diagnostic(names))
    }
}

/// Conditions registered for labels no statement uses.
pub(crate) fn unused_transitions<'a>(unused: impl IntoIterator<Item = &'a str>) -> Check {
    let labels = unused.into_iter().map(str::to_string).collect();
    finding(labels, |labels| Diagnostic::UnusedTransitions { labels })
}

/// States that cannot be reached from the entry point.
pub(crate) fn dead_states(states: &StateTable, access: &Accessibility, entry: usize) -> Check {
    let dead = access
        .dead_states(entry)
        .into_iter()
        .map(|k| states.name(k).to_string())
        .collect();
    finding(dead, |states_found| Diagnostic::DeadStates {
        entry: states.name(entry).to_string(),
        states: states_found,
    })
}

/// Action keys naming neither a state nor a registered condition.
pub(crate) fn invalid_actions<'a>(
    kind: ActionKind,
    keys: impl IntoIterator<Item = &'a str>,
    states: &StateTable,
    labels: &BTreeSet<&str>,
) -> Check {
    let stray = keys
        .into_iter()
        .filter(|key| {
            if kind.keyed_by_label() {
                !labels.contains(*key)
            } else {
                !states.contains(key)
            }
        })
        .map(str::to_string)
        .collect();
    finding(stray, |keys| Diagnostic::InvalidActions { kind, keys })
}

/// Run all checks, keeping every finding in check order.
pub(crate) fn accumulate(checks: Vec<Check>) -> Vec<Diagnostic> {
    match Validation::all_vec(checks).map(|_| ()) {
        Validation::Success(()) => Vec::new(),
        Validation::Failure(errors) => errors.iter().cloned().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{parse_statement, TransitionMatrix};

    fn table(lines: &[&str]) -> StateTable {
        let statements: Vec<_> = lines.iter().map(|l| parse_statement(l).unwrap()).collect();
        StateTable::from_statements(&statements)
    }

    #[test]
    fn clean_checks_accumulate_to_nothing() {
        let checks = vec![unused_transitions(Vec::<&str>::new()), Validation::success(())];
        assert!(accumulate(checks).is_empty());
    }

    #[test]
    fn all_findings_are_kept_in_order() {
        let states = table(&["A -> B : t0"]);
        let labels: BTreeSet<&str> = ["t0"].into_iter().collect();

        let checks = vec![
            unused_transitions(["t9"]),
            invalid_actions(ActionKind::OnEntry, ["A", "Z"], &states, &labels),
            invalid_actions(ActionKind::OnTransition, ["t0", "t7"], &states, &labels),
        ];
        let findings = accumulate(checks);

        assert_eq!(
            findings,
            vec![
                Diagnostic::UnusedTransitions {
                    labels: vec!["t9".to_string()]
                },
                Diagnostic::InvalidActions {
                    kind: ActionKind::OnEntry,
                    keys: vec!["Z".to_string()]
                },
                Diagnostic::InvalidActions {
                    kind: ActionKind::OnTransition,
                    keys: vec!["t7".to_string()]
                },
            ]
        );
    }

    #[test]
    fn dead_states_name_the_entry() {
        let states = table(&["A -> B : t0", "C -> C : t1"]);
        let mut matrix = TransitionMatrix::new(3);
        matrix.set(0, 1, "t0");
        matrix.set(2, 2, "t1");
        let access = Accessibility::from_matrix(&matrix);

        let findings = accumulate(vec![dead_states(&states, &access, 0)]);
        assert_eq!(
            findings,
            vec![Diagnostic::DeadStates {
                entry: "A".to_string(),
                states: vec!["C".to_string()],
            }]
        );
    }
}
