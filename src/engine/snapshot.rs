//! Serializable view of a machine for presentation layers.

use crate::builder::diagnostics::Diagnostic;
use crate::core::{Separator, TransitionRecord};
use crate::engine::config::MachineConfig;
use crate::engine::machine::Machine;
use serde::{Deserialize, Serialize};

/// Everything a viewer needs to draw the machine and its recent activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineSnapshot {
    pub states: Vec<String>,
    pub separator: Separator,
    pub entry_point: String,
    pub current_state: String,
    /// Row-major labels, `None` where no transition exists
    pub matrix: Vec<Vec<Option<String>>>,
    pub fired_labels: Vec<String>,
    pub last_transition: Option<TransitionRecord>,
    pub history: Vec<String>,
    pub dead_states: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
    pub config: MachineConfig,
}

impl MachineSnapshot {
    /// Pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// `(origin, destination, label)` for every transition, row-major.
    pub fn edges(&self) -> Vec<(&str, &str, &str)> {
        self.matrix
            .iter()
            .enumerate()
            .flat_map(|(i, row)| {
                row.iter().enumerate().filter_map(move |(j, label)| {
                    label.as_deref().map(|label| {
                        (self.states[i].as_str(), self.states[j].as_str(), label)
                    })
                })
            })
            .collect()
    }
}

impl<C> Machine<C> {
    /// Capture a serializable view of the machine.
    pub fn snapshot(&self) -> MachineSnapshot {
        let matrix = self.matrix();
        MachineSnapshot {
            states: self.states().to_vec(),
            separator: self.separator(),
            entry_point: self.entry_point().to_string(),
            current_state: self.current_state().to_string(),
            matrix: (0..matrix.size())
                .map(|i| {
                    matrix
                        .row(i)
                        .iter()
                        .map(|cell| cell.label().map(str::to_string))
                        .collect()
                })
                .collect(),
            fired_labels: self.fired_labels().to_vec(),
            last_transition: self.last_transition().cloned(),
            history: self.history(),
            dead_states: self.dead_states(),
            diagnostics: self.diagnostics().to_vec(),
            config: self.config().clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::MachineBuilder;
    use crate::core::Guard;
    use crate::expr::Variables;

    fn compiled() -> Machine<Variables> {
        let mut builder = MachineBuilder::<Variables>::new();
        builder.add_transition("A -> B : t0").unwrap();
        builder.add_transition("B -> A : t1").unwrap();
        builder.add_transition("C -> C : t2").unwrap();
        for label in ["t0", "t1", "t2"] {
            builder.add_condition(label, Guard::always()).unwrap();
        }
        builder.add_condition("t7", Guard::never()).unwrap();
        builder.compile().unwrap()
    }

    #[test]
    fn snapshot_captures_queries() {
        let mut machine = compiled();
        machine.step(&mut Variables::new()).unwrap();
        let snapshot = machine.snapshot();

        assert_eq!(snapshot.states, vec!["A", "B", "C"]);
        assert_eq!(snapshot.current_state, "B");
        assert_eq!(snapshot.fired_labels, vec!["t0"]);
        assert_eq!(snapshot.history, vec!["A", "B"]);
        assert_eq!(snapshot.dead_states, vec!["C"]);
        assert_eq!(snapshot.matrix[0][1].as_deref(), Some("t0"));
        assert_eq!(snapshot.matrix[0][0], None);
        assert_eq!(
            snapshot.edges(),
            vec![("A", "B", "t0"), ("B", "A", "t1"), ("C", "C", "t2")]
        );
    }

    #[test]
    fn snapshot_json_round_trips() {
        let snapshot = compiled().snapshot();
        let json = snapshot.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["separator"], "Arrow");
        assert_eq!(value["diagnostics"][0]["category"], "unused_transitions");
        assert_eq!(value["diagnostics"][0]["labels"][0], "t7");
        assert_eq!(value["diagnostics"][1]["category"], "dead_states");
        assert_eq!(value["config"]["sleep_interval_ms"], 500);

        let back: MachineSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }
}
