//! Compiled machine and its step engine.

use crate::builder::diagnostics::{report, Diagnostic};
use crate::builder::error::DefinitionError;
use crate::builder::registry::{ActionKind, ActionRegistry, GuardRegistry};
use crate::core::{
    detect_closed_cycle, detect_windowed_cycles, Accessibility, Action, Guard, Separator,
    StateHistory, StateTable, TransitionMatrix, TransitionRecord, TransitionStatement,
    WindowedCycle,
};
use crate::engine::config::MachineConfig;
use crate::engine::error::StepError;
use crate::expr::Scope;
use chrono::Utc;
use std::fmt;
use std::time::Duration;
use tracing::{debug, error, trace};

/// Outcome of a step that did not fail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// No guard held; the machine stayed where it was
    Idle,

    /// Exactly one guard held and the machine moved
    Transitioned(TransitionRecord),
}

impl StepOutcome {
    /// Whether the step moved the machine.
    pub fn is_transition(&self) -> bool {
        matches!(self, Self::Transitioned(_))
    }
}

/// Everything the compiler hands over to a running machine.
pub(crate) struct CompiledParts<C> {
    pub statements: Vec<TransitionStatement>,
    pub separator: Separator,
    pub states: StateTable,
    pub matrix: TransitionMatrix,
    pub accessibility: Accessibility,
    pub guards: GuardRegistry<C>,
    pub actions: ActionRegistry<C>,
    pub entry: usize,
    pub diagnostics: Vec<Diagnostic>,
    pub config: MachineConfig,
}

/// A compiled machine, ready to step.
///
/// Built by [`MachineBuilder::compile`](crate::MachineBuilder::compile).
/// `step` is the only operation that moves the current state forward.
///
/// # Example
///
/// ```rust
/// use guardfsm::{Guard, MachineBuilder, StepOutcome};
/// use guardfsm::expr::Variables;
///
/// let mut builder = MachineBuilder::<Variables>::new();
/// builder.add_transition("idle -> busy : start").unwrap();
/// builder.add_transition("busy -> idle : stop").unwrap();
/// builder.add_condition("start", Guard::expr("jobs > 0").unwrap()).unwrap();
/// builder.add_condition("stop", Guard::expr("jobs == 0").unwrap()).unwrap();
/// let mut machine = builder.compile().unwrap();
///
/// let mut vars = Variables::new().with("jobs", 0);
/// assert_eq!(machine.step(&mut vars).unwrap(), StepOutcome::Idle);
///
/// vars.set("jobs", 3);
/// assert!(machine.step(&mut vars).unwrap().is_transition());
/// assert_eq!(machine.current_state(), "busy");
/// ```
pub struct Machine<C> {
    statements: Vec<TransitionStatement>,
    separator: Separator,
    states: StateTable,
    matrix: TransitionMatrix,
    accessibility: Accessibility,
    guards: GuardRegistry<C>,
    actions: ActionRegistry<C>,
    entry: usize,
    current: usize,
    history: StateHistory,
    fired: Vec<usize>,
    fired_labels: Vec<String>,
    last_transition: Option<TransitionRecord>,
    diagnostics: Vec<Diagnostic>,
    config: MachineConfig,
}

impl<C> Machine<C> {
    pub(crate) fn from_parts(parts: CompiledParts<C>) -> Self {
        let mut machine = Self {
            statements: parts.statements,
            separator: parts.separator,
            states: parts.states,
            matrix: parts.matrix,
            accessibility: parts.accessibility,
            guards: parts.guards,
            actions: parts.actions,
            entry: parts.entry,
            current: parts.entry,
            history: StateHistory::new(parts.config.history_len),
            fired: Vec::new(),
            fired_labels: Vec::new(),
            last_transition: None,
            diagnostics: parts.diagnostics,
            config: parts.config,
        };
        machine.reset();
        machine
    }

    /// Return to the entry point with a fresh history holding only it.
    pub fn reset(&mut self) {
        self.current = self.entry;
        self.history.clear();
        self.history.record(self.entry);
        self.fired.clear();
        self.fired_labels.clear();
        self.last_transition = None;
    }

    /// Move the entry point and reset onto it.
    ///
    /// The dead-state diagnostic is recomputed for the new entry point.
    pub fn set_entry_point(&mut self, state: &str) -> Result<(), DefinitionError> {
        let entry = self
            .states
            .index_of(state)
            .ok_or_else(|| DefinitionError::UnknownState {
                name: state.to_string(),
            })?;
        self.entry = entry;
        self.refresh_dead_states();
        self.reset();
        Ok(())
    }

    fn refresh_dead_states(&mut self) {
        self.diagnostics
            .retain(|d| !matches!(d, Diagnostic::DeadStates { .. }));
        let dead = self.dead_states();
        if !dead.is_empty() {
            let position = self
                .diagnostics
                .iter()
                .position(|d| matches!(d, Diagnostic::InvalidActions { .. }))
                .unwrap_or(self.diagnostics.len());
            let diagnostic = Diagnostic::DeadStates {
                entry: self.entry_point().to_string(),
                states: dead,
            };
            report(&diagnostic, self.config.surface_warnings);
            self.diagnostics.insert(position, diagnostic);
        }
    }

    // Run-loop toggles

    /// Whether a step fails when several conditions hold.
    pub fn check_disjoint(&self) -> bool {
        self.config.check_disjoint
    }

    /// Enable or disable the disjointness check.
    pub fn set_check_disjoint(&mut self, enabled: bool) {
        self.config.check_disjoint = enabled;
    }

    /// Whether diagnostics are logged at `warn`.
    pub fn surface_warnings(&self) -> bool {
        self.config.surface_warnings
    }

    /// Log later diagnostics at `warn` instead of `debug`.
    pub fn set_surface_warnings(&mut self, enabled: bool) {
        self.config.surface_warnings = enabled;
    }

    /// Interval a driver loop should wait between steps. The machine never sleeps.
    pub fn sleep_interval(&self) -> Duration {
        self.config.sleep_interval()
    }

    /// Change the interval a driver loop should wait between steps.
    pub fn set_sleep_interval(&mut self, interval: Duration) {
        self.config = self.config.clone().with_sleep_interval(interval);
    }

    /// Current configuration, including toggles changed after compile.
    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    // Queries

    /// Name of the current state.
    pub fn current_state(&self) -> &str {
        self.states.name(self.current)
    }

    /// Index of the current state in [`states`](Self::states).
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Name of the entry state.
    pub fn entry_point(&self) -> &str {
        self.states.name(self.entry)
    }

    /// State names in index order.
    pub fn states(&self) -> &[String] {
        self.states.names()
    }

    /// Sorted state table with its name index.
    pub fn state_table(&self) -> &StateTable {
        &self.states
    }

    /// Separator shared by every statement.
    pub fn separator(&self) -> Separator {
        self.separator
    }

    /// Statements in registration order.
    pub fn statements(&self) -> &[TransitionStatement] {
        &self.statements
    }

    /// Labeled transition matrix.
    pub fn matrix(&self) -> &TransitionMatrix {
        &self.matrix
    }

    /// Path-count matrix used for dead-state analysis.
    pub fn accessibility(&self) -> &Accessibility {
        &self.accessibility
    }

    /// Condition registered for `label`.
    pub fn condition(&self, label: &str) -> Option<&Guard<C>> {
        self.guards.get(label)
    }

    /// Every registered condition in label order.
    pub fn conditions(&self) -> impl Iterator<Item = (&str, &Guard<C>)> {
        self.guards.iter()
    }

    /// Action bound to `key` for `kind`.
    pub fn action(&self, kind: ActionKind, key: &str) -> Option<&Action<C>> {
        self.actions.get(kind, key)
    }

    /// Destination indices of the guards that held on the last step.
    pub fn fired_transitions(&self) -> &[usize] {
        &self.fired
    }

    /// Labels of the guards that held on the last step.
    pub fn fired_labels(&self) -> &[String] {
        &self.fired_labels
    }

    /// Most recent transition since compile or reset.
    pub fn last_transition(&self) -> Option<&TransitionRecord> {
        self.last_transition.as_ref()
    }

    /// Raw history ring, including empty slots.
    pub fn history_buffer(&self) -> &StateHistory {
        &self.history
    }

    /// Visited state names, oldest first.
    pub fn history(&self) -> Vec<String> {
        self.history
            .states()
            .into_iter()
            .map(|i| self.states.name(i).to_string())
            .collect()
    }

    /// States unreachable from the current entry point.
    pub fn dead_states(&self) -> Vec<String> {
        self.accessibility
            .dead_states(self.entry)
            .into_iter()
            .map(|i| self.states.name(i).to_string())
            .collect()
    }

    /// All compile findings, in check order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Labels with a condition but no statement.
    pub fn unused_transitions(&self) -> Vec<String> {
        self.diagnostics
            .iter()
            .filter_map(|d| match d {
                Diagnostic::UnusedTransitions { labels } => Some(labels.clone()),
                _ => None,
            })
            .flatten()
            .collect()
    }

    /// Action keys that name nothing in the machine, per kind.
    pub fn invalid_actions(&self) -> Vec<(ActionKind, Vec<String>)> {
        self.diagnostics
            .iter()
            .filter_map(|d| match d {
                Diagnostic::InvalidActions { kind, keys } => Some((*kind, keys.clone())),
                _ => None,
            })
            .collect()
    }

    /// Shortest cycle closing the history, as state names.
    pub fn detect_closed_cycle(&self, max_len: Option<usize>) -> Option<Vec<String>> {
        detect_closed_cycle(&self.history(), max_len)
    }

    /// Every immediately repeated window of the history, as state names.
    pub fn detect_windowed_cycles(&self, max_len: Option<usize>) -> Vec<WindowedCycle<String>> {
        detect_windowed_cycles(&self.history(), max_len)
    }

    // Post-compile registration

    /// Swap the condition of an existing transition.
    pub fn replace_condition(
        &mut self,
        label: &str,
        guard: Guard<C>,
    ) -> Result<Guard<C>, DefinitionError> {
        if self.matrix.find(label).is_none() {
            return Err(DefinitionError::UnknownTransition {
                label: label.to_string(),
            });
        }
        self.guards
            .replace(label, guard)
            .ok_or_else(|| DefinitionError::UnknownTransition {
                label: label.to_string(),
            })
    }

    /// Bind an action to a state or label the machine has.
    ///
    /// Returns the action previously bound to the same key.
    pub fn set_action(
        &mut self,
        kind: ActionKind,
        key: &str,
        action: Action<C>,
    ) -> Result<Option<Action<C>>, DefinitionError> {
        if kind.keyed_by_label() {
            if !self.guards.contains(key) {
                return Err(DefinitionError::UnknownTransition {
                    label: key.to_string(),
                });
            }
        } else if !self.states.contains(key) {
            return Err(DefinitionError::UnknownState {
                name: key.to_string(),
            });
        }
        Ok(self.actions.insert(kind, key, action))
    }

    /// Bind an on-entry action to a known state.
    pub fn on_entry(
        &mut self,
        state: &str,
        action: Action<C>,
    ) -> Result<Option<Action<C>>, DefinitionError> {
        self.set_action(ActionKind::OnEntry, state, action)
    }

    /// Bind an on-exit action to a known state.
    pub fn on_exit(
        &mut self,
        state: &str,
        action: Action<C>,
    ) -> Result<Option<Action<C>>, DefinitionError> {
        self.set_action(ActionKind::OnExit, state, action)
    }

    /// Bind an on-state action to a known state.
    pub fn on_state(
        &mut self,
        state: &str,
        action: Action<C>,
    ) -> Result<Option<Action<C>>, DefinitionError> {
        self.set_action(ActionKind::OnState, state, action)
    }

    /// Bind an on-transition action to a registered condition label.
    pub fn on_transition(
        &mut self,
        label: &str,
        action: Action<C>,
    ) -> Result<Option<Action<C>>, DefinitionError> {
        self.set_action(ActionKind::OnTransition, label, action)
    }

    /// Unbind and return the action for `key`.
    pub fn remove_action(&mut self, kind: ActionKind, key: &str) -> Option<Action<C>> {
        self.actions.remove(kind, key)
    }
}

impl<C: Scope> Machine<C> {
    /// Execute one step against the caller context.
    ///
    /// Order: on_state action of the current state, then every guard of
    /// the current row in destination order. With exactly one guard
    /// holding the machine moves, records the new state, then runs the
    /// on_transition, on_exit and on_entry actions in that order.
    pub fn step(&mut self, ctx: &mut C) -> Result<StepOutcome, StepError> {
        let origin = self.current;
        self.fired.clear();
        self.fired_labels.clear();

        if let Some(action) = self.actions.get(ActionKind::OnState, self.states.name(origin)) {
            action.run(ctx).map_err(|source| {
                let state = self.states.name(origin).to_string();
                error!(state = %state, error = %source, "on_state action failed");
                StepError::OnStateActionError { state, source }
            })?;
        }

        let held = self.evaluate_guards(origin, ctx)?;
        self.fired = held.iter().map(|(destination, _)| *destination).collect();
        self.fired_labels = held.into_iter().map(|(_, label)| label).collect();

        match self.fired.len() {
            0 => {
                trace!(state = self.current_state(), "no transition holds");
                Ok(StepOutcome::Idle)
            }
            1 => {
                let record = self.advance(origin, self.fired[0]);
                self.run_transition_actions(ctx, &record)?;
                Ok(StepOutcome::Transitioned(record))
            }
            _ => {
                let state = self.states.name(origin).to_string();
                let labels = self.fired_labels.clone();
                error!(state = %state, labels = ?labels, "transitions are not disjoint");
                Err(StepError::NondisjointTransitions { state, labels })
            }
        }
    }

    /// Labels whose guard holds, in destination order.
    ///
    /// Without disjointness checking, evaluation stops at the first hit.
    fn evaluate_guards(
        &self,
        origin: usize,
        ctx: &C,
    ) -> Result<Vec<(usize, String)>, StepError> {
        let mut held = Vec::new();
        for (destination, label) in self.matrix.outgoing(origin) {
            let Some(guard) = self.guards.get(label) else {
                continue;
            };
            let holds = guard.check(ctx).map_err(|source| {
                let state = self.states.name(origin).to_string();
                error!(state = %state, label, error = %source, "condition evaluation failed");
                StepError::TransitionEvalError {
                    state,
                    label: label.to_string(),
                    condition: guard.describe(),
                    source,
                }
            })?;
            trace!(label, condition = %guard.describe(), holds, "evaluated condition");
            if holds {
                held.push((destination, label.to_string()));
                if !self.config.check_disjoint {
                    break;
                }
            }
        }
        Ok(held)
    }

    fn advance(&mut self, origin: usize, destination: usize) -> TransitionRecord {
        let record = TransitionRecord {
            from: self.states.name(origin).to_string(),
            to: self.states.name(destination).to_string(),
            label: self.fired_labels[0].clone(),
            separator: self.separator,
            timestamp: Utc::now(),
        };
        self.current = destination;
        self.history.record(destination);
        debug!("{record}");
        self.last_transition = Some(record.clone());
        record
    }

    fn run_transition_actions(
        &self,
        ctx: &mut C,
        record: &TransitionRecord,
    ) -> Result<(), StepError> {
        if let Some(action) = self.actions.get(ActionKind::OnTransition, &record.label) {
            action.run(ctx).map_err(|source| {
                error!(label = %record.label, error = %source, "on_transition action failed");
                StepError::OnTransitionActionError {
                    label: record.label.clone(),
                    source,
                }
            })?;
        }
        if let Some(action) = self.actions.get(ActionKind::OnExit, &record.from) {
            action.run(ctx).map_err(|source| {
                error!(state = %record.from, error = %source, "on_exit action failed");
                StepError::OnExitActionError {
                    state: record.from.clone(),
                    source,
                }
            })?;
        }
        if let Some(action) = self.actions.get(ActionKind::OnEntry, &record.to) {
            action.run(ctx).map_err(|source| {
                error!(state = %record.to, error = %source, "on_entry action failed");
                StepError::OnEntryActionError {
                    state: record.to.clone(),
                    source,
                }
            })?;
        }
        Ok(())
    }
}

impl<C> fmt::Debug for Machine<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Machine")
            .field("states", &self.states.names())
            .field("separator", &self.separator)
            .field("entry", &self.entry_point())
            .field("current", &self.current_state())
            .field("history", &self.history())
            .field("fired_labels", &self.fired_labels)
            .field("diagnostics", &self.diagnostics)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::MachineBuilder;
    use crate::expr::{Value, Variables};
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn logged_while(f: impl FnOnce()) -> String {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .without_time()
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        let bytes = logs.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    fn chain() -> Machine<Variables> {
        let mut builder = MachineBuilder::new();
        builder.add_guarded("A -> B : t0", Guard::always()).unwrap();
        builder.add_guarded("B -> C : t1", Guard::always()).unwrap();
        builder.compile().unwrap()
    }

    fn ring() -> MachineBuilder<Variables> {
        let mut builder = MachineBuilder::new();
        for line in ["A -> B : t0", "B -> C : t1", "C -> D : t2", "D -> A : t3"] {
            builder.add_transition(line).unwrap();
        }
        builder
    }

    fn rotating_ring() -> Machine<Variables> {
        let mut builder = ring();
        for (i, label) in ["t0", "t1", "t2", "t3"].into_iter().enumerate() {
            builder
                .add_condition(label, Guard::expr(&format!("n % 4 == {i}")).unwrap())
                .unwrap();
        }
        builder.compile().unwrap()
    }

    #[test]
    fn compiled_machine_starts_at_entry_with_seeded_history() {
        let machine = rotating_ring();
        assert_eq!(machine.current_state(), "A");
        assert_eq!(machine.entry_point(), "A");
        assert_eq!(machine.history(), vec!["A"]);
        assert!(machine.last_transition().is_none());
    }

    #[test]
    fn rotating_guards_walk_the_ring() {
        let mut machine = rotating_ring();
        let mut vars = Variables::new();
        let mut visited = vec![machine.current_state().to_string()];

        for n in 0..4 {
            vars.set("n", n);
            let outcome = machine.step(&mut vars).unwrap();
            assert!(outcome.is_transition());
            visited.push(machine.current_state().to_string());
        }

        assert_eq!(visited, vec!["A", "B", "C", "D", "A"]);
        assert_eq!(machine.history(), vec!["A", "B", "C", "D", "A"]);
    }

    #[test]
    fn no_guard_holding_is_idle() {
        let mut machine = rotating_ring();
        let mut vars = Variables::new().with("n", 2);

        assert_eq!(machine.step(&mut vars).unwrap(), StepOutcome::Idle);
        assert_eq!(machine.current_state(), "A");
        assert!(machine.fired_labels().is_empty());
        assert_eq!(machine.history(), vec!["A"]);
    }

    #[test]
    fn nondisjoint_guards_fail_without_moving() {
        let mut builder = ring();
        builder.add_transition("A -> C : t4").unwrap();
        for label in ["t0", "t1", "t2", "t3", "t4"] {
            builder.add_condition(label, Guard::always()).unwrap();
        }
        let mut machine = builder.compile().unwrap();

        let err = machine.step(&mut Variables::new()).unwrap_err();
        match err {
            StepError::NondisjointTransitions { state, labels } => {
                assert_eq!(state, "A");
                assert_eq!(labels, vec!["t0", "t4"]);
            }
            other => panic!("expected nondisjoint error, got {other:?}"),
        }
        assert_eq!(machine.current_state(), "A");
        assert_eq!(machine.fired_labels(), ["t0", "t4"]);
    }

    #[test]
    fn first_match_wins_without_disjoint_check() {
        let mut builder = ring();
        builder.add_transition("A -> C : t4").unwrap();
        for label in ["t0", "t1", "t2", "t3", "t4"] {
            builder.add_condition(label, Guard::always()).unwrap();
        }
        let mut machine = builder.compile().unwrap();
        machine.set_check_disjoint(false);

        machine.step(&mut Variables::new()).unwrap();
        assert_eq!(machine.current_state(), "B");
        assert_eq!(machine.fired_labels(), ["t0"]);
    }

    #[test]
    fn failing_guard_is_wrapped_with_context() {
        let mut builder = ring();
        builder
            .add_condition("t0", Guard::expr("missing > 1").unwrap())
            .unwrap();
        for label in ["t1", "t2", "t3"] {
            builder.add_condition(label, Guard::never()).unwrap();
        }
        let mut machine = builder.compile().unwrap();

        let err = machine.step(&mut Variables::new()).unwrap_err();
        match err {
            StepError::TransitionEvalError {
                state,
                label,
                condition,
                ..
            } => {
                assert_eq!(state, "A");
                assert_eq!(label, "t0");
                assert_eq!(condition, "missing > 1");
            }
            other => panic!("expected eval error, got {other:?}"),
        }
        assert!(machine.fired_labels().is_empty());
        assert_eq!(machine.current_state(), "A");
    }

    #[test]
    fn actions_run_in_fixed_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut machine = rotating_ring();

        let push = |entry: &'static str| {
            let log = Arc::clone(&log);
            Action::new(move |_: &mut Variables| log.lock().unwrap().push(entry))
        };
        machine.on_state("A", push("state A")).unwrap();
        machine.on_transition("t0", push("transition t0")).unwrap();
        machine.on_exit("A", push("exit A")).unwrap();
        machine.on_entry("B", push("entry B")).unwrap();

        machine.step(&mut Variables::new().with("n", 0)).unwrap();

        assert_eq!(
            *log.lock().unwrap(),
            vec!["state A", "transition t0", "exit A", "entry B"]
        );
    }

    #[test]
    fn on_state_failure_stops_before_guards() {
        let mut machine = rotating_ring();
        machine
            .on_state("A", Action::try_new(|_: &mut Variables| Err("boom")))
            .unwrap();

        let err = machine
            .step(&mut Variables::new().with("n", 0))
            .unwrap_err();
        assert!(matches!(err, StepError::OnStateActionError { ref state, .. } if state == "A"));
        assert_eq!(machine.current_state(), "A");
    }

    #[test]
    fn on_exit_failure_keeps_new_state_and_skips_entry() {
        let mut machine = rotating_ring();
        machine
            .on_exit("A", Action::try_new(|_: &mut Variables| Err("stuck")))
            .unwrap();
        machine
            .on_entry("B", Action::script("entered = true").unwrap())
            .unwrap();

        let mut vars = Variables::new().with("n", 0);
        let err = machine.step(&mut vars).unwrap_err();

        assert!(matches!(err, StepError::OnExitActionError { ref state, .. } if state == "A"));
        assert!(err.after_transition());
        assert_eq!(machine.current_state(), "B");
        assert_eq!(vars.get("entered"), None);
    }

    #[test]
    fn on_transition_failure_skips_exit_and_entry() {
        let mut machine = rotating_ring();
        machine
            .on_transition("t0", Action::try_new(|_: &mut Variables| Err("x")))
            .unwrap();
        machine
            .on_exit("A", Action::script("exited = true").unwrap())
            .unwrap();
        machine
            .on_entry("B", Action::script("entered = true").unwrap())
            .unwrap();

        let mut vars = Variables::new().with("n", 0);
        let err = machine.step(&mut vars).unwrap_err();

        assert!(matches!(err, StepError::OnTransitionActionError { ref label, .. } if label == "t0"));
        assert!(err.after_transition());
        assert_eq!(machine.current_state(), "B");
        assert_eq!(vars.get("exited"), None);
        assert_eq!(vars.get("entered"), None);
    }

    #[test]
    fn on_entry_failure_names_the_new_state() {
        let mut machine = rotating_ring();
        machine
            .on_exit("A", Action::script("exited = true").unwrap())
            .unwrap();
        machine
            .on_entry("B", Action::try_new(|_: &mut Variables| Err("no power")))
            .unwrap();

        let mut vars = Variables::new().with("n", 0);
        let err = machine.step(&mut vars).unwrap_err();

        assert!(matches!(err, StepError::OnEntryActionError { ref state, .. } if state == "B"));
        assert!(err.after_transition());
        assert_eq!(std::error::Error::source(&err).unwrap().to_string(), "no power");
        assert_eq!(machine.current_state(), "B");
        assert_eq!(vars.get("exited"), Some(Value::Bool(true)));
        assert_eq!(machine.history(), vec!["A", "B"]);
    }

    #[test]
    fn script_actions_feed_back_into_guards() {
        let mut machine = rotating_ring();
        for state in ["A", "B", "C", "D"] {
            machine
                .on_entry(state, Action::script("n = n + 1").unwrap())
                .unwrap();
        }

        let mut vars = Variables::new().with("n", 0);
        for _ in 0..8 {
            machine.step(&mut vars).unwrap();
        }
        assert_eq!(vars.get("n"), Some(Value::Int(8)));
        assert_eq!(machine.current_state(), "A");
    }

    #[test]
    fn reset_is_idempotent() {
        let mut machine = rotating_ring();
        machine.step(&mut Variables::new().with("n", 0)).unwrap();
        assert_eq!(machine.current_state(), "B");

        machine.reset();
        let first = (machine.current_state().to_string(), machine.history());
        machine.reset();
        let second = (machine.current_state().to_string(), machine.history());

        assert_eq!(first, second);
        assert_eq!(first.0, "A");
        assert!(machine.last_transition().is_none());
    }

    #[test]
    fn set_entry_point_resets_and_rechecks_dead_states() {
        let mut builder = MachineBuilder::<Variables>::new();
        builder.add_transition("A -> B : t0").unwrap();
        builder.add_transition("B -> C : t1").unwrap();
        builder.add_condition("t0", Guard::always()).unwrap();
        builder.add_condition("t1", Guard::always()).unwrap();
        let mut machine = builder.compile().unwrap();
        assert!(machine.dead_states().is_empty());

        machine.set_entry_point("B").unwrap();
        assert_eq!(machine.current_state(), "B");
        assert_eq!(machine.history(), vec!["B"]);
        assert_eq!(machine.dead_states(), vec!["A"]);
        assert!(machine.diagnostics().contains(&Diagnostic::DeadStates {
            entry: "B".to_string(),
            states: vec!["A".to_string()],
        }));

        assert!(matches!(
            machine.set_entry_point("Z"),
            Err(DefinitionError::UnknownState { .. })
        ));
    }

    #[test]
    fn post_compile_registration_is_validated() {
        let mut machine = rotating_ring();
        assert!(matches!(
            machine.on_entry("Z", Action::new(|_| {})),
            Err(DefinitionError::UnknownState { .. })
        ));
        assert!(matches!(
            machine.on_transition("t9", Action::new(|_| {})),
            Err(DefinitionError::UnknownTransition { .. })
        ));
        assert!(machine.on_transition("t3", Action::new(|_| {})).unwrap().is_none());
        assert!(matches!(
            machine.replace_condition("t9", Guard::always()),
            Err(DefinitionError::UnknownTransition { .. })
        ));

        let previous = machine.replace_condition("t0", Guard::always()).unwrap();
        assert_eq!(previous.describe(), "n % 4 == 0");
        machine.step(&mut Variables::new().with("n", 3)).unwrap();
        assert_eq!(machine.current_state(), "B");
    }

    #[test]
    fn last_transition_is_recorded() {
        let mut machine = rotating_ring();
        let outcome = machine.step(&mut Variables::new().with("n", 0)).unwrap();

        let record = machine.last_transition().unwrap();
        assert_eq!(record.to_string(), "A -> B : t0");
        assert_eq!(outcome, StepOutcome::Transitioned(record.clone()));
        assert_eq!(machine.fired_transitions(), [1]);
    }

    #[test]
    fn cycle_queries_use_state_names() {
        let mut machine = rotating_ring();
        let mut vars = Variables::new();
        for n in 0..7 {
            vars.set("n", n % 4);
            machine.step(&mut vars).unwrap();
        }
        // History: A B C D A B C D
        assert_eq!(
            machine.detect_closed_cycle(None),
            Some(vec![
                "A".to_string(),
                "B".to_string(),
                "C".to_string(),
                "D".to_string()
            ])
        );
        assert_eq!(machine.detect_closed_cycle(Some(3)), None);
        assert!(!machine.detect_windowed_cycles(None).is_empty());
    }

    #[test]
    fn toggles_update_config() {
        let mut machine = rotating_ring();
        machine.set_surface_warnings(true);
        machine.set_sleep_interval(Duration::from_millis(20));
        assert!(machine.surface_warnings());
        assert_eq!(machine.sleep_interval(), Duration::from_millis(20));
        assert_eq!(machine.config().sleep_interval_ms, 20);
    }

    #[test]
    fn surface_warnings_decides_dead_state_log_level() {
        let mut machine = chain();

        let quiet = logged_while(|| machine.set_entry_point("B").unwrap());
        assert!(quiet.contains("Dead states unreachable from 'B': A"));
        assert!(quiet.contains("DEBUG"));
        assert!(!quiet.contains("WARN"));

        machine.set_surface_warnings(true);
        let loud = logged_while(|| machine.set_entry_point("C").unwrap());
        assert!(loud.contains("Dead states unreachable from 'C': A, B"));
        assert!(loud.contains("WARN"));
    }

    #[test]
    fn compile_surfaces_diagnostics_as_warnings_when_enabled() {
        let compile = |surface: bool| {
            logged_while(|| {
                let mut builder = MachineBuilder::<Variables>::with_config(
                    MachineConfig::default().with_surface_warnings(surface),
                );
                builder.add_guarded("A -> B : t0", Guard::always()).unwrap();
                builder.add_condition("t7", Guard::never()).unwrap();
                builder.compile().unwrap();
            })
        };

        let loud = compile(true);
        assert!(loud.contains("WARN"));
        assert!(loud.contains("Unused transitions: t7"));
        assert!(!compile(false).contains("WARN"));
    }
}
