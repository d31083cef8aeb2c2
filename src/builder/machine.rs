//! Builder collecting statements, conditions and actions, and the compiler
//! turning them into a [`Machine`].

use crate::builder::diagnostics::report;
use crate::builder::error::DefinitionError;
use crate::builder::registry::{ActionKind, ActionRegistry, GuardRegistry};
use crate::builder::validation;
use crate::core::{
    parse_statement, Accessibility, Action, Cell, Guard, StateTable, TransitionMatrix,
    TransitionStatement,
};
use crate::engine::{CompiledParts, Machine, MachineConfig};
use std::collections::BTreeSet;
use std::fmt;
use tracing::{debug, error};

/// Builder for constructing machines from transition statements.
///
/// Statements are checked against the grammar as they are added; every
/// other check happens once, in [`compile`](Self::compile).
pub struct MachineBuilder<C> {
    statements: Vec<String>,
    guards: GuardRegistry<C>,
    actions: ActionRegistry<C>,
    entry_point: Option<String>,
    config: MachineConfig,
}

impl<C> MachineBuilder<C> {
    /// Create a new builder with the default configuration.
    pub fn new() -> Self {
        Self::with_config(MachineConfig::default())
    }

    /// Create a new builder with the given configuration.
    pub fn with_config(config: MachineConfig) -> Self {
        Self {
            statements: Vec::new(),
            guards: GuardRegistry::new(),
            actions: ActionRegistry::new(),
            entry_point: None,
            config,
        }
    }

    /// Add a transition statement such as `A -> B : t0`.
    ///
    /// Fails with `InvalidSyntax` and records nothing if the statement
    /// does not match the grammar.
    pub fn add_transition(&mut self, statement: &str) -> Result<&mut Self, DefinitionError> {
        self.parse(statement)?;
        self.statements.push(statement.to_string());
        Ok(self)
    }

    /// Add a statement together with the condition for its label.
    pub fn add_guarded(
        &mut self,
        statement: &str,
        guard: Guard<C>,
    ) -> Result<&mut Self, DefinitionError> {
        let parsed = self.parse(statement)?;
        self.guards.insert_unique(parsed.label, guard)?;
        self.statements.push(statement.to_string());
        Ok(self)
    }

    fn parse(&self, statement: &str) -> Result<TransitionStatement, DefinitionError> {
        parse_statement(statement).map_err(|err| {
            error!(statement, "rejected transition statement");
            DefinitionError::from(err)
        })
    }

    /// Register the condition for a label. A second registration without
    /// [`del_condition`](Self::del_condition) fails with `RedundantCondition`.
    pub fn add_condition(
        &mut self,
        label: impl Into<String>,
        guard: Guard<C>,
    ) -> Result<&mut Self, DefinitionError> {
        self.guards.insert_unique(label, guard)?;
        Ok(self)
    }

    /// Register a textual condition such as `a % 10 == 0`.
    pub fn add_condition_expr(
        &mut self,
        label: impl Into<String>,
        source: &str,
    ) -> Result<&mut Self, DefinitionError> {
        let guard = Guard::expr(source).map_err(|source_err| DefinitionError::InvalidExpression {
            text: source.to_string(),
            source: source_err,
        })?;
        self.add_condition(label, guard)
    }

    /// Remove the condition for a label so it can be registered again.
    pub fn del_condition(&mut self, label: &str) -> Option<Guard<C>> {
        self.guards.remove(label)
    }

    /// Bind an action. Keys are checked against the machine on compile.
    pub fn on_action(
        &mut self,
        kind: ActionKind,
        key: impl Into<String>,
        action: Action<C>,
    ) -> &mut Self {
        self.actions.insert(kind, key, action);
        self
    }

    /// Bind a textual action such as `count = count + 1`.
    pub fn on_action_script(
        &mut self,
        kind: ActionKind,
        key: impl Into<String>,
        source: &str,
    ) -> Result<&mut Self, DefinitionError> {
        let action =
            Action::script(source).map_err(|source_err| DefinitionError::InvalidExpression {
                text: source.to_string(),
                source: source_err,
            })?;
        Ok(self.on_action(kind, key, action))
    }

    /// Run `action` whenever the machine enters `state`.
    pub fn on_entry(&mut self, state: impl Into<String>, action: Action<C>) -> &mut Self {
        self.on_action(ActionKind::OnEntry, state, action)
    }

    /// Run `action` whenever the machine leaves `state`.
    pub fn on_exit(&mut self, state: impl Into<String>, action: Action<C>) -> &mut Self {
        self.on_action(ActionKind::OnExit, state, action)
    }

    /// Run `action` at the start of every step taken from `state`.
    pub fn on_state(&mut self, state: impl Into<String>, action: Action<C>) -> &mut Self {
        self.on_action(ActionKind::OnState, state, action)
    }

    /// Run `action` whenever the transition `label` fires.
    pub fn on_transition(&mut self, label: impl Into<String>, action: Action<C>) -> &mut Self {
        self.on_action(ActionKind::OnTransition, label, action)
    }

    /// Override the entry point, which otherwise is the origin of the first
    /// statement.
    pub fn entry_point(&mut self, state: impl Into<String>) -> &mut Self {
        self.entry_point = Some(state.into());
        self
    }

    /// Statements in registration order, as written.
    pub fn transitions(&self) -> &[String] {
        &self.statements
    }

    /// Registered conditions keyed by label.
    pub fn conditions(&self) -> &GuardRegistry<C> {
        &self.guards
    }

    /// Registered action bindings.
    pub fn actions(&self) -> &ActionRegistry<C> {
        &self.actions
    }

    /// Configuration the compiled machine will start with.
    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    /// Compile into a runnable machine.
    ///
    /// Fatal problems are returned as errors. Unused conditions, dead
    /// states and stray action keys are kept as diagnostics on the machine.
    pub fn compile(self) -> Result<Machine<C>, DefinitionError> {
        self.compile_parts()
            .map(Machine::from_parts)
            .inspect_err(|err| error!(error = %err, "compilation failed"))
    }

    fn compile_parts(self) -> Result<CompiledParts<C>, DefinitionError> {
        let MachineBuilder {
            statements: raw,
            guards,
            actions,
            entry_point,
            config,
        } = self;

        let statements = raw
            .iter()
            .map(|line| parse_statement(line).map_err(DefinitionError::compile_failure))
            .collect::<Result<Vec<_>, _>>()?;
        let first = statements.first().ok_or(DefinitionError::NoTransitions)?;
        let separator = first.separator;

        let states = StateTable::from_statements(&statements);
        let mut matrix = TransitionMatrix::new(states.len());
        let mut used: BTreeSet<String> = BTreeSet::new();
        let mut unused: BTreeSet<&str> = guards.labels().collect();

        for (statement, line) in statements.iter().zip(&raw) {
            if statement.separator != separator {
                return Err(DefinitionError::InconsistentTransition {
                    expected: separator,
                    found: statement.separator,
                    statement: line.trim().to_string(),
                });
            }
            if !guards.contains(&statement.label) {
                return Err(DefinitionError::UndefinedTransition {
                    label: statement.label.clone(),
                    statement: line.trim().to_string(),
                });
            }
            let origin = index_of(&states, &statement.origin)?;
            let destination = index_of(&states, &statement.destination)?;

            if used.contains(&statement.label) {
                return Err(DefinitionError::DuplicateLabel {
                    label: statement.label.clone(),
                });
            }
            if let Cell::Label(existing) = matrix.get(origin, destination) {
                return Err(DefinitionError::ParallelTransition {
                    origin: statement.origin.clone(),
                    destination: statement.destination.clone(),
                    existing: existing.clone(),
                    label: statement.label.clone(),
                });
            }

            matrix.set(origin, destination, statement.label.as_str());
            unused.remove(statement.label.as_str());
            used.insert(statement.label.clone());
        }

        let entry = match &entry_point {
            Some(name) => states
                .index_of(name)
                .ok_or_else(|| DefinitionError::UnknownState { name: name.clone() })?,
            None => index_of(&states, &first.origin)?,
        };

        let accessibility = Accessibility::from_matrix(&matrix);
        let conditions: BTreeSet<&str> = guards.labels().collect();

        let mut checks = vec![
            validation::unused_transitions(unused.iter().copied()),
            validation::dead_states(&states, &accessibility, entry),
        ];
        checks.extend(ActionKind::ALL.iter().map(|&kind| {
            validation::invalid_actions(kind, actions.keys(kind), &states, &conditions)
        }));
        let diagnostics = validation::accumulate(checks);

        for diagnostic in &diagnostics {
            report(diagnostic, config.surface_warnings);
        }
        debug!(
            states = states.len(),
            transitions = matrix.transition_count(),
            entry = states.name(entry),
            separator = %separator,
            "compiled machine"
        );

        Ok(CompiledParts {
            statements,
            separator,
            states,
            matrix,
            accessibility,
            guards,
            actions,
            entry,
            diagnostics,
            config,
        })
    }
}

fn index_of(states: &StateTable, name: &str) -> Result<usize, DefinitionError> {
    states
        .index_of(name)
        .ok_or_else(|| DefinitionError::compile_failure(format!("state '{name}' missing from index")))
}

impl<C> Default for MachineBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for MachineBuilder<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MachineBuilder")
            .field("statements", &self.statements)
            .field("guards", &self.guards)
            .field("actions", &self.actions)
            .field("entry_point", &self.entry_point)
            .field("config", &self.config)
            .finish()
    }
}
