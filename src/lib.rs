//! Guardfsm: guarded finite state machines from a tiny transition grammar
//!
//! A machine is described by statements of the form `origin -> destination : label`
//! and one guard per label. Compilation derives the sorted state set, builds a
//! labeled adjacency matrix, and reports structural issues (unused guards,
//! unreachable states, stray action bindings) as diagnostics. Each step then
//! evaluates the guards leaving the current state against a caller-supplied
//! context and moves along the single transition whose guard holds.
//!
//! # Core Concepts
//!
//! - **Statements**: `A -> B : t0`, `A => B : t0` or `A , B : t0`; one machine uses one separator
//! - **Guards**: restricted boolean expressions or predicate closures over the context
//! - **Actions**: on-entry, on-exit, on-state and on-transition callbacks or scripts
//! - **History**: a bounded ring of visited states with cycle detection on top
//!
//! # Example
//!
//! ```rust
//! use guardfsm::{Guard, MachineBuilder};
//! use guardfsm::expr::Variables;
//!
//! let mut builder = MachineBuilder::<Variables>::new();
//! builder.add_transition("A -> B : t0").unwrap();
//! builder.add_transition("B -> C : t1").unwrap();
//! builder.add_transition("C -> A : t2").unwrap();
//! for label in ["t0", "t1", "t2"] {
//!     builder.add_condition_expr(label, "tick % 2 == 0").unwrap();
//! }
//! let mut machine = builder.compile().unwrap();
//!
//! let mut vars = Variables::new();
//! for tick in 0..6 {
//!     vars.set("tick", tick);
//!     machine.step(&mut vars).unwrap();
//! }
//! assert_eq!(machine.history(), vec!["A", "B", "C", "A"]);
//! assert_eq!(machine.detect_closed_cycle(None), None);
//! ```

pub mod builder;
pub mod core;
pub mod engine;
pub mod expr;

// Re-export commonly used types
pub use builder::{ActionKind, DefinitionError, Diagnostic, MachineBuilder};
pub use core::{Action, CallbackError, Guard, Separator, TransitionRecord};
pub use engine::{Machine, MachineConfig, MachineSnapshot, StepError, StepOutcome};
pub use expr::{Scope, Value, Variables};
