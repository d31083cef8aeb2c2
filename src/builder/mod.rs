//! Defining machines: registration, compilation and its diagnostics.
//!
//! Transition statements, conditions and actions are collected in a
//! [`MachineBuilder`] and compiled once into a [`Machine`](crate::Machine).

pub mod diagnostics;
pub mod error;
pub mod machine;
pub mod macros;
pub mod registry;
mod validation;

pub use diagnostics::Diagnostic;
pub use error::DefinitionError;
pub use machine::MachineBuilder;
pub use registry::{ActionKind, ActionRegistry, GuardRegistry};
