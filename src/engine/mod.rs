//! Running a compiled machine.
//!
//! [`Machine`] owns everything the compiler produced and is the only place
//! the current state and history change. Drivers call [`Machine::step`]
//! from one task at a time; the machine does no locking of its own.

mod config;
mod error;
mod machine;
mod render;
mod snapshot;

pub use config::MachineConfig;
pub use error::StepError;
pub use machine::{Machine, StepOutcome};
pub use snapshot::MachineSnapshot;

pub(crate) use machine::CompiledParts;
