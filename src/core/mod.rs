//! Core state machine types.
//!
//! This module contains the vocabulary shared by the machine, the builders
//! and the host adapter:
//! - States and their kind tags via the `State` and `StateKind` traits
//! - Guard predicates for transition control
//! - Layer, command, message and machine identifiers
//! - State change notifications and the bounded transition log

mod guard;
mod history;
mod ids;
mod state;

pub use guard::Guard;
pub use history::{StateChanged, TransitionLog, TransitionRecord, Trigger};
pub use ids::{Command, Layer, MachineId, Message};
pub use state::{SetupContext, State, StateKind};
