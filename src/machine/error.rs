//! Errors raised while wiring or driving a machine.

use crate::builder::BuildError;
use crate::core::Layer;
use thiserror::Error;

/// Errors that can occur when registering with or operating a state machine.
///
/// Registration errors mean the machine was wired incorrectly and should not
/// be started. Lookup errors are never replaced by a default answer.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MachineError {
    #[error("State '{state}' is already registered on layer {layer}")]
    DuplicateState { layer: Layer, state: &'static str },

    #[error("Layer {0} has no registered states")]
    UnknownLayer(Layer),

    #[error("State '{state}' is not registered on layer {layer}")]
    UnknownState { layer: Layer, state: &'static str },

    #[error("Machine has already started; registration is closed")]
    AlreadyStarted,

    #[error("Machine has not started. Call setup_layers() first")]
    NotStarted,

    #[error("Machine has no states to start with")]
    NoStates,

    #[error("Invalid transition: {0}")]
    Build(#[from] BuildError),
}
