//! Build errors for transition builders.

use thiserror::Error;

/// Errors that can occur when building transitions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("Transition source not specified. Call .from(kind) or start with TransitionBuilder::any()")]
    MissingFromState,

    #[error("Transition target not specified. Call .to(kind)")]
    MissingToState,

    #[error("Transition has neither a command nor a guard. Call .on_command(command) or .when(guard)")]
    MissingTrigger,
}
