//! Builder API for ergonomic state machine construction.
//!
//! This module provides fluent builders and macros for wiring state machines
//! with minimal boilerplate. Builders validate their input and report
//! wiring mistakes as errors instead of producing a half-wired machine.

pub mod error;
pub mod machine;
pub mod macros;
pub mod transition;

pub use error::BuildError;
pub use machine::StateMachineBuilder;
pub use transition::{Source, Transition, TransitionBuilder};

use crate::core::{Command, State};

/// Start a transition between two states that fires when `guard` holds.
///
/// # Example
///
/// ```
/// use stance::builder::guarded_transition;
/// use stance::core::State;
/// use stance::state_kinds;
///
/// state_kinds! {
///     enum Kind { Default, Rolling }
/// }
///
/// struct Movement { is_rolling: bool }
///
/// struct Plain(Kind);
///
/// impl State<Movement> for Plain {
///     type Kind = Kind;
///     fn kind(&self) -> Kind { self.0 }
/// }
///
/// let transition = guarded_transition::<Plain, Movement, _>(
///     Kind::Default,
///     Kind::Rolling,
///     |_, movement| movement.is_rolling,
/// )
/// .build()
/// .unwrap();
///
/// assert!(transition.is_transferable(&Plain(Kind::Default), &Movement { is_rolling: true }));
/// ```
pub fn guarded_transition<S, O, F>(from: S::Kind, to: S::Kind, guard: F) -> TransitionBuilder<S, O>
where
    S: State<O>,
    F: Fn(&S, &O) -> bool + Send + Sync + 'static,
{
    TransitionBuilder::new().from(from).to(to).when(guard)
}

/// Start a transition between two states that fires on `command`.
///
/// # Example
///
/// ```
/// use stance::builder::command_transition;
/// use stance::core::{Command, State};
/// use stance::state_kinds;
///
/// state_kinds! {
///     enum Kind { Stunned, Default }
/// }
///
/// struct Plain(Kind);
///
/// impl State<()> for Plain {
///     type Kind = Kind;
///     fn kind(&self) -> Kind { self.0 }
/// }
///
/// let transition = command_transition::<Plain, ()>(Kind::Stunned, Kind::Default, 0)
///     .build()
///     .unwrap();
///
/// assert_eq!(transition.command(), Some(Command(0)));
/// ```
pub fn command_transition<S, O>(
    from: S::Kind,
    to: S::Kind,
    command: impl Into<Command>,
) -> TransitionBuilder<S, O>
where
    S: State<O>,
{
    TransitionBuilder::new().from(from).to(to).on_command(command)
}
