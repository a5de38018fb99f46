//! Transitions and the builder that validates them.

use crate::builder::error::BuildError;
use crate::core::{Command, Guard, Layer, State};
use std::fmt;

/// Where a transition can be taken from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Source<K> {
    /// Usable whatever the active state is.
    Any,
    /// Usable only while the given state is active.
    State(K),
}

/// An edge of the transition graph.
///
/// A transition always carries a command, a guard, or both. Guard-only
/// transitions are picked up automatically during ticks; transitions with a
/// command only fire through `execute_command`.
pub struct Transition<S: State<O>, O> {
    source: Source<S::Kind>,
    target: S::Kind,
    command: Option<Command>,
    guard: Option<Guard<S, O>>,
    allow_self: bool,
    layer: Layer,
}

impl<S: State<O>, O> Transition<S, O> {
    pub fn source(&self) -> Source<S::Kind> {
        self.source
    }

    pub fn target(&self) -> S::Kind {
        self.target
    }

    pub fn command(&self) -> Option<Command> {
        self.command
    }

    pub fn layer(&self) -> Layer {
        self.layer
    }

    pub fn allows_self(&self) -> bool {
        self.allow_self
    }

    pub fn has_guard(&self) -> bool {
        self.guard.is_some()
    }

    /// True when there is no guard, or the guard holds.
    ///
    /// Evaluated fresh on each call.
    pub fn is_transferable(&self, active: &S, owner: &O) -> bool {
        self.guard.as_ref().map_or(true, |g| g.check(active, owner))
    }
}

impl<S: State<O>, O> fmt::Debug for Transition<S, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("source", &self.source)
            .field("target", &self.target)
            .field("command", &self.command)
            .field("guarded", &self.guard.is_some())
            .field("allow_self", &self.allow_self)
            .field("layer", &self.layer)
            .finish()
    }
}

/// Builder for constructing transitions with a fluent API.
///
/// # Example
///
/// ```rust
/// use stance::builder::TransitionBuilder;
/// use stance::core::{Command, State};
/// use stance::state_kinds;
///
/// state_kinds! {
///     enum Kind { Default, Dead }
/// }
///
/// struct Entity { is_dead: bool }
///
/// struct Plain(Kind);
///
/// impl State<Entity> for Plain {
///     type Kind = Kind;
///     fn kind(&self) -> Kind { self.0 }
/// }
///
/// let to_dead = TransitionBuilder::<Plain, Entity>::any()
///     .to(Kind::Dead)
///     .when(|_, entity: &Entity| entity.is_dead)
///     .build()
///     .unwrap();
///
/// assert!(to_dead.command().is_none());
/// assert!(to_dead.is_transferable(&Plain(Kind::Default), &Entity { is_dead: true }));
/// ```
pub struct TransitionBuilder<S: State<O>, O> {
    source: Option<Source<S::Kind>>,
    target: Option<S::Kind>,
    command: Option<Command>,
    guard: Option<Guard<S, O>>,
    allow_self: Option<bool>,
    layer: Layer,
}

impl<S: State<O>, O> TransitionBuilder<S, O> {
    /// Create an empty builder. Call [`from`](Self::from) to set the source.
    pub fn new() -> Self {
        Self {
            source: None,
            target: None,
            command: None,
            guard: None,
            allow_self: None,
            layer: Layer::BASE,
        }
    }

    /// Create a builder for a transition usable from any state.
    pub fn any() -> Self {
        Self {
            source: Some(Source::Any),
            ..Self::new()
        }
    }

    /// Set the source state.
    pub fn from(mut self, kind: S::Kind) -> Self {
        self.source = Some(Source::State(kind));
        self
    }

    /// Set the target state (required).
    pub fn to(mut self, kind: S::Kind) -> Self {
        self.target = Some(kind);
        self
    }

    /// Require an explicit command to take this transition.
    pub fn on_command(mut self, command: impl Into<Command>) -> Self {
        self.command = Some(command.into());
        self
    }

    /// Add a guard predicate.
    pub fn guard(mut self, guard: Guard<S, O>) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Add a guard using a closure.
    pub fn when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&S, &O) -> bool + Send + Sync + 'static,
    {
        self.guard = Some(Guard::new(predicate));
        self
    }

    /// Let the transition fire even when its target is already active.
    ///
    /// Transitions from a named state allow this unless
    /// [`deny_self`](Self::deny_self) is called; any-transitions do not.
    pub fn allow_self(mut self) -> Self {
        self.allow_self = Some(true);
        self
    }

    /// Skip the transition during ticks while its target is already active.
    pub fn deny_self(mut self) -> Self {
        self.allow_self = Some(false);
        self
    }

    /// Place the transition on a layer other than [`Layer::BASE`].
    pub fn layer(mut self, layer: impl Into<Layer>) -> Self {
        self.layer = layer.into();
        self
    }

    /// Build the transition.
    pub fn build(self) -> Result<Transition<S, O>, BuildError> {
        let source = self.source.ok_or(BuildError::MissingFromState)?;
        let target = self.target.ok_or(BuildError::MissingToState)?;

        if self.command.is_none() && self.guard.is_none() {
            return Err(BuildError::MissingTrigger);
        }

        let allow_self = self
            .allow_self
            .unwrap_or(matches!(source, Source::State(_)));

        Ok(Transition {
            source,
            target,
            command: self.command,
            guard: self.guard,
            allow_self,
            layer: self.layer,
        })
    }
}

impl<S: State<O>, O> Default for TransitionBuilder<S, O> {
    fn default() -> Self {
        Self::new()
    }
}
