//! The State trait and the kind tags that identify states.
//!
//! A machine is specialized over a closed set of state variants. Each
//! variant is named by a value of a [`StateKind`] enum, and the machine keys
//! its registry by `(layer, kind)`.

use super::ids::{Layer, MachineId, Message};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::any::Any;
use std::fmt::Debug;
use std::hash::Hash;

/// Tag naming one concrete state variant.
///
/// Usually generated with [`state_kinds!`](crate::state_kinds).
///
/// # Example
///
/// ```rust
/// use stance::core::StateKind;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// enum EntityKind {
///     Default,
///     Rolling,
///     Dead,
/// }
///
/// impl StateKind for EntityKind {
///     fn name(&self) -> &'static str {
///         match self {
///             Self::Default => "Default",
///             Self::Rolling => "Rolling",
///             Self::Dead => "Dead",
///         }
///     }
/// }
///
/// assert_eq!(EntityKind::Rolling.name(), "Rolling");
/// ```
pub trait StateKind:
    Copy + Eq + Hash + Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Name used in logs and diagnostics.
    fn name(&self) -> &'static str;
}

/// References handed to a state once, when it is registered.
pub struct SetupContext<'a, O> {
    /// Machine the state now belongs to.
    pub machine: MachineId,
    /// Layer the state was registered on.
    pub layer: Layer,
    /// The entity driven by the machine.
    pub owner: &'a O,
}

/// A behavior unit owned by a machine and driven through its lifecycle.
///
/// Hooks receive the owner explicitly instead of caching a back-reference.
/// The machine guarantees:
///
/// - `setup` runs exactly once, before any `enter`.
/// - `enter` is never called twice without an `exit` in between.
/// - `exit` is only called on a state that was entered.
/// - `update` runs once per tick while active, and only on ticks where the
///   layer did not change state.
///
/// Every hook except [`kind`](State::kind) defaults to a no-op.
///
/// # Example
///
/// ```rust
/// use stance::core::{State, StateKind};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// enum DoorKind { Closed, Open }
///
/// impl StateKind for DoorKind {
///     fn name(&self) -> &'static str {
///         match self {
///             Self::Closed => "Closed",
///             Self::Open => "Open",
///         }
///     }
/// }
///
/// struct Door { hinges_moving: bool }
///
/// enum DoorState { Closed, Open }
///
/// impl State<Door> for DoorState {
///     type Kind = DoorKind;
///
///     fn kind(&self) -> DoorKind {
///         match self {
///             Self::Closed => DoorKind::Closed,
///             Self::Open => DoorKind::Open,
///         }
///     }
///
///     fn enter(&mut self, door: &mut Door) {
///         door.hinges_moving = matches!(self, Self::Open);
///     }
/// }
/// ```
pub trait State<O> {
    type Kind: StateKind;

    /// Variant tag of this state.
    fn kind(&self) -> Self::Kind;

    /// Called once right after registration.
    fn setup(&mut self, _ctx: SetupContext<'_, O>) {}

    /// Called when the state becomes the active state of its layer.
    fn enter(&mut self, _owner: &mut O) {}

    /// Called once per tick while active, when no transition fired.
    fn update(&mut self, _owner: &mut O) {}

    /// Called when the state stops being active. Undoes `enter`.
    fn exit(&mut self, _owner: &mut O) {}

    /// Handle a message. Returns whether it was handled.
    fn on_receive_message(
        &mut self,
        _owner: &mut O,
        _message: Message,
        _data: Option<&dyn Any>,
    ) -> bool {
        false
    }
}

/// Boxed states forward to their contents, so a machine can hold
/// heterogeneous `Box<dyn State<O, Kind = K>>` values instead of an enum.
impl<O, K: StateKind> State<O> for Box<dyn State<O, Kind = K>> {
    type Kind = K;

    #[inline]
    fn kind(&self) -> K {
        (**self).kind()
    }

    #[inline]
    fn setup(&mut self, ctx: SetupContext<'_, O>) {
        (**self).setup(ctx)
    }

    #[inline]
    fn enter(&mut self, owner: &mut O) {
        (**self).enter(owner)
    }

    #[inline]
    fn update(&mut self, owner: &mut O) {
        (**self).update(owner)
    }

    #[inline]
    fn exit(&mut self, owner: &mut O) {
        (**self).exit(owner)
    }

    #[inline]
    fn on_receive_message(
        &mut self,
        owner: &mut O,
        message: Message,
        data: Option<&dyn Any>,
    ) -> bool {
        (**self).on_receive_message(owner, message, data)
    }
}
