//! Small value types that address parts of a machine.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// An independent slot of a machine with its own active state.
///
/// Layers are ordered numerically and always processed in ascending order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Layer(pub i32);

impl Layer {
    /// The layer used when none is specified.
    pub const BASE: Layer = Layer(0);
}

impl Default for Layer {
    fn default() -> Self {
        Self::BASE
    }
}

impl From<i32> for Layer {
    fn from(value: i32) -> Self {
        Layer(value)
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Externally supplied token that requests a specific transition.
///
/// Game code usually keeps its commands in an enum and converts with a
/// `From` impl:
///
/// ```rust
/// use stance::core::Command;
///
/// #[derive(Clone, Copy)]
/// enum EntityCommand {
///     ToDefaultState,
///     ToStunningState,
/// }
///
/// impl From<EntityCommand> for Command {
///     fn from(command: EntityCommand) -> Self {
///         Command(command as i32)
///     }
/// }
///
/// assert_eq!(Command::from(EntityCommand::ToStunningState), Command(1));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Command(pub i32);

impl From<i32> for Command {
    fn from(value: i32) -> Self {
        Command(value)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Token delivered to the active state of a layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Message(pub i32);

impl From<i32> for Message {
    fn from(value: i32) -> Self {
        Message(value)
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identity of a machine instance, attached to every notification it emits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MachineId(Uuid);

impl MachineId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for MachineId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MachineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layers_order_numerically() {
        let mut layers = vec![Layer(2), Layer(-1), Layer::BASE, Layer(1)];
        layers.sort();
        assert_eq!(layers, vec![Layer(-1), Layer(0), Layer(1), Layer(2)]);
    }

    #[test]
    fn default_layer_is_base() {
        assert_eq!(Layer::default(), Layer::BASE);
        assert_eq!(Layer::from(0), Layer::BASE);
    }

    #[test]
    fn command_accepts_extreme_values() {
        assert_eq!(Command::from(i32::MIN), Command(i32::MIN));
        assert_ne!(Command(i32::MIN), Command(0));
    }

    #[test]
    fn machine_ids_are_unique() {
        assert_ne!(MachineId::new(), MachineId::new());
    }

    #[test]
    fn ids_display_readably() {
        assert_eq!(Layer(3).to_string(), "3");
        assert_eq!(Command(7).to_string(), "#7");
        assert_eq!(Message(0).to_string(), "#0");
    }
}
