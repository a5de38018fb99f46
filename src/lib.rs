//! Stance: a layered finite-state machine for gameplay entities
//!
//! A machine drives one owner (an entity) through states grouped into
//! independent layers, for example a movement layer and a combat layer. Each
//! layer has exactly one active state. Once per frame the host calls
//! [`StateMachine::update`], which resolves every layer in ascending order.
//!
//! # Core Concepts
//!
//! - **State**: A behavior unit with lifecycle hooks via the `State` trait
//! - **StateKind**: The closed set of tags naming a machine's states
//! - **Guards**: Predicates over the active state and the owner
//! - **Any-transitions**: Transitions usable from every state of a layer,
//!   always checked before the active state's own transitions
//! - **Commands**: Tokens that request a specific transition explicitly
//! - **Messages**: Tokens delivered to active states, never transitions
//!
//! # Example
//!
//! ```rust
//! use stance::core::State;
//! use stance::machine::StateMachine;
//! use stance::state_kinds;
//!
//! state_kinds! {
//!     enum EntityKind {
//!         Default,
//!         Rolling,
//!         Dead,
//!     }
//! }
//!
//! #[derive(Default)]
//! struct Entity {
//!     is_rolling: bool,
//!     is_dead: bool,
//! }
//!
//! struct EntityState(EntityKind);
//!
//! impl State<Entity> for EntityState {
//!     type Kind = EntityKind;
//!
//!     fn kind(&self) -> EntityKind {
//!         self.0
//!     }
//! }
//!
//! # fn main() -> Result<(), stance::MachineError> {
//! let mut machine = StateMachine::new(Entity::default());
//! machine.add_state(0, EntityState(EntityKind::Default))?;
//! machine.add_state(0, EntityState(EntityKind::Rolling))?;
//! machine.add_state(0, EntityState(EntityKind::Dead))?;
//!
//! machine.make_transition(
//!     EntityKind::Default,
//!     EntityKind::Rolling,
//!     None,
//!     Some(stance::Guard::new(|_, e: &Entity| e.is_rolling)),
//!     0,
//! )?;
//! machine.make_any_transition(
//!     EntityKind::Dead,
//!     None,
//!     Some(stance::Guard::new(|_, e: &Entity| e.is_dead)),
//!     0,
//!     false,
//! )?;
//! machine.setup_layers()?;
//!
//! machine.owner_mut().is_rolling = true;
//! machine.update()?;
//! assert!(machine.is_in_state(EntityKind::Rolling));
//!
//! machine.owner_mut().is_dead = true;
//! machine.update()?;
//! assert!(machine.is_in_state(EntityKind::Dead));
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod config;
pub mod core;
pub mod host;
pub mod machine;

// Re-export commonly used types
pub use builder::{BuildError, StateMachineBuilder, TransitionBuilder};
pub use config::{ConfigError, MachineConfig};
pub use crate::core::{Command, Guard, Layer, Message, State, StateChanged, StateKind, Trigger};
pub use host::{HostedStateMachine, StateMachineDefinition};
pub use machine::{MachineError, StateMachine};
