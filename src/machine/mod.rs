//! The layered state machine.
//!
//! This module owns the runtime side of the crate: state registration, the
//! per-tick resolution algorithm, command and message dispatch, and state
//! change notifications.
//!
//! # Resolution
//!
//! On every tick, each layer is resolved independently in ascending layer
//! order:
//!
//! 1. The layer's any-transitions are scanned in registration order.
//! 2. If none fired, the active state's own transitions are scanned.
//! 3. If still none fired, the active state's `update` hook runs.
//!
//! A transition is eligible during a tick when it carries no command, its
//! guard (if any) holds, and its target differs from the active state unless
//! it allows self-transitions. The first eligible transition wins.

mod error;
mod layer;
mod observers;
mod state_machine;

pub use error::MachineError;
pub use observers::SubscriptionId;
pub use state_machine::StateMachine;
