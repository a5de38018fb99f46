//! Host adapter driving a machine from a game loop.
//!
//! A game describes one kind of machine with a [`StateMachineDefinition`]
//! (which states exist, how they connect) and lets a [`HostedStateMachine`]
//! build it for each entity once the entity exists. Until then, ticks are
//! ignored, so the host can forward its frame callback unconditionally.

use crate::config::MachineConfig;
use crate::core::{Command, Layer, Message, State, StateChanged};
use crate::machine::{MachineError, StateMachine};
use std::any::Any;
use tracing::debug;

/// Shape of machine for one type of entity.
pub trait StateMachineDefinition: Sized {
    type Owner;
    type State: State<Self::Owner>;

    /// Configuration for each machine built from this definition.
    fn config(&self) -> MachineConfig {
        MachineConfig::default()
    }

    /// Register the states. The first state of each layer is its initial state.
    fn add_states(&self, machine: &mut DefinedMachine<Self>) -> Result<(), MachineError>;

    /// Register the transitions between the states.
    fn make_transitions(&self, machine: &mut DefinedMachine<Self>) -> Result<(), MachineError>;
}

/// The machine type produced by a definition.
pub type DefinedMachine<D> =
    StateMachine<<D as StateMachineDefinition>::State, <D as StateMachineDefinition>::Owner>;

type Kind<D> = <<D as StateMachineDefinition>::State as State<
    <D as StateMachineDefinition>::Owner,
>>::Kind;

type Relay<D> = Box<dyn FnMut(&StateChanged<Kind<D>>) + Send>;

/// Owns a machine built from a definition and forwards host calls to it.
pub struct HostedStateMachine<D: StateMachineDefinition> {
    definition: D,
    machine: Option<DefinedMachine<D>>,
    pending: Vec<Relay<D>>,
}

impl<D: StateMachineDefinition> HostedStateMachine<D> {
    pub fn new(definition: D) -> Self {
        Self {
            definition,
            machine: None,
            pending: Vec::new(),
        }
    }

    /// Build and start the machine for `owner`.
    ///
    /// Runs the definition's `add_states`, then `make_transitions`, then
    /// enters every layer. Relays registered before this call see the
    /// initial activations.
    pub fn setup(&mut self, owner: D::Owner) -> Result<(), MachineError> {
        if self.machine.is_some() {
            return Err(MachineError::AlreadyStarted);
        }

        let mut machine = StateMachine::with_config(owner, self.definition.config());
        for relay in self.pending.drain(..) {
            machine.subscribe(relay);
        }
        self.definition.add_states(&mut machine)?;
        self.definition.make_transitions(&mut machine)?;
        machine.setup_layers()?;

        debug!(machine = %machine.id(), "hosted machine set up");
        self.machine = Some(machine);
        Ok(())
    }

    /// Forward a frame tick. Does nothing before [`setup`](Self::setup).
    pub fn update(&mut self) -> Result<(), MachineError> {
        match self.machine.as_mut() {
            Some(machine) => machine.update(),
            None => Ok(()),
        }
    }

    /// Relay every state change of the machine to `observer`.
    pub fn on_state_changed<F>(&mut self, observer: F)
    where
        F: FnMut(&StateChanged<Kind<D>>) + Send + 'static,
    {
        match self.machine.as_mut() {
            Some(machine) => {
                machine.subscribe(observer);
            }
            None => self.pending.push(Box::new(observer)),
        }
    }

    fn running(&self) -> Result<&DefinedMachine<D>, MachineError> {
        self.machine.as_ref().ok_or(MachineError::NotStarted)
    }

    fn running_mut(&mut self) -> Result<&mut DefinedMachine<D>, MachineError> {
        self.machine.as_mut().ok_or(MachineError::NotStarted)
    }

    pub fn execute_command(&mut self, command: impl Into<Command>) -> Result<bool, MachineError> {
        self.running_mut()?.execute_command(command)
    }

    pub fn execute_command_on(
        &mut self,
        command: impl Into<Command>,
        layer: impl Into<Layer>,
    ) -> Result<bool, MachineError> {
        self.running_mut()?.execute_command_on(command, layer)
    }

    pub fn send_message(
        &mut self,
        message: impl Into<Message>,
        data: Option<&dyn Any>,
    ) -> Result<bool, MachineError> {
        self.running_mut()?.send_message(message, data)
    }

    pub fn send_message_to(
        &mut self,
        message: impl Into<Message>,
        layer: impl Into<Layer>,
        data: Option<&dyn Any>,
    ) -> Result<bool, MachineError> {
        self.running_mut()?.send_message_to(message, layer, data)
    }

    /// False before setup.
    pub fn is_in_state(&self, kind: Kind<D>) -> bool {
        self.machine
            .as_ref()
            .is_some_and(|machine| machine.is_in_state(kind))
    }

    pub fn is_in_state_on(
        &self,
        kind: Kind<D>,
        layer: impl Into<Layer>,
    ) -> Result<bool, MachineError> {
        self.running()?.is_in_state_on(kind, layer)
    }

    pub fn current_state(&self, layer: impl Into<Layer>) -> Result<&D::State, MachineError> {
        self.running()?.current_state(layer)
    }

    pub fn current_kind(&self, layer: impl Into<Layer>) -> Result<Kind<D>, MachineError> {
        self.running()?.current_kind(layer)
    }

    /// The entity, once set up.
    pub fn owner(&self) -> Option<&D::Owner> {
        self.machine.as_ref().map(|machine| machine.owner())
    }

    pub fn owner_mut(&mut self) -> Option<&mut D::Owner> {
        self.machine.as_mut().map(|machine| machine.owner_mut())
    }

    pub fn machine(&self) -> Option<&DefinedMachine<D>> {
        self.machine.as_ref()
    }

    pub fn machine_mut(&mut self) -> Option<&mut DefinedMachine<D>> {
        self.machine.as_mut()
    }

    pub fn definition(&self) -> &D {
        &self.definition
    }

    pub fn is_set_up(&self) -> bool {
        self.machine.is_some()
    }
}
