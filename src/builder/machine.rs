//! Builder for constructing state machines.

use crate::builder::transition::TransitionBuilder;
use crate::config::MachineConfig;
use crate::core::{Layer, State};
use crate::machine::{MachineError, StateMachine};

/// Builder for constructing started state machines with a fluent API.
///
/// States are registered in the order they were given, then transitions,
/// then every layer is entered.
pub struct StateMachineBuilder<S: State<O>, O> {
    config: MachineConfig,
    states: Vec<(Layer, S)>,
    transitions: Vec<TransitionBuilder<S, O>>,
}

impl<S: State<O>, O> StateMachineBuilder<S, O> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            config: MachineConfig::default(),
            states: Vec::new(),
            transitions: Vec::new(),
        }
    }

    /// Use a configuration other than the default.
    pub fn config(mut self, config: MachineConfig) -> Self {
        self.config = config;
        self
    }

    /// Register a state. The first state of each layer is its initial state.
    pub fn state(mut self, layer: impl Into<Layer>, state: S) -> Self {
        self.states.push((layer.into(), state));
        self
    }

    /// Register several states on one layer, in order.
    pub fn states(mut self, layer: impl Into<Layer>, states: impl IntoIterator<Item = S>) -> Self {
        let layer = layer.into();
        self.states
            .extend(states.into_iter().map(|state| (layer, state)));
        self
    }

    /// Add a transition using a builder.
    pub fn transition(mut self, builder: TransitionBuilder<S, O>) -> Self {
        self.transitions.push(builder);
        self
    }

    /// Add multiple transitions at once.
    pub fn transitions(mut self, builders: Vec<TransitionBuilder<S, O>>) -> Self {
        self.transitions.extend(builders);
        self
    }

    /// Wire a machine for `owner` and start it.
    ///
    /// Fails on the first registration error; a machine is never returned
    /// partially wired.
    pub fn build(self, owner: O) -> Result<StateMachine<S, O>, MachineError> {
        if self.states.is_empty() {
            return Err(MachineError::NoStates);
        }

        let mut machine = StateMachine::with_config(owner, self.config);
        for (layer, state) in self.states {
            machine.add_state(layer, state)?;
        }
        for transition in self.transitions {
            machine.add_transition(transition)?;
        }
        machine.setup_layers()?;

        Ok(machine)
    }
}

impl<S: State<O>, O> Default for StateMachineBuilder<S, O> {
    fn default() -> Self {
        Self::new()
    }
}
