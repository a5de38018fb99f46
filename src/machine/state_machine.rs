//! Layered state machine driven by per-frame ticks.

use crate::builder::{Source, TransitionBuilder};
use crate::config::MachineConfig;
use crate::core::{
    Command, Guard, Layer, MachineId, Message, SetupContext, State, StateChanged, StateKind,
    TransitionLog, Trigger,
};
use crate::machine::error::MachineError;
use crate::machine::layer::{LayerStates, Selector};
use crate::machine::observers::{Notifier, SubscriptionId};
use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, trace, warn};

/// State machine owning an entity's states, transitions and active states.
///
/// States are partitioned into layers. Each layer has exactly one active
/// state once the machine has started, and layers are resolved
/// independently in ascending order on every [`update`](Self::update).
///
/// The machine is wired in two phases:
///
/// 1. Registration: [`add_state`](Self::add_state),
///    [`make_transition`](Self::make_transition),
///    [`make_any_transition`](Self::make_any_transition) or
///    [`add_transition`](Self::add_transition).
/// 2. [`setup_layers`](Self::setup_layers), which enters the first state
///    registered on every layer. Registration is closed afterwards.
pub struct StateMachine<S: State<O>, O> {
    id: MachineId,
    owner: O,
    layers: BTreeMap<Layer, LayerStates<S, O>>,
    notifier: Notifier<S::Kind>,
    config: MachineConfig,
    started: bool,
    tick: u64,
}

impl<S: State<O>, O> StateMachine<S, O> {
    /// Create an empty machine driving `owner`, with the default configuration.
    pub fn new(owner: O) -> Self {
        Self::with_config(owner, MachineConfig::default())
    }

    pub fn with_config(owner: O, config: MachineConfig) -> Self {
        let id = MachineId::new();
        Self {
            id,
            owner,
            layers: BTreeMap::new(),
            notifier: Notifier::new(id, config.history_capacity),
            config,
            started: false,
            tick: 0,
        }
    }

    fn ensure_registering(&self) -> Result<(), MachineError> {
        if self.started {
            return Err(MachineError::AlreadyStarted);
        }
        Ok(())
    }

    fn ensure_started(&self) -> Result<(), MachineError> {
        if !self.started {
            return Err(MachineError::NotStarted);
        }
        Ok(())
    }

    fn layer(&self, layer: Layer) -> Result<&LayerStates<S, O>, MachineError> {
        self.layers.get(&layer).ok_or(MachineError::UnknownLayer(layer))
    }

    /// Register a state on a layer and call its `setup` hook.
    ///
    /// The first state registered on a layer becomes its initial state.
    pub fn add_state(&mut self, layer: impl Into<Layer>, mut state: S) -> Result<(), MachineError> {
        self.ensure_registering()?;
        let layer = layer.into();
        let kind = state.kind();

        let states = self.layers.entry(layer).or_insert_with(LayerStates::new);
        if states.contains(kind) {
            return Err(MachineError::DuplicateState {
                layer,
                state: kind.name(),
            });
        }

        state.setup(SetupContext {
            machine: self.id,
            layer,
            owner: &self.owner,
        });
        let priority = states.push(state);

        debug!(machine = %self.id, layer = %layer, state = kind.name(), priority, "state registered");
        Ok(())
    }

    /// Register a transition described by a builder.
    pub fn add_transition(&mut self, builder: TransitionBuilder<S, O>) -> Result<(), MachineError> {
        self.ensure_registering()?;
        let transition = builder.build()?;
        let layer = transition.layer();
        let states = self
            .layers
            .get_mut(&layer)
            .ok_or(MachineError::UnknownLayer(layer))?;

        let lookup = |kind: S::Kind| {
            states.index_of(kind).ok_or(MachineError::UnknownState {
                layer,
                state: kind.name(),
            })
        };
        let target = lookup(transition.target())?;
        let from = match transition.source() {
            Source::Any => None,
            Source::State(kind) => Some(lookup(kind)?),
        };

        trace!(machine = %self.id, ?transition, "transition registered");
        states.push_transition(from, target, transition);
        Ok(())
    }

    /// Add a transition between two states of a layer.
    ///
    /// At least one of `command` and `guard` must be given. A transition
    /// from a state to itself re-enters that state when it fires.
    pub fn make_transition(
        &mut self,
        from: S::Kind,
        to: S::Kind,
        command: Option<Command>,
        guard: Option<Guard<S, O>>,
        layer: impl Into<Layer>,
    ) -> Result<(), MachineError> {
        let builder = TransitionBuilder::new().from(from).to(to).layer(layer);
        self.add_transition(with_trigger(builder, command, guard))
    }

    /// Add a transition usable from whichever state of the layer is active.
    ///
    /// Unless `allow_self` is set, ticks skip the transition while its
    /// target is already the active state. Commands always take it.
    pub fn make_any_transition(
        &mut self,
        to: S::Kind,
        command: Option<Command>,
        guard: Option<Guard<S, O>>,
        layer: impl Into<Layer>,
        allow_self: bool,
    ) -> Result<(), MachineError> {
        let mut builder = TransitionBuilder::any().to(to).layer(layer);
        if allow_self {
            builder = builder.allow_self();
        }
        self.add_transition(with_trigger(builder, command, guard))
    }

    /// Enter the initial state of every layer and close registration.
    pub fn setup_layers(&mut self) -> Result<(), MachineError> {
        if self.started {
            warn!(machine = %self.id, "setup_layers called on a running machine");
            return Err(MachineError::AlreadyStarted);
        }
        if self.layers.is_empty() {
            return Err(MachineError::NoStates);
        }

        self.started = true;
        for (&layer, states) in self.layers.iter_mut() {
            let (previous, current) = states.activate(0, &mut self.owner);
            self.notifier
                .emit(layer, previous, current, Trigger::Initial, self.tick);
        }
        Ok(())
    }

    /// Advance one tick.
    ///
    /// For every layer in ascending order, the first eligible guard-only
    /// transition fires (any-transitions before the active state's own
    /// ones). A layer with no eligible transition runs its active state's
    /// `update` hook instead.
    pub fn update(&mut self) -> Result<(), MachineError> {
        self.ensure_started()?;
        self.tick += 1;
        let tick = self.tick;
        if self.config.trace_ticks {
            trace!(machine = %self.id, tick, "tick");
        }

        for (&layer, states) in self.layers.iter_mut() {
            let changed = states.fire(
                layer,
                Selector::Automatic,
                &mut self.owner,
                &mut self.notifier,
                tick,
            );
            if !changed {
                if self.config.trace_ticks {
                    trace!(machine = %self.id, layer = %layer, "update active state");
                }
                states.update_active(&mut self.owner);
            }
        }
        Ok(())
    }

    /// Execute a command on one layer.
    ///
    /// Looks for a transferable transition carrying exactly this command,
    /// in the layer's any-transitions first and then in the active state's
    /// transitions. Returns whether a transition happened.
    pub fn execute_command_on(
        &mut self,
        command: impl Into<Command>,
        layer: impl Into<Layer>,
    ) -> Result<bool, MachineError> {
        self.ensure_started()?;
        let (command, layer) = (command.into(), layer.into());
        let Some(states) = self.layers.get_mut(&layer) else {
            warn!(machine = %self.id, layer = %layer, %command, "command sent to unknown layer");
            return Err(MachineError::UnknownLayer(layer));
        };

        let fired = states.fire(
            layer,
            Selector::Command(command),
            &mut self.owner,
            &mut self.notifier,
            self.tick,
        );
        if !fired {
            trace!(machine = %self.id, layer = %layer, %command, "command matched no transition");
        }
        Ok(fired)
    }

    /// Execute a command on every layer.
    ///
    /// Returns true if at least one layer transitioned.
    pub fn execute_command(&mut self, command: impl Into<Command>) -> Result<bool, MachineError> {
        self.ensure_started()?;
        let command = command.into();

        let mut fired = false;
        for (&layer, states) in self.layers.iter_mut() {
            if states.fire(
                layer,
                Selector::Command(command),
                &mut self.owner,
                &mut self.notifier,
                self.tick,
            ) {
                fired = true;
            }
        }
        if !fired {
            trace!(machine = %self.id, %command, "command matched no transition on any layer");
        }
        Ok(fired)
    }

    /// Deliver a message to the active state of one layer.
    ///
    /// Returns whether the state handled it. Messages never cause
    /// transitions by themselves.
    pub fn send_message_to(
        &mut self,
        message: impl Into<Message>,
        layer: impl Into<Layer>,
        data: Option<&dyn Any>,
    ) -> Result<bool, MachineError> {
        self.ensure_started()?;
        let (message, layer) = (message.into(), layer.into());
        let states = self
            .layers
            .get_mut(&layer)
            .ok_or(MachineError::UnknownLayer(layer))?;
        let state = states.active_mut().ok_or(MachineError::NotStarted)?;

        let handled = state.on_receive_message(&mut self.owner, message, data);
        if !handled {
            trace!(machine = %self.id, layer = %layer, %message, "message not handled");
        }
        Ok(handled)
    }

    /// Deliver a message to the active state of every layer.
    ///
    /// Every layer receives the message. Returns true if any state handled it.
    pub fn send_message(
        &mut self,
        message: impl Into<Message>,
        data: Option<&dyn Any>,
    ) -> Result<bool, MachineError> {
        self.ensure_started()?;
        let message = message.into();

        let mut handled = false;
        for states in self.layers.values_mut() {
            if let Some(state) = states.active_mut() {
                if state.on_receive_message(&mut self.owner, message, data) {
                    handled = true;
                }
            }
        }
        Ok(handled)
    }

    /// True if the active state of any layer has this kind.
    pub fn is_in_state(&self, kind: S::Kind) -> bool {
        self.layers
            .values()
            .any(|states| states.active_kind() == Some(kind))
    }

    /// True if the active state of `layer` has this kind.
    pub fn is_in_state_on(
        &self,
        kind: S::Kind,
        layer: impl Into<Layer>,
    ) -> Result<bool, MachineError> {
        Ok(self.current_kind(layer)? == kind)
    }

    /// Active state of a layer.
    pub fn current_state(&self, layer: impl Into<Layer>) -> Result<&S, MachineError> {
        self.layer(layer.into())?
            .active()
            .ok_or(MachineError::NotStarted)
    }

    /// Kind of the active state of a layer.
    pub fn current_kind(&self, layer: impl Into<Layer>) -> Result<S::Kind, MachineError> {
        self.current_state(layer).map(|state| state.kind())
    }

    /// A registered state, active or not.
    pub fn state(&self, kind: S::Kind, layer: impl Into<Layer>) -> Result<&S, MachineError> {
        let layer = layer.into();
        self.layer(layer)?
            .state(kind)
            .ok_or(MachineError::UnknownState {
                layer,
                state: kind.name(),
            })
    }

    /// Number of states registered on a layer.
    pub fn state_count(&self, layer: impl Into<Layer>) -> Result<usize, MachineError> {
        Ok(self.layer(layer.into())?.len())
    }

    /// Known layers in ascending order.
    pub fn layers(&self) -> impl Iterator<Item = Layer> + '_ {
        self.layers.keys().copied()
    }

    /// Observe every state change, including initial activations.
    ///
    /// Observers run synchronously after the new state's `enter` hook, in
    /// subscription order.
    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&StateChanged<S::Kind>) + Send + 'static,
    {
        self.notifier.subscribe(Box::new(observer))
    }

    /// Remove an observer. Returns false if it was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }

    pub fn history(&self) -> &TransitionLog<S::Kind> {
        self.notifier.history()
    }

    pub fn owner(&self) -> &O {
        &self.owner
    }

    pub fn owner_mut(&mut self) -> &mut O {
        &mut self.owner
    }

    pub fn id(&self) -> MachineId {
        self.id
    }

    /// Number of completed `update` calls.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }
}

fn with_trigger<S: State<O>, O>(
    mut builder: TransitionBuilder<S, O>,
    command: Option<Command>,
    guard: Option<Guard<S, O>>,
) -> TransitionBuilder<S, O> {
    if let Some(command) = command {
        builder = builder.on_command(command);
    }
    if let Some(guard) = guard {
        builder = builder.guard(guard);
    }
    builder
}

impl<S: State<O>, O> fmt::Debug for StateMachine<S, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let active: Vec<(Layer, Option<&'static str>)> = self
            .layers
            .iter()
            .map(|(&layer, states)| (layer, states.active_kind().map(|k| k.name())))
            .collect();

        f.debug_struct("StateMachine")
            .field("id", &self.id)
            .field("started", &self.started)
            .field("tick", &self.tick)
            .field("active", &active)
            .finish()
    }
}
