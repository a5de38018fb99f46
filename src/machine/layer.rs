//! Per-layer storage: registered states, their transitions, the layer's
//! any-transitions and the active state.

use crate::builder::Transition;
use crate::core::{Command, Layer, State, Trigger};
use crate::machine::observers::Notifier;
use std::collections::HashMap;

/// Which transitions a resolution pass may pick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Selector {
    /// Guard-only transitions, polled every tick.
    Automatic,
    /// Transitions carrying exactly this command.
    Command(Command),
}

impl Selector {
    fn trigger(self) -> Trigger {
        match self {
            Selector::Automatic => Trigger::Automatic,
            Selector::Command(command) => Trigger::Command(command),
        }
    }
}

/// A transition whose target has been resolved to a slot index.
struct Edge<S: State<O>, O> {
    target: usize,
    transition: Transition<S, O>,
}

impl<S: State<O>, O> Edge<S, O> {
    fn is_eligible(&self, selector: Selector, active: usize, current: &S, owner: &O) -> bool {
        let selectable = match selector {
            Selector::Automatic => {
                self.transition.command().is_none()
                    && (self.transition.allows_self() || self.target != active)
            }
            // Commands re-enter an active target.
            Selector::Command(command) => self.transition.command() == Some(command),
        };

        selectable && self.transition.is_transferable(current, owner)
    }
}

struct Slot<S: State<O>, O> {
    state: S,
    transitions: Vec<Edge<S, O>>,
}

/// States of one layer. A state's index in `slots` is its priority.
pub(crate) struct LayerStates<S: State<O>, O> {
    slots: Vec<Slot<S, O>>,
    index: HashMap<S::Kind, usize>,
    any: Vec<Edge<S, O>>,
    active: Option<usize>,
}

impl<S: State<O>, O> LayerStates<S, O> {
    pub(crate) fn new() -> Self {
        Self {
            slots: Vec::new(),
            index: HashMap::new(),
            any: Vec::new(),
            active: None,
        }
    }

    pub(crate) fn contains(&self, kind: S::Kind) -> bool {
        self.index.contains_key(&kind)
    }

    pub(crate) fn index_of(&self, kind: S::Kind) -> Option<usize> {
        self.index.get(&kind).copied()
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    /// Register a state and return its priority.
    pub(crate) fn push(&mut self, state: S) -> usize {
        let priority = self.slots.len();
        self.index.insert(state.kind(), priority);
        self.slots.push(Slot {
            state,
            transitions: Vec::new(),
        });
        priority
    }

    pub(crate) fn push_transition(
        &mut self,
        from: Option<usize>,
        target: usize,
        transition: Transition<S, O>,
    ) {
        let edge = Edge { target, transition };
        match from {
            Some(from) => self.slots[from].transitions.push(edge),
            None => self.any.push(edge),
        }
    }

    pub(crate) fn state(&self, kind: S::Kind) -> Option<&S> {
        self.index_of(kind).map(|i| &self.slots[i].state)
    }

    pub(crate) fn active(&self) -> Option<&S> {
        self.active.map(|i| &self.slots[i].state)
    }

    pub(crate) fn active_kind(&self) -> Option<S::Kind> {
        self.active().map(|state| state.kind())
    }

    /// Find the first eligible transition, any-transitions first, then the
    /// active state's own transitions, each in registration order.
    fn select(&self, selector: Selector, owner: &O) -> Option<usize> {
        let active = self.active?;
        let current = &self.slots[active].state;

        self.any
            .iter()
            .chain(self.slots[active].transitions.iter())
            .find(|edge| edge.is_eligible(selector, active, current, owner))
            .map(|edge| edge.target)
    }

    /// Exit the active state (if any), then enter `target`.
    ///
    /// Returns the kinds of the exited and entered states.
    pub(crate) fn activate(
        &mut self,
        target: usize,
        owner: &mut O,
    ) -> (Option<S::Kind>, S::Kind) {
        let previous = self.active.map(|i| {
            let slot = &mut self.slots[i];
            slot.state.exit(owner);
            slot.state.kind()
        });

        self.active = Some(target);
        let next = &mut self.slots[target].state;
        next.enter(owner);

        (previous, next.kind())
    }

    /// Take the first eligible transition, if there is one, and report it.
    pub(crate) fn fire(
        &mut self,
        layer: Layer,
        selector: Selector,
        owner: &mut O,
        notifier: &mut Notifier<S::Kind>,
        tick: u64,
    ) -> bool {
        let Some(target) = self.select(selector, owner) else {
            return false;
        };

        let (previous, current) = self.activate(target, owner);
        notifier.emit(layer, previous, current, selector.trigger(), tick);
        true
    }

    pub(crate) fn update_active(&mut self, owner: &mut O) {
        if let Some(i) = self.active {
            self.slots[i].state.update(owner);
        }
    }

    pub(crate) fn active_mut(&mut self) -> Option<&mut S> {
        self.active.map(|i| &mut self.slots[i].state)
    }
}
