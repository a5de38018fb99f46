//! Synchronous delivery of state change notifications.

use crate::core::{Layer, MachineId, StateChanged, StateKind, TransitionLog, Trigger};
use tracing::debug;

/// Handle returned by `subscribe`, used to remove the observer again.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer<K> = Box<dyn FnMut(&StateChanged<K>) + Send>;

/// Calls observers in subscription order and records every change.
pub(crate) struct Notifier<K: StateKind> {
    machine: MachineId,
    observers: Vec<(SubscriptionId, Observer<K>)>,
    next_id: u64,
    history: TransitionLog<K>,
}

impl<K: StateKind> Notifier<K> {
    pub(crate) fn new(machine: MachineId, history_capacity: usize) -> Self {
        Self {
            machine,
            observers: Vec::new(),
            next_id: 0,
            history: TransitionLog::new(history_capacity),
        }
    }

    pub(crate) fn subscribe(&mut self, observer: Observer<K>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, observer));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    pub(crate) fn history(&self) -> &TransitionLog<K> {
        &self.history
    }

    pub(crate) fn emit(
        &mut self,
        layer: Layer,
        previous: Option<K>,
        current: K,
        trigger: Trigger,
        tick: u64,
    ) {
        debug!(
            machine = %self.machine,
            layer = %layer,
            from = previous.map(|k| k.name()).unwrap_or("<none>"),
            to = current.name(),
            trigger = ?trigger,
            tick,
            "state changed"
        );

        let change = StateChanged {
            machine: self.machine,
            layer,
            previous,
            current,
            trigger,
            tick,
        };

        for (_, observer) in self.observers.iter_mut() {
            observer(&change);
        }
        self.history.record(change);
    }
}
