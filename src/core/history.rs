//! State change notifications and the bounded transition log.

use super::ids::{Command, Layer, MachineId};
use super::state::StateKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// What caused a state change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trigger {
    /// Initial activation of a layer's priority-0 state.
    Initial,
    /// A guard-only transition picked up during a tick.
    Automatic,
    /// An explicitly executed command.
    Command(Command),
}

/// Notification emitted synchronously whenever a layer changes state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateChanged<K: StateKind> {
    /// Machine that changed state
    pub machine: MachineId,
    /// Layer that changed state
    pub layer: Layer,
    /// State that was exited, `None` for the initial activation
    pub previous: Option<K>,
    /// State that was entered
    pub current: K,
    /// Cause of the change
    pub trigger: Trigger,
    /// Tick counter of the machine when the change happened
    pub tick: u64,
}

/// A state change with the wall-clock time it was recorded at.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct TransitionRecord<K: StateKind> {
    pub change: StateChanged<K>,
    pub timestamp: DateTime<Utc>,
}

/// Most recent state changes of a machine, oldest first.
///
/// The log holds at most `capacity` records and drops the oldest one when
/// full. A capacity of zero disables recording.
///
/// # Example
///
/// ```rust
/// use stance::core::{Layer, MachineId, StateChanged, StateKind, TransitionLog, Trigger};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// enum Phase { Start, End }
///
/// impl StateKind for Phase {
///     fn name(&self) -> &'static str {
///         match self {
///             Self::Start => "Start",
///             Self::End => "End",
///         }
///     }
/// }
///
/// let machine = MachineId::new();
/// let mut log = TransitionLog::new(8);
/// log.record(StateChanged {
///     machine,
///     layer: Layer::BASE,
///     previous: None,
///     current: Phase::Start,
///     trigger: Trigger::Initial,
///     tick: 0,
/// });
/// log.record(StateChanged {
///     machine,
///     layer: Layer::BASE,
///     previous: Some(Phase::Start),
///     current: Phase::End,
///     trigger: Trigger::Automatic,
///     tick: 1,
/// });
///
/// assert_eq!(log.path(Layer::BASE), vec![Phase::Start, Phase::End]);
/// ```
#[derive(Clone, Debug)]
pub struct TransitionLog<K: StateKind> {
    records: VecDeque<TransitionRecord<K>>,
    capacity: usize,
}

impl<K: StateKind> TransitionLog<K> {
    pub fn new(capacity: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record a change, stamped with the current time.
    pub fn record(&mut self, change: StateChanged<K>) {
        self.record_at(change, Utc::now());
    }

    /// Record a change with an explicit timestamp.
    pub fn record_at(&mut self, change: StateChanged<K>, timestamp: DateTime<Utc>) {
        if self.capacity == 0 {
            return;
        }
        if self.records.len() == self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(TransitionRecord { change, timestamp });
    }

    /// Recorded changes, oldest first.
    pub fn records(&self) -> impl Iterator<Item = &TransitionRecord<K>> {
        self.records.iter()
    }

    /// Most recent change recorded for a layer.
    pub fn last(&self, layer: Layer) -> Option<&TransitionRecord<K>> {
        self.records.iter().rev().find(|r| r.change.layer == layer)
    }

    /// States traversed by a layer, as far back as the log reaches.
    ///
    /// Starts with the `previous` state of the oldest retained change (if
    /// there is one), followed by the `current` state of every change.
    pub fn path(&self, layer: Layer) -> Vec<K> {
        let mut changes = self
            .records
            .iter()
            .map(|r| &r.change)
            .filter(|c| c.layer == layer)
            .peekable();

        let mut path = Vec::new();
        if let Some(previous) = changes.peek().and_then(|c| c.previous) {
            path.push(previous);
        }
        path.extend(changes.map(|c| c.current));
        path
    }

    /// Time between the oldest and newest retained record.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.records.front()?, self.records.back()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
    enum TestKind {
        Default,
        Rolling,
        Dead,
    }

    impl StateKind for TestKind {
        fn name(&self) -> &'static str {
            match self {
                Self::Default => "Default",
                Self::Rolling => "Rolling",
                Self::Dead => "Dead",
            }
        }
    }

    fn change(
        machine: MachineId,
        layer: i32,
        previous: Option<TestKind>,
        current: TestKind,
        tick: u64,
    ) -> StateChanged<TestKind> {
        StateChanged {
            machine,
            layer: Layer(layer),
            previous,
            current,
            trigger: if previous.is_none() {
                Trigger::Initial
            } else {
                Trigger::Automatic
            },
            tick,
        }
    }

    #[test]
    fn new_log_is_empty() {
        let log: TransitionLog<TestKind> = TransitionLog::new(4);
        assert!(log.is_empty());
        assert!(log.path(Layer::BASE).is_empty());
        assert!(log.duration().is_none());
    }

    #[test]
    fn path_follows_one_layer() {
        let id = MachineId::new();
        let mut log = TransitionLog::new(16);
        log.record(change(id, 0, None, TestKind::Default, 0));
        log.record(change(id, 1, None, TestKind::Default, 0));
        log.record(change(id, 0, Some(TestKind::Default), TestKind::Rolling, 1));
        log.record(change(id, 0, Some(TestKind::Rolling), TestKind::Dead, 2));

        assert_eq!(
            log.path(Layer(0)),
            vec![TestKind::Default, TestKind::Rolling, TestKind::Dead]
        );
        assert_eq!(log.path(Layer(1)), vec![TestKind::Default]);
    }

    #[test]
    fn full_log_drops_oldest() {
        let id = MachineId::new();
        let mut log = TransitionLog::new(2);
        log.record(change(id, 0, None, TestKind::Default, 0));
        log.record(change(id, 0, Some(TestKind::Default), TestKind::Rolling, 1));
        log.record(change(id, 0, Some(TestKind::Rolling), TestKind::Dead, 2));

        assert_eq!(log.len(), 2);
        assert_eq!(
            log.path(Layer(0)),
            vec![TestKind::Default, TestKind::Rolling, TestKind::Dead]
        );
        assert_eq!(log.records().next().map(|r| r.change.tick), Some(1));
    }

    #[test]
    fn zero_capacity_disables_recording() {
        let mut log = TransitionLog::new(0);
        log.record(change(MachineId::new(), 0, None, TestKind::Default, 0));
        assert!(log.is_empty());
    }

    #[test]
    fn last_finds_latest_change_of_layer() {
        let id = MachineId::new();
        let mut log = TransitionLog::new(8);
        log.record(change(id, 0, None, TestKind::Default, 0));
        log.record(change(id, 1, None, TestKind::Rolling, 0));
        log.record(change(id, 0, Some(TestKind::Default), TestKind::Dead, 3));

        let last = log.last(Layer(0)).map(|r| r.change.current);
        assert_eq!(last, Some(TestKind::Dead));
        assert!(log.last(Layer(5)).is_none());
    }

    #[test]
    fn duration_spans_first_to_last() {
        let id = MachineId::new();
        let start = Utc::now();
        let mut log = TransitionLog::new(8);
        log.record_at(change(id, 0, None, TestKind::Default, 0), start);
        log.record_at(
            change(id, 0, Some(TestKind::Default), TestKind::Rolling, 1),
            start + chrono::Duration::milliseconds(250),
        );

        assert_eq!(log.duration(), Some(Duration::from_millis(250)));
    }

    #[test]
    fn state_changed_serializes() {
        let event = change(MachineId::new(), 2, Some(TestKind::Rolling), TestKind::Dead, 9);
        let json = serde_json::to_string(&event).unwrap();
        let back: StateChanged<TestKind> = serde_json::from_str(&json).unwrap();
        assert_eq!(event, back);
    }
}
