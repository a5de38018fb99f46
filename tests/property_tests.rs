//! Property-based tests for the layered state machine.
//!
//! These tests use proptest to drive machines through random sequences of
//! ticks, commands and owner changes and check that the lifecycle
//! invariants hold throughout.

use proptest::prelude::*;
use stance::core::{Layer, Message, SetupContext, State};
use stance::{state_kinds, Command, Guard, StateMachine};
use std::any::Any;

state_kinds! {
    enum Kind {
        A,
        B,
        C,
        D,
    }
}

const KINDS: [Kind; 4] = [Kind::A, Kind::B, Kind::C, Kind::D];

#[derive(Default)]
struct Owner {
    flags: [bool; 4],
    lifecycle: Vec<(Layer, Kind, Hook)>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Hook {
    Enter,
    Exit,
}

struct Probe {
    kind: Kind,
    layer: Layer,
}

impl State<Owner> for Probe {
    type Kind = Kind;

    fn kind(&self) -> Kind {
        self.kind
    }

    fn setup(&mut self, ctx: SetupContext<'_, Owner>) {
        self.layer = ctx.layer;
    }

    fn enter(&mut self, owner: &mut Owner) {
        owner.lifecycle.push((self.layer, self.kind, Hook::Enter));
    }

    fn exit(&mut self, owner: &mut Owner) {
        owner.lifecycle.push((self.layer, self.kind, Hook::Exit));
    }

    fn on_receive_message(&mut self, _: &mut Owner, message: Message, _: Option<&dyn Any>) -> bool {
        message.0 == self.kind as i32
    }
}

fn probe(kind: Kind) -> Probe {
    Probe {
        kind,
        layer: Layer::BASE,
    }
}

fn index(kind: Kind) -> usize {
    kind as usize
}

#[derive(Clone, Debug)]
enum Op {
    Tick,
    Toggle(usize),
    Command(i32),
    CommandOn(i32, i32),
    Message(i32),
}

fn arbitrary_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => Just(Op::Tick),
        2 => (0..4usize).prop_map(Op::Toggle),
        1 => (0..3i32).prop_map(Op::Command),
        1 => (0..3i32, 0..3i32).prop_map(|(c, l)| Op::CommandOn(c, l)),
        1 => (0..4i32).prop_map(Op::Message),
    ]
}

/// Three layers with every kind registered; guard-only edges between every
/// pair of states, an any-transition to `D`, and command edges.
fn wired(layer_order: &[i32]) -> StateMachine<Probe, Owner> {
    let mut machine = StateMachine::new(Owner::default());
    for &layer in layer_order {
        for kind in KINDS {
            machine.add_state(layer, probe(kind)).unwrap();
        }
    }

    for layer in 0..3 {
        machine
            .make_any_transition(
                Kind::D,
                None,
                Some(Guard::new(|_, o: &Owner| o.flags[3])),
                layer,
                false,
            )
            .unwrap();
        machine
            .make_any_transition(Kind::A, Some(Command(0)), None, layer, false)
            .unwrap();
        for from in KINDS {
            for to in KINDS {
                if from == to {
                    continue;
                }
                let target = index(to);
                machine
                    .make_transition(
                        from,
                        to,
                        None,
                        Some(Guard::new(move |_, o: &Owner| o.flags[target])),
                        layer,
                    )
                    .unwrap();
            }
            let next = KINDS[(index(from) + 1) % KINDS.len()];
            machine
                .make_transition(from, next, Some(Command(1)), None, layer)
                .unwrap();
        }
    }

    machine.setup_layers().unwrap();
    machine
}

fn apply(machine: &mut StateMachine<Probe, Owner>, op: &Op) {
    match *op {
        Op::Tick => machine.update().unwrap(),
        Op::Toggle(flag) => {
            let flags = &mut machine.owner_mut().flags;
            flags[flag] = !flags[flag];
        }
        Op::Command(command) => {
            machine.execute_command(command).unwrap();
        }
        Op::CommandOn(command, layer) => {
            machine.execute_command_on(command, layer).unwrap();
        }
        Op::Message(message) => {
            machine.send_message(message, None).unwrap();
        }
    }
}

fn active_kinds(machine: &StateMachine<Probe, Owner>) -> Vec<Kind> {
    machine
        .layers()
        .map(|layer| machine.current_kind(layer).unwrap())
        .collect()
}

proptest! {
    #[test]
    fn every_layer_has_exactly_one_active_state(ops in prop::collection::vec(arbitrary_op(), 0..60)) {
        let mut machine = wired(&[0, 1, 2]);

        for op in &ops {
            apply(&mut machine, op);
            for layer in machine.layers() {
                let active = KINDS
                    .iter()
                    .filter(|&&kind| machine.is_in_state_on(kind, layer).unwrap())
                    .count();
                prop_assert_eq!(active, 1);
            }
        }
    }

    #[test]
    fn enter_and_exit_alternate_per_layer(ops in prop::collection::vec(arbitrary_op(), 0..60)) {
        let mut machine = wired(&[0, 1, 2]);
        for op in &ops {
            apply(&mut machine, op);
        }

        for layer in machine.layers().collect::<Vec<_>>() {
            let hooks: Vec<(Kind, Hook)> = machine
                .owner()
                .lifecycle
                .iter()
                .filter(|(l, _, _)| *l == layer)
                .map(|&(_, kind, hook)| (kind, hook))
                .collect();

            prop_assert_eq!(hooks.first().copied(), Some((Kind::A, Hook::Enter)));
            for pair in hooks.windows(2) {
                prop_assert_ne!(pair[0].1, pair[1].1);
                if pair[0].1 == Hook::Enter {
                    prop_assert_eq!(pair[0].0, pair[1].0);
                }
            }

            let entered = hooks.iter().filter(|(_, h)| *h == Hook::Enter).count();
            let exited = hooks.len() - entered;
            prop_assert_eq!(entered, exited + 1);

            let last_entered = hooks
                .iter()
                .rev()
                .find(|(_, h)| *h == Hook::Enter)
                .map(|(kind, _)| *kind);
            prop_assert_eq!(last_entered, Some(machine.current_kind(layer).unwrap()));
        }
    }

    #[test]
    fn initial_state_is_first_registered_regardless_of_layer_order(
        order in Just(vec![0, 1, 2]).prop_shuffle(),
        first in 0..4usize,
    ) {
        let mut machine = StateMachine::new(Owner::default());
        for &layer in &order {
            let start = KINDS[(first + layer as usize) % KINDS.len()];
            machine.add_state(layer, probe(start)).unwrap();
            for kind in KINDS.into_iter().filter(|&k| k != start) {
                machine.add_state(layer, probe(kind)).unwrap();
            }
        }
        machine.setup_layers().unwrap();

        for layer in 0..3i32 {
            let expected = KINDS[(first + layer as usize) % KINDS.len()];
            prop_assert_eq!(machine.current_kind(layer).unwrap(), expected);
        }
    }

    #[test]
    fn resolution_is_deterministic(ops in prop::collection::vec(arbitrary_op(), 0..40)) {
        let mut first = wired(&[2, 0, 1]);
        let mut second = wired(&[0, 1, 2]);

        for op in &ops {
            apply(&mut first, op);
            apply(&mut second, op);
            prop_assert_eq!(active_kinds(&first), active_kinds(&second));
        }
        prop_assert_eq!(&first.owner().lifecycle, &second.owner().lifecycle);
    }

    #[test]
    fn unmatched_command_changes_nothing(command in 2..100i32, toggles in prop::collection::vec(0..4usize, 0..8)) {
        let mut machine = wired(&[0, 1, 2]);
        for flag in toggles {
            machine.owner_mut().flags[flag] = true;
        }
        let before = active_kinds(&machine);
        let hooks = machine.owner().lifecycle.len();

        prop_assert_eq!(machine.execute_command(command).unwrap(), false);
        prop_assert_eq!(active_kinds(&machine), before);
        prop_assert_eq!(machine.owner().lifecycle.len(), hooks);
    }
}
