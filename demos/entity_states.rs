//! Entity States
//!
//! This demo drives a player entity through a movement layer and a combat
//! layer for a handful of frames.
//!
//! Key concepts:
//! - Guard transitions resolved once per frame
//! - Any-transitions that preempt local ones (death)
//! - Commands broadcast to every layer
//! - Messages handled by the active state
//! - Observers and the transition history
//!
//! Run with: RUST_LOG=stance=debug cargo run --example entity_states

use stance::builder::{command_transition, guarded_transition, StateMachineBuilder, TransitionBuilder};
use stance::core::{Layer, Message, State, StateKind};
use stance::{state_kinds, Command, MachineConfig, StateChanged};
use std::any::Any;

state_kinds! {
    enum EntityStateKind {
        Default,
        Rolling,
        Dead,
        CastingSkill,
    }
}

const MOVEMENT: Layer = Layer(0);
const COMBAT: Layer = Layer(1);

const TO_DEFAULT: Command = Command(0);
const TO_CASTING_SKILL: Command = Command(1);
const USING_SKILL: Message = Message(0);

#[derive(Debug, Default)]
struct Player {
    is_rolling: bool,
    health: i32,
    controller_enabled: bool,
}

struct EntityState(EntityStateKind);

impl State<Player> for EntityState {
    type Kind = EntityStateKind;

    fn kind(&self) -> EntityStateKind {
        self.0
    }

    fn enter(&mut self, player: &mut Player) {
        if matches!(self.0, EntityStateKind::Rolling | EntityStateKind::Dead) {
            player.controller_enabled = false;
        }
    }

    fn exit(&mut self, player: &mut Player) {
        if matches!(self.0, EntityStateKind::Rolling | EntityStateKind::Dead) {
            player.controller_enabled = true;
        }
    }

    fn on_receive_message(
        &mut self,
        _player: &mut Player,
        message: Message,
        data: Option<&dyn Any>,
    ) -> bool {
        if self.0 != EntityStateKind::CastingSkill || message != USING_SKILL {
            return false;
        }
        if let Some(skill) = data.and_then(|d| d.downcast_ref::<&str>()) {
            println!("    casting {}", skill);
        }
        true
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    println!("=== Entity States ===\n");

    let config = MachineConfig::from_json(r#"{ "history_capacity": 16 }"#)?;

    let mut machine = StateMachineBuilder::new()
        .config(config)
        .states(
            MOVEMENT,
            [
                EntityStateKind::Default,
                EntityStateKind::Rolling,
                EntityStateKind::Dead,
            ]
            .map(EntityState),
        )
        .states(
            COMBAT,
            [EntityStateKind::Default, EntityStateKind::CastingSkill].map(EntityState),
        )
        .transition(guarded_transition(
            EntityStateKind::Default,
            EntityStateKind::Rolling,
            |_, player: &Player| player.is_rolling,
        ))
        .transition(guarded_transition(
            EntityStateKind::Rolling,
            EntityStateKind::Default,
            |_, player: &Player| !player.is_rolling,
        ))
        .transition(
            TransitionBuilder::any()
                .to(EntityStateKind::Dead)
                .when(|_, player: &Player| player.health <= 0),
        )
        .transition(
            command_transition(
                EntityStateKind::Default,
                EntityStateKind::CastingSkill,
                TO_CASTING_SKILL,
            )
            .layer(COMBAT),
        )
        .transition(
            command_transition(
                EntityStateKind::CastingSkill,
                EntityStateKind::Default,
                TO_DEFAULT,
            )
            .layer(COMBAT),
        )
        .build(Player {
            health: 3,
            controller_enabled: true,
            ..Player::default()
        })?;

    machine.subscribe(|change: &StateChanged<EntityStateKind>| {
        println!(
            "  [{}] layer {}: {} -> {}",
            change.tick,
            change.layer,
            change.previous.map_or("-", |kind| kind.name()),
            change.current.name()
        );
    });

    println!("Frame 1: player starts rolling");
    machine.owner_mut().is_rolling = true;
    machine.update()?;

    println!("Frame 2: roll ends, skill starts");
    machine.owner_mut().is_rolling = false;
    machine.update()?;
    machine.execute_command(TO_CASTING_SKILL)?;
    let skill: &'static str = "fireball";
    machine.send_message(USING_SKILL, Some(&skill))?;

    println!("Frame 3: player takes lethal damage");
    machine.owner_mut().health = 0;
    machine.update()?;
    machine.execute_command(TO_DEFAULT)?;

    println!("\nFinal:");
    for layer in machine.layers() {
        println!("  layer {}: {}", layer, machine.current_kind(layer)?.name());
    }
    println!("  controller enabled: {}", machine.owner().controller_enabled);
    println!(
        "  movement path: {:?}",
        machine.history().path(MOVEMENT)
    );

    Ok(())
}
