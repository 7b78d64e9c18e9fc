#![allow(dead_code)]

use std::path::PathBuf;

use battle_content::{CommandSpec, ContentFactory, CreatureSpec, ScenarioSpec, Side};
use runtime::{BattleEvent, BattleReport};

pub fn creature(name: &str, side: Side, hp: u32, speed: u32, moves: &[&str]) -> CreatureSpec {
    CreatureSpec {
        name: name.to_string(),
        side,
        hp,
        speed,
        moves: moves.iter().map(|name| name.to_string()).collect(),
        abilities: Vec::new(),
    }
}

pub fn with_abilities(mut spec: CreatureSpec, abilities: &[&str]) -> CreatureSpec {
    spec.abilities = abilities.iter().map(|name| name.to_string()).collect();
    spec
}

pub fn command(turn: u32, creature: &str, slot: u32) -> CommandSpec {
    CommandSpec {
        turn,
        creature: creature.to_string(),
        slot,
    }
}

pub fn scenario(
    field_size: usize,
    max_turns: u32,
    roster: Vec<CreatureSpec>,
    commands: Vec<CommandSpec>,
) -> ScenarioSpec {
    ScenarioSpec {
        name: "fixture".to_string(),
        seed: Some(1),
        field_size: Some(field_size),
        max_turns: Some(max_turns),
        roster,
        commands,
    }
}

/// The content shipped with the workspace.
pub fn shipped_content() -> ContentFactory {
    ContentFactory::new(
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../battle/content/data"),
    )
}

/// Names of the creatures that used a move during `turn`, in order.
pub fn movers(report: &BattleReport, turn: u32) -> Vec<String> {
    turn_events(report, turn)
        .filter_map(|event| match event {
            BattleEvent::MoveUsed { creature, .. } => Some(creature.clone()),
            _ => None,
        })
        .collect()
}

/// Events between the start of `turn` and the start of the next one.
pub fn turn_events(report: &BattleReport, turn: u32) -> impl Iterator<Item = &BattleEvent> + '_ {
    report
        .events
        .iter()
        .skip_while(move |event| **event != BattleEvent::TurnStarted { turn })
        .skip(1)
        .take_while(|event| !matches!(event, BattleEvent::TurnStarted { .. }))
}

/// Events before the first turn: the leads' entries.
pub fn opening_events(report: &BattleReport) -> Vec<BattleEvent> {
    report
        .events
        .iter()
        .take_while(|event| !matches!(event, BattleEvent::TurnStarted { .. }))
        .cloned()
        .collect()
}
