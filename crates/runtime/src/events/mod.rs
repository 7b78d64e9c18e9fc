//! Observable battle events.
//!
//! Phases append an event for every visible change they make. The log is the
//! battle's transcript: the CLI prints it and tests assert on it.
use std::fmt;

use battle_content::Side;
use battle_core::SummonSource;
use serde::Serialize;

/// How a battle finished.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Winner(Side),
    Draw,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Winner(side) => write!(f, "{side} wins"),
            Outcome::Draw => write!(f, "draw"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DamageCause {
    Move,
    Sandstorm,
    Poison,
}

/// A visible change to the battle.
///
/// Creatures are named rather than numbered so transcripts read on their own.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BattleEvent {
    TurnStarted {
        turn: u32,
    },
    SentOut {
        creature: String,
        side: Side,
        #[serde(serialize_with = "serialize_display")]
        source: SummonSource,
    },
    Entered {
        creature: String,
    },
    AbilityActivated {
        creature: String,
        ability: String,
    },
    MoveUsed {
        creature: String,
        #[serde(rename = "move")]
        move_name: String,
        target: Option<String>,
    },
    Damaged {
        creature: String,
        amount: u32,
        hp: u32,
        cause: DamageCause,
    },
    SpeedChanged {
        creature: String,
        stage: i8,
    },
    Poisoned {
        creature: String,
    },
    ActionForced {
        creature: String,
        first: bool,
    },
    MoveCancelled {
        creature: String,
    },
    Fainted {
        creature: String,
    },
    SandstormStarted,
    SandstormEnded,
    TrickRoomStarted,
    TrickRoomEnded,
    TurnEnded {
        turn: u32,
    },
    TurnLimitReached {
        turn: u32,
    },
    BattleEnded {
        outcome: Outcome,
    },
}

fn serialize_display<T: fmt::Display, S: serde::Serializer>(
    value: &T,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

impl fmt::Display for BattleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BattleEvent::TurnStarted { turn } => write!(f, "-- turn {turn} --"),
            BattleEvent::SentOut {
                creature,
                side,
                source,
            } => write!(f, "{side} sends out {creature} ({source})"),
            BattleEvent::Entered { creature } => write!(f, "{creature} entered the field"),
            BattleEvent::AbilityActivated { creature, ability } => {
                write!(f, "{creature}'s {ability} activated")
            }
            BattleEvent::MoveUsed {
                creature,
                move_name,
                target: Some(target),
            } => write!(f, "{creature} used {move_name} on {target}"),
            BattleEvent::MoveUsed {
                creature,
                move_name,
                target: None,
            } => write!(f, "{creature} used {move_name}"),
            BattleEvent::Damaged {
                creature,
                amount,
                hp,
                cause,
            } => write!(f, "{creature} took {amount} {cause} damage ({hp} hp left)"),
            BattleEvent::SpeedChanged { creature, stage } => {
                write!(f, "{creature}'s speed stage is now {stage:+}")
            }
            BattleEvent::Poisoned { creature } => write!(f, "{creature} was poisoned"),
            BattleEvent::ActionForced {
                creature,
                first: true,
            } => write!(f, "{creature} moves next"),
            BattleEvent::ActionForced {
                creature,
                first: false,
            } => write!(f, "{creature} moves last"),
            BattleEvent::MoveCancelled { creature } => {
                write!(f, "{creature}'s move was cancelled")
            }
            BattleEvent::Fainted { creature } => write!(f, "{creature} fainted"),
            BattleEvent::SandstormStarted => write!(f, "a sandstorm kicked up"),
            BattleEvent::SandstormEnded => write!(f, "the sandstorm subsided"),
            BattleEvent::TrickRoomStarted => write!(f, "the dimensions were twisted"),
            BattleEvent::TrickRoomEnded => write!(f, "the twisted dimensions returned to normal"),
            BattleEvent::TurnEnded { turn } => write!(f, "-- end of turn {turn} --"),
            BattleEvent::TurnLimitReached { turn } => write!(f, "turn limit {turn} reached"),
            BattleEvent::BattleEnded { outcome } => write!(f, "battle over: {outcome}"),
        }
    }
}

/// Append-only transcript of a battle.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    events: Vec<BattleEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: BattleEvent) {
        tracing::debug!(target: "runtime::battle", event = %event, "battle event");
        self.events.push(event);
    }

    pub fn iter(&self) -> impl Iterator<Item = &BattleEvent> + '_ {
        self.events.iter()
    }

    pub fn as_slice(&self) -> &[BattleEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
