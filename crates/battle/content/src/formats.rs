//! On-disk formats for battle content.

use serde::{Deserialize, Serialize};

/// Which side of the field a creature fights for.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Side {
    Player,
    Enemy,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::Player => Side::Enemy,
            Side::Enemy => Side::Player,
        }
    }
}

/// Secondary effect of a move, applied after its damage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveEffect {
    #[default]
    None,
    /// Lowers the target's speed by this many stages.
    LowerTargetSpeed(u8),
    /// Raises the user's speed by this many stages.
    RaiseUserSpeed(u8),
    /// Poisons the target.
    Poison,
    /// Toggles speed reversal on the field.
    TrickRoom,
    /// Starts a sandstorm.
    Sandstorm,
    /// The target's pending action goes last this turn.
    Quash,
    /// The target's pending action goes next.
    AfterYou,
}

/// A move definition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveSpec {
    pub name: String,
    /// Priority bracket; higher brackets act first.
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub power: u32,
    #[serde(default)]
    pub effect: MoveEffect,
}

/// What an ability does when its owner enters the field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryEffect {
    /// Only announces itself.
    #[default]
    Announce,
    /// Lowers the speed of every opposing creature on the field.
    LowerFoeSpeed(u8),
    /// Starts a sandstorm.
    Sandstorm,
    /// Toggles speed reversal on the field.
    TrickRoom,
}

/// An ability definition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilitySpec {
    pub name: String,
    /// Declared priority among one entrant's entry reactions.
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub effect: EntryEffect,
}

/// One creature of a scenario roster. Creatures enter in roster order per
/// side; the first `field_size` of each side start on the field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatureSpec {
    pub name: String,
    pub side: Side,
    pub hp: u32,
    pub speed: u32,
    pub moves: Vec<String>,
    /// Ability names, primary first. At most two are used.
    #[serde(default)]
    pub abilities: Vec<String>,
}

/// A scripted choice: on `turn`, `creature` uses the move in `slot`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    pub turn: u32,
    pub creature: String,
    pub slot: u32,
}

/// A complete battle setup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioSpec {
    pub name: String,
    /// Overrides the configured seed when present.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Overrides the configured field size when present.
    #[serde(default)]
    pub field_size: Option<usize>,
    #[serde(default)]
    pub max_turns: Option<u32>,
    pub roster: Vec<CreatureSpec>,
    #[serde(default)]
    pub commands: Vec<CommandSpec>,
}

impl ScenarioSpec {
    pub fn creature(&self, name: &str) -> Option<&CreatureSpec> {
        self.roster.iter().find(|creature| creature.name == name)
    }

    /// Roster entries of `side` in entry order.
    pub fn side(&self, side: Side) -> impl Iterator<Item = &CreatureSpec> + '_ {
        self.roster.iter().filter(move |creature| creature.side == side)
    }
}
