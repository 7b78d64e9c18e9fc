//! Mutable battle state owned by the runtime.
//!
//! [`BattleState`] is the `B` every runtime phase is parameterized over: the
//! scheduler reads it through [`BattleOracle`] when ordering, and phases
//! mutate it through [`PhaseContext::battle_mut`](battle_core::PhaseContext::battle_mut).
mod creature;

pub use creature::{Creature, Position, Status};

use battle_content::Side;
use battle_core::{
    BattleConfig, BattleOracle, ParticipantId, ReactionSpec, Reactions, SchedulerError,
    TieBreaker, order_by_speed,
};

use crate::events::{BattleEvent, DamageCause, EventLog, Outcome};

/// Tie-break stream for one-off orderings made by phases.
const RESIDUAL_STREAM: u32 = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Weather {
    Sandstorm { turns_left: u8 },
}

#[derive(Debug)]
pub struct BattleState {
    config: BattleConfig,
    turn: u32,
    creatures: Vec<Creature>,
    weather: Option<Weather>,
    trick_room_turns: u8,
    outcome: Option<Outcome>,
    events: EventLog,
    tie_break: TieBreaker,
}

impl BattleState {
    pub const SANDSTORM_TURNS: u8 = 5;
    pub const TRICK_ROOM_TURNS: u8 = 5;

    /// Creatures must be indexed by their id.
    pub fn new(config: BattleConfig, creatures: Vec<Creature>) -> Self {
        Self {
            tie_break: TieBreaker::with_stream(config.seed, RESIDUAL_STREAM),
            config,
            turn: 0,
            creatures,
            weather: None,
            trick_room_turns: 0,
            outcome: None,
            events: EventLog::new(),
        }
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn creature(&self, id: ParticipantId) -> Option<&Creature> {
        self.creatures.get(id.0 as usize)
    }

    pub fn creature_mut(&mut self, id: ParticipantId) -> Option<&mut Creature> {
        self.creatures.get_mut(id.0 as usize)
    }

    pub fn creatures(&self) -> &[Creature] {
        &self.creatures
    }

    pub fn find_by_name(&self, name: &str) -> Option<ParticipantId> {
        self.creatures
            .iter()
            .find(|creature| creature.name == name)
            .map(|creature| creature.id)
    }

    /// Display name of `id`, falling back to its number.
    pub fn name(&self, id: ParticipantId) -> String {
        self.creature(id)
            .map(|creature| creature.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    /// Active creatures, player side first, then by field slot.
    pub fn active(&self) -> Vec<ParticipantId> {
        let mut active: Vec<&Creature> = self
            .creatures
            .iter()
            .filter(|creature| creature.is_active())
            .collect();
        active.sort_by_key(|creature| (creature.side, creature.slot()));
        active.into_iter().map(|creature| creature.id).collect()
    }

    /// Active creatures of `side` by field slot.
    pub fn active_on(&self, side: Side) -> Vec<ParticipantId> {
        self.active()
            .into_iter()
            .filter(|id| self.creature(*id).is_some_and(|creature| creature.side == side))
            .collect()
    }

    /// Default target of `id`: the opposing active creature in the lowest slot.
    pub fn first_foe(&self, id: ParticipantId) -> Option<ParticipantId> {
        let side = self.creature(id)?.side;
        self.active_on(side.opponent()).into_iter().next()
    }

    /// Creatures that start on the field, in roster order per side.
    pub fn leads(&self) -> Vec<ParticipantId> {
        [Side::Player, Side::Enemy]
            .into_iter()
            .flat_map(|side| {
                self.creatures
                    .iter()
                    .filter(move |creature| creature.side == side)
                    .take(self.config.field_size)
                    .map(|creature| creature.id)
            })
            .collect()
    }

    /// First benched creature of `side` still able to battle.
    pub fn next_reserve(&self, side: Side) -> Option<ParticipantId> {
        self.creatures
            .iter()
            .find(|creature| {
                creature.side == side && creature.position == Position::Bench && creature.can_battle()
            })
            .map(|creature| creature.id)
    }

    pub fn able_to_battle(&self, side: Side) -> bool {
        self.creatures
            .iter()
            .any(|creature| creature.side == side && creature.can_battle())
    }

    fn free_slot(&self, side: Side) -> Option<usize> {
        (0..self.config.field_size).find(|slot| {
            !self.creatures.iter().any(|creature| {
                creature.side == side && creature.position == Position::Field(*slot)
            })
        })
    }

    /// Moves `id` from the bench into the first free slot of its side.
    pub fn enter_field(&mut self, id: ParticipantId) -> Option<usize> {
        let side = self.creature(id)?.side;
        let slot = self.free_slot(side)?;
        let creature = self.creature_mut(id)?;
        creature.position = Position::Field(slot);
        Some(slot)
    }

    /// Applies damage and records it. Returns whether `id` was knocked out.
    pub fn apply_damage(&mut self, id: ParticipantId, amount: u32, cause: DamageCause) -> bool {
        let Some(creature) = self.creature_mut(id) else {
            return false;
        };
        let knocked_out = creature.take_damage(amount);
        let event = BattleEvent::Damaged {
            creature: creature.name.clone(),
            amount,
            hp: creature.hp,
            cause,
        };
        self.events.push(event);
        knocked_out
    }

    /// Marks `id` fainted and returns its side.
    pub fn faint(&mut self, id: ParticipantId) -> Option<Side> {
        let creature = self.creature_mut(id)?;
        creature.hp = 0;
        creature.position = Position::Fainted;
        let (side, name) = (creature.side, creature.name.clone());
        self.events.push(BattleEvent::Fainted { creature: name });
        Some(side)
    }

    /// Shifts the speed stage of `id`, recording the new stage if it moved.
    pub fn shift_speed_stage(&mut self, id: ParticipantId, delta: i8) {
        let Some(creature) = self.creature_mut(id) else {
            return;
        };
        if creature.shift_speed_stage(delta) {
            let event = BattleEvent::SpeedChanged {
                creature: creature.name.clone(),
                stage: creature.speed_stage,
            };
            self.events.push(event);
        }
    }

    pub fn poison(&mut self, id: ParticipantId) {
        let Some(creature) = self.creature_mut(id) else {
            return;
        };
        if creature.status.is_none() {
            creature.status = Some(Status::Poison);
            let event = BattleEvent::Poisoned {
                creature: creature.name.clone(),
            };
            self.events.push(event);
        }
    }

    pub fn weather(&self) -> Option<Weather> {
        self.weather
    }

    /// Starts (or restarts) a sandstorm.
    pub fn start_sandstorm(&mut self) {
        self.weather = Some(Weather::Sandstorm {
            turns_left: Self::SANDSTORM_TURNS,
        });
        self.events.push(BattleEvent::SandstormStarted);
    }

    /// Counts down the weather at the end of a turn.
    pub fn tick_weather(&mut self) {
        if let Some(Weather::Sandstorm { turns_left }) = self.weather {
            if turns_left <= 1 {
                self.weather = None;
                self.events.push(BattleEvent::SandstormEnded);
            } else {
                self.weather = Some(Weather::Sandstorm {
                    turns_left: turns_left - 1,
                });
            }
        }
    }

    pub fn trick_room_active(&self) -> bool {
        self.trick_room_turns > 0
    }

    /// Twists the dimensions, or restores them if already twisted.
    pub fn toggle_trick_room(&mut self) {
        if self.trick_room_active() {
            self.trick_room_turns = 0;
            self.events.push(BattleEvent::TrickRoomEnded);
        } else {
            self.trick_room_turns = Self::TRICK_ROOM_TURNS;
            self.events.push(BattleEvent::TrickRoomStarted);
        }
    }

    pub fn begin_turn(&mut self) -> u32 {
        self.turn += 1;
        self.events.push(BattleEvent::TurnStarted { turn: self.turn });
        self.turn
    }

    pub fn end_turn(&mut self) {
        if self.trick_room_turns > 0 {
            self.trick_room_turns -= 1;
            if self.trick_room_turns == 0 {
                self.events.push(BattleEvent::TrickRoomEnded);
            }
        }
        self.events.push(BattleEvent::TurnEnded { turn: self.turn });
    }

    /// Outcome given which sides can still battle.
    pub fn decide_outcome(&self) -> Option<Outcome> {
        match (
            self.able_to_battle(Side::Player),
            self.able_to_battle(Side::Enemy),
        ) {
            (true, true) => None,
            (true, false) => Some(Outcome::Winner(Side::Player)),
            (false, true) => Some(Outcome::Winner(Side::Enemy)),
            (false, false) => Some(Outcome::Draw),
        }
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn finish(&mut self, outcome: Outcome) {
        if self.outcome.is_none() {
            self.outcome = Some(outcome);
            self.events.push(BattleEvent::BattleEnded { outcome });
        }
    }

    pub fn emit(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Orders `participants` by live speed, breaking ties with the battle's
    /// residual stream.
    pub fn speed_order(
        &mut self,
        participants: &[ParticipantId],
    ) -> Result<Vec<ParticipantId>, SchedulerError> {
        let mut tie_break = self.tie_break.clone();
        let order = order_by_speed(participants, &*self, &mut tie_break)?;
        self.tie_break = tie_break;
        Ok(order)
    }
}

impl BattleOracle for BattleState {
    fn effective_speed(&self, participant: ParticipantId) -> Option<u32> {
        self.creature(participant).map(Creature::effective_speed)
    }

    fn speed_reversed(&self) -> bool {
        self.trick_room_active()
    }

    fn entry_reactions(&self, participant: ParticipantId) -> Reactions {
        let mut reactions = Reactions::new();
        let Some(creature) = self.creature(participant).filter(|c| c.is_active()) else {
            return reactions;
        };
        for (index, ability) in creature
            .abilities
            .iter()
            .take(BattleConfig::MAX_REACTIONS)
            .enumerate()
        {
            reactions.push(if index == 0 {
                ReactionSpec::primary(ability.priority)
            } else {
                ReactionSpec::secondary(ability.priority)
            });
        }
        reactions
    }
}
