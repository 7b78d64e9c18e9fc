#![allow(dead_code)]

use std::collections::BTreeMap;

use battle_core::{
    BattleOracle, BoxedPhase, ParticipantId, Phase, PhaseContext, PhaseKind, PhaseStep,
    ReactionSpec, Reactions, SchedulerError, SummonRole,
};

/// Battle state holding only what the scheduler reads.
#[derive(Debug, Default)]
pub struct Arena {
    pub speeds: BTreeMap<ParticipantId, u32>,
    pub brackets: BTreeMap<ParticipantId, i32>,
    pub reactions: BTreeMap<ParticipantId, Reactions>,
    pub trick_room: bool,
    pub executed: Vec<(PhaseKind, u32)>,
}

impl Arena {
    pub fn with_speeds(speeds: &[(u32, u32)]) -> Self {
        let mut arena = Self::default();
        for &(id, speed) in speeds {
            arena.speeds.insert(ParticipantId(id), speed);
        }
        arena
    }

    pub fn give_reactions(&mut self, id: u32, specs: &[ReactionSpec]) {
        self.reactions
            .insert(ParticipantId(id), specs.iter().copied().collect());
    }
}

impl BattleOracle for Arena {
    fn effective_speed(&self, participant: ParticipantId) -> Option<u32> {
        self.speeds.get(&participant).copied()
    }

    fn speed_reversed(&self) -> bool {
        self.trick_room
    }

    fn entry_reactions(&self, participant: ParticipantId) -> Reactions {
        self.reactions.get(&participant).cloned().unwrap_or_default()
    }
}

/// Phase owned by one participant; records `(kind, participant)` when run.
#[derive(Debug)]
pub struct Unit {
    kind: PhaseKind,
    owner: ParticipantId,
    role: Option<SummonRole>,
}

impl Unit {
    pub fn boxed(kind: PhaseKind, owner: u32) -> BoxedPhase<Arena> {
        Box::new(Self {
            kind,
            owner: ParticipantId(owner),
            role: None,
        })
    }

    pub fn summon(owner: u32, role: SummonRole) -> BoxedPhase<Arena> {
        Box::new(Self {
            kind: PhaseKind::PostSummon,
            owner: ParticipantId(owner),
            role: Some(role),
        })
    }
}

impl Phase<Arena> for Unit {
    fn kind(&self) -> PhaseKind {
        self.kind
    }

    fn participant(&self) -> Option<ParticipantId> {
        Some(self.owner)
    }

    fn bracket(&self, battle: &Arena) -> i32 {
        battle.brackets.get(&self.owner).copied().unwrap_or_default()
    }

    fn summon_role(&self) -> Option<SummonRole> {
        self.role
    }

    fn start(&mut self, ctx: &mut PhaseContext<'_, Arena>) -> Result<PhaseStep, SchedulerError> {
        ctx.battle_mut().executed.push((self.kind, self.owner.0));
        Ok(PhaseStep::End)
    }
}

pub fn owner(phase: &dyn Phase<Arena>) -> u32 {
    phase.participant().map(|p| p.0).unwrap_or_default()
}
