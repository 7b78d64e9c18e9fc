use battle_content::EntryEffect;
use battle_core::{
    ParticipantId, Phase, PhaseContext, PhaseKind, PhaseStep, ReactionSpec, SchedulerError,
    SummonRole, SummonSource,
};

use super::{StatStageChangePhase, creature, is_active};
use crate::events::BattleEvent;
use crate::state::BattleState;

/// Sends a creature onto the field and schedules its entry.
///
/// Battle-start entries are appended so that every lead is on the field
/// before any entry resolves. A replacement's entry is inserted at the front
/// and resolves before the rest of the turn.
#[derive(Debug)]
pub struct SummonPhase {
    participant: ParticipantId,
    source: SummonSource,
}

impl SummonPhase {
    pub fn battle_start(participant: ParticipantId) -> Self {
        Self {
            participant,
            source: SummonSource::BattleStart,
        }
    }

    pub fn replacement(participant: ParticipantId) -> Self {
        Self {
            participant,
            source: SummonSource::Replacement,
        }
    }
}

impl Phase<BattleState> for SummonPhase {
    fn kind(&self) -> PhaseKind {
        PhaseKind::Summon
    }

    fn participant(&self) -> Option<ParticipantId> {
        Some(self.participant)
    }

    fn start(
        &mut self,
        ctx: &mut PhaseContext<'_, BattleState>,
    ) -> Result<PhaseStep, SchedulerError> {
        let id = self.participant;
        let side = creature(ctx.battle(), id, PhaseKind::Summon)?.side;
        let Some(slot) = ctx.battle_mut().enter_field(id) else {
            return Err(SchedulerError::effect(
                PhaseKind::Summon,
                format!("no free slot for {id}"),
            ));
        };
        tracing::debug!(
            target: "runtime::phase",
            participant = %id,
            slot,
            source = %self.source,
            "sent out"
        );
        let event = BattleEvent::SentOut {
            creature: ctx.battle().name(id),
            side,
            source: self.source,
        };
        ctx.battle_mut().emit(event);

        let entry = Box::new(EntryPhase::new(id, self.source));
        match self.source {
            SummonSource::BattleStart => ctx.push_phase(entry)?,
            SummonSource::Replacement => ctx.unshift_phase(entry)?,
        }
        Ok(PhaseStep::End)
    }
}

/// A creature settling onto the field. Entrants resolve in speed order and
/// each one's reactions follow it directly.
#[derive(Debug)]
pub struct EntryPhase {
    participant: ParticipantId,
    source: SummonSource,
}

impl EntryPhase {
    pub fn new(participant: ParticipantId, source: SummonSource) -> Self {
        Self {
            participant,
            source,
        }
    }
}

impl Phase<BattleState> for EntryPhase {
    fn kind(&self) -> PhaseKind {
        PhaseKind::PostSummon
    }

    fn participant(&self) -> Option<ParticipantId> {
        Some(self.participant)
    }

    fn summon_role(&self) -> Option<SummonRole> {
        Some(SummonRole::Entry {
            source: self.source,
        })
    }

    fn label(&self) -> String {
        format!("entry({})", self.participant)
    }

    fn start(
        &mut self,
        ctx: &mut PhaseContext<'_, BattleState>,
    ) -> Result<PhaseStep, SchedulerError> {
        if is_active(ctx.battle(), self.participant) {
            let creature = ctx.battle().name(self.participant);
            ctx.battle_mut().emit(BattleEvent::Entered { creature });
        }
        Ok(PhaseStep::End)
    }
}

/// One entry ability of an entrant firing.
#[derive(Debug)]
pub struct ReactionPhase {
    participant: ParticipantId,
    spec: ReactionSpec,
}

impl ReactionPhase {
    pub fn new(participant: ParticipantId, spec: ReactionSpec) -> Self {
        Self { participant, spec }
    }
}

impl Phase<BattleState> for ReactionPhase {
    fn kind(&self) -> PhaseKind {
        PhaseKind::PostSummon
    }

    fn participant(&self) -> Option<ParticipantId> {
        Some(self.participant)
    }

    fn summon_role(&self) -> Option<SummonRole> {
        Some(SummonRole::Reaction {
            priority: self.spec.priority,
            secondary: self.spec.secondary,
        })
    }

    fn label(&self) -> String {
        let which = if self.spec.secondary {
            "secondary"
        } else {
            "primary"
        };
        format!("reaction({}, {which})", self.participant)
    }

    fn start(
        &mut self,
        ctx: &mut PhaseContext<'_, BattleState>,
    ) -> Result<PhaseStep, SchedulerError> {
        let owner = creature(ctx.battle(), self.participant, PhaseKind::PostSummon)?;
        if !owner.is_active() {
            return Ok(PhaseStep::End);
        }
        let Some(ability) = owner.abilities.get(usize::from(self.spec.secondary)).cloned()
        else {
            return Err(SchedulerError::effect(
                PhaseKind::PostSummon,
                format!("{} has no ability for this reaction", self.participant),
            ));
        };
        let (name, side) = (owner.name.clone(), owner.side);

        ctx.battle_mut().emit(BattleEvent::AbilityActivated {
            creature: name,
            ability: ability.name,
        });
        match ability.effect {
            EntryEffect::Announce => {}
            EntryEffect::LowerFoeSpeed(stages) => {
                let delta = -i8::try_from(stages).unwrap_or(i8::MAX);
                for foe in ctx.battle().active_on(side.opponent()) {
                    ctx.unshift_phase(Box::new(StatStageChangePhase::new(foe, delta)))?;
                }
            }
            EntryEffect::Sandstorm => ctx.battle_mut().start_sandstorm(),
            EntryEffect::TrickRoom => ctx.battle_mut().toggle_trick_room(),
        }
        Ok(PhaseStep::End)
    }
}
