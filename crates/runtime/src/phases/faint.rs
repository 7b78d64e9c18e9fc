use battle_core::{ParticipantId, Phase, PhaseContext, PhaseKind, PhaseStep, SchedulerError};

use super::SummonPhase;
use crate::events::{BattleEvent, Outcome};
use crate::state::BattleState;

/// Removes a knocked-out creature from the battle.
///
/// Its pending move and end-of-turn status are cancelled. If its side still
/// has a reserve, the reserve is summoned next; if either side is out of
/// creatures, everything pending is dropped and the battle ends.
#[derive(Debug)]
pub struct FaintPhase {
    participant: ParticipantId,
}

impl FaintPhase {
    pub fn new(participant: ParticipantId) -> Self {
        Self { participant }
    }
}

impl Phase<BattleState> for FaintPhase {
    fn kind(&self) -> PhaseKind {
        PhaseKind::Faint
    }

    fn participant(&self) -> Option<ParticipantId> {
        Some(self.participant)
    }

    fn start(
        &mut self,
        ctx: &mut PhaseContext<'_, BattleState>,
    ) -> Result<PhaseStep, SchedulerError> {
        let id = self.participant;
        let Some(side) = ctx.battle_mut().faint(id) else {
            return Err(SchedulerError::effect(
                PhaseKind::Faint,
                format!("unknown participant {id}"),
            ));
        };
        tracing::debug!(target: "runtime::phase", participant = %id, "fainted");

        let owned = |phase: &dyn Phase<BattleState>| phase.participant() == Some(id);
        if ctx.try_remove_phase(PhaseKind::Move, &owned)? {
            let creature = ctx.battle().name(id);
            ctx.battle_mut()
                .emit(BattleEvent::MoveCancelled { creature });
        }
        ctx.try_remove_phase(PhaseKind::PostTurnStatus, &owned)?;

        if ctx.battle().decide_outcome().is_some() {
            let scheduler = ctx.scheduler();
            scheduler.clear_phase_queue();
            scheduler.clear_dynamic_queues();
            ctx.unshift_phase(Box::new(BattleEndPhase))?;
        } else if let Some(reserve) = ctx.battle().next_reserve(side) {
            ctx.unshift_phase(Box::new(SummonPhase::replacement(reserve)))?;
        }
        Ok(PhaseStep::End)
    }
}

/// Records the outcome. Nothing is scheduled after it.
#[derive(Debug, Default)]
pub struct BattleEndPhase;

impl Phase<BattleState> for BattleEndPhase {
    fn kind(&self) -> PhaseKind {
        PhaseKind::BattleEnd
    }

    fn start(
        &mut self,
        ctx: &mut PhaseContext<'_, BattleState>,
    ) -> Result<PhaseStep, SchedulerError> {
        let outcome = ctx.battle().decide_outcome().unwrap_or(Outcome::Draw);
        ctx.battle_mut().finish(outcome);
        tracing::info!(target: "runtime::battle", outcome = %outcome, "battle ended");

        let scheduler = ctx.scheduler();
        scheduler.clear_phase_queue();
        scheduler.clear_dynamic_queues();
        Ok(PhaseStep::End)
    }
}
