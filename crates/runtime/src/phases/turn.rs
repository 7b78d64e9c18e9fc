use battle_core::{
    ParticipantId, Phase, PhaseContext, PhaseKind, PhaseStep, SchedulerError, Signal,
};

use super::{MovePhase, PostTurnStatusPhase, WeatherEffectPhase, creature};
use crate::state::BattleState;

/// Opens a turn and lays out its skeleton.
///
/// Every active creature gets a command phase and a `Move` release marker.
/// The moves themselves are queued by the commands, so their order is only
/// settled when each marker is reached. Turn-end work follows.
#[derive(Debug, Default)]
pub struct TurnInitPhase;

impl Phase<BattleState> for TurnInitPhase {
    fn kind(&self) -> PhaseKind {
        PhaseKind::TurnInit
    }

    fn start(
        &mut self,
        ctx: &mut PhaseContext<'_, BattleState>,
    ) -> Result<PhaseStep, SchedulerError> {
        let turn = ctx.battle_mut().begin_turn();
        let active = ctx.battle().active();
        tracing::info!(
            target: "runtime::battle",
            turn,
            active = active.len(),
            "turn started"
        );

        for participant in &active {
            ctx.push_phase(Box::new(CommandPhase::new(*participant)))?;
        }
        for _ in &active {
            ctx.scheduler().push_release_marker(PhaseKind::Move);
        }
        ctx.push_phase(Box::new(WeatherEffectPhase))?;
        for participant in &active {
            ctx.push_phase(Box::new(PostTurnStatusPhase::new(*participant)))?;
        }
        ctx.push_phase(Box::new(TurnEndPhase))?;
        Ok(PhaseStep::End)
    }
}

/// Waits for the move choice of one creature.
///
/// `Signal::Choice(slot)` picks a move slot; `Signal::Confirm` picks the
/// first. An invalid slot is rejected and the phase keeps waiting.
#[derive(Debug)]
pub struct CommandPhase {
    participant: ParticipantId,
}

impl CommandPhase {
    pub fn new(participant: ParticipantId) -> Self {
        Self { participant }
    }
}

impl Phase<BattleState> for CommandPhase {
    fn kind(&self) -> PhaseKind {
        PhaseKind::Command
    }

    fn participant(&self) -> Option<ParticipantId> {
        Some(self.participant)
    }

    fn start(
        &mut self,
        ctx: &mut PhaseContext<'_, BattleState>,
    ) -> Result<PhaseStep, SchedulerError> {
        if !creature(ctx.battle(), self.participant, PhaseKind::Command)?.is_active() {
            return Ok(PhaseStep::End);
        }
        Ok(PhaseStep::Await)
    }

    fn resume(
        &mut self,
        ctx: &mut PhaseContext<'_, BattleState>,
        signal: Signal,
    ) -> Result<PhaseStep, SchedulerError> {
        let slot = match signal {
            Signal::Confirm => 0,
            Signal::Choice(slot) => slot as usize,
        };
        let known = creature(ctx.battle(), self.participant, PhaseKind::Command)?
            .moves
            .len();
        if slot >= known {
            return Err(SchedulerError::effect(
                PhaseKind::Command,
                format!("{} has no move in slot {slot}", self.participant),
            ));
        }

        tracing::debug!(
            target: "runtime::phase",
            participant = %self.participant,
            slot,
            "command chosen"
        );
        let chosen = Box::new(MovePhase::new(self.participant, slot));
        if let Some(phase) = ctx.queue_dynamic_phase(chosen)? {
            ctx.push_phase(phase)?;
        }
        Ok(PhaseStep::End)
    }
}

/// Closes the turn: field effects count down.
#[derive(Debug, Default)]
pub struct TurnEndPhase;

impl Phase<BattleState> for TurnEndPhase {
    fn kind(&self) -> PhaseKind {
        PhaseKind::TurnEnd
    }

    fn start(
        &mut self,
        ctx: &mut PhaseContext<'_, BattleState>,
    ) -> Result<PhaseStep, SchedulerError> {
        let state = ctx.battle_mut();
        state.end_turn();
        tracing::info!(target: "runtime::battle", turn = state.turn(), "turn ended");
        Ok(PhaseStep::End)
    }
}
