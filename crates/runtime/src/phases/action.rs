use battle_content::MoveEffect;
use battle_core::{ParticipantId, Phase, PhaseContext, PhaseKind, PhaseStep, SchedulerError};

use super::{creature, is_active, strike};
use crate::events::{BattleEvent, DamageCause};
use crate::state::BattleState;

/// One creature using one of its moves.
///
/// The move's priority is its bracket. The bracket and the user's speed are
/// read from live state whenever the action queue orders, so a speed change
/// earlier in the turn reorders the moves still pending.
#[derive(Debug)]
pub struct MovePhase {
    user: ParticipantId,
    slot: usize,
}

impl MovePhase {
    pub fn new(user: ParticipantId, slot: usize) -> Self {
        Self { user, slot }
    }

    pub fn slot(&self) -> usize {
        self.slot
    }
}

impl Phase<BattleState> for MovePhase {
    fn kind(&self) -> PhaseKind {
        PhaseKind::Move
    }

    fn participant(&self) -> Option<ParticipantId> {
        Some(self.user)
    }

    fn bracket(&self, battle: &BattleState) -> i32 {
        battle
            .creature(self.user)
            .and_then(|creature| creature.moves.get(self.slot))
            .map(|spec| spec.priority)
            .unwrap_or_default()
    }

    fn start(
        &mut self,
        ctx: &mut PhaseContext<'_, BattleState>,
    ) -> Result<PhaseStep, SchedulerError> {
        let user = creature(ctx.battle(), self.user, PhaseKind::Move)?;
        if !user.is_active() {
            return Ok(PhaseStep::End);
        }
        let spec = user.moves.get(self.slot).cloned().ok_or_else(|| {
            SchedulerError::effect(
                PhaseKind::Move,
                format!("{} has no move in slot {}", self.user, self.slot),
            )
        })?;
        let user_name = user.name.clone();
        let target = ctx.battle().first_foe(self.user);

        tracing::debug!(
            target: "runtime::phase",
            participant = %self.user,
            r#move = %spec.name,
            "move used"
        );
        let event = BattleEvent::MoveUsed {
            creature: user_name,
            move_name: spec.name.clone(),
            target: target.map(|target| ctx.battle().name(target)),
        };
        ctx.battle_mut().emit(event);

        if let Some(target) = target.filter(|_| spec.power > 0) {
            strike(ctx, target, spec.power, DamageCause::Move)?;
        }

        match spec.effect {
            MoveEffect::None => {}
            MoveEffect::LowerTargetSpeed(stages) => {
                if let Some(target) = target {
                    ctx.unshift_phase(Box::new(StatStageChangePhase::new(
                        target,
                        -stage_delta(stages),
                    )))?;
                }
            }
            MoveEffect::RaiseUserSpeed(stages) => {
                ctx.unshift_phase(Box::new(StatStageChangePhase::new(
                    self.user,
                    stage_delta(stages),
                )))?;
            }
            MoveEffect::Poison => {
                if let Some(target) = target.filter(|target| is_active(ctx.battle(), *target)) {
                    ctx.battle_mut().poison(target);
                }
            }
            MoveEffect::TrickRoom => ctx.battle_mut().toggle_trick_room(),
            MoveEffect::Sandstorm => ctx.battle_mut().start_sandstorm(),
            MoveEffect::Quash | MoveEffect::AfterYou => {
                if let Some(target) = target {
                    let first = spec.effect == MoveEffect::AfterYou;
                    let owned_by_target =
                        |phase: &dyn Phase<BattleState>| phase.participant() == Some(target);
                    let forced = if first {
                        ctx.scheduler().force_action_first(&owned_by_target)
                    } else {
                        ctx.scheduler().force_action_last(&owned_by_target)
                    };
                    if forced {
                        let creature = ctx.battle().name(target);
                        ctx.battle_mut()
                            .emit(BattleEvent::ActionForced { creature, first });
                    }
                }
            }
        }
        Ok(PhaseStep::End)
    }
}

fn stage_delta(stages: u8) -> i8 {
    i8::try_from(stages).unwrap_or(i8::MAX)
}

/// Shifts one creature's speed stage.
#[derive(Debug)]
pub struct StatStageChangePhase {
    target: ParticipantId,
    delta: i8,
}

impl StatStageChangePhase {
    pub fn new(target: ParticipantId, delta: i8) -> Self {
        Self { target, delta }
    }
}

impl Phase<BattleState> for StatStageChangePhase {
    fn kind(&self) -> PhaseKind {
        PhaseKind::StatStageChange
    }

    fn participant(&self) -> Option<ParticipantId> {
        Some(self.target)
    }

    fn start(
        &mut self,
        ctx: &mut PhaseContext<'_, BattleState>,
    ) -> Result<PhaseStep, SchedulerError> {
        if is_active(ctx.battle(), self.target) {
            ctx.battle_mut().shift_speed_stage(self.target, self.delta);
        }
        Ok(PhaseStep::End)
    }
}
