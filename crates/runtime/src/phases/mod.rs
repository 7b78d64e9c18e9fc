//! Concrete battle phases.
//!
//! Each phase is one unit of battle work scheduled through the
//! [`PhaseManager`](battle_core::PhaseManager). Phases mutate
//! [`BattleState`] and schedule follow-up work; none of them order anything
//! themselves.
//!
//! | Kind               | Phase                    | Scheduled by                     |
//! |--------------------|--------------------------|----------------------------------|
//! | `turn_init`        | [`TurnInitPhase`]        | runtime, when the schedule idles |
//! | `command`          | [`CommandPhase`]         | turn init                        |
//! | `move`             | [`MovePhase`]            | command (dynamic)                |
//! | `stat_stage_change`| [`StatStageChangePhase`] | moves, entry reactions           |
//! | `faint`            | [`FaintPhase`]           | anything that deals damage       |
//! | `summon`           | [`SummonPhase`]          | runtime start, faint             |
//! | `post_summon`      | [`EntryPhase`], [`ReactionPhase`] | summon (dynamic)        |
//! | `weather_effect`   | [`WeatherEffectPhase`]   | turn init                        |
//! | `post_turn_status` | [`PostTurnStatusPhase`]  | turn init (dynamic)              |
//! | `turn_end`         | [`TurnEndPhase`]         | turn init                        |
//! | `battle_end`       | [`BattleEndPhase`]       | faint                            |
mod action;
mod faint;
mod residual;
mod summon;
mod turn;

pub use action::{MovePhase, StatStageChangePhase};
pub use faint::{BattleEndPhase, FaintPhase};
pub use residual::{PostTurnStatusPhase, WeatherEffectPhase};
pub use summon::{EntryPhase, ReactionPhase, SummonPhase};
pub use turn::{CommandPhase, TurnEndPhase, TurnInitPhase};

use battle_core::{
    BoxedPhase, ParticipantId, PhaseContext, PhaseKind, ReactionFactory, SchedulerError,
};

use crate::events::DamageCause;
use crate::state::{BattleState, Creature};

/// Builds the reaction phases the summon queue generates for entrants.
pub fn reaction_factory() -> ReactionFactory<BattleState> {
    Box::new(|participant, spec| -> BoxedPhase<BattleState> {
        Box::new(ReactionPhase::new(participant, spec))
    })
}

fn creature<'a>(
    state: &'a BattleState,
    id: ParticipantId,
    kind: PhaseKind,
) -> Result<&'a Creature, SchedulerError> {
    state
        .creature(id)
        .ok_or_else(|| SchedulerError::effect(kind, format!("unknown participant {id}")))
}

fn is_active(state: &BattleState, id: ParticipantId) -> bool {
    state.creature(id).is_some_and(Creature::is_active)
}

/// Damages `target` and schedules its faint ahead of pending work.
fn strike(
    ctx: &mut PhaseContext<'_, BattleState>,
    target: ParticipantId,
    amount: u32,
    cause: DamageCause,
) -> Result<(), SchedulerError> {
    if ctx.battle_mut().apply_damage(target, amount, cause) {
        ctx.unshift_phase(Box::new(FaintPhase::new(target)))?;
    }
    Ok(())
}
