use battle_core::{ParticipantId, Phase, PhaseContext, PhaseKind, PhaseStep, SchedulerError};

use super::{is_active, strike};
use crate::events::DamageCause;
use crate::state::{BattleState, Status, Weather};

/// Sandstorm chip damage, dealt in live speed order.
#[derive(Debug, Default)]
pub struct WeatherEffectPhase;

impl WeatherEffectPhase {
    const SANDSTORM_DIVISOR: u32 = 16;
}

impl Phase<BattleState> for WeatherEffectPhase {
    fn kind(&self) -> PhaseKind {
        PhaseKind::WeatherEffect
    }

    fn start(
        &mut self,
        ctx: &mut PhaseContext<'_, BattleState>,
    ) -> Result<PhaseStep, SchedulerError> {
        let Some(Weather::Sandstorm { .. }) = ctx.battle().weather() else {
            return Ok(PhaseStep::End);
        };

        let active = ctx.battle().active();
        let order = ctx.battle_mut().speed_order(&active)?;
        for participant in order {
            let Some(amount) = ctx
                .battle()
                .creature(participant)
                .filter(|creature| creature.is_active())
                .map(|creature| creature.fraction_of_max_hp(Self::SANDSTORM_DIVISOR))
            else {
                continue;
            };
            strike(ctx, participant, amount, DamageCause::Sandstorm)?;
        }
        ctx.battle_mut().tick_weather();
        Ok(PhaseStep::End)
    }
}

/// End-of-turn status damage for one creature.
///
/// Queued for every active creature when the turn opens; the creature order
/// queue settles who goes first when each release marker is reached.
#[derive(Debug)]
pub struct PostTurnStatusPhase {
    participant: ParticipantId,
}

impl PostTurnStatusPhase {
    const POISON_DIVISOR: u32 = 8;

    pub fn new(participant: ParticipantId) -> Self {
        Self { participant }
    }
}

impl Phase<BattleState> for PostTurnStatusPhase {
    fn kind(&self) -> PhaseKind {
        PhaseKind::PostTurnStatus
    }

    fn participant(&self) -> Option<ParticipantId> {
        Some(self.participant)
    }

    fn start(
        &mut self,
        ctx: &mut PhaseContext<'_, BattleState>,
    ) -> Result<PhaseStep, SchedulerError> {
        if !is_active(ctx.battle(), self.participant) {
            return Ok(PhaseStep::End);
        }
        let Some(creature) = ctx.battle().creature(self.participant) else {
            return Ok(PhaseStep::End);
        };
        if creature.status == Some(Status::Poison) {
            let amount = creature.fraction_of_max_hp(Self::POISON_DIVISOR);
            strike(ctx, self.participant, amount, DamageCause::Poison)?;
        }
        Ok(PhaseStep::End)
    }
}
