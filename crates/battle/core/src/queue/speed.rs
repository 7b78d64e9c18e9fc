//! Speed ordering shared by every participant-ordered queue.
//!
//! Faster participants come first; under a speed-reversing field effect the
//! slower ones do. Equal speeds are left to the caller's seeded tie-break.

use std::cmp::Ordering;

use crate::env::{BattleOracle, ParticipantId, TieBreaker};
use crate::error::SchedulerError;
use crate::phase::{BoxedPhase, Phase};
use crate::queue::{OrderRule, Queued};

/// Sort key derived from a participant's live speed. Lower sorts first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpeedKey(i64);

impl SpeedKey {
    pub fn new(speed: u32, reversed: bool) -> Self {
        let speed = i64::from(speed);
        Self(if reversed { speed } else { -speed })
    }

    /// Resolves the key for `participant` from the oracle.
    pub fn resolve<B: BattleOracle>(
        participant: ParticipantId,
        battle: &B,
    ) -> Result<Self, SchedulerError> {
        let speed = battle
            .effective_speed(participant)
            .ok_or(SchedulerError::UnresolvedSpeed { participant })?;
        Ok(Self::new(speed, battle.speed_reversed()))
    }

    /// Resolves the key for the participant a phase belongs to.
    pub fn of_phase<B: BattleOracle>(
        phase: &dyn Phase<B>,
        battle: &B,
    ) -> Result<Self, SchedulerError> {
        let participant = phase
            .participant()
            .ok_or(SchedulerError::MissingParticipant { kind: phase.kind() })?;
        Self::resolve(participant, battle)
    }
}

/// Descending live speed; ties fall through to the queue's seeded tickets.
#[derive(Clone, Copy, Debug, Default)]
pub struct SpeedOrder;

impl<B: BattleOracle> OrderRule<BoxedPhase<B>, B> for SpeedOrder {
    type Key = SpeedKey;

    fn key(&self, entry: &Queued<BoxedPhase<B>>, battle: &B) -> Result<SpeedKey, SchedulerError> {
        SpeedKey::of_phase(entry.item().as_ref(), battle)
    }

    fn compare(&self, a: &SpeedKey, b: &SpeedKey) -> Ordering {
        a.cmp(b)
    }
}

/// One-off speed ordering of a participant list.
///
/// The list is shuffled with `tie_break` first and then stably sorted by
/// speed, so every permutation of an equal-speed group is equally likely and
/// a fixed stream always yields the same permutation.
pub fn order_by_speed<B: BattleOracle>(
    participants: &[ParticipantId],
    battle: &B,
    tie_break: &mut TieBreaker,
) -> Result<Vec<ParticipantId>, SchedulerError> {
    let mut shuffled = participants.to_vec();
    tie_break.shuffle(&mut shuffled);

    let mut keyed = shuffled
        .into_iter()
        .map(|participant| SpeedKey::resolve(participant, battle).map(|key| (key, participant)))
        .collect::<Result<Vec<_>, _>>()?;
    keyed.sort_by_key(|(key, _)| *key);

    Ok(keyed.into_iter().map(|(_, participant)| participant).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestBattle;

    #[test]
    fn key_orders_faster_first() {
        assert!(SpeedKey::new(150, false) < SpeedKey::new(100, false));
        assert!(SpeedKey::new(150, true) > SpeedKey::new(100, true));
    }

    #[test]
    fn order_by_speed_descends() {
        let battle = TestBattle::with_speeds(&[(1, 40), (2, 90), (3, 65)]);
        let mut rng = TieBreaker::new(5);
        let order = order_by_speed(
            &[ParticipantId(1), ParticipantId(2), ParticipantId(3)],
            &battle,
            &mut rng,
        )
        .unwrap();
        assert_eq!(order, vec![ParticipantId(2), ParticipantId(3), ParticipantId(1)]);
    }

    #[test]
    fn order_by_speed_respects_reversal() {
        let mut battle = TestBattle::with_speeds(&[(1, 40), (2, 90)]);
        battle.reversed = true;
        let mut rng = TieBreaker::new(5);
        let order = order_by_speed(&[ParticipantId(2), ParticipantId(1)], &battle, &mut rng).unwrap();
        assert_eq!(order, vec![ParticipantId(1), ParticipantId(2)]);
    }

    #[test]
    fn order_by_speed_rejects_unknown_participant() {
        let battle = TestBattle::with_speeds(&[(1, 40)]);
        let mut rng = TieBreaker::new(5);
        let err = order_by_speed(&[ParticipantId(1), ParticipantId(9)], &battle, &mut rng)
            .unwrap_err();
        assert_eq!(
            err,
            SchedulerError::UnresolvedSpeed {
                participant: ParticipantId(9)
            }
        );
    }

    #[test]
    fn order_by_speed_reproduces_ties_per_seed() {
        let battle = TestBattle::with_speeds(&[(1, 80), (2, 80), (3, 80), (4, 80)]);
        let ids: Vec<_> = (1..=4).map(ParticipantId).collect();
        let first = order_by_speed(&ids, &battle, &mut TieBreaker::new(11)).unwrap();
        let second = order_by_speed(&ids, &battle, &mut TieBreaker::new(11)).unwrap();
        assert_eq!(first, second);
    }
}
