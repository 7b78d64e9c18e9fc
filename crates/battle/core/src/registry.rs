//! Fixed mapping from dynamic phase kinds to their ordering queues.
//!
//! The registry is assembled once per battle through
//! [`QueueRegistryBuilder`] and never changes shape afterwards; only the
//! contents of the registered queues do.

use std::collections::BTreeMap;
use std::fmt;

use crate::env::{BattleOracle, TieBreaker};
use crate::error::SchedulerError;
use crate::phase::{BoxedPhase, Phase, PhaseKind};
use crate::queue::{
    ActionOrderQueue, CreatureOrderQueue, DynamicQueue, PhasePredicate, ReactionFactory,
    ReleasePoint, SummonReactionQueue,
};

/// Tie-break streams of the standard queues. Each queue draws from its own
/// stream so that activity in one never shifts tie-breaks in another.
const ACTION_STREAM: u32 = 1;
const SUMMON_STREAM: u32 = 2;
const CREATURE_STREAM: u32 = 3;

pub struct QueueRegistryBuilder<B> {
    queues: BTreeMap<PhaseKind, Box<dyn DynamicQueue<B>>>,
}

impl<B> Default for QueueRegistryBuilder<B> {
    fn default() -> Self {
        Self {
            queues: BTreeMap::new(),
        }
    }
}

impl<B> fmt::Debug for QueueRegistryBuilder<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.queues.iter()).finish()
    }
}

impl<B> QueueRegistryBuilder<B> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `queue` as the owner of `kind`.
    pub fn register(
        mut self,
        kind: PhaseKind,
        queue: Box<dyn DynamicQueue<B>>,
    ) -> Result<Self, SchedulerError> {
        if self.queues.contains_key(&kind) {
            return Err(SchedulerError::DuplicateQueue { kind });
        }
        self.queues.insert(kind, queue);
        Ok(self)
    }

    pub fn build(self) -> QueueRegistry<B> {
        QueueRegistry {
            queues: self.queues,
        }
    }
}

/// Owns one queue per dynamic [`PhaseKind`].
pub struct QueueRegistry<B> {
    queues: BTreeMap<PhaseKind, Box<dyn DynamicQueue<B>>>,
}

impl<B> fmt::Debug for QueueRegistry<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.queues.iter()).finish()
    }
}

impl<B> Default for QueueRegistry<B> {
    fn default() -> Self {
        QueueRegistryBuilder::new().build()
    }
}

impl<B: BattleOracle + 'static> QueueRegistry<B> {
    /// Registry with the standard battle queues:
    ///
    /// | Kind                            | Queue                   |
    /// |---------------------------------|-------------------------|
    /// | [`PhaseKind::Move`]             | [`ActionOrderQueue`]    |
    /// | [`PhaseKind::PostSummon`]       | [`SummonReactionQueue`] |
    /// | [`PhaseKind::PostTurnStatus`]   | [`CreatureOrderQueue`]  |
    pub fn standard(seed: u64, reactions: ReactionFactory<B>) -> Self {
        let queues: [(PhaseKind, Box<dyn DynamicQueue<B>>); 3] = [
            (
                PhaseKind::Move,
                Box::new(ActionOrderQueue::new(TieBreaker::with_stream(
                    seed,
                    ACTION_STREAM,
                ))),
            ),
            (
                PhaseKind::PostSummon,
                Box::new(SummonReactionQueue::new(
                    TieBreaker::with_stream(seed, SUMMON_STREAM),
                    reactions,
                )),
            ),
            (
                PhaseKind::PostTurnStatus,
                Box::new(CreatureOrderQueue::new(TieBreaker::with_stream(
                    seed,
                    CREATURE_STREAM,
                ))),
            ),
        ];
        Self {
            queues: queues.into_iter().collect(),
        }
    }
}

impl<B> QueueRegistry<B> {
    pub fn builder() -> QueueRegistryBuilder<B> {
        QueueRegistryBuilder::new()
    }

    pub fn is_dynamic_type(&self, kind: PhaseKind) -> bool {
        self.queues.contains_key(&kind)
    }

    /// Registered kinds in a stable order.
    pub fn kinds(&self) -> impl Iterator<Item = PhaseKind> + '_ {
        self.queues.keys().copied()
    }

    fn queue_mut(&mut self, kind: PhaseKind) -> Result<&mut dyn DynamicQueue<B>, SchedulerError> {
        match self.queues.get_mut(&kind) {
            Some(queue) => Ok(queue.as_mut()),
            None => Err(SchedulerError::UnregisteredDynamicType { kind }),
        }
    }

    /// Routes `phase` to the queue owning its kind.
    pub fn enqueue(
        &mut self,
        phase: BoxedPhase<B>,
        battle: &B,
    ) -> Result<Vec<ReleasePoint>, SchedulerError> {
        let kind = phase.kind();
        let releases = self.queue_mut(kind)?.enqueue(phase, battle)?;
        tracing::trace!(
            target: "battle_core::registry",
            kind = %kind,
            generated = releases.len(),
            "enqueued dynamic phase"
        );
        Ok(releases)
    }

    /// Next-ordered phase of `kind`; `Ok(None)` when its queue is empty.
    pub fn release(
        &mut self,
        kind: PhaseKind,
        battle: &B,
    ) -> Result<Option<BoxedPhase<B>>, SchedulerError> {
        self.queue_mut(kind)?.release(battle)
    }

    pub fn remove(
        &mut self,
        kind: PhaseKind,
        battle: &B,
        predicate: PhasePredicate<'_, B>,
    ) -> Result<bool, SchedulerError> {
        self.queue_mut(kind)?.remove(battle, predicate)
    }

    /// First pending phase of `kind` matching `predicate`. Non-dynamic kinds
    /// never match.
    pub fn find(&self, kind: PhaseKind, predicate: PhasePredicate<'_, B>) -> Option<&dyn Phase<B>> {
        self.queues.get(&kind)?.find(predicate)
    }

    pub fn has(&self, kind: PhaseKind, predicate: PhasePredicate<'_, B>) -> bool {
        self.find(kind, predicate).is_some()
    }

    /// Pending phases of `kind`; zero for non-dynamic kinds.
    pub fn len_of(&self, kind: PhaseKind) -> usize {
        self.queues.get(&kind).map_or(0, |queue| queue.len())
    }

    /// Total pending phases across every queue.
    pub fn len(&self) -> usize {
        self.queues.values().map(|queue| queue.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.queues.values().all(|queue| queue.is_empty())
    }

    pub fn clear_all(&mut self) {
        for queue in self.queues.values_mut() {
            queue.clear();
        }
    }

    /// The registered action queue, if [`PhaseKind::Move`] is backed by one.
    pub fn action_queue_mut(&mut self) -> Option<&mut ActionOrderQueue<B>> {
        self.queues
            .get_mut(&PhaseKind::Move)?
            .as_action_queue_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::ParticipantId;
    use crate::phase::{SummonRole, SummonSource};
    use crate::testing::{TestBattle, TestPhase};

    fn registry() -> QueueRegistry<TestBattle> {
        QueueRegistry::standard(
            7,
            Box::new(|participant, spec| {
                TestPhase::new(PhaseKind::PostSummon)
                    .owned_by(participant.0)
                    .with_role(SummonRole::Reaction {
                        priority: spec.priority,
                        secondary: spec.secondary,
                    })
                    .boxed()
            }),
        )
    }

    #[test]
    fn standard_registry_covers_dynamic_kinds() {
        let registry = registry();
        assert!(registry.is_dynamic_type(PhaseKind::Move));
        assert!(registry.is_dynamic_type(PhaseKind::PostSummon));
        assert!(registry.is_dynamic_type(PhaseKind::PostTurnStatus));
        assert!(!registry.is_dynamic_type(PhaseKind::TurnEnd));
        assert!(registry.is_empty());
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let err = QueueRegistry::<TestBattle>::builder()
            .register(
                PhaseKind::PostTurnStatus,
                Box::new(CreatureOrderQueue::new(TieBreaker::new(1))),
            )
            .and_then(|builder| {
                builder.register(
                    PhaseKind::PostTurnStatus,
                    Box::new(CreatureOrderQueue::new(TieBreaker::new(2))),
                )
            })
            .unwrap_err();
        assert_eq!(
            err,
            SchedulerError::DuplicateQueue {
                kind: PhaseKind::PostTurnStatus
            }
        );
    }

    #[test]
    fn builder_debug_lists_registered_kinds() {
        let builder = QueueRegistry::<TestBattle>::builder()
            .register(
                PhaseKind::PostTurnStatus,
                Box::new(CreatureOrderQueue::new(TieBreaker::new(1))),
            )
            .unwrap();
        assert!(format!("{builder:?}").contains("PostTurnStatus"));
    }

    #[test]
    fn unregistered_kind_is_an_error() {
        let battle = TestBattle::default();
        let mut registry = registry();
        let err = registry
            .enqueue(TestPhase::new(PhaseKind::Message).boxed(), &battle)
            .unwrap_err();
        assert_eq!(
            err,
            SchedulerError::UnregisteredDynamicType {
                kind: PhaseKind::Message
            }
        );
        assert!(registry.release(PhaseKind::Message, &battle).is_err());
    }

    #[test]
    fn release_routes_by_kind() {
        let battle = TestBattle::with_speeds(&[(1, 50), (2, 90)]);
        let mut registry = registry();
        registry
            .enqueue(
                TestPhase::new(PhaseKind::PostTurnStatus).owned_by(1).boxed(),
                &battle,
            )
            .unwrap();
        registry
            .enqueue(TestPhase::new(PhaseKind::Move).owned_by(2).boxed(), &battle)
            .unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.len_of(PhaseKind::Move), 1);
        let released = registry
            .release(PhaseKind::PostTurnStatus, &battle)
            .unwrap()
            .unwrap();
        assert_eq!(released.kind(), PhaseKind::PostTurnStatus);
        assert!(registry.release(PhaseKind::PostSummon, &battle).unwrap().is_none());
    }

    #[test]
    fn entry_reports_generated_reactions() {
        let mut battle = TestBattle::with_speeds(&[(1, 50)]);
        battle.reactions.insert(
            ParticipantId(1),
            [crate::env::ReactionSpec::primary(0)].into_iter().collect(),
        );
        let mut registry = registry();
        let releases = registry
            .enqueue(
                TestPhase::new(PhaseKind::PostSummon)
                    .owned_by(1)
                    .with_role(SummonRole::Entry {
                        source: SummonSource::Replacement,
                    })
                    .boxed(),
                &battle,
            )
            .unwrap();
        assert_eq!(releases.len(), 1);
        assert_eq!(registry.len_of(PhaseKind::PostSummon), 2);
    }

    #[test]
    fn clear_all_empties_every_queue() {
        let battle = TestBattle::with_speeds(&[(1, 50)]);
        let mut registry = registry();
        registry
            .enqueue(TestPhase::new(PhaseKind::Move).owned_by(1).boxed(), &battle)
            .unwrap();
        registry
            .enqueue(
                TestPhase::new(PhaseKind::PostTurnStatus).owned_by(1).boxed(),
                &battle,
            )
            .unwrap();
        registry.clear_all();
        assert!(registry.is_empty());
        assert!(!registry.has(PhaseKind::Move, &|_| true));
    }

    #[test]
    fn action_queue_is_reachable() {
        let mut registry = registry();
        assert!(registry.action_queue_mut().is_some());
        let mut bare = QueueRegistry::<TestBattle>::default();
        assert!(bare.action_queue_mut().is_none());
    }
}
