use std::fmt;

use crate::env::{BattleOracle, TieBreaker};
use crate::error::SchedulerError;
use crate::phase::{BoxedPhase, Phase};
use crate::queue::{DynamicQueue, PhasePredicate, PriorityQueue, ReleasePoint, SpeedOrder};

/// Orders phases tied 1:1 to a participant by live effective speed.
///
/// Speed is read on every pop, so a stat change that resolves between two
/// pops is reflected in the very next one.
pub struct CreatureOrderQueue<B> {
    queue: PriorityQueue<BoxedPhase<B>, SpeedOrder>,
}

impl<B: BattleOracle> CreatureOrderQueue<B> {
    pub fn new(tie_break: TieBreaker) -> Self {
        Self {
            queue: PriorityQueue::new(SpeedOrder, tie_break),
        }
    }

    pub fn push(&mut self, phase: BoxedPhase<B>) {
        self.queue.push(phase);
    }

    pub fn pop(&mut self, battle: &B) -> Result<Option<BoxedPhase<B>>, SchedulerError> {
        self.queue.pop(battle)
    }

    /// Queued phases in the current (possibly stale) order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Phase<B>> + '_ {
        self.queue.iter().map(|phase| phase.as_ref())
    }
}

impl<B> fmt::Debug for CreatureOrderQueue<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreatureOrderQueue")
            .field("len", &self.queue.len())
            .finish()
    }
}

impl<B: BattleOracle> DynamicQueue<B> for CreatureOrderQueue<B> {
    fn enqueue(
        &mut self,
        phase: BoxedPhase<B>,
        _battle: &B,
    ) -> Result<Vec<ReleasePoint>, SchedulerError> {
        self.queue.push(phase);
        Ok(Vec::new())
    }

    fn release(&mut self, battle: &B) -> Result<Option<BoxedPhase<B>>, SchedulerError> {
        self.queue.pop(battle)
    }

    fn remove(
        &mut self,
        battle: &B,
        predicate: PhasePredicate<'_, B>,
    ) -> Result<bool, SchedulerError> {
        self.queue.remove(battle, |phase| predicate(phase.as_ref()))
    }

    fn find(&self, predicate: PhasePredicate<'_, B>) -> Option<&dyn Phase<B>> {
        self.queue
            .find(|phase| predicate(phase.as_ref()))
            .map(|phase| phase.as_ref())
    }

    fn clear(&mut self) {
        self.queue.clear();
    }

    fn len(&self) -> usize {
        self.queue.len()
    }
}
