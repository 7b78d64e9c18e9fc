use std::cmp::Ordering;
use std::fmt;

use crate::env::{BattleOracle, TieBreaker};
use crate::error::SchedulerError;
use crate::phase::{BoxedPhase, Phase};
use crate::queue::{
    DynamicQueue, OrderRule, PhasePredicate, PriorityQueue, Queued, ReleasePoint, SpeedKey,
};

/// Forced placement of a queued action, set by effects that make an action
/// go next or last regardless of bracket and speed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum TimingModifier {
    First,
    #[default]
    Normal,
    Last,
}

/// A queued action and its timing override.
#[derive(Debug)]
pub struct ActionEntry<B> {
    phase: BoxedPhase<B>,
    timing: TimingModifier,
}

/// Timing override, then bracket (descending), then live speed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct ActionKey {
    timing: TimingModifier,
    bracket: i64,
    speed: SpeedKey,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ActionOrder;

impl<B: BattleOracle> OrderRule<ActionEntry<B>, B> for ActionOrder {
    type Key = ActionKey;

    fn key(&self, entry: &Queued<ActionEntry<B>>, battle: &B) -> Result<ActionKey, SchedulerError> {
        let action = entry.item();
        let phase = action.phase.as_ref();
        Ok(ActionKey {
            timing: action.timing,
            bracket: -i64::from(phase.bracket(battle)),
            speed: SpeedKey::of_phase(phase, battle)?,
        })
    }

    fn compare(&self, a: &ActionKey, b: &ActionKey) -> Ordering {
        a.cmp(b)
    }
}

/// Orders the per-turn chosen actions.
///
/// Bracket and speed are both read at pop time: effects resolved earlier in
/// the turn can change either before the queue is next drained.
pub struct ActionOrderQueue<B> {
    queue: PriorityQueue<ActionEntry<B>, ActionOrder>,
}

impl<B: BattleOracle> ActionOrderQueue<B> {
    pub fn new(tie_break: TieBreaker) -> Self {
        Self {
            queue: PriorityQueue::new(ActionOrder, tie_break),
        }
    }

    pub fn push(&mut self, phase: BoxedPhase<B>) {
        self.queue.push(ActionEntry {
            phase,
            timing: TimingModifier::Normal,
        });
    }

    pub fn pop(&mut self, battle: &B) -> Result<Option<BoxedPhase<B>>, SchedulerError> {
        Ok(self.queue.pop(battle)?.map(|entry| entry.phase))
    }

    /// Sets the timing override of the first queued action matching
    /// `predicate`. Returns whether an action matched.
    pub fn set_timing(&mut self, predicate: PhasePredicate<'_, B>, timing: TimingModifier) -> bool {
        match self.queue.find_mut(|entry| predicate(entry.phase.as_ref())) {
            Some(entry) => {
                entry.timing = timing;
                true
            }
            None => false,
        }
    }

    pub fn timing_of(&self, predicate: PhasePredicate<'_, B>) -> Option<TimingModifier> {
        self.queue
            .find(|entry| predicate(entry.phase.as_ref()))
            .map(|entry| entry.timing)
    }
}

impl<B> fmt::Debug for ActionOrderQueue<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionOrderQueue")
            .field("len", &self.queue.len())
            .finish()
    }
}

impl<B: BattleOracle> DynamicQueue<B> for ActionOrderQueue<B> {
    fn enqueue(
        &mut self,
        phase: BoxedPhase<B>,
        _battle: &B,
    ) -> Result<Vec<ReleasePoint>, SchedulerError> {
        self.push(phase);
        Ok(Vec::new())
    }

    fn release(&mut self, battle: &B) -> Result<Option<BoxedPhase<B>>, SchedulerError> {
        self.pop(battle)
    }

    fn remove(
        &mut self,
        battle: &B,
        predicate: PhasePredicate<'_, B>,
    ) -> Result<bool, SchedulerError> {
        self.queue
            .remove(battle, |entry| predicate(entry.phase.as_ref()))
    }

    fn find(&self, predicate: PhasePredicate<'_, B>) -> Option<&dyn Phase<B>> {
        self.queue
            .find(|entry| predicate(entry.phase.as_ref()))
            .map(|entry| entry.phase.as_ref())
    }

    fn clear(&mut self) {
        self.queue.clear();
    }

    fn len(&self) -> usize {
        self.queue.len()
    }

    fn as_action_queue_mut(&mut self) -> Option<&mut ActionOrderQueue<B>> {
        Some(self)
    }
}
