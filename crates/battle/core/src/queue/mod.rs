//! Ordering queues for dynamically scheduled phases.
//!
//! [`PriorityQueue`] is the shared container: it stores elements in push
//! order and sorts them with an injected [`OrderRule`] immediately before it
//! yields or removes anything. The rule computes a key per element from live
//! battle state, so the order always reflects the state at pop time.
//!
//! Concrete queues wrap a `PriorityQueue` with a rule and expose the
//! [`DynamicQueue`] interface consumed by the registry:
//! - [`CreatureOrderQueue`]: live speed
//! - [`ActionOrderQueue`]: timing override, bracket, then live speed
//! - [`SummonReactionQueue`]: entrant speed, then entry/reaction priority
mod action;
mod creature;
mod speed;
mod summon;

use std::cmp::Ordering;
use std::fmt;

pub use action::{ActionOrderQueue, TimingModifier};
pub use creature::CreatureOrderQueue;
pub use speed::{SpeedKey, SpeedOrder, order_by_speed};
pub use summon::{ReactionFactory, SummonReactionQueue};

use crate::env::TieBreaker;
use crate::error::SchedulerError;
use crate::phase::{BoxedPhase, Phase, PhaseKind};

/// Comparator injected into a [`PriorityQueue`].
///
/// `key` may fail when an ordering input cannot be resolved; the queue then
/// leaves its contents untouched and propagates the error.
pub trait OrderRule<T, B> {
    type Key;

    fn key(&self, entry: &Queued<T>, battle: &B) -> Result<Self::Key, SchedulerError>;

    fn compare(&self, a: &Self::Key, b: &Self::Key) -> Ordering;
}

/// A queued element with its tie-break metadata.
#[derive(Clone, Debug)]
pub struct Queued<T> {
    item: T,
    ticket: u64,
    seq: u64,
}

impl<T> Queued<T> {
    pub fn item(&self) -> &T {
        &self.item
    }

    /// Seeded tie-break ticket drawn at push time.
    pub fn ticket(&self) -> u64 {
        self.ticket
    }

    /// Push sequence number within the queue.
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn into_item(self) -> T {
        self.item
    }
}

/// Abstract ordering container.
///
/// Elements equal under the rule fall back to their seeded ticket, then to
/// push order, which makes the order a deterministic total order.
#[derive(Debug)]
pub struct PriorityQueue<T, R> {
    entries: Vec<Queued<T>>,
    rule: R,
    tie_break: TieBreaker,
    next_seq: u64,
}

impl<T, R> PriorityQueue<T, R> {
    pub fn new(rule: R, tie_break: TieBreaker) -> Self {
        Self {
            entries: Vec::new(),
            rule,
            tie_break,
            next_seq: 0,
        }
    }

    pub fn rule(&self) -> &R {
        &self.rule
    }

    /// Appends an element without reordering.
    pub fn push(&mut self, item: T) {
        let ticket = self.tie_break.next_ticket();
        self.push_with_ticket(item, ticket);
    }

    /// Draws a ticket without pushing, for elements that must share one.
    pub(crate) fn draw_ticket(&mut self) -> u64 {
        self.tie_break.next_ticket()
    }

    pub(crate) fn push_with_ticket(&mut self, item: T, ticket: u64) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(Queued { item, ticket, seq });
    }

    /// Sorts the backing collection with the current battle state.
    pub fn reorder<B>(&mut self, battle: &B) -> Result<(), SchedulerError>
    where
        R: OrderRule<T, B>,
    {
        if self.entries.len() < 2 {
            // Still resolve the key so a missing input fails loudly.
            if let Some(entry) = self.entries.first() {
                self.rule.key(entry, battle)?;
            }
            return Ok(());
        }

        let keys = self
            .entries
            .iter()
            .map(|entry| self.rule.key(entry, battle))
            .collect::<Result<Vec<_>, _>>()?;

        let mut keyed: Vec<_> = keys.into_iter().zip(self.entries.drain(..)).collect();
        let rule = &self.rule;
        keyed.sort_by(|(ka, a), (kb, b)| {
            rule.compare(ka, kb)
                .then_with(|| a.ticket.cmp(&b.ticket))
                .then_with(|| a.seq.cmp(&b.seq))
        });
        self.entries = keyed.into_iter().map(|(_, entry)| entry).collect();
        Ok(())
    }

    /// Reorders and removes the front element; `Ok(None)` when empty.
    pub fn pop<B>(&mut self, battle: &B) -> Result<Option<T>, SchedulerError>
    where
        R: OrderRule<T, B>,
    {
        if self.entries.is_empty() {
            return Ok(None);
        }
        self.reorder(battle)?;
        Ok(Some(self.entries.remove(0).item))
    }

    /// Reorders, then removes the first element matching `predicate`.
    ///
    /// Removes at most one element and keeps the relative order of the rest.
    pub fn remove<B, F>(&mut self, battle: &B, mut predicate: F) -> Result<bool, SchedulerError>
    where
        R: OrderRule<T, B>,
        F: FnMut(&T) -> bool,
    {
        self.reorder(battle)?;
        match self.entries.iter().position(|entry| predicate(&entry.item)) {
            Some(index) => {
                self.entries.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// First element matching `predicate` in the current (possibly stale) order.
    pub fn find<F>(&self, mut predicate: F) -> Option<&T>
    where
        F: FnMut(&T) -> bool,
    {
        self.entries
            .iter()
            .map(|entry| &entry.item)
            .find(|item| predicate(item))
    }

    pub fn find_mut<F>(&mut self, mut predicate: F) -> Option<&mut T>
    where
        F: FnMut(&T) -> bool,
    {
        self.entries
            .iter_mut()
            .map(|entry| &mut entry.item)
            .find(|item| predicate(item))
    }

    pub fn has<F>(&self, predicate: F) -> bool
    where
        F: FnMut(&T) -> bool,
    {
        self.find(predicate).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Elements in the current (possibly stale) order.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.entries.iter().map(|entry| &entry.item)
    }
}

/// Where the release marker of a generated phase goes in the main sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    Back,
    Front,
}

/// Release marker requested by a queue for a phase it generated itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReleasePoint {
    pub kind: PhaseKind,
    pub placement: Placement,
}

/// Predicate over queued phases used for lookup and cancellation.
pub type PhasePredicate<'p, B> = &'p dyn Fn(&dyn Phase<B>) -> bool;

/// Shared interface of every queue owned by the registry.
pub trait DynamicQueue<B>: fmt::Debug {
    /// Accepts a phase; returns release markers for any phases the queue
    /// generated on its own in response.
    fn enqueue(
        &mut self,
        phase: BoxedPhase<B>,
        battle: &B,
    ) -> Result<Vec<ReleasePoint>, SchedulerError>;

    /// Next-ordered phase, or `None` when empty.
    fn release(&mut self, battle: &B) -> Result<Option<BoxedPhase<B>>, SchedulerError>;

    fn remove(&mut self, battle: &B, predicate: PhasePredicate<'_, B>)
    -> Result<bool, SchedulerError>;

    fn find(&self, predicate: PhasePredicate<'_, B>) -> Option<&dyn Phase<B>>;

    fn has(&self, predicate: PhasePredicate<'_, B>) -> bool {
        self.find(predicate).is_some()
    }

    fn clear(&mut self);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Access to timing overrides when this is an [`ActionOrderQueue`].
    fn as_action_queue_mut(&mut self) -> Option<&mut ActionOrderQueue<B>> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Orders plain numbers descending; a zero is an unresolvable input.
    struct Descending;

    impl OrderRule<u32, ()> for Descending {
        type Key = u32;

        fn key(&self, entry: &Queued<u32>, _battle: &()) -> Result<u32, SchedulerError> {
            if *entry.item() == 0 {
                return Err(SchedulerError::NoActivePhase);
            }
            Ok(*entry.item())
        }

        fn compare(&self, a: &u32, b: &u32) -> Ordering {
            b.cmp(a)
        }
    }

    fn queue(items: &[u32]) -> PriorityQueue<u32, Descending> {
        let mut queue = PriorityQueue::new(Descending, TieBreaker::new(1));
        for &item in items {
            queue.push(item);
        }
        queue
    }

    #[test]
    fn pop_on_empty_yields_nothing() {
        let mut queue = queue(&[]);
        assert_eq!(queue.pop(&()).unwrap(), None);
    }

    #[test]
    fn pop_follows_rule() {
        let mut queue = queue(&[3, 9, 5]);
        assert_eq!(queue.pop(&()).unwrap(), Some(9));
        assert_eq!(queue.pop(&()).unwrap(), Some(5));
        assert_eq!(queue.pop(&()).unwrap(), Some(3));
        assert_eq!(queue.pop(&()).unwrap(), None);
    }

    #[test]
    fn push_does_not_reorder() {
        let queue = queue(&[3, 9, 5]);
        assert_eq!(queue.iter().copied().collect::<Vec<_>>(), vec![3, 9, 5]);
    }

    #[test]
    fn reorder_twice_is_stable() {
        let mut queue = queue(&[4, 4, 4, 2, 4]);
        queue.reorder(&()).unwrap();
        let first: Vec<u64> = queue.entries.iter().map(Queued::seq).collect();
        queue.reorder(&()).unwrap();
        let second: Vec<u64> = queue.entries.iter().map(Queued::seq).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn remove_takes_first_match_only() {
        let mut queue = queue(&[7, 8, 7, 1]);
        assert!(queue.remove(&(), |item| *item == 7).unwrap());
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.iter().filter(|item| **item == 7).count(), 1);
        assert!(!queue.remove(&(), |item| *item == 42).unwrap());
        assert_eq!(queue.len(), 3);
    }

    #[test]
    fn failed_key_leaves_contents_untouched() {
        let mut queue = queue(&[3, 0, 5]);
        assert!(queue.pop(&()).is_err());
        assert_eq!(queue.iter().copied().collect::<Vec<_>>(), vec![3, 0, 5]);
    }

    #[test]
    fn clear_empties_queue() {
        let mut queue = queue(&[1, 2, 3]);
        queue.clear();
        assert!(queue.is_empty());
        assert_eq!(queue.pop(&()).unwrap(), None);
    }

    #[test]
    fn find_reports_presence_without_mutation() {
        let mut queue = queue(&[1, 2, 3]);
        assert!(queue.has(|item| *item == 2));
        assert!(!queue.has(|item| *item == 4));
        if let Some(item) = queue.find_mut(|item| *item == 2) {
            *item = 20;
        }
        assert_eq!(queue.pop(&()).unwrap(), Some(20));
    }
}
