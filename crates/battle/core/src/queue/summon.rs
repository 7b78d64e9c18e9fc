use std::cmp::{Ordering, Reverse};
use std::collections::BTreeMap;
use std::fmt;

use crate::env::{BattleOracle, ParticipantId, ReactionSpec, TieBreaker};
use crate::error::SchedulerError;
use crate::phase::{BoxedPhase, Phase, PhaseKind, SummonRole, SummonSource};
use crate::queue::{
    DynamicQueue, OrderRule, PhasePredicate, Placement, PriorityQueue, Queued, ReleasePoint,
    SpeedKey,
};

/// Builds the reaction phase for one triggered capability of an entrant.
pub type ReactionFactory<B> = Box<dyn Fn(ParticipantId, ReactionSpec) -> BoxedPhase<B>>;

/// Entrant speed, entrant ticket, entry before reactions, reaction priority.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct SummonKey {
    speed: SpeedKey,
    entrant: u64,
    stage: u8,
    priority: Reverse<i32>,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SummonOrder;

impl<B: BattleOracle> OrderRule<BoxedPhase<B>, B> for SummonOrder {
    type Key = SummonKey;

    fn key(&self, entry: &Queued<BoxedPhase<B>>, battle: &B) -> Result<SummonKey, SchedulerError> {
        let phase = entry.item().as_ref();
        let role = phase
            .summon_role()
            .ok_or(SchedulerError::MissingSummonRole { kind: phase.kind() })?;
        let (stage, priority) = match role {
            SummonRole::Entry { .. } => (0, i32::MAX),
            SummonRole::Reaction { priority, .. } => (1, priority),
        };
        Ok(SummonKey {
            speed: SpeedKey::of_phase(phase, battle)?,
            entrant: entry.ticket(),
            stage,
            priority: Reverse(priority),
        })
    }

    fn compare(&self, a: &SummonKey, b: &SummonKey) -> Ordering {
        a.cmp(b)
    }
}

/// Orders field-entry phases and the reactions they trigger.
///
/// All phases of one entrant share the entrant's tie-break ticket, so they
/// stay grouped: entrants resolve in speed order, and within an entrant the
/// entry phase comes first, followed by its reactions by declared priority.
pub struct SummonReactionQueue<B> {
    queue: PriorityQueue<BoxedPhase<B>, SummonOrder>,
    entrants: BTreeMap<ParticipantId, u64>,
    factory: ReactionFactory<B>,
}

impl<B: BattleOracle> SummonReactionQueue<B> {
    pub fn new(tie_break: TieBreaker, factory: ReactionFactory<B>) -> Self {
        Self {
            queue: PriorityQueue::new(SummonOrder, tie_break),
            entrants: BTreeMap::new(),
            factory,
        }
    }

    pub fn pop(&mut self, battle: &B) -> Result<Option<BoxedPhase<B>>, SchedulerError> {
        self.queue.pop(battle)
    }

    /// Queued phases in the current (possibly stale) order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Phase<B>> + '_ {
        self.queue.iter().map(|phase| phase.as_ref())
    }

    fn entrant_ticket(&mut self, participant: ParticipantId) -> u64 {
        match self.entrants.get(&participant) {
            Some(ticket) => *ticket,
            None => {
                let ticket = self.queue.draw_ticket();
                self.entrants.insert(participant, ticket);
                ticket
            }
        }
    }

    fn enqueue_entry(
        &mut self,
        phase: BoxedPhase<B>,
        participant: ParticipantId,
        source: SummonSource,
        battle: &B,
    ) -> Result<Vec<ReleasePoint>, SchedulerError> {
        // A new entry starts a new group, even for a returning participant.
        let ticket = self.queue.draw_ticket();
        self.entrants.insert(participant, ticket);
        self.queue.push_with_ticket(phase, ticket);

        let placement = match source {
            SummonSource::BattleStart => Placement::Back,
            SummonSource::Replacement => Placement::Front,
        };

        let mut releases = Vec::new();
        for spec in battle.entry_reactions(participant) {
            let reaction = (self.factory)(participant, spec);
            if reaction.kind() != PhaseKind::PostSummon {
                return Err(SchedulerError::UnexpectedKind {
                    expected: PhaseKind::PostSummon,
                    produced: reaction.kind(),
                });
            }
            self.queue.push_with_ticket(reaction, ticket);
            releases.push(ReleasePoint {
                kind: PhaseKind::PostSummon,
                placement,
            });
        }

        tracing::trace!(
            target: "battle_core::queue",
            participant = %participant,
            source = %source,
            reactions = releases.len(),
            "queued entry"
        );
        Ok(releases)
    }
}

impl<B> fmt::Debug for SummonReactionQueue<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SummonReactionQueue")
            .field("len", &self.queue.len())
            .field("entrants", &self.entrants.len())
            .finish()
    }
}

impl<B: BattleOracle> DynamicQueue<B> for SummonReactionQueue<B> {
    fn enqueue(
        &mut self,
        phase: BoxedPhase<B>,
        battle: &B,
    ) -> Result<Vec<ReleasePoint>, SchedulerError> {
        let kind = phase.kind();
        let role = phase
            .summon_role()
            .ok_or(SchedulerError::MissingSummonRole { kind })?;
        let participant = phase
            .participant()
            .ok_or(SchedulerError::MissingParticipant { kind })?;

        match role {
            SummonRole::Entry { source } => self.enqueue_entry(phase, participant, source, battle),
            SummonRole::Reaction { .. } => {
                let ticket = self.entrant_ticket(participant);
                self.queue.push_with_ticket(phase, ticket);
                Ok(Vec::new())
            }
        }
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
        self.entrants.clear();
    }

    fn len(&self) -> usize {
        self.queue.len()
    }
}
