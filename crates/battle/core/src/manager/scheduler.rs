use std::collections::VecDeque;
use std::fmt;

use crate::env::BattleOracle;
use crate::error::SchedulerError;
use crate::phase::{BoxedPhase, Phase, PhaseKind};
use crate::queue::{PhasePredicate, Placement, ReleasePoint, TimingModifier};
use crate::registry::QueueRegistry;

/// One entry of the main sequence.
pub(crate) enum Slot<B> {
    Phase(BoxedPhase<B>),
    /// Release point of the next-ordered phase of a dynamic kind.
    Release(PhaseKind),
}

impl<B> Slot<B> {
    fn kind(&self) -> PhaseKind {
        match self {
            Slot::Phase(phase) => phase.kind(),
            Slot::Release(kind) => *kind,
        }
    }
}

impl<B> fmt::Debug for Slot<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Phase(phase) => write!(f, "Phase({})", phase.label()),
            Slot::Release(kind) => write!(f, "Release({kind})"),
        }
    }
}

/// Pending work of a battle: the main sequence plus the dynamic queues.
///
/// Running phases reach the scheduler through
/// [`PhaseContext`](super::PhaseContext) while the phase itself is held by
/// the manager, so a phase can schedule further work without aliasing the
/// sequence it was taken from.
pub struct Scheduler<B> {
    sequence: VecDeque<Slot<B>>,
    registry: QueueRegistry<B>,
    /// Insertion index for front insertions made during the current step.
    front_cursor: usize,
    override_request: Option<BoxedPhase<B>>,
    standby_held: bool,
}

impl<B> fmt::Debug for Scheduler<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("sequence", &self.sequence)
            .field("registry", &self.registry)
            .field("front_cursor", &self.front_cursor)
            .finish()
    }
}

impl<B: BattleOracle> Scheduler<B> {
    pub fn new(registry: QueueRegistry<B>) -> Self {
        Self {
            sequence: VecDeque::new(),
            registry,
            front_cursor: 0,
            override_request: None,
            standby_held: false,
        }
    }

    pub fn registry(&self) -> &QueueRegistry<B> {
        &self.registry
    }

    /// Pending slots in the main sequence, markers included.
    pub fn sequence_len(&self) -> usize {
        self.sequence.len()
    }

    /// Kinds of the main sequence slots in execution order.
    pub fn sequence_kinds(&self) -> impl Iterator<Item = PhaseKind> + '_ {
        self.sequence.iter().map(Slot::kind)
    }

    /// Appends `phase`; dynamic kinds are diverted to their queue and a
    /// release marker is appended instead.
    pub fn push_phase(&mut self, phase: BoxedPhase<B>, battle: &B) -> Result<(), SchedulerError> {
        if self.registry.is_dynamic_type(phase.kind()) {
            let kind = phase.kind();
            self.divert(phase, battle)?;
            self.push_release_marker(kind);
        } else {
            self.sequence.push_back(Slot::Phase(phase));
        }
        Ok(())
    }

    /// Inserts `phase` ahead of everything queued before the current step.
    /// Front insertions made during one step keep their call order.
    pub fn unshift_phase(
        &mut self,
        phase: BoxedPhase<B>,
        battle: &B,
    ) -> Result<(), SchedulerError> {
        if self.registry.is_dynamic_type(phase.kind()) {
            let kind = phase.kind();
            self.divert(phase, battle)?;
            self.unshift_release_marker(kind);
        } else {
            self.insert_front(Slot::Phase(phase));
        }
        Ok(())
    }

    /// Routes `phase` to its dynamic queue without adding a release marker
    /// for it. A non-dynamic phase is handed back untouched.
    pub fn queue_dynamic_phase(
        &mut self,
        phase: BoxedPhase<B>,
        battle: &B,
    ) -> Result<Option<BoxedPhase<B>>, SchedulerError> {
        if !self.registry.is_dynamic_type(phase.kind()) {
            return Ok(Some(phase));
        }
        self.divert(phase, battle)?;
        Ok(None)
    }

    pub fn push_release_marker(&mut self, kind: PhaseKind) {
        self.sequence.push_back(Slot::Release(kind));
    }

    pub fn unshift_release_marker(&mut self, kind: PhaseKind) {
        self.insert_front(Slot::Release(kind));
    }

    /// Requests that the phase currently running be replaced by `phase`
    /// once its `start` (or `resume`) returns.
    ///
    /// If the requesting phase awaits, it is put on standby and `phase`
    /// starts immediately; if it ends, `phase` simply runs next.
    pub fn override_current(&mut self, phase: BoxedPhase<B>) -> Result<(), SchedulerError> {
        if self.standby_held || self.override_request.is_some() {
            return Err(SchedulerError::StandbyOccupied);
        }
        self.override_request = Some(phase);
        Ok(())
    }

    /// Whether a pending phase of `kind` matches `predicate`, in either the
    /// main sequence or the kind's dynamic queue.
    pub fn has_phase_of_kind(&self, kind: PhaseKind, predicate: PhasePredicate<'_, B>) -> bool {
        self.registry.has(kind, predicate)
            || self.sequence.iter().any(|slot| match slot {
                Slot::Phase(phase) => phase.kind() == kind && predicate(phase.as_ref()),
                Slot::Release(_) => false,
            })
    }

    /// First pending phase of `kind` matching `predicate`.
    pub fn find_phase(
        &self,
        kind: PhaseKind,
        predicate: PhasePredicate<'_, B>,
    ) -> Option<&dyn Phase<B>> {
        self.registry.find(kind, predicate).or_else(|| {
            self.sequence.iter().find_map(|slot| match slot {
                Slot::Phase(phase) if phase.kind() == kind && predicate(phase.as_ref()) => {
                    Some(phase.as_ref())
                }
                _ => None,
            })
        })
    }

    /// Removes the first pending phase of `kind` matching `predicate`,
    /// looking in the dynamic queue first and then the main sequence.
    ///
    /// A marker left behind by a cancelled dynamic phase is skipped when
    /// reached.
    pub fn try_remove_phase(
        &mut self,
        kind: PhaseKind,
        battle: &B,
        predicate: PhasePredicate<'_, B>,
    ) -> Result<bool, SchedulerError> {
        if self.registry.is_dynamic_type(kind) && self.registry.remove(kind, battle, predicate)? {
            return Ok(true);
        }
        let position = self.sequence.iter().position(|slot| match slot {
            Slot::Phase(phase) => phase.kind() == kind && predicate(phase.as_ref()),
            Slot::Release(_) => false,
        });
        match position {
            Some(index) => {
                self.remove_at(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Drops every main-sequence phase and release marker of `kind`.
    /// Phases already held by a dynamic queue stay there.
    pub fn remove_all_phases_of_kind(&mut self, kind: PhaseKind) -> usize {
        let mut removed = 0;
        let mut index = 0;
        while index < self.sequence.len() {
            if self.sequence[index].kind() == kind {
                self.remove_at(index);
                removed += 1;
            } else {
                index += 1;
            }
        }
        removed
    }

    /// Sets the timing override of the first pending action matching
    /// `predicate`. Returns whether an action matched.
    pub fn set_action_timing(
        &mut self,
        predicate: PhasePredicate<'_, B>,
        timing: TimingModifier,
    ) -> bool {
        self.registry
            .action_queue_mut()
            .is_some_and(|actions| actions.set_timing(predicate, timing))
    }

    pub fn force_action_first(&mut self, predicate: PhasePredicate<'_, B>) -> bool {
        self.set_action_timing(predicate, TimingModifier::First)
    }

    pub fn force_action_last(&mut self, predicate: PhasePredicate<'_, B>) -> bool {
        self.set_action_timing(predicate, TimingModifier::Last)
    }

    /// Empties the main sequence. Dynamic queues are left alone.
    pub fn clear_phase_queue(&mut self) {
        self.sequence.clear();
        self.front_cursor = 0;
    }

    pub fn clear_dynamic_queues(&mut self) {
        self.registry.clear_all();
    }

    fn divert(&mut self, phase: BoxedPhase<B>, battle: &B) -> Result<(), SchedulerError> {
        let releases = self.registry.enqueue(phase, battle)?;
        for ReleasePoint { kind, placement } in releases {
            match placement {
                Placement::Back => self.push_release_marker(kind),
                Placement::Front => self.unshift_release_marker(kind),
            }
        }
        Ok(())
    }

    fn insert_front(&mut self, slot: Slot<B>) {
        let index = self.front_cursor.min(self.sequence.len());
        self.sequence.insert(index, slot);
        self.front_cursor = index + 1;
    }

    fn remove_at(&mut self, index: usize) {
        self.sequence.remove(index);
        if index < self.front_cursor {
            self.front_cursor -= 1;
        }
    }

    /// Next phase to run: the front phase, or the phase a front marker
    /// releases. Markers whose queue comes back empty are skipped.
    pub(crate) fn next_phase(&mut self, battle: &B) -> Result<Option<BoxedPhase<B>>, SchedulerError> {
        while let Some(slot) = self.sequence.pop_front() {
            let kind = match slot {
                Slot::Phase(phase) => return Ok(Some(phase)),
                Slot::Release(kind) => kind,
            };
            match self.registry.release(kind, battle) {
                Ok(Some(phase)) => {
                    tracing::trace!(
                        target: "battle_core::manager",
                        kind = %kind,
                        phase = %phase.label(),
                        "released dynamic phase"
                    );
                    return Ok(Some(phase));
                }
                Ok(None) => {
                    tracing::trace!(
                        target: "battle_core::manager",
                        kind = %kind,
                        "skipped marker of cancelled phase"
                    );
                }
                Err(err) => {
                    // The marker stays in place when the queue fails to order.
                    self.sequence.push_front(Slot::Release(kind));
                    return Err(err);
                }
            }
        }
        Ok(None)
    }

    pub(crate) fn begin_step(&mut self, standby_held: bool) {
        self.front_cursor = 0;
        self.standby_held = standby_held;
    }

    /// Front insertions made after this point go to the very front again.
    pub(crate) fn end_step(&mut self) {
        self.front_cursor = 0;
    }

    pub(crate) fn take_override_request(&mut self) -> Option<BoxedPhase<B>> {
        self.override_request.take()
    }

    pub(crate) fn push_front_direct(&mut self, phase: BoxedPhase<B>) {
        self.sequence.push_front(Slot::Phase(phase));
    }
}
