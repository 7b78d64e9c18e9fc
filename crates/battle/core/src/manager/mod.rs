//! The phase manager: main sequence, dynamic queues and the execution loop.
//!
//! Execution is cooperative and single-threaded. [`PhaseManager::step`] runs
//! exactly one phase to its first suspension point. A phase that returns
//! [`PhaseStep::Await`] stays current and blocks the loop until
//! [`PhaseManager::resume`] delivers a [`Signal`].
mod scheduler;

pub use scheduler::Scheduler;

use crate::env::BattleOracle;
use crate::error::SchedulerError;
use crate::phase::{BoxedPhase, Phase, PhaseKind, PhaseState, PhaseStep, Signal};
use crate::queue::{PhasePredicate, TimingModifier};
use crate::registry::QueueRegistry;

/// Result of one call to [`PhaseManager::step`] or [`PhaseManager::resume`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// A phase of this kind ran to completion.
    Ended(PhaseKind),
    /// The current phase of this kind awaits a signal.
    Suspended(PhaseKind),
    /// Nothing is left to run; the dynamic queues have been cleared.
    Idle,
}

/// What a running phase sees: the pending schedule and the battle state.
pub struct PhaseContext<'a, B> {
    scheduler: &'a mut Scheduler<B>,
    battle: &'a mut B,
}

impl<'a, B: BattleOracle> PhaseContext<'a, B> {
    pub fn new(scheduler: &'a mut Scheduler<B>, battle: &'a mut B) -> Self {
        Self { scheduler, battle }
    }

    pub fn battle(&self) -> &B {
        self.battle
    }

    pub fn battle_mut(&mut self) -> &mut B {
        self.battle
    }

    pub fn scheduler(&mut self) -> &mut Scheduler<B> {
        self.scheduler
    }

    pub fn push_phase(&mut self, phase: BoxedPhase<B>) -> Result<(), SchedulerError> {
        self.scheduler.push_phase(phase, self.battle)
    }

    pub fn unshift_phase(&mut self, phase: BoxedPhase<B>) -> Result<(), SchedulerError> {
        self.scheduler.unshift_phase(phase, self.battle)
    }

    pub fn queue_dynamic_phase(
        &mut self,
        phase: BoxedPhase<B>,
    ) -> Result<Option<BoxedPhase<B>>, SchedulerError> {
        self.scheduler.queue_dynamic_phase(phase, self.battle)
    }

    pub fn override_current(&mut self, phase: BoxedPhase<B>) -> Result<(), SchedulerError> {
        self.scheduler.override_current(phase)
    }

    pub fn has_phase_of_kind(&self, kind: PhaseKind, predicate: PhasePredicate<'_, B>) -> bool {
        self.scheduler.has_phase_of_kind(kind, predicate)
    }

    pub fn try_remove_phase(
        &mut self,
        kind: PhaseKind,
        predicate: PhasePredicate<'_, B>,
    ) -> Result<bool, SchedulerError> {
        self.scheduler.try_remove_phase(kind, self.battle, predicate)
    }

    /// Splits the context into the schedule and a shared view of the
    /// battle, for callers that need both at once.
    pub fn split(&mut self) -> (&mut Scheduler<B>, &B) {
        (&mut *self.scheduler, &*self.battle)
    }
}

/// Owns the schedule of one battle and drives its phases.
#[derive(Debug)]
pub struct PhaseManager<B> {
    scheduler: Scheduler<B>,
    current: Option<BoxedPhase<B>>,
    standby: Option<BoxedPhase<B>>,
}

impl<B: BattleOracle> PhaseManager<B> {
    pub fn new(registry: QueueRegistry<B>) -> Self {
        Self {
            scheduler: Scheduler::new(registry),
            current: None,
            standby: None,
        }
    }

    pub fn scheduler(&self) -> &Scheduler<B> {
        &self.scheduler
    }

    pub fn is_dynamic_type(&self, kind: PhaseKind) -> bool {
        self.scheduler.registry().is_dynamic_type(kind)
    }

    pub fn push_phase(&mut self, phase: BoxedPhase<B>, battle: &B) -> Result<(), SchedulerError> {
        self.scheduler.push_phase(phase, battle)
    }

    pub fn unshift_phase(
        &mut self,
        phase: BoxedPhase<B>,
        battle: &B,
    ) -> Result<(), SchedulerError> {
        self.scheduler.unshift_phase(phase, battle)
    }

    pub fn queue_dynamic_phase(
        &mut self,
        phase: BoxedPhase<B>,
        battle: &B,
    ) -> Result<Option<BoxedPhase<B>>, SchedulerError> {
        self.scheduler.queue_dynamic_phase(phase, battle)
    }

    pub fn push_release_marker(&mut self, kind: PhaseKind) {
        self.scheduler.push_release_marker(kind);
    }

    pub fn unshift_release_marker(&mut self, kind: PhaseKind) {
        self.scheduler.unshift_release_marker(kind);
    }

    /// The active phase: the one awaiting a signal, if any.
    pub fn current_phase(&self) -> Option<&dyn Phase<B>> {
        self.current.as_deref()
    }

    /// Lifecycle state of the first phase of `kind` matching `predicate`.
    ///
    /// The current and standby phases are active, queued ones pending.
    /// Ended phases are dropped, so they yield `None`.
    pub fn phase_state(
        &self,
        kind: PhaseKind,
        predicate: PhasePredicate<'_, B>,
    ) -> Option<PhaseState> {
        let live = |phase: &BoxedPhase<B>| phase.kind() == kind && predicate(phase.as_ref());
        if self.current.iter().chain(self.standby.iter()).any(live) {
            Some(PhaseState::Active)
        } else if self.scheduler.has_phase_of_kind(kind, predicate) {
            Some(PhaseState::Pending)
        } else {
            None
        }
    }

    /// The phase displaced by an override in effect.
    pub fn standby_phase(&self) -> Option<&dyn Phase<B>> {
        self.standby.as_deref()
    }

    pub fn is_suspended(&self) -> bool {
        self.current.is_some()
    }

    /// Replaces the active phase with `phase` and starts it.
    ///
    /// The replaced phase goes on standby and becomes current again, still
    /// awaiting its signal, once `phase` ends. Dynamic queues and the main
    /// sequence are not touched.
    pub fn override_phase(
        &mut self,
        phase: BoxedPhase<B>,
        battle: &mut B,
    ) -> Result<StepOutcome, SchedulerError> {
        let Some(previous) = self.current.take() else {
            return Err(SchedulerError::NoActivePhase);
        };
        if self.standby.is_some() {
            self.current = Some(previous);
            return Err(SchedulerError::StandbyOccupied);
        }
        self.enter_override(previous, phase, battle)
    }

    /// Runs the next phase until it ends or awaits.
    pub fn step(&mut self, battle: &mut B) -> Result<StepOutcome, SchedulerError> {
        if let Some(current) = &self.current {
            return Ok(StepOutcome::Suspended(current.kind()));
        }

        match self.scheduler.next_phase(battle)? {
            Some(phase) => self.start(phase, battle),
            None => {
                // Pending dynamic phases whose markers were removed can
                // never run.
                self.scheduler.clear_dynamic_queues();
                self.scheduler.end_step();
                tracing::debug!(target: "battle_core::manager", "schedule drained");
                Ok(StepOutcome::Idle)
            }
        }
    }

    /// Delivers `signal` to the awaiting phase.
    ///
    /// If the phase rejects the signal with an error it stays current.
    pub fn resume(&mut self, battle: &mut B, signal: Signal) -> Result<StepOutcome, SchedulerError> {
        let Some(mut phase) = self.current.take() else {
            return Err(SchedulerError::NoActivePhase);
        };
        self.scheduler.begin_step(self.standby.is_some());

        tracing::trace!(
            target: "battle_core::manager",
            phase = %phase.label(),
            signal = ?signal,
            "resuming phase"
        );
        let result = {
            let mut ctx = PhaseContext::new(&mut self.scheduler, battle);
            phase.resume(&mut ctx, signal)
        };
        let outcome = match result {
            Ok(step) => self.settle(phase, step, battle),
            Err(err) => {
                self.scheduler.take_override_request();
                self.current = Some(phase);
                Err(err)
            }
        };
        self.scheduler.end_step();
        outcome
    }

    fn start(&mut self, mut phase: BoxedPhase<B>, battle: &mut B) -> Result<StepOutcome, SchedulerError> {
        self.scheduler.begin_step(self.standby.is_some());

        tracing::debug!(
            target: "battle_core::manager",
            phase = %phase.label(),
            state = %PhaseState::Active,
            "phase started"
        );
        let result = {
            let mut ctx = PhaseContext::new(&mut self.scheduler, battle);
            phase.start(&mut ctx)
        };
        let outcome = match result {
            Ok(step) => self.settle(phase, step, battle),
            Err(err) => {
                self.scheduler.take_override_request();
                tracing::warn!(
                    target: "battle_core::manager",
                    phase = %phase.label(),
                    error = %err,
                    "phase failed"
                );
                Err(err)
            }
        };
        self.scheduler.end_step();
        outcome
    }

    fn settle(
        &mut self,
        phase: BoxedPhase<B>,
        step: PhaseStep,
        battle: &mut B,
    ) -> Result<StepOutcome, SchedulerError> {
        let kind = phase.kind();
        let request = self.scheduler.take_override_request();

        match step {
            PhaseStep::Await => match request {
                Some(next) => self.enter_override(phase, next, battle),
                None => {
                    tracing::debug!(
                        target: "battle_core::manager",
                        phase = %phase.label(),
                        "phase awaiting signal"
                    );
                    self.current = Some(phase);
                    Ok(StepOutcome::Suspended(kind))
                }
            },
            PhaseStep::End => {
                tracing::debug!(
                    target: "battle_core::manager",
                    phase = %phase.label(),
                    state = %PhaseState::Ended,
                    "phase ended"
                );
                drop(phase);

                if let Some(next) = request {
                    self.scheduler.push_front_direct(next);
                }
                if let Some(standby) = self.standby.take() {
                    tracing::debug!(
                        target: "battle_core::manager",
                        phase = %standby.label(),
                        "standby phase restored"
                    );
                    self.current = Some(standby);
                }
                Ok(StepOutcome::Ended(kind))
            }
        }
    }

    fn enter_override(
        &mut self,
        previous: BoxedPhase<B>,
        phase: BoxedPhase<B>,
        battle: &mut B,
    ) -> Result<StepOutcome, SchedulerError> {
        tracing::debug!(
            target: "battle_core::manager",
            previous = %previous.label(),
            phase = %phase.label(),
            "phase overridden"
        );
        self.standby = Some(previous);
        self.start(phase, battle)
    }

    /// Whether a pending phase of `kind` matches `predicate`. The current
    /// and standby phases are not pending.
    pub fn has_phase_of_kind(&self, kind: PhaseKind, predicate: PhasePredicate<'_, B>) -> bool {
        self.scheduler.has_phase_of_kind(kind, predicate)
    }

    pub fn find_phase(
        &self,
        kind: PhaseKind,
        predicate: PhasePredicate<'_, B>,
    ) -> Option<&dyn Phase<B>> {
        self.scheduler.find_phase(kind, predicate)
    }

    pub fn try_remove_phase(
        &mut self,
        kind: PhaseKind,
        battle: &B,
        predicate: PhasePredicate<'_, B>,
    ) -> Result<bool, SchedulerError> {
        self.scheduler.try_remove_phase(kind, battle, predicate)
    }

    pub fn remove_all_phases_of_kind(&mut self, kind: PhaseKind) -> usize {
        self.scheduler.remove_all_phases_of_kind(kind)
    }

    pub fn force_action_first(&mut self, predicate: PhasePredicate<'_, B>) -> bool {
        self.scheduler
            .set_action_timing(predicate, TimingModifier::First)
    }

    pub fn force_action_last(&mut self, predicate: PhasePredicate<'_, B>) -> bool {
        self.scheduler
            .set_action_timing(predicate, TimingModifier::Last)
    }

    /// Empties the main sequence.
    pub fn clear_phase_queue(&mut self) {
        self.scheduler.clear_phase_queue();
    }

    /// Empties the main sequence, every dynamic queue and the standby slot.
    pub fn clear_all_phases(&mut self) {
        self.scheduler.clear_phase_queue();
        self.scheduler.clear_dynamic_queues();
        self.standby = None;
    }
}
