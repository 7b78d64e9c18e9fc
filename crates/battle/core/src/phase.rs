//! Phases: the discrete, sequentially executed units of battle work.
//!
//! The scheduler treats a phase as opaque apart from its [`PhaseKind`] tag
//! and the ordering inputs it exposes (participant, priority bracket, summon
//! role). Effect-specific data lives inside the implementor.

use std::fmt;

use crate::env::ParticipantId;
use crate::error::SchedulerError;
use crate::manager::PhaseContext;

/// Type tag of a phase.
///
/// The [`QueueRegistry`](crate::QueueRegistry) maps some kinds to dedicated
/// ordering queues ("dynamic" kinds); all others run straight from the main
/// sequence.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum PhaseKind {
    /// Opens a turn and collects commands.
    TurnInit,
    /// Awaits one participant's choice.
    Command,
    /// Resolves one participant's chosen action.
    Move,
    /// Applies a stat stage change to one participant.
    StatStageChange,
    /// Removes a participant whose HP reached zero.
    Faint,
    /// Brings a participant onto the field.
    Summon,
    /// Entry effects and the triggered reactions of an entrant.
    PostSummon,
    /// Plain battle message.
    Message,
    /// End-of-turn weather resolution.
    WeatherEffect,
    /// End-of-turn status resolution for one participant.
    PostTurnStatus,
    /// Closes a turn.
    TurnEnd,
    /// Declares the battle outcome.
    BattleEnd,
}

/// Lifecycle of a phase inside the scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum PhaseState {
    Pending,
    Active,
    Ended,
}

/// What a phase reports after `start` or `resume` returns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhaseStep {
    /// The phase is done; the scheduler advances.
    End,
    /// The phase waits for an external [`Signal`]; the scheduler does no
    /// other work until [`PhaseManager::resume`](crate::PhaseManager::resume)
    /// delivers one.
    Await,
}

/// External event delivered to an awaiting phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Signal {
    /// Acknowledgement (message confirmed, animation finished).
    Confirm,
    /// Index of a selected option (move slot, party slot, ...).
    Choice(u32),
}

/// How a participant entered the field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum SummonSource {
    /// Initial send-out; reactions wait behind work already queued.
    BattleStart,
    /// Mid-battle replacement; reactions run ahead of queued actions.
    Replacement,
}

/// Role of a [`PhaseKind::PostSummon`] phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SummonRole {
    /// The neutral entry phase of an entrant.
    Entry { source: SummonSource },
    /// A triggered reaction generated for an entrant.
    Reaction { priority: i32, secondary: bool },
}

/// A unit of battle work, generic over the host battle state `B`.
pub trait Phase<B>: fmt::Debug {
    fn kind(&self) -> PhaseKind;

    /// Participant this phase belongs to, if any. Speed-ordered queues
    /// require one.
    fn participant(&self) -> Option<ParticipantId> {
        None
    }

    /// Priority bracket, read at pop time. Higher brackets resolve first.
    fn bracket(&self, _battle: &B) -> i32 {
        0
    }

    /// Entry/reaction role for [`PhaseKind::PostSummon`] phases.
    fn summon_role(&self) -> Option<SummonRole> {
        None
    }

    /// Human-readable label for logs.
    fn label(&self) -> String {
        match self.participant() {
            Some(participant) => format!("{}({participant})", self.kind()),
            None => self.kind().to_string(),
        }
    }

    /// Runs the phase. Further phases may be scheduled through `ctx`.
    fn start(&mut self, ctx: &mut PhaseContext<'_, B>) -> Result<PhaseStep, SchedulerError>;

    /// Continues an awaiting phase with the delivered signal.
    fn resume(
        &mut self,
        _ctx: &mut PhaseContext<'_, B>,
        _signal: Signal,
    ) -> Result<PhaseStep, SchedulerError> {
        Ok(PhaseStep::End)
    }
}

pub type BoxedPhase<B> = Box<dyn Phase<B>>;
