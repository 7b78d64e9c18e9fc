//! Error types for the phase scheduler.
//!
//! Every variant signals a scheduling-logic defect or an ordering input that
//! cannot be resolved. Empty queues are not errors; they surface as `None`.

use crate::env::ParticipantId;
use crate::phase::PhaseKind;

/// Errors surfaced by queues, the registry and the phase manager.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SchedulerError {
    #[error("no phase is currently active")]
    NoActivePhase,

    #[error("an override is already in effect: standby slot is occupied")]
    StandbyOccupied,

    #[error("phase kind {kind} has no dynamic queue registered")]
    UnregisteredDynamicType { kind: PhaseKind },

    #[error("phase kind {kind} registered to more than one dynamic queue")]
    DuplicateQueue { kind: PhaseKind },

    #[error("{kind} phase has no associated participant")]
    MissingParticipant { kind: PhaseKind },

    #[error("{kind} phase does not declare a summon role")]
    MissingSummonRole { kind: PhaseKind },

    #[error("speed of participant {participant} cannot be resolved")]
    UnresolvedSpeed { participant: ParticipantId },

    #[error("reaction factory produced a {produced} phase (expected {expected})")]
    UnexpectedKind {
        expected: PhaseKind,
        produced: PhaseKind,
    },

    #[error("{kind} phase failed: {reason}")]
    Effect { kind: PhaseKind, reason: String },
}

impl SchedulerError {
    /// Wraps a failure raised by a phase's effect body.
    pub fn effect(kind: PhaseKind, reason: impl std::fmt::Display) -> Self {
        Self::Effect {
            kind,
            reason: reason.to_string(),
        }
    }
}
