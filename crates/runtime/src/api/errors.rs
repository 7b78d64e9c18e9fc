//! Unified error types surfaced by the runtime API.
//!
//! Wraps scheduler failures, content problems found while assembling a
//! battle, and driver-level failures so clients can bubble them up with
//! consistent context.
use battle_content::Side;
use battle_core::{ParticipantId, PhaseKind, SchedulerError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),

    #[error("step budget of {limit} exhausted before the battle finished")]
    StepBudgetExceeded { limit: u64 },

    #[error("command provider gave no command for {participant}")]
    NoCommand { participant: ParticipantId },

    #[error("{kind} phase is waiting for a signal the runtime cannot supply")]
    UnexpectedSuspension { kind: PhaseKind },

    #[error("creature `{creature}` knows unknown move `{name}`")]
    UnknownMove { creature: String, name: String },

    #[error("creature `{creature}` has unknown ability `{name}`")]
    UnknownAbility { creature: String, name: String },

    #[error("scripted command names unknown creature `{name}`")]
    UnknownCreature { name: String },

    #[error("{side} side has no creatures")]
    EmptySide { side: Side },

    #[error("runtime requires a scenario before building")]
    MissingScenario,

    #[error("failed to load builtin content")]
    Content(#[source] anyhow::Error),
}
