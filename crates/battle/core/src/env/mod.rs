//! Read-only battle inputs consumed by the scheduler.
//!
//! Ordering decisions depend on live battle state (effective speed, field
//! effects, un-suppressed abilities) and on the battle seed. Both are passed
//! in explicitly: queues receive `&B` where `B: BattleOracle` at the moment
//! they order, and every queue owns a [`TieBreaker`] stream derived from the
//! seed supplied when the registry is built.
mod rng;

use std::fmt;

use arrayvec::ArrayVec;

use crate::config::BattleConfig;

pub use rng::{PcgRng, RngOracle, TieBreaker, compute_seed};

/// Identifies a battle participant (a creature on either side).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParticipantId(pub u32);

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A triggered capability that fires when its owner enters the field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReactionSpec {
    /// Declared priority; higher resolves first among one entrant's reactions.
    pub priority: i32,
    /// `true` when the capability is not the participant's primary one.
    pub secondary: bool,
}

impl ReactionSpec {
    pub const fn primary(priority: i32) -> Self {
        Self {
            priority,
            secondary: false,
        }
    }

    pub const fn secondary(priority: i32) -> Self {
        Self {
            priority,
            secondary: true,
        }
    }
}

/// Reactions declared by one entrant, primary first.
pub type Reactions = ArrayVec<ReactionSpec, { BattleConfig::MAX_REACTIONS }>;

/// Live view of battle state needed to order phases.
///
/// Implementations must be pure with respect to the scheduler: answering a
/// query never mutates state, and the same state always yields the same
/// answer.
pub trait BattleOracle {
    /// Current effective speed of `participant`, after stat stages and any
    /// other modifiers. `None` when the participant cannot be resolved
    /// (e.g. it has already left the field).
    fn effective_speed(&self, participant: ParticipantId) -> Option<u32>;

    /// Whether a field effect currently makes slower participants move first.
    fn speed_reversed(&self) -> bool {
        false
    }

    /// Un-suppressed triggered capabilities of an entering participant,
    /// index 0 = primary, index 1 = secondary.
    fn entry_reactions(&self, _participant: ParticipantId) -> Reactions {
        Reactions::new()
    }
}
