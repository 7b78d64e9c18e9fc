//! Deterministic phase scheduling for turn-based creature battles.
//!
//! `battle-core` decides *when* each unit of battle work runs, never *what* it
//! does. Effect code builds [`Phase`] implementations and hands them to the
//! [`PhaseManager`]; kinds registered in the [`QueueRegistry`] are diverted
//! into dedicated ordering queues and released in priority/speed order at
//! the point the main sequence reaches them.
//!
//! Ordering inputs (live speed, speed reversal, entry reactions) come from the
//! host through [`BattleOracle`], and ties are broken by a seeded
//! [`TieBreaker`], so identical seeds and choice histories replay identically.
pub mod config;
pub mod env;
pub mod error;
pub mod manager;
pub mod phase;
pub mod queue;
pub mod registry;

#[cfg(test)]
pub(crate) mod testing;

pub use config::BattleConfig;
pub use env::{
    BattleOracle, ParticipantId, PcgRng, ReactionSpec, Reactions, RngOracle, TieBreaker,
    compute_seed,
};
pub use error::SchedulerError;
pub use manager::{PhaseContext, PhaseManager, Scheduler, StepOutcome};
pub use phase::{
    BoxedPhase, Phase, PhaseKind, PhaseState, PhaseStep, Signal, SummonRole, SummonSource,
};
pub use queue::{
    ActionOrderQueue, CreatureOrderQueue, DynamicQueue, OrderRule, Placement, PriorityQueue,
    Queued, ReactionFactory, ReleasePoint, SpeedKey, SpeedOrder, SummonReactionQueue,
    TimingModifier, order_by_speed,
};
pub use registry::{QueueRegistry, QueueRegistryBuilder};
