//! Reference battle runtime built on the phase scheduler.
//!
//! This crate gives the scheduler in `battle-core` something to schedule:
//! creatures with speed stages, moves with priority brackets, entry
//! abilities, weather and end-of-turn status. Consumers build a [`Battle`]
//! from a scenario and either [`Battle::run`] it to completion or drive it
//! one [`Battle::step`] at a time.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the battle driver and builder
//! - [`api`] exposes errors and the command provider abstraction
//! - [`state`] holds the battle state the scheduler orders against
//! - [`phases`] implements every battle phase
//! - [`events`] records the battle transcript
//! - [`scenario`] assembles state from content
pub mod api;
pub mod events;
pub mod phases;
pub mod runtime;
pub mod scenario;
pub mod state;

pub use api::{
    CommandProvider, FirstMoveProvider, Result, RuntimeError, ScriptedProvider,
};
pub use events::{BattleEvent, DamageCause, EventLog, Outcome};
pub use runtime::{Battle, BattleBuilder, BattleReport, RuntimeConfig};
pub use state::{BattleState, Creature, Position, Status, Weather};
