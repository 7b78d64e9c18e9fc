//! Data-driven battle content and loaders.
//!
//! This crate houses the data formats the runtime builds battles from and the
//! loaders for their RON/TOML files:
//! - Move catalog (data-driven via RON)
//! - Ability catalog (data-driven via RON)
//! - Battle scenarios: roster and scripted commands (RON)
//! - Battle configuration (TOML)
//!
//! Content is consumed by the runtime when a battle is assembled and never
//! reaches the scheduler.

pub mod formats;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use formats::{
    AbilitySpec, CommandSpec, CreatureSpec, EntryEffect, MoveEffect, MoveSpec, ScenarioSpec, Side,
};

#[cfg(feature = "loaders")]
pub use loaders::{
    AbilityCatalog, ConfigLoader, ContentFactory, LoadResult, MoveCatalog, ScenarioLoader,
};
