//! Subcommands of the battle runner.

mod list;
mod run;

pub use list::List;
pub use run::Run;

/// Content shipped with the workspace.
pub const DEFAULT_DATA_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../battle/content/data");
