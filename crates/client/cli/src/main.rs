//! Command-line battle runner.
//!
//! Run with: `battle-cli run <scenario>`
mod commands;
mod logging;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use commands::{List, Run};

/// Runs scripted creature battles
#[derive(Parser)]
#[command(name = "battle-cli")]
#[command(about = "Runs scripted creature battles", long_about = None)]
#[command(version)]
struct Cli {
    /// Also write logs to `battle.log` in this directory
    #[arg(long, global = true, env = "BATTLE_LOG_DIR", value_name = "DIR")]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Run a scenario and print its transcript
    Run(Run),

    /// List the scenarios of a data directory
    List(List),
}

fn main() -> Result<()> {
    // Load .env file if it exists so BATTLE_* variables reach clap
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let _guard = logging::init(cli.log_dir.as_deref())?;

    match cli.command {
        Command::Run(cmd) => cmd.execute(),
        Command::List(cmd) => cmd.execute(),
    }
}
