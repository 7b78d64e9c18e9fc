//! Run a scenario to completion and print what happened.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use battle_content::{ContentFactory, ScenarioLoader, ScenarioSpec};
use clap::Parser;
use runtime::{Battle, BattleReport, RuntimeConfig};

use super::DEFAULT_DATA_DIR;

/// Run a scenario and print its transcript
#[derive(Parser, Debug)]
pub struct Run {
    /// Scenario name under `<data-dir>/scenarios/`, or a path to a `.ron` file
    #[arg(value_name = "SCENARIO")]
    pub scenario: String,

    /// Battle seed, overriding both config.toml and the scenario
    #[arg(long, env = "BATTLE_SEED")]
    pub seed: Option<u64>,

    /// Turn limit, overriding the scenario
    #[arg(long, env = "BATTLE_MAX_TURNS")]
    pub max_turns: Option<u32>,

    /// Step budget before the run is aborted
    #[arg(long, env = "BATTLE_MAX_STEPS", default_value_t = RuntimeConfig::default().max_steps)]
    pub max_steps: u64,

    /// Content directory holding config.toml, catalogs and scenarios
    #[arg(short, long, env = "BATTLE_DATA_DIR", value_name = "DIR", default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "transcript")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Every battle event, one per line, then the result
    Transcript,
    /// Only the result
    Summary,
    /// Full JSON report
    Json,
}

impl Run {
    pub fn execute(self) -> Result<()> {
        let content = ContentFactory::new(&self.data_dir);
        let battle = content
            .load_config()
            .with_context(|| format!("Failed to load config from {}", self.data_dir.display()))?;
        let scenario = self.load_scenario(&content)?;

        let config = RuntimeConfig {
            battle,
            max_steps: self.max_steps,
            ..RuntimeConfig::default()
        };
        let mut builder = Battle::builder()
            .config(config)
            .moves(content.load_moves()?)
            .abilities(content.load_abilities()?)
            .scenario(scenario);
        if let Some(seed) = self.seed {
            builder = builder.seed(seed);
        }
        if let Some(max_turns) = self.max_turns {
            builder = builder.max_turns(max_turns);
        }

        let report = builder.build()?.run()?;
        print!("{}", render(&report, self.format)?);
        Ok(())
    }

    fn load_scenario(&self, content: &ContentFactory) -> Result<ScenarioSpec> {
        let path = Path::new(&self.scenario);
        if path.extension().is_some_and(|ext| ext == "ron") {
            ScenarioLoader::load(path)
        } else {
            content
                .load_scenario(&self.scenario)
                .with_context(|| format!("Unknown scenario '{}'", self.scenario))
        }
    }
}

pub(crate) fn render(report: &BattleReport, format: OutputFormat) -> Result<String> {
    let mut out = String::new();
    match format {
        OutputFormat::Json => {
            out.push_str(&report.to_json()?);
            out.push('\n');
        }
        OutputFormat::Transcript => {
            for event in &report.events {
                writeln!(out, "{event}")?;
            }
            write_summary(&mut out, report)?;
        }
        OutputFormat::Summary => write_summary(&mut out, report)?,
    }
    Ok(out)
}

fn write_summary(out: &mut String, report: &BattleReport) -> std::fmt::Result {
    let outcome = report
        .outcome
        .map(|outcome| outcome.to_string())
        .unwrap_or_else(|| "unfinished".to_string());
    writeln!(
        out,
        "{}: {outcome} after {} turns (seed {}, {} steps)",
        report.scenario, report.turns, report.seed, report.steps
    )
}

#[cfg(test)]
mod tests {
    use runtime::{BattleEvent, Outcome};

    use super::*;

    fn report() -> BattleReport {
        BattleReport {
            scenario: "duel".into(),
            seed: 7,
            outcome: Some(Outcome::Draw),
            turns: 1,
            steps: 12,
            events: vec![
                BattleEvent::TurnStarted { turn: 1 },
                BattleEvent::TurnEnded { turn: 1 },
            ],
        }
    }

    #[test]
    fn transcript_lists_events_then_summary() {
        let text = render(&report(), OutputFormat::Transcript).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            [
                "-- turn 1 --",
                "-- end of turn 1 --",
                "duel: draw after 1 turns (seed 7, 12 steps)",
            ]
        );
    }

    #[test]
    fn summary_is_a_single_line() {
        let text = render(&report(), OutputFormat::Summary).unwrap();
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn loads_a_scenario_file_outside_the_data_dir() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("mirror.ron");
        std::fs::write(
            &path,
            r#"(
                name: "mirror",
                max_turns: Some(2),
                roster: [
                    (name: "left", side: Player, hp: 50, speed: 60, moves: ["tackle"]),
                    (name: "right", side: Enemy, hp: 50, speed: 40, moves: ["tackle"]),
                ],
            )"#,
        )
        .unwrap();

        let run = Run {
            scenario: path.display().to_string(),
            seed: None,
            max_turns: None,
            max_steps: 1_000,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            format: OutputFormat::Summary,
        };
        let scenario = run
            .load_scenario(&ContentFactory::new(&run.data_dir))
            .unwrap();
        assert_eq!(scenario.name, "mirror");
    }
}
