//! Battle scenario loader.

use std::collections::BTreeSet;
use std::path::Path;

use crate::formats::{ScenarioSpec, Side};
use crate::loaders::{LoadResult, read_file};

/// Loader for battle scenarios from RON files.
pub struct ScenarioLoader;

impl ScenarioLoader {
    /// Load and validate a scenario from a RON file.
    ///
    /// RON format: [`ScenarioSpec`]
    pub fn load(path: &Path) -> LoadResult<ScenarioSpec> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid scenario {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> LoadResult<ScenarioSpec> {
        let scenario: ScenarioSpec = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse scenario RON: {}", e))?;
        Self::validate(&scenario)?;
        Ok(scenario)
    }

    /// Structural checks that do not need the move or ability catalogs.
    pub fn validate(scenario: &ScenarioSpec) -> LoadResult<()> {
        for side in [Side::Player, Side::Enemy] {
            if scenario.side(side).next().is_none() {
                anyhow::bail!("Side '{}' has no creatures", side);
            }
        }

        let mut names = BTreeSet::new();
        for creature in &scenario.roster {
            if !names.insert(creature.name.as_str()) {
                anyhow::bail!("Duplicate creature '{}'", creature.name);
            }
            if creature.moves.is_empty() {
                anyhow::bail!("Creature '{}' has no moves", creature.name);
            }
            if creature.hp == 0 {
                anyhow::bail!("Creature '{}' starts with no HP", creature.name);
            }
        }

        for command in &scenario.commands {
            let Some(creature) = scenario.creature(&command.creature) else {
                anyhow::bail!(
                    "Command on turn {} names unknown creature '{}'",
                    command.turn,
                    command.creature
                );
            };
            if command.slot as usize >= creature.moves.len() {
                anyhow::bail!(
                    "Command on turn {} uses slot {} but '{}' knows {} moves",
                    command.turn,
                    command.slot,
                    creature.name,
                    creature.moves.len()
                );
            }
        }
        Ok(())
    }
}
