//! List the scenarios available in a data directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use super::DEFAULT_DATA_DIR;

/// List the scenarios of a data directory
#[derive(Parser, Debug)]
pub struct List {
    /// Content directory holding `scenarios/`
    #[arg(short, long, env = "BATTLE_DATA_DIR", value_name = "DIR", default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,
}

impl List {
    pub fn execute(self) -> Result<()> {
        for name in scenario_names(&self.data_dir)? {
            println!("{name}");
        }
        Ok(())
    }
}

/// Names of the `.ron` files under `scenarios/`, sorted.
pub(crate) fn scenario_names(data_dir: &Path) -> Result<Vec<String>> {
    let dir = data_dir.join("scenarios");
    let entries = std::fs::read_dir(&dir)
        .with_context(|| format!("Failed to read scenario directory {}", dir.display()))?;

    let mut names = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.extension().is_none_or(|ext| ext != "ron") {
            continue;
        }
        if let Some(stem) = path.file_stem() {
            names.push(stem.to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_only_ron_files() {
        let temp = tempfile::tempdir().unwrap();
        let scenarios = temp.path().join("scenarios");
        std::fs::create_dir_all(&scenarios).unwrap();
        std::fs::write(scenarios.join("b.ron"), "").unwrap();
        std::fs::write(scenarios.join("a.ron"), "").unwrap();
        std::fs::write(scenarios.join("notes.txt"), "").unwrap();

        assert_eq!(scenario_names(temp.path()).unwrap(), ["a", "b"]);
    }

    #[test]
    fn shipped_scenarios_are_listed() {
        let names = scenario_names(Path::new(DEFAULT_DATA_DIR)).unwrap();
        assert_eq!(names, ["doubles", "duel", "trick_room"]);
    }
}
