//! Content factory for loading battle content from a data directory.

use std::path::{Path, PathBuf};

use battle_core::BattleConfig;

use crate::formats::ScenarioSpec;
use crate::loaders::{AbilityCatalog, ConfigLoader, LoadResult, MoveCatalog, ScenarioLoader};

/// Content factory that loads all battle content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── moves.ron        (optional, defaults to the embedded catalog)
/// ├── abilities.ron    (optional, defaults to the embedded catalog)
/// └── scenarios/
///     ├── duel.ron
///     └── doubles.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Load battle configuration from `config.toml`, or the defaults when
    /// the file does not exist.
    pub fn load_config(&self) -> LoadResult<BattleConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            return Ok(BattleConfig::default());
        }
        ConfigLoader::load(&path)
    }

    pub fn load_moves(&self) -> LoadResult<MoveCatalog> {
        let path = self.data_dir.join("moves.ron");
        if path.exists() {
            MoveCatalog::load(&path)
        } else {
            MoveCatalog::builtin()
        }
    }

    pub fn load_abilities(&self) -> LoadResult<AbilityCatalog> {
        let path = self.data_dir.join("abilities.ron");
        if path.exists() {
            AbilityCatalog::load(&path)
        } else {
            AbilityCatalog::builtin()
        }
    }

    /// Path of the named scenario inside `scenarios/`.
    pub fn scenario_path(&self, name: &str) -> PathBuf {
        self.data_dir.join("scenarios").join(format!("{name}.ron"))
    }

    pub fn load_scenario(&self, name: &str) -> LoadResult<ScenarioSpec> {
        ScenarioLoader::load(&self.scenario_path(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
        assert_eq!(
            factory.scenario_path("duel"),
            Path::new("/tmp/data/scenarios/duel.ron")
        );
    }

    #[test]
    fn empty_directory_falls_back_to_embedded_content() {
        let dir = tempfile::tempdir().unwrap();
        let factory = ContentFactory::new(dir.path());
        assert_eq!(factory.load_config().unwrap(), BattleConfig::default());
        assert!(!factory.load_moves().unwrap().is_empty());
        assert!(!factory.load_abilities().unwrap().is_empty());
        assert!(factory.load_scenario("missing").is_err());
    }

    #[test]
    fn shipped_scenarios_load() {
        let factory = ContentFactory::new(concat!(env!("CARGO_MANIFEST_DIR"), "/data"));
        for name in ["duel", "doubles", "trick_room"] {
            factory
                .load_scenario(name)
                .unwrap_or_else(|e| panic!("scenario {name}: {e}"));
        }
        assert_eq!(factory.load_config().unwrap().seed, 20_240_601);
    }
}
