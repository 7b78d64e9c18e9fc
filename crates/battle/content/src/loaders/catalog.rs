//! Move and ability catalogs.
//!
//! The built-in catalogs are embedded from `data/`; custom catalogs can be
//! loaded from RON files with the same layout (a list of specs).

use std::collections::BTreeMap;
use std::path::Path;

use crate::formats::{AbilitySpec, MoveSpec};
use crate::loaders::{LoadResult, read_file};

/// Moves by name.
#[derive(Debug, Clone, Default)]
pub struct MoveCatalog {
    moves: BTreeMap<String, MoveSpec>,
}

impl MoveCatalog {
    /// Loads the embedded move catalog.
    pub fn builtin() -> LoadResult<Self> {
        Self::parse(include_str!("../../data/moves.ron"))
    }

    /// Loads a move catalog from a RON file.
    ///
    /// RON format: `Vec<MoveSpec>`
    pub fn load(path: &Path) -> LoadResult<Self> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Self> {
        let specs: Vec<MoveSpec> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse move catalog RON: {}", e))?;

        let mut moves = BTreeMap::new();
        for spec in specs {
            if moves.contains_key(&spec.name) {
                anyhow::bail!("Duplicate move '{}' in catalog", spec.name);
            }
            moves.insert(spec.name.clone(), spec);
        }
        Ok(Self { moves })
    }

    pub fn get(&self, name: &str) -> Option<&MoveSpec> {
        self.moves.get(name)
    }

    /// Adds or replaces a move.
    pub fn insert(&mut self, spec: MoveSpec) {
        self.moves.insert(spec.name.clone(), spec);
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.moves.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}

/// Abilities by name.
#[derive(Debug, Clone, Default)]
pub struct AbilityCatalog {
    abilities: BTreeMap<String, AbilitySpec>,
}

impl AbilityCatalog {
    /// Loads the embedded ability catalog.
    pub fn builtin() -> LoadResult<Self> {
        Self::parse(include_str!("../../data/abilities.ron"))
    }

    /// Loads an ability catalog from a RON file.
    ///
    /// RON format: `Vec<AbilitySpec>`
    pub fn load(path: &Path) -> LoadResult<Self> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Self> {
        let specs: Vec<AbilitySpec> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse ability catalog RON: {}", e))?;

        let mut abilities = BTreeMap::new();
        for spec in specs {
            if abilities.contains_key(&spec.name) {
                anyhow::bail!("Duplicate ability '{}' in catalog", spec.name);
            }
            abilities.insert(spec.name.clone(), spec);
        }
        Ok(Self { abilities })
    }

    pub fn get(&self, name: &str) -> Option<&AbilitySpec> {
        self.abilities.get(name)
    }

    pub fn insert(&mut self, spec: AbilitySpec) {
        self.abilities.insert(spec.name.clone(), spec);
    }

    pub fn len(&self) -> usize {
        self.abilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.abilities.is_empty()
    }
}
