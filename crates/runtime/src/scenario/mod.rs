//! Assembles battle state from scenario content.
//!
//! A [`ScenarioSpec`] names moves and abilities; this module resolves the
//! names against the catalogs and lays the roster out as creatures indexed
//! by their [`ParticipantId`].
use battle_content::{AbilityCatalog, MoveCatalog, ScenarioSpec, Side};
use battle_core::{BattleConfig, ParticipantId};

use crate::api::{Result, RuntimeError};
use crate::state::{BattleState, Creature};

/// Applies the scenario's seed and field size over `config`.
pub fn effective_config(scenario: &ScenarioSpec, config: &BattleConfig) -> BattleConfig {
    let mut config = config.clone();
    if let Some(seed) = scenario.seed {
        config.seed = seed;
    }
    if let Some(field_size) = scenario.field_size {
        config = config.with_field_size(field_size);
    }
    config
}

/// Builds the initial state. Every creature starts on the bench.
pub fn build_state(
    scenario: &ScenarioSpec,
    moves: &MoveCatalog,
    abilities: &AbilityCatalog,
    config: BattleConfig,
) -> Result<BattleState> {
    for side in [Side::Player, Side::Enemy] {
        if scenario.side(side).next().is_none() {
            return Err(RuntimeError::EmptySide { side });
        }
    }

    let mut creatures = Vec::with_capacity(scenario.roster.len());
    for (index, spec) in scenario.roster.iter().enumerate() {
        let id = ParticipantId(index as u32);
        let mut creature = Creature::new(id, spec.name.clone(), spec.side, spec.hp, spec.speed);

        for name in &spec.moves {
            let found = moves.get(name).ok_or_else(|| RuntimeError::UnknownMove {
                creature: spec.name.clone(),
                name: name.clone(),
            })?;
            creature.moves.push(found.clone());
        }
        for name in spec.abilities.iter().take(BattleConfig::MAX_REACTIONS) {
            let found = abilities
                .get(name)
                .ok_or_else(|| RuntimeError::UnknownAbility {
                    creature: spec.name.clone(),
                    name: name.clone(),
                })?;
            creature.abilities.push(found.clone());
        }
        if spec.abilities.len() > BattleConfig::MAX_REACTIONS {
            tracing::warn!(
                target: "runtime::battle",
                creature = %spec.name,
                abilities = spec.abilities.len(),
                "extra abilities ignored"
            );
        }
        creatures.push(creature);
    }

    tracing::debug!(
        target: "runtime::battle",
        scenario = %scenario.name,
        seed = config.seed,
        creatures = creatures.len(),
        "battle state assembled"
    );
    Ok(BattleState::new(config, creatures))
}
