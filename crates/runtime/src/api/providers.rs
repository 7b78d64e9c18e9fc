//! Abstraction for sourcing each creature's command.
//!
//! Runtime users plug in [`CommandProvider`] implementations so a battle can
//! run with human input, scripted fixtures, or simple policies.
use std::collections::BTreeMap;

use battle_content::CommandSpec;
use battle_core::ParticipantId;

use super::errors::{Result, RuntimeError};
use crate::state::BattleState;

/// Chooses the move slot a creature uses this turn.
///
/// Returning `None` means no command is available; the runtime reports
/// [`RuntimeError::NoCommand`] rather than waiting forever.
pub trait CommandProvider {
    fn choose(&mut self, state: &BattleState, participant: ParticipantId) -> Option<u32>;
}

/// Always picks the first move. Useful as a fallback.
#[derive(Clone, Copy, Debug, Default)]
pub struct FirstMoveProvider;

impl CommandProvider for FirstMoveProvider {
    fn choose(&mut self, _state: &BattleState, _participant: ParticipantId) -> Option<u32> {
        Some(0)
    }
}

/// Replays fixed `(turn, creature) -> slot` choices.
#[derive(Default)]
pub struct ScriptedProvider {
    script: BTreeMap<(u32, ParticipantId), u32>,
    fallback: Option<Box<dyn CommandProvider>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves scenario commands against the creatures of `state`.
    pub fn from_commands(commands: &[CommandSpec], state: &BattleState) -> Result<Self> {
        let mut provider = Self::new();
        for command in commands {
            let participant =
                state
                    .find_by_name(&command.creature)
                    .ok_or_else(|| RuntimeError::UnknownCreature {
                        name: command.creature.clone(),
                    })?;
            provider = provider.with(command.turn, participant, command.slot);
        }
        Ok(provider)
    }

    pub fn with(mut self, turn: u32, participant: ParticipantId, slot: u32) -> Self {
        self.script.insert((turn, participant), slot);
        self
    }

    /// Consulted for every choice the script does not cover.
    pub fn with_fallback(mut self, fallback: impl CommandProvider + 'static) -> Self {
        self.fallback = Some(Box::new(fallback));
        self
    }

    pub fn len(&self) -> usize {
        self.script.len()
    }

    pub fn is_empty(&self) -> bool {
        self.script.is_empty()
    }
}

impl CommandProvider for ScriptedProvider {
    fn choose(&mut self, state: &BattleState, participant: ParticipantId) -> Option<u32> {
        if let Some(slot) = self.script.get(&(state.turn(), participant)) {
            return Some(*slot);
        }
        self.fallback
            .as_mut()
            .and_then(|fallback| fallback.choose(state, participant))
    }
}
