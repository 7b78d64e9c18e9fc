//! Battle driver and builder.
//!
//! [`Battle`] owns the phase manager, the battle state and the command
//! provider. It steps the manager, answers every command phase from the
//! provider, and opens a new turn whenever the schedule runs dry.
use battle_content::{AbilityCatalog, MoveCatalog, ScenarioSpec};
use battle_core::{
    BattleConfig, ParticipantId, PhaseKind, PhaseManager, QueueRegistry, Signal, StepOutcome,
};
use serde::Serialize;

use crate::api::{CommandProvider, FirstMoveProvider, Result, RuntimeError, ScriptedProvider};
use crate::events::{BattleEvent, Outcome};
use crate::phases::{SummonPhase, TurnInitPhase, reaction_factory};
use crate::scenario;
use crate::state::BattleState;

/// Runtime configuration
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub battle: BattleConfig,
    /// Upper bound on manager steps, guarding against phases that never get
    /// their signal or turns that never end.
    pub max_steps: u64,
    /// The battle is a draw once this many turns have been played.
    pub max_turns: u32,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            battle: BattleConfig::default(),
            max_steps: 10_000,
            max_turns: 100,
        }
    }
}

/// Summary of a finished battle.
#[derive(Debug, Clone, Serialize)]
pub struct BattleReport {
    pub scenario: String,
    pub seed: u64,
    pub outcome: Option<Outcome>,
    pub turns: u32,
    pub steps: u64,
    pub events: Vec<BattleEvent>,
}

impl BattleReport {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// One battle in progress.
pub struct Battle {
    scenario: String,
    manager: PhaseManager<BattleState>,
    state: BattleState,
    provider: Box<dyn CommandProvider>,
    config: RuntimeConfig,
    steps: u64,
}

impl Battle {
    /// Create a new battle builder
    pub fn builder() -> BattleBuilder {
        BattleBuilder::new()
    }

    pub fn state(&self) -> &BattleState {
        &self.state
    }

    pub fn manager(&self) -> &PhaseManager<BattleState> {
        &self.manager
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Advances the battle by one step.
    ///
    /// A suspended command phase is answered from the provider; otherwise the
    /// manager runs the next phase.
    pub fn step(&mut self) -> Result<StepOutcome> {
        if self.steps >= self.config.max_steps {
            return Err(RuntimeError::StepBudgetExceeded {
                limit: self.config.max_steps,
            });
        }
        self.steps += 1;

        let waiting = self
            .manager
            .current_phase()
            .map(|phase| (phase.kind(), phase.participant()));
        match waiting {
            Some((PhaseKind::Command, Some(participant))) => self.answer(participant),
            Some((kind, _)) => Err(RuntimeError::UnexpectedSuspension { kind }),
            None => Ok(self.manager.step(&mut self.state)?),
        }
    }

    fn answer(&mut self, participant: ParticipantId) -> Result<StepOutcome> {
        let slot = self
            .provider
            .choose(&self.state, participant)
            .ok_or(RuntimeError::NoCommand { participant })?;
        Ok(self
            .manager
            .resume(&mut self.state, Signal::Choice(slot))?)
    }

    /// Runs until the battle has an outcome or the turn limit is reached.
    pub fn run(&mut self) -> Result<BattleReport> {
        loop {
            if self.step()? != StepOutcome::Idle {
                continue;
            }
            if self.state.outcome().is_some() {
                break;
            }
            if self.state.turn() >= self.config.max_turns {
                let turn = self.state.turn();
                tracing::info!(target: "runtime::battle", turn, "turn limit reached");
                self.state.emit(BattleEvent::TurnLimitReached { turn });
                self.state.finish(Outcome::Draw);
                break;
            }
            self.manager
                .push_phase(Box::new(TurnInitPhase), &self.state)?;
        }
        Ok(self.report())
    }

    pub fn report(&self) -> BattleReport {
        BattleReport {
            scenario: self.scenario.clone(),
            seed: self.state.config().seed,
            outcome: self.state.outcome(),
            turns: self.state.turn(),
            steps: self.steps,
            events: self.state.events().as_slice().to_vec(),
        }
    }
}

/// Builder for [`Battle`].
pub struct BattleBuilder {
    config: RuntimeConfig,
    scenario: Option<ScenarioSpec>,
    moves: Option<MoveCatalog>,
    abilities: Option<AbilityCatalog>,
    provider: Option<Box<dyn CommandProvider>>,
    seed: Option<u64>,
    max_turns: Option<u32>,
}

impl BattleBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            scenario: None,
            moves: None,
            abilities: None,
            provider: None,
            seed: None,
            max_turns: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Seed that wins over both the configuration and the scenario.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Turn limit that wins over both the configuration and the scenario.
    pub fn max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = Some(max_turns);
        self
    }

    pub fn scenario(mut self, scenario: ScenarioSpec) -> Self {
        self.scenario = Some(scenario);
        self
    }

    /// Move catalog to resolve the roster against. Defaults to the builtin one.
    pub fn moves(mut self, moves: MoveCatalog) -> Self {
        self.moves = Some(moves);
        self
    }

    /// Ability catalog to resolve the roster against. Defaults to the builtin one.
    pub fn abilities(mut self, abilities: AbilityCatalog) -> Self {
        self.abilities = Some(abilities);
        self
    }

    /// Set the command provider.
    ///
    /// If not provided, the scenario's scripted commands are used, falling
    /// back to each creature's first move.
    pub fn provider(mut self, provider: impl CommandProvider + 'static) -> Self {
        self.provider = Some(Box::new(provider));
        self
    }

    /// Build the battle and schedule the leads' entries.
    pub fn build(self) -> Result<Battle> {
        let scenario = self.scenario.ok_or(RuntimeError::MissingScenario)?;
        let moves = match self.moves {
            Some(moves) => moves,
            None => MoveCatalog::builtin().map_err(RuntimeError::Content)?,
        };
        let abilities = match self.abilities {
            Some(abilities) => abilities,
            None => AbilityCatalog::builtin().map_err(RuntimeError::Content)?,
        };

        let mut config = self.config;
        config.battle = scenario::effective_config(&scenario, &config.battle);
        if let Some(seed) = self.seed {
            config.battle.seed = seed;
        }
        if let Some(max_turns) = self.max_turns.or(scenario.max_turns) {
            config.max_turns = max_turns;
        }

        let state = scenario::build_state(&scenario, &moves, &abilities, config.battle.clone())?;
        let provider: Box<dyn CommandProvider> = match self.provider {
            Some(provider) => provider,
            None => Box::new(
                ScriptedProvider::from_commands(&scenario.commands, &state)?
                    .with_fallback(FirstMoveProvider),
            ),
        };

        let registry = QueueRegistry::standard(config.battle.seed, reaction_factory());
        let mut manager = PhaseManager::new(registry);
        for lead in state.leads() {
            manager.push_phase(Box::new(SummonPhase::battle_start(lead)), &state)?;
        }

        tracing::info!(
            target: "runtime::battle",
            scenario = %scenario.name,
            seed = config.battle.seed,
            field_size = config.battle.field_size,
            "battle assembled"
        );
        Ok(Battle {
            scenario: scenario.name,
            manager,
            state,
            provider,
            config,
            steps: 0,
        })
    }
}
