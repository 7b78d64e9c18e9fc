//! Fixtures shared by the unit tests.

use std::collections::HashMap;
use std::fmt;

use crate::env::{BattleOracle, ParticipantId, Reactions};
use crate::error::SchedulerError;
use crate::manager::PhaseContext;
use crate::phase::{BoxedPhase, Phase, PhaseKind, PhaseStep, Signal, SummonRole};

/// Battle state with directly settable ordering inputs.
#[derive(Debug, Default)]
pub struct TestBattle {
    pub speeds: HashMap<ParticipantId, u32>,
    pub reversed: bool,
    pub brackets: HashMap<ParticipantId, i32>,
    pub reactions: HashMap<ParticipantId, Reactions>,
    /// Labels of started and resumed phases, in execution order.
    pub log: Vec<String>,
}

impl TestBattle {
    pub fn with_speeds(speeds: &[(u32, u32)]) -> Self {
        Self {
            speeds: speeds
                .iter()
                .map(|&(id, speed)| (ParticipantId(id), speed))
                .collect(),
            ..Self::default()
        }
    }

    pub fn set_speed(&mut self, id: u32, speed: u32) {
        self.speeds.insert(ParticipantId(id), speed);
    }
}

impl BattleOracle for TestBattle {
    fn effective_speed(&self, participant: ParticipantId) -> Option<u32> {
        self.speeds.get(&participant).copied()
    }

    fn speed_reversed(&self) -> bool {
        self.reversed
    }

    fn entry_reactions(&self, participant: ParticipantId) -> Reactions {
        self.reactions.get(&participant).cloned().unwrap_or_default()
    }
}

type Script = Box<dyn FnMut(&mut PhaseContext<'_, TestBattle>) -> Result<(), SchedulerError>>;

enum Bracket {
    Fixed(i32),
    /// Read from `TestBattle::brackets` when ordered.
    Live,
}

/// Configurable phase that records itself in `TestBattle::log`.
pub struct TestPhase {
    kind: PhaseKind,
    participant: Option<ParticipantId>,
    bracket: Bracket,
    role: Option<SummonRole>,
    name: Option<String>,
    awaits: bool,
    script: Option<Script>,
}

impl TestPhase {
    pub fn new(kind: PhaseKind) -> Self {
        Self {
            kind,
            participant: None,
            bracket: Bracket::Fixed(0),
            role: None,
            name: None,
            awaits: false,
            script: None,
        }
    }

    pub fn owned_by(mut self, id: u32) -> Self {
        self.participant = Some(ParticipantId(id));
        self
    }

    pub fn with_bracket(mut self, bracket: i32) -> Self {
        self.bracket = Bracket::Fixed(bracket);
        self
    }

    pub fn with_live_bracket(mut self) -> Self {
        self.bracket = Bracket::Live;
        self
    }

    pub fn with_role(mut self, role: SummonRole) -> Self {
        self.role = Some(role);
        self
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// Makes `start` suspend until a signal arrives.
    pub fn awaiting(mut self) -> Self {
        self.awaits = true;
        self
    }

    /// Runs `script` inside `start`, before the phase ends or awaits.
    pub fn on_start<F>(mut self, script: F) -> Self
    where
        F: FnMut(&mut PhaseContext<'_, TestBattle>) -> Result<(), SchedulerError> + 'static,
    {
        self.script = Some(Box::new(script));
        self
    }

    pub fn boxed(self) -> BoxedPhase<TestBattle> {
        Box::new(self)
    }
}

impl fmt::Debug for TestPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestPhase")
            .field("kind", &self.kind)
            .field("participant", &self.participant)
            .field("name", &self.name)
            .finish()
    }
}

impl Phase<TestBattle> for TestPhase {
    fn kind(&self) -> PhaseKind {
        self.kind
    }

    fn participant(&self) -> Option<ParticipantId> {
        self.participant
    }

    fn bracket(&self, battle: &TestBattle) -> i32 {
        match self.bracket {
            Bracket::Fixed(bracket) => bracket,
            Bracket::Live => self
                .participant
                .and_then(|participant| battle.brackets.get(&participant).copied())
                .unwrap_or_default(),
        }
    }

    fn summon_role(&self) -> Option<SummonRole> {
        self.role
    }

    fn label(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => match self.participant {
                Some(participant) => format!("{}({participant})", self.kind),
                None => self.kind.to_string(),
            },
        }
    }

    fn start(&mut self, ctx: &mut PhaseContext<'_, TestBattle>) -> Result<PhaseStep, SchedulerError> {
        let label = self.label();
        ctx.battle_mut().log.push(label);
        if let Some(script) = self.script.as_mut() {
            script(ctx)?;
        }
        Ok(if self.awaits {
            PhaseStep::Await
        } else {
            PhaseStep::End
        })
    }

    fn resume(
        &mut self,
        ctx: &mut PhaseContext<'_, TestBattle>,
        signal: Signal,
    ) -> Result<PhaseStep, SchedulerError> {
        let label = format!("{}:{signal:?}", self.label());
        ctx.battle_mut().log.push(label);
        Ok(PhaseStep::End)
    }
}

/// Shorthand for a named phase of a non-dynamic kind.
pub fn message(name: &str) -> BoxedPhase<TestBattle> {
    TestPhase::new(PhaseKind::Message).named(name).boxed()
}
