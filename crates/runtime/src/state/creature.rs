use battle_content::{AbilitySpec, MoveSpec, Side};
use battle_core::ParticipantId;

/// Where a creature currently is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Position {
    Bench,
    /// On the field in this slot of its side.
    Field(usize),
    Fainted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Poison,
}

/// A battle participant with its runtime stats.
#[derive(Clone, Debug)]
pub struct Creature {
    pub id: ParticipantId,
    pub name: String,
    pub side: Side,
    pub max_hp: u32,
    pub hp: u32,
    pub base_speed: u32,
    /// Speed stat stage in `MIN_STAGE..=MAX_STAGE`.
    pub speed_stage: i8,
    pub moves: Vec<MoveSpec>,
    /// Primary ability first.
    pub abilities: Vec<AbilitySpec>,
    pub position: Position,
    pub status: Option<Status>,
}

impl Creature {
    pub const MIN_STAGE: i8 = -6;
    pub const MAX_STAGE: i8 = 6;

    pub fn new(id: ParticipantId, name: impl Into<String>, side: Side, hp: u32, speed: u32) -> Self {
        Self {
            id,
            name: name.into(),
            side,
            max_hp: hp,
            hp,
            base_speed: speed,
            speed_stage: 0,
            moves: Vec::new(),
            abilities: Vec::new(),
            position: Position::Bench,
            status: None,
        }
    }

    /// Speed after the stat stage multiplier: `(2 + s) / 2` when raised,
    /// `2 / (2 - s)` when lowered.
    pub fn effective_speed(&self) -> u32 {
        let base = u64::from(self.base_speed);
        let stage = i64::from(self.speed_stage).unsigned_abs();
        let speed = if self.speed_stage >= 0 {
            base * (2 + stage) / 2
        } else {
            base * 2 / (2 + stage)
        };
        u32::try_from(speed).unwrap_or(u32::MAX)
    }

    /// On the field and still standing.
    pub fn is_active(&self) -> bool {
        matches!(self.position, Position::Field(_)) && self.hp > 0
    }

    /// Not yet fainted, whether benched or on the field.
    pub fn can_battle(&self) -> bool {
        self.position != Position::Fainted && self.hp > 0
    }

    pub fn slot(&self) -> Option<usize> {
        match self.position {
            Position::Field(slot) => Some(slot),
            _ => None,
        }
    }

    /// Shifts the speed stage by `delta`, clamped. Returns whether it moved.
    pub fn shift_speed_stage(&mut self, delta: i8) -> bool {
        let next = self
            .speed_stage
            .saturating_add(delta)
            .clamp(Self::MIN_STAGE, Self::MAX_STAGE);
        let changed = next != self.speed_stage;
        self.speed_stage = next;
        changed
    }

    /// Applies damage and returns whether this knocked the creature out.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        let was_standing = self.hp > 0;
        self.hp = self.hp.saturating_sub(amount);
        was_standing && self.hp == 0
    }

    /// A fraction of max hp, at least one.
    pub fn fraction_of_max_hp(&self, divisor: u32) -> u32 {
        (self.max_hp / divisor.max(1)).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creature(speed: u32) -> Creature {
        Creature::new(ParticipantId(0), "probe", Side::Player, 40, speed)
    }

    #[test]
    fn speed_stages_scale_speed() {
        let mut probe = creature(100);
        assert_eq!(probe.effective_speed(), 100);

        probe.speed_stage = 1;
        assert_eq!(probe.effective_speed(), 150);
        probe.speed_stage = 2;
        assert_eq!(probe.effective_speed(), 200);
        probe.speed_stage = -1;
        assert_eq!(probe.effective_speed(), 66);
        probe.speed_stage = -2;
        assert_eq!(probe.effective_speed(), 50);
        probe.speed_stage = 6;
        assert_eq!(probe.effective_speed(), 400);
        probe.speed_stage = -6;
        assert_eq!(probe.effective_speed(), 25);
    }

    #[test]
    fn speed_stage_clamps() {
        let mut probe = creature(80);
        assert!(probe.shift_speed_stage(5));
        assert!(probe.shift_speed_stage(5));
        assert_eq!(probe.speed_stage, 6);
        assert!(!probe.shift_speed_stage(1));

        assert!(probe.shift_speed_stage(-20));
        assert_eq!(probe.speed_stage, -6);
    }

    #[test]
    fn damage_reports_knockout_once() {
        let mut probe = creature(80);
        assert!(!probe.take_damage(39));
        assert!(probe.take_damage(5));
        assert_eq!(probe.hp, 0);
        assert!(!probe.take_damage(5));
    }

    #[test]
    fn activity_follows_position() {
        let mut probe = creature(80);
        assert!(!probe.is_active());
        assert!(probe.can_battle());

        probe.position = Position::Field(0);
        assert!(probe.is_active());
        assert_eq!(probe.slot(), Some(0));

        probe.position = Position::Fainted;
        assert!(!probe.can_battle());
    }
}
