/// Battle configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BattleConfig {
    /// Battle-wide seed feeding every tie-break stream.
    /// Two battles with the same seed and choice history replay identically.
    pub seed: u64,

    /// Participants per side on the field at once (1 = singles, 2 = doubles).
    pub field_size: usize,
}

impl BattleConfig {
    // ===== compile-time constants =====
    /// Maximum participants per side on the field.
    pub const MAX_FIELD_SIZE: usize = 2;
    /// Maximum triggered capabilities per participant (primary + secondary).
    pub const MAX_REACTIONS: usize = 2;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_SEED: u64 = 0x5EED_BA77_1E00_0001;
    pub const DEFAULT_FIELD_SIZE: usize = 1;

    pub fn new() -> Self {
        Self {
            seed: Self::DEFAULT_SEED,
            field_size: Self::DEFAULT_FIELD_SIZE,
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::new()
        }
    }

    /// Returns a copy with the field size clamped to `1..=MAX_FIELD_SIZE`.
    pub fn with_field_size(mut self, field_size: usize) -> Self {
        self.field_size = field_size.clamp(1, Self::MAX_FIELD_SIZE);
        self
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self::new()
    }
}
