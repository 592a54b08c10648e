use crate::scatter::ScatterRule;

/// Artillery rule switches and tunable parameters.
///
/// Defaults follow the tabletop rules; every field can be overridden from the
/// rules TOML loaded by `barrage-content`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ArtilleryConfig {
    /// Use the dedicated artillery skill instead of gunnery for firers and spotters.
    pub use_artillery_skill: bool,

    /// Flat to-hit modifier for indirect shots.
    pub indirect_fire_modifier: i32,

    /// Improvement applied to the fire adjustment after a spotted miss.
    pub convergence_step: i32,

    /// Maximum distance between a designation and the round's original target hex.
    pub homing_radius: u32,

    pub indirect_scatter: ScatterRule,
    pub direct_scatter: ScatterRule,

    /// Percent chance that a single point-defense mount kills an incoming round.
    pub single_intercept_chance: u32,

    /// To-hit penalty when a batched defense absorbs (almost) all of a round's armor.
    pub batch_max_penalty: i32,

    /// 2d6 target to clear a minefield hit by an area attack; lower rolls trigger it.
    pub minefield_clear_target: u32,
}

impl ArtilleryConfig {
    // ===== compile-time constants =====
    /// Lowest 2d6 result; any target at or below it is an automatic success.
    pub const MIN_ROLL: i32 = 2;
    /// Highest 2d6 result; any target above it cannot be rolled.
    pub const MAX_ROLL: i32 = 12;
    /// Upper bound on rounds a single bay can throw in one attack.
    pub const MAX_BAY_WEAPONS: usize = 8;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_INDIRECT_FIRE_MODIFIER: i32 = 3;
    pub const DEFAULT_CONVERGENCE_STEP: i32 = 1;
    pub const DEFAULT_HOMING_RADIUS: u32 = 8;
    pub const DEFAULT_SINGLE_INTERCEPT_CHANCE: u32 = 50;
    pub const DEFAULT_BATCH_MAX_PENALTY: i32 = 4;
    pub const DEFAULT_MINEFIELD_CLEAR_TARGET: u32 = 9;

    pub fn new() -> Self {
        Self {
            use_artillery_skill: false,
            indirect_fire_modifier: Self::DEFAULT_INDIRECT_FIRE_MODIFIER,
            convergence_step: Self::DEFAULT_CONVERGENCE_STEP,
            homing_radius: Self::DEFAULT_HOMING_RADIUS,
            indirect_scatter: ScatterRule::INDIRECT,
            direct_scatter: ScatterRule::DIRECT,
            single_intercept_chance: Self::DEFAULT_SINGLE_INTERCEPT_CHANCE,
            batch_max_penalty: Self::DEFAULT_BATCH_MAX_PENALTY,
            minefield_clear_target: Self::DEFAULT_MINEFIELD_CLEAR_TARGET,
        }
    }

    pub fn with_artillery_skill(mut self, enabled: bool) -> Self {
        self.use_artillery_skill = enabled;
        self
    }
}

impl Default for ArtilleryConfig {
    fn default() -> Self {
        Self::new()
    }
}
