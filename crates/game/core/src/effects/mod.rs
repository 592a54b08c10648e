//! Munition catalog types and the effects a landed round produces.
//!
//! Every munition maps to exactly one [`MunitionCategory`]; the dispatcher
//! selects the effect from the category alone, so a new munition is a new
//! catalog entry rather than a new resolution path.
mod blast;
mod dispatch;

pub use blast::BlastShape;
pub use dispatch::{
    Absorption, DirectHit, DispatchContext, EntityDamage, Impact, ImpactOutcome, MinefieldEvent,
    MinefieldResult, apply_impact,
};

use crate::state::AmmoId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MineKind {
    /// Triggered by ground vibration from units of at least `sensitivity` tons.
    Vibrating { sensitivity: u8 },
    /// Detonates on its own after `delay` turns.
    Timed { delay: u8 },
}

impl core::fmt::Display for MineKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MineKind::Vibrating { sensitivity } => write!(f, "vibrabomb ({sensitivity})"),
            MineKind::Timed { delay } => write!(f, "timed mines ({delay} turns)"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "kebab-case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SmokeKind {
    Standard,
    /// Also blocks active probes and targeting lasers.
    AntiSensor,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MunitionCategory {
    /// Ordinary high-explosive blast with ring falloff.
    Kinetic,
    Incendiary,
    Illumination,
    Mines { kind: MineKind, density: u8 },
    Smoke(SmokeKind),
    /// Blast with ring falloff that also reaches units above and below ground level.
    LargeYield,
}

impl MunitionCategory {
    /// Whether the round only makes sense against a hex.
    pub fn requires_hex_target(&self) -> bool {
        matches!(
            self,
            MunitionCategory::Illumination
                | MunitionCategory::Mines { .. }
                | MunitionCategory::Smoke(_)
        )
    }

    /// Whether the effect is an explosion that can set off minefields.
    pub fn is_area_blast(&self) -> bool {
        matches!(self, MunitionCategory::Kinetic | MunitionCategory::LargeYield)
    }
}

/// Catalog entry for one artillery munition.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MunitionProfile {
    pub id: AmmoId,
    pub name: String,
    pub category: MunitionCategory,
    /// Damage at the impact hex.
    pub rated_damage: u32,
    /// Damage lost per ring away from the impact hex.
    pub falloff: u32,
    /// Rings (or layers, for large yields) the effect reaches.
    pub radius: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub homing: bool,
    /// Armor point defenses must strip before the round is destroyed.
    #[cfg_attr(feature = "serde", serde(default))]
    pub missile_armor: u32,
}

impl MunitionProfile {
    pub fn new(id: AmmoId, name: impl Into<String>, category: MunitionCategory) -> Self {
        Self {
            id,
            name: name.into(),
            category,
            rated_damage: 0,
            falloff: 0,
            radius: 0,
            homing: false,
            missile_armor: 0,
        }
    }

    pub fn with_damage(mut self, rated_damage: u32, falloff: u32, radius: u32) -> Self {
        self.rated_damage = rated_damage;
        self.falloff = falloff;
        self.radius = radius;
        self
    }

    pub fn with_radius(mut self, radius: u32) -> Self {
        self.radius = radius;
        self
    }

    pub fn homing(mut self, missile_armor: u32) -> Self {
        self.homing = true;
        self.missile_armor = missile_armor;
        self
    }
}
