use bitflags::bitflags;

use crate::config::ArtilleryConfig;
use crate::state::{AmmoId, BuildingId, EntityId, Hex, WeaponId};
use crate::tohit::Modifier;

/// What a shot was aimed at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetSpec {
    Hex(Hex),
    Building { building: BuildingId, hex: Hex },
    Entity(EntityId),
}

impl TargetSpec {
    pub fn entity(&self) -> Option<EntityId> {
        match self {
            TargetSpec::Entity(id) => Some(*id),
            _ => None,
        }
    }

    /// Hex for targets that cannot move.
    pub fn fixed_hex(&self) -> Option<Hex> {
        match self {
            TargetSpec::Hex(hex) | TargetSpec::Building { hex, .. } => Some(*hex),
            TargetSpec::Entity(_) => None,
        }
    }
}

impl core::fmt::Display for TargetSpec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TargetSpec::Hex(hex) => write!(f, "hex {hex}"),
            TargetSpec::Building { building, hex } => write!(f, "{building} at {hex}"),
            TargetSpec::Entity(id) => write!(f, "unit {id}"),
        }
    }
}

/// Whether the firer could see what it shot at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FireMode {
    /// Line-of-sight shot; fire adjustment does not apply.
    Direct,
    /// Spotted or predicted shot; walks in over successive turns.
    Indirect,
}

bitflags! {
    /// How the round(s) were fired.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct RoundFlags: u8 {
        const INDIRECT = 1 << 0;
        /// Fired from a weapon bay; every weapon in the bay throws a round.
        const BAY      = 1 << 1;
        /// Fired by a unit off the board edge.
        const OFFBOARD = 1 << 2;
    }
}

/// A committed artillery shot.
///
/// Everything except `turns_until_impact` is fixed at declaration. The
/// counter is only ever decremented by the attack queue.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackDeclaration {
    pub firer: EntityId,
    pub weapon: WeaponId,
    pub ammo: AmmoId,
    pub target: TargetSpec,
    /// Firer's hex when the shot was declared.
    pub origin: Hex,
    pub turns_until_impact: u8,
    /// Spotter candidates, best first as chosen by the player.
    pub spotters: Vec<EntityId>,
    pub flags: RoundFlags,
    /// Rounds thrown by one attack; more than one only for bays.
    pub weapon_count: u8,
    /// Externally computed modifiers: weapon accuracy, target type, range.
    pub modifiers: Vec<Modifier>,
}

impl AttackDeclaration {
    pub fn new(
        firer: EntityId,
        weapon: WeaponId,
        ammo: AmmoId,
        target: TargetSpec,
        origin: Hex,
    ) -> Self {
        Self {
            firer,
            weapon,
            ammo,
            target,
            origin,
            turns_until_impact: 0,
            spotters: Vec::new(),
            flags: RoundFlags::INDIRECT,
            weapon_count: 1,
            modifiers: Vec::new(),
        }
    }

    pub fn with_turns_until_impact(mut self, turns: u8) -> Self {
        self.turns_until_impact = turns;
        self
    }

    pub fn with_spotters(mut self, spotters: impl IntoIterator<Item = EntityId>) -> Self {
        self.spotters = spotters.into_iter().collect();
        self
    }

    pub fn with_modifier(mut self, label: impl Into<String>, delta: i32) -> Self {
        self.modifiers.push(Modifier::new(label, delta));
        self
    }

    pub fn direct(mut self) -> Self {
        self.flags.remove(RoundFlags::INDIRECT);
        self
    }

    pub fn offboard(mut self) -> Self {
        self.flags.insert(RoundFlags::OFFBOARD);
        self
    }

    /// Marks the shot as a bay volley of `weapons` rounds.
    pub fn bay(mut self, weapons: u8) -> Self {
        self.flags.insert(RoundFlags::BAY);
        self.weapon_count = weapons;
        self
    }

    pub fn fire_mode(&self) -> FireMode {
        if self.flags.contains(RoundFlags::INDIRECT) {
            FireMode::Indirect
        } else {
            FireMode::Direct
        }
    }

    /// Number of rounds this attack throws, clamped to the bay limit.
    pub fn rounds(&self) -> usize {
        if self.flags.contains(RoundFlags::BAY) {
            (self.weapon_count as usize).clamp(1, ArtilleryConfig::MAX_BAY_WEAPONS)
        } else {
            1
        }
    }
}
