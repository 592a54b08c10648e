use std::collections::BTreeMap;

use super::{MunitionCategory, MunitionProfile};

/// Damage by (relative elevation, ring distance) from the impact hex.
///
/// Missing entries deal no damage.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlastShape {
    cells: BTreeMap<(i32, u32), u32>,
}

impl BlastShape {
    /// Ground-level rings for kinetic blasts, elevation layers for large yields.
    ///
    /// Returns `None` for munitions that do not explode.
    pub fn for_munition(profile: &MunitionProfile) -> Option<Self> {
        match profile.category {
            MunitionCategory::Kinetic => Some(Self::rings(
                profile.rated_damage,
                profile.falloff,
                profile.radius,
                0,
            )),
            MunitionCategory::LargeYield => Some(Self::rings(
                profile.rated_damage,
                profile.falloff,
                profile.radius,
                profile.radius as i32,
            )),
            _ => None,
        }
    }

    fn rings(rated: u32, falloff: u32, radius: u32, layers: i32) -> Self {
        let mut cells = BTreeMap::new();
        for elevation in -layers..=layers {
            for ring in 0..=radius {
                let steps = ring + elevation.unsigned_abs();
                let damage = rated.saturating_sub(steps.saturating_mul(falloff));
                if damage > 0 {
                    cells.insert((elevation, ring), damage);
                }
            }
        }
        Self { cells }
    }

    pub fn damage_at(&self, elevation: i32, ring: u32) -> u32 {
        self.cells.get(&(elevation, ring)).copied().unwrap_or(0)
    }

    /// Outermost ring that still deals damage at any elevation.
    pub fn reach(&self) -> Option<u32> {
        self.cells.keys().map(|&(_, ring)| ring).max()
    }

    pub fn iter(&self) -> impl Iterator<Item = ((i32, u32), u32)> + '_ {
        self.cells.iter().map(|(&key, &damage)| (key, damage))
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
