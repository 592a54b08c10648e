//! Fire-adjustment memory ("walking the fire in").
//!
//! Keyed by firer, weapon and target hex. A hit pins the key to
//! [`FireAdjustment::AutoHit`] for the rest of the session; a spotted miss
//! moves the offset one step towards success. Direct fire never reads or
//! writes the memory.

use std::collections::BTreeMap;

use crate::attack::FireMode;
use crate::state::{EntityId, Hex, WeaponId};
use crate::tohit::SpotterQuality;

/// What the memory knows about one (firer, weapon, hex).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FireAdjustment {
    /// Signed to-hit offset; negative is easier.
    Offset(i32),
    /// The hex has been hit; every later shot hits automatically.
    AutoHit,
}

impl FireAdjustment {
    pub fn is_auto_hit(&self) -> bool {
        matches!(self, FireAdjustment::AutoHit)
    }

    pub fn offset(&self) -> i32 {
        match self {
            FireAdjustment::Offset(offset) => *offset,
            FireAdjustment::AutoHit => 0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConvergenceKey {
    pub firer: EntityId,
    pub weapon: WeaponId,
    pub hex: Hex,
}

impl ConvergenceKey {
    pub const fn new(firer: EntityId, weapon: WeaponId, hex: Hex) -> Self {
        Self { firer, weapon, hex }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConvergenceMemory {
    entries: BTreeMap<ConvergenceKey, FireAdjustment>,
}

impl ConvergenceMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current adjustment, `None` when nothing was ever fired at the hex.
    pub fn adjustment(&self, key: ConvergenceKey) -> Option<FireAdjustment> {
        self.entries.get(&key).copied()
    }

    /// Adjustment with unknown hexes reading as a zero offset.
    pub fn get_modifier(&self, key: ConvergenceKey) -> FireAdjustment {
        self.adjustment(key).unwrap_or(FireAdjustment::Offset(0))
    }

    /// Whether an earlier shot already landed on this hex.
    pub fn is_adjusted(&self, key: ConvergenceKey) -> bool {
        self.entries.contains_key(&key)
    }

    /// Updates the memory after a resolution and returns the new entry.
    ///
    /// Returns `None` for direct fire, which leaves the memory untouched.
    pub fn record_outcome(
        &mut self,
        key: ConvergenceKey,
        fire_mode: FireMode,
        hit: bool,
        spotter: Option<&SpotterQuality>,
        step: i32,
    ) -> Option<FireAdjustment> {
        if fire_mode == FireMode::Direct {
            return None;
        }

        let entry = self.entries.entry(key).or_insert(FireAdjustment::Offset(0));
        match (*entry, hit) {
            (FireAdjustment::AutoHit, _) => {}
            (FireAdjustment::Offset(_), true) => *entry = FireAdjustment::AutoHit,
            (FireAdjustment::Offset(offset), false) => {
                if spotter.is_some() {
                    *entry = FireAdjustment::Offset(offset - step.max(0));
                }
            }
        }
        Some(*entry)
    }

    /// Hexes this firer now hits automatically, for UI hints.
    pub fn auto_hit_hexes(&self, firer: EntityId) -> Vec<(WeaponId, Hex)> {
        self.entries
            .iter()
            .filter(|(key, adjustment)| key.firer == firer && adjustment.is_auto_hit())
            .map(|(key, _)| (key.weapon, key.hex))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ConvergenceKey, &FireAdjustment)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(hex: Hex) -> ConvergenceKey {
        ConvergenceKey::new(EntityId(1), WeaponId(7), hex)
    }

    fn spotter() -> SpotterQuality {
        SpotterQuality {
            spotter: EntityId(2),
            skill: 4,
            forward_observer: false,
            comm_link: false,
        }
    }

    #[test]
    fn hit_sets_sentinel_that_never_weakens() {
        let mut memory = ConvergenceMemory::new();
        let target = key(Hex::new(3, 3));

        memory.record_outcome(target, FireMode::Indirect, true, None, 1);
        assert_eq!(memory.adjustment(target), Some(FireAdjustment::AutoHit));

        for _ in 0..3 {
            memory.record_outcome(target, FireMode::Indirect, false, Some(&spotter()), 1);
        }
        assert_eq!(memory.adjustment(target), Some(FireAdjustment::AutoHit));
    }

    #[test]
    fn spotted_miss_improves_unspotted_miss_only_marks() {
        let mut memory = ConvergenceMemory::new();
        let target = key(Hex::new(1, 2));

        memory.record_outcome(target, FireMode::Indirect, false, None, 1);
        assert_eq!(memory.adjustment(target), Some(FireAdjustment::Offset(0)));
        assert!(memory.is_adjusted(target));

        memory.record_outcome(target, FireMode::Indirect, false, Some(&spotter()), 1);
        memory.record_outcome(target, FireMode::Indirect, false, Some(&spotter()), 1);
        assert_eq!(memory.adjustment(target), Some(FireAdjustment::Offset(-2)));
    }

    #[test]
    fn direct_fire_never_touches_memory() {
        let mut memory = ConvergenceMemory::new();
        let target = key(Hex::new(0, 0));

        assert_eq!(
            memory.record_outcome(target, FireMode::Direct, true, None, 1),
            None
        );
        assert!(memory.is_empty());
        assert_eq!(memory.get_modifier(target), FireAdjustment::Offset(0));
    }

    #[test]
    fn keys_are_per_weapon() {
        let mut memory = ConvergenceMemory::new();
        let hex = Hex::new(4, 4);
        memory.record_outcome(key(hex), FireMode::Indirect, true, None, 1);

        let other_weapon = ConvergenceKey::new(EntityId(1), WeaponId(8), hex);
        assert!(!memory.is_adjusted(other_weapon));
        assert_eq!(memory.auto_hit_hexes(EntityId(1)), vec![(WeaponId(7), hex)]);
        assert!(memory.auto_hit_hexes(EntityId(2)).is_empty());
    }
}
