//! In-memory game-state store used by the runtime and scenarios.

use std::collections::{BTreeMap, BTreeSet};

use barrage_core::{
    BoardOracle, BuildingId, BuildingView, DefenseRegime, EntityId, Hex, MineKind, MinefieldView,
    Modifier, SmokeKind, UnitOracle, UnitStatus, UnitView,
};
use serde::{Deserialize, Serialize};

/// A unit plus the damage it can still absorb.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitRecord {
    pub view: UnitView,
    pub durability: u32,
    pub damage: u32,
}

impl UnitRecord {
    pub fn remaining(&self) -> u32 {
        self.durability.saturating_sub(self.damage)
    }
}

/// Rectangular hex board with everything standing on it.
///
/// Reads go through the [`BoardOracle`]/[`UnitOracle`] impls; writes only
/// happen when a [`crate::DamageLedger`] is applied between attacks.
#[derive(Clone, Debug, Default)]
pub struct Battlefield {
    width: i32,
    height: i32,
    units: BTreeMap<EntityId, UnitRecord>,
    buildings: BTreeMap<Hex, BuildingView>,
    minefields: BTreeMap<Hex, MinefieldView>,
    defenses: BTreeMap<EntityId, DefenseRegime>,
    blocked_sight: BTreeSet<(Hex, Hex)>,
    terrain: BTreeMap<Hex, Vec<Modifier>>,
    fires: BTreeSet<Hex>,
    illuminated: BTreeSet<Hex>,
    smoke: BTreeMap<Hex, SmokeKind>,
}

impl Battlefield {
    pub const SMOKE_MODIFIER: i32 = 1;
    pub const ANTI_SENSOR_SMOKE_MODIFIER: i32 = 2;

    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn dimensions(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    pub fn add_unit(&mut self, view: UnitView, durability: u32) {
        self.units.insert(
            view.id,
            UnitRecord {
                view,
                durability,
                damage: 0,
            },
        );
    }

    pub fn add_building(&mut self, hex: Hex, id: BuildingId, capacity: u32) {
        self.buildings.insert(hex, BuildingView::new(id, capacity));
    }

    pub fn add_minefield(&mut self, hex: Hex, minefield: MinefieldView) {
        self.minefields.insert(hex, minefield);
    }

    pub fn set_defenses(&mut self, owner: EntityId, regime: DefenseRegime) {
        self.defenses.insert(owner, regime);
    }

    pub fn block_sight(&mut self, a: Hex, b: Hex) {
        self.blocked_sight.insert(ordered(a, b));
    }

    pub fn add_terrain_modifier(&mut self, hex: Hex, modifier: Modifier) {
        self.terrain.entry(hex).or_default().push(modifier);
    }

    pub fn unit_record(&self, id: EntityId) -> Option<&UnitRecord> {
        self.units.get(&id)
    }

    pub fn units(&self) -> impl Iterator<Item = &UnitRecord> {
        self.units.values()
    }

    pub fn minefield_at(&self, hex: Hex) -> Option<MinefieldView> {
        self.minefields.get(&hex).copied()
    }

    pub fn is_burning(&self, hex: Hex) -> bool {
        self.fires.contains(&hex)
    }

    pub fn is_illuminated(&self, hex: Hex) -> bool {
        self.illuminated.contains(&hex)
    }

    pub fn smoke_at(&self, hex: Hex) -> Option<SmokeKind> {
        self.smoke.get(&hex).copied()
    }

    // ===== writes applied from the damage ledger =====

    /// Returns `true` when this damage destroyed the unit.
    pub(crate) fn damage_unit(&mut self, id: EntityId, amount: u32) -> bool {
        let Some(record) = self.units.get_mut(&id) else {
            return false;
        };
        if record.view.has_left_game() {
            return false;
        }
        record.damage = record.damage.saturating_add(amount);
        if record.remaining() == 0 {
            record.view.status |= UnitStatus::DESTROYED;
            return true;
        }
        false
    }

    /// Returns `true` when the structure in `hex` collapsed.
    pub(crate) fn damage_building(&mut self, building: BuildingId, hex: Hex, amount: u32) -> bool {
        let Some(view) = self.buildings.get_mut(&hex) else {
            return false;
        };
        if view.id != building {
            return false;
        }
        view.remaining_capacity = view.remaining_capacity.saturating_sub(amount);
        if view.remaining_capacity == 0 {
            self.buildings.remove(&hex);
            return true;
        }
        false
    }

    pub(crate) fn ignite(&mut self, hex: Hex) {
        self.fires.insert(hex);
    }

    pub(crate) fn illuminate(&mut self, center: Hex, radius: u32) {
        for (_, hex) in center.spiral(radius) {
            if self.contains(hex) {
                self.illuminated.insert(hex);
            }
        }
    }

    pub(crate) fn deploy_smoke(&mut self, hex: Hex, kind: SmokeKind) {
        let entry = self.smoke.entry(hex).or_insert(kind);
        if kind == SmokeKind::AntiSensor {
            *entry = kind;
        }
    }

    pub(crate) fn lay_minefield(&mut self, hex: Hex, kind: MineKind, density: u8) {
        self.minefields
            .entry(hex)
            .and_modify(|field| {
                if field.kind == kind {
                    field.density = field.density.max(density);
                }
            })
            .or_insert(MinefieldView { kind, density });
    }

    pub(crate) fn remove_minefield(&mut self, hex: Hex) {
        self.minefields.remove(&hex);
    }
}

fn ordered(a: Hex, b: Hex) -> (Hex, Hex) {
    if a <= b { (a, b) } else { (b, a) }
}

impl BoardOracle for Battlefield {
    fn contains(&self, hex: Hex) -> bool {
        (0..self.width).contains(&hex.q) && (0..self.height).contains(&hex.r)
    }

    fn building(&self, hex: Hex) -> Option<BuildingView> {
        self.buildings.get(&hex).copied()
    }

    fn minefield(&self, hex: Hex) -> Option<MinefieldView> {
        self.minefield_at(hex)
    }

    fn occupants(&self, hex: Hex) -> Vec<EntityId> {
        self.units
            .values()
            .filter(|record| record.view.position == Some(hex))
            .map(|record| record.view.id)
            .collect()
    }

    fn has_line_of_sight(&self, from: Hex, to: Hex) -> bool {
        !self.blocked_sight.contains(&ordered(from, to))
    }

    fn environment_modifiers(&self, target: Hex) -> Vec<Modifier> {
        let mut modifiers = self.terrain.get(&target).cloned().unwrap_or_default();
        match self.smoke_at(target) {
            Some(SmokeKind::Standard) => {
                modifiers.push(Modifier::new("smoke", Self::SMOKE_MODIFIER));
            }
            Some(SmokeKind::AntiSensor) => {
                modifiers.push(Modifier::new(
                    "anti-sensor smoke",
                    Self::ANTI_SENSOR_SMOKE_MODIFIER,
                ));
            }
            None => {}
        }
        modifiers
    }
}

impl UnitOracle for Battlefield {
    fn unit(&self, id: EntityId) -> Option<UnitView> {
        self.units.get(&id).map(|record| record.view.clone())
    }

    fn point_defenses(&self, id: EntityId) -> Option<DefenseRegime> {
        self.defenses.get(&id).cloned()
    }
}
