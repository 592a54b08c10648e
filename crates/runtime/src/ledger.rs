//! Damage commands recorded during one attack and applied as a batch.

use barrage_core::{AttackId, BuildingId, DamageSink, EntityId, Hex, MineKind, SmokeKind};
use serde::{Deserialize, Serialize};

use crate::oracle::Battlefield;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageCommand {
    Entity {
        attack: AttackId,
        target: EntityId,
        amount: u32,
    },
    Building {
        attack: AttackId,
        building: BuildingId,
        hex: Hex,
        amount: u32,
    },
    Ignite {
        attack: AttackId,
        hex: Hex,
    },
    Illuminate {
        attack: AttackId,
        hex: Hex,
        radius: u32,
    },
    Smoke {
        attack: AttackId,
        hex: Hex,
        kind: SmokeKind,
    },
    LayMines {
        attack: AttackId,
        hex: Hex,
        kind: MineKind,
        density: u8,
    },
    ClearMines {
        attack: AttackId,
        hex: Hex,
    },
    DetonateMines {
        attack: AttackId,
        hex: Hex,
    },
}

/// What applying a ledger changed beyond plain damage.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AppliedDamage {
    pub destroyed_units: Vec<EntityId>,
    pub collapsed_buildings: Vec<BuildingId>,
}

/// [`DamageSink`] that holds every call until the attack has finished.
///
/// The rules read the battlefield as it was when the attack started, so the
/// runtime only writes once the resolution returns.
#[derive(Clone, Debug, Default)]
pub struct DamageLedger {
    commands: Vec<DamageCommand>,
}

impl DamageLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DamageCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Writes every command to `battlefield` in the order it was issued.
    pub fn apply(self, battlefield: &mut Battlefield) -> AppliedDamage {
        let mut applied = AppliedDamage::default();

        for command in self.commands {
            match command {
                DamageCommand::Entity { target, amount, .. } => {
                    if battlefield.damage_unit(target, amount) {
                        tracing::info!(unit = %target, "Unit destroyed by artillery");
                        applied.destroyed_units.push(target);
                    }
                }
                DamageCommand::Building {
                    building,
                    hex,
                    amount,
                    ..
                } => {
                    if battlefield.damage_building(building, hex, amount) {
                        tracing::info!(%building, %hex, "Building collapsed");
                        applied.collapsed_buildings.push(building);
                    }
                }
                DamageCommand::Ignite { hex, .. } => battlefield.ignite(hex),
                DamageCommand::Illuminate { hex, radius, .. } => {
                    battlefield.illuminate(hex, radius)
                }
                DamageCommand::Smoke { hex, kind, .. } => battlefield.deploy_smoke(hex, kind),
                DamageCommand::LayMines {
                    hex, kind, density, ..
                } => battlefield.lay_minefield(hex, kind, density),
                DamageCommand::ClearMines { hex, .. } | DamageCommand::DetonateMines { hex, .. } => {
                    battlefield.remove_minefield(hex)
                }
            }
        }

        applied
    }
}

impl DamageSink for DamageLedger {
    fn damage_entity(&mut self, attack: AttackId, target: EntityId, amount: u32) {
        self.commands.push(DamageCommand::Entity {
            attack,
            target,
            amount,
        });
    }

    fn damage_building(&mut self, attack: AttackId, building: BuildingId, hex: Hex, amount: u32) {
        self.commands.push(DamageCommand::Building {
            attack,
            building,
            hex,
            amount,
        });
    }

    fn ignite(&mut self, attack: AttackId, hex: Hex) {
        self.commands.push(DamageCommand::Ignite { attack, hex });
    }

    fn illuminate(&mut self, attack: AttackId, hex: Hex, radius: u32) {
        self.commands
            .push(DamageCommand::Illuminate { attack, hex, radius });
    }

    fn deploy_smoke(&mut self, attack: AttackId, hex: Hex, kind: SmokeKind) {
        self.commands.push(DamageCommand::Smoke { attack, hex, kind });
    }

    fn lay_minefield(&mut self, attack: AttackId, hex: Hex, kind: MineKind, density: u8) {
        self.commands.push(DamageCommand::LayMines {
            attack,
            hex,
            kind,
            density,
        });
    }

    fn clear_minefield(&mut self, attack: AttackId, hex: Hex) {
        self.commands.push(DamageCommand::ClearMines { attack, hex });
    }

    fn detonate_minefield(&mut self, attack: AttackId, hex: Hex) {
        self.commands.push(DamageCommand::DetonateMines { attack, hex });
    }
}

#[cfg(test)]
mod tests {
    use barrage_core::{BoardOracle, TeamId, UnitView};

    use super::*;

    #[test]
    fn commands_apply_in_issue_order() {
        let mut field = Battlefield::new(10, 10);
        let hex = Hex::new(5, 5);
        field.add_unit(UnitView::new(EntityId(1), TeamId(1), Some(hex)), 10);
        field.add_building(hex, BuildingId(3), 5);

        let mut ledger = DamageLedger::new();
        ledger.damage_building(AttackId(1), BuildingId(3), hex, 5);
        ledger.damage_entity(AttackId(1), EntityId(1), 12);
        ledger.lay_minefield(AttackId(1), Hex::new(6, 5), MineKind::Timed { delay: 0 }, 10);
        ledger.clear_minefield(AttackId(1), Hex::new(6, 5));
        assert_eq!(ledger.len(), 4);

        let applied = ledger.apply(&mut field);

        assert_eq!(applied.destroyed_units, vec![EntityId(1)]);
        assert_eq!(applied.collapsed_buildings, vec![BuildingId(3)]);
        assert_eq!(field.building(hex), None);
        assert_eq!(field.minefield_at(Hex::new(6, 5)), None);
    }
}
