//! Applies a landed round's effect through the [`DamageSink`].
//!
//! Blasts walk the impact hex and its rings in order. In each hex a building
//! soaks up to its remaining capacity before the rest reaches the occupants.

use super::{BlastShape, MunitionCategory, MunitionProfile};
use crate::config::ArtilleryConfig;
use crate::env::{BoardOracle, DamageSink, RngOracle, RollContext, RollSeeds, UnitOracle};
use crate::state::{AttackId, BuildingId, EntityId, Hex};

/// What the round struck squarely, if it hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DirectHit {
    Entity(EntityId),
    Building(BuildingId),
    Hex,
}

/// One round coming down.
#[derive(Clone, Copy, Debug)]
pub struct Impact<'a> {
    pub attack: AttackId,
    pub profile: &'a MunitionProfile,
    pub center: Hex,
    /// `None` on a miss: splash only, nobody excluded.
    pub direct: Option<DirectHit>,
    /// Bay index, used to keep minefield rolls independent.
    pub round: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityDamage {
    pub entity: EntityId,
    pub hex: Hex,
    pub amount: u32,
    pub direct: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Absorption {
    pub building: BuildingId,
    pub hex: Hex,
    pub amount: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MinefieldResult {
    Cleared,
    Detonated,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MinefieldEvent {
    pub hex: Hex,
    pub roll: u32,
    pub result: MinefieldResult,
}

/// Everything one impact did, in the order the sink saw it.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImpactOutcome {
    pub center: Hex,
    pub direct: Option<DirectHit>,
    pub category: MunitionCategory,
    pub blast: Option<BlastShape>,
    pub entity_damage: Vec<EntityDamage>,
    pub building_damage: Vec<Absorption>,
    /// Hexes touched by a non-blast effect.
    pub affected_hexes: Vec<Hex>,
    pub minefields: Vec<MinefieldEvent>,
}

impl ImpactOutcome {
    pub fn missed(&self) -> bool {
        self.direct.is_none()
    }

    pub fn total_entity_damage(&self) -> u32 {
        self.entity_damage.iter().map(|damage| damage.amount).sum()
    }
}

/// Collaborators the dispatcher reads from and writes to.
pub struct DispatchContext<'a> {
    pub config: &'a ArtilleryConfig,
    pub board: &'a dyn BoardOracle,
    pub units: &'a dyn UnitOracle,
    pub rng: &'a dyn RngOracle,
    pub seeds: RollSeeds,
}

pub fn apply_impact(
    impact: &Impact<'_>,
    ctx: &DispatchContext<'_>,
    sink: &mut dyn DamageSink,
) -> ImpactOutcome {
    let profile = impact.profile;
    let mut outcome = ImpactOutcome {
        center: impact.center,
        direct: impact.direct,
        category: profile.category,
        blast: None,
        entity_damage: Vec::new(),
        building_damage: Vec::new(),
        affected_hexes: Vec::new(),
        minefields: Vec::new(),
    };

    match profile.category {
        MunitionCategory::Kinetic | MunitionCategory::LargeYield => {
            if let Some(shape) = BlastShape::for_munition(profile) {
                apply_blast(impact, &shape, ctx, sink, &mut outcome);
                outcome.blast = Some(shape);
            }
        }
        MunitionCategory::Incendiary => {
            for hex in area(impact.center, profile.radius, ctx.board) {
                sink.ignite(impact.attack, hex);
                outcome.affected_hexes.push(hex);
            }
        }
        MunitionCategory::Illumination => {
            sink.illuminate(impact.attack, impact.center, profile.radius);
            outcome.affected_hexes.push(impact.center);
        }
        MunitionCategory::Mines { kind, density } => {
            for hex in area(impact.center, profile.radius, ctx.board) {
                sink.lay_minefield(impact.attack, hex, kind, density);
                outcome.affected_hexes.push(hex);
            }
        }
        MunitionCategory::Smoke(kind) => {
            for hex in area(impact.center, profile.radius, ctx.board) {
                sink.deploy_smoke(impact.attack, hex, kind);
                outcome.affected_hexes.push(hex);
            }
        }
    }

    outcome
}

fn area(center: Hex, radius: u32, board: &dyn BoardOracle) -> Vec<Hex> {
    center
        .spiral(radius)
        .into_iter()
        .map(|(_, hex)| hex)
        .filter(|&hex| board.contains(hex))
        .collect()
}

fn apply_blast(
    impact: &Impact<'_>,
    shape: &BlastShape,
    ctx: &DispatchContext<'_>,
    sink: &mut dyn DamageSink,
    outcome: &mut ImpactOutcome,
) {
    let attack = impact.attack;
    let rated = impact.profile.rated_damage;

    let mut excluded = None;
    let mut struck_building = None;
    match impact.direct {
        Some(DirectHit::Entity(target)) => {
            sink.damage_entity(attack, target, rated);
            outcome.entity_damage.push(EntityDamage {
                entity: target,
                hex: impact.center,
                amount: rated,
                direct: true,
            });
            excluded = Some(target);
        }
        Some(DirectHit::Building(building)) => {
            let absorbed = ctx
                .board
                .building(impact.center)
                .filter(|view| view.id == building)
                .map_or(0, |view| view.remaining_capacity.min(rated));
            if absorbed > 0 {
                sink.damage_building(attack, building, impact.center, absorbed);
                outcome.building_damage.push(Absorption {
                    building,
                    hex: impact.center,
                    amount: absorbed,
                });
            }
            struck_building = Some(building);
        }
        Some(DirectHit::Hex) | None => {}
    }

    let Some(reach) = shape.reach() else { return };
    let mut minefield_index: u16 = (impact.round as u16) << 8;

    for (ring, hex) in impact.center.spiral(reach) {
        if !ctx.board.contains(hex) {
            continue;
        }

        let ground = shape.damage_at(0, ring);
        let mut absorbed = 0;
        if let Some(building) = ctx.board.building(hex) {
            absorbed = building.remaining_capacity.min(ground);
            let already_struck = ring == 0 && struck_building == Some(building.id);
            if absorbed > 0 && !already_struck {
                sink.damage_building(attack, building.id, hex, absorbed);
                outcome.building_damage.push(Absorption {
                    building: building.id,
                    hex,
                    amount: absorbed,
                });
            }
        }

        for occupant in ctx.board.occupants(hex) {
            if Some(occupant) == excluded {
                continue;
            }
            let Some(view) = ctx.units.unit(occupant) else {
                continue;
            };
            if view.has_left_game() {
                continue;
            }
            let amount = shape
                .damage_at(view.elevation, ring)
                .saturating_sub(absorbed);
            if amount > 0 {
                sink.damage_entity(attack, occupant, amount);
                outcome.entity_damage.push(EntityDamage {
                    entity: occupant,
                    hex,
                    amount,
                    direct: false,
                });
            }
        }

        if ctx.board.minefield(hex).is_some() {
            let seed = ctx.seeds.seed(RollContext::Minefield(minefield_index));
            minefield_index = minefield_index.wrapping_add(1);
            let roll = ctx.rng.roll_2d6(seed);
            let result = if roll >= ctx.config.minefield_clear_target {
                sink.clear_minefield(attack, hex);
                MinefieldResult::Cleared
            } else {
                sink.detonate_minefield(attack, hex);
                MinefieldResult::Detonated
            };
            outcome.minefields.push(MinefieldEvent { hex, roll, result });
        }
    }
}
