//! The resolution pipeline for one attack.
//!
//! validate → retarget → to-hit → intercept → roll → adjust → land.
//! Each step either hands on to the next or ends the attack with an outcome;
//! nothing after `begin_resolution` can fail.

use super::{ResolutionOutcome, ResolutionReport, Sinks};
use crate::attack::{AttackDeclaration, FireMode, TargetSpec};
use crate::config::ArtilleryConfig;
use crate::convergence::{ConvergenceKey, ConvergenceMemory};
use crate::effects::{
    DirectHit, DispatchContext, Impact, ImpactOutcome, MinefieldResult, MunitionCategory,
    MunitionProfile, apply_impact,
};
use crate::env::{
    Arbiter, BoardOracle, MunitionOracle, RngOracle, RollContext, RollSeeds, UnitOracle,
};
use crate::homing::{DesignationSet, HomingFailure, HomingQuery, resolve_homing};
use crate::intercept::intercept;
use crate::report::{ReportEntry, ReportKind};
use crate::scatter::{Landing, ScatterRule, scatter_round};
use crate::state::{AttackId, Hex, Turn};
use crate::tohit::{Modifier, SkillRating, ToHitInputs, ToHitResult, evaluate, select_spotter};

pub(super) struct Collaborators<'e> {
    pub board: &'e dyn BoardOracle,
    pub units: &'e dyn UnitOracle,
    pub munitions: &'e dyn MunitionOracle,
    pub rng: &'e dyn RngOracle,
    pub arbiter: &'e dyn Arbiter,
}

pub(super) struct Resolution<'r> {
    pub config: &'r ArtilleryConfig,
    pub convergence: &'r mut ConvergenceMemory,
    pub designations: &'r DesignationSet,
    pub turn: Turn,
    pub attack: AttackId,
    pub seeds: RollSeeds,
}

/// Working state threaded through the pipeline.
struct Flight<'r, 's, 'e> {
    res: Resolution<'r>,
    env: &'e Collaborators<'e>,
    sinks: Sinks<'s>,
    report: ResolutionReport,
}

impl<'r> Resolution<'r> {
    pub fn run(
        self,
        declaration: &AttackDeclaration,
        env: &Collaborators<'_>,
        sinks: Sinks<'_>,
    ) -> ResolutionReport {
        let attack = self.attack;
        let mut flight = Flight {
            res: self,
            env,
            sinks,
            report: ResolutionReport::new(attack),
        };
        let outcome = flight.fly(declaration);
        flight.report.outcome = outcome;

        for entry in &flight.report.entries {
            flight.sinks.reports.push(entry.clone());
        }
        flight.report
    }
}

impl Flight<'_, '_, '_> {
    fn note(&mut self, kind: ReportKind) {
        self.report.entries.push(ReportEntry {
            turn: self.res.turn,
            attack: self.res.attack,
            kind,
        });
    }

    fn impossible(&mut self, reason: impl Into<String>) -> ResolutionOutcome {
        let reason = reason.into();
        self.report.to_hit = Some(ToHitResult::impossible(reason.clone()));
        self.note(ReportKind::Impossible {
            reason: reason.clone(),
        });
        ResolutionOutcome::Impossible { reason }
    }

    fn target_lost(&mut self, target: TargetSpec) -> ResolutionOutcome {
        self.note(ReportKind::TargetLost { target });
        ResolutionOutcome::TargetLost
    }

    fn fly(&mut self, declaration: &AttackDeclaration) -> ResolutionOutcome {
        let config = self.res.config;
        let env = self.env;

        // ----- validate -----
        let Some(profile) = env.munitions.munition(declaration.ammo) else {
            return self.impossible("unknown munition");
        };
        let Some(firer) = env.units.unit(declaration.firer) else {
            return self.impossible(format!("firer {} not found", declaration.firer));
        };
        if profile.category.requires_hex_target() && declaration.target.entity().is_some() {
            return self.impossible(format!("{} must be aimed at a hex", profile.name));
        }

        // Where the target is at the moment of impact.
        let intended = match declaration.target {
            TargetSpec::Entity(id) => match env.units.unit(id) {
                Some(view) if !view.has_left_game() => view.position,
                _ => return self.target_lost(declaration.target),
            },
            TargetSpec::Building { building, hex } => match env.board.building(hex) {
                Some(view) if view.id == building => Some(hex),
                _ => return self.target_lost(declaration.target),
            },
            TargetSpec::Hex(hex) => Some(hex),
        };

        // ----- retarget -----
        let mut target = declaration.target;
        let mut strike = intended;
        if profile.homing {
            let Some(original_hex) = intended else {
                return self.impossible(HomingFailure::NoValidDesignation.to_string());
            };
            let query = HomingQuery {
                attack: self.res.attack,
                firer: declaration.firer,
                team: firer.team,
                original_hex,
                radius: config.homing_radius,
                turn: self.res.turn,
            };
            match resolve_homing(&query, self.res.designations, env.units, env.arbiter) {
                Ok(lock) => {
                    target = lock.candidate.target;
                    strike = Some(lock.candidate.hex);
                    self.note(ReportKind::HomingLock {
                        target,
                        selection: lock.selection,
                    });
                    self.report.homing = Some(lock);
                }
                Err(failure) => return self.impossible(failure.to_string()),
            }
        }

        // ----- to-hit -----
        let fire_mode = declaration.fire_mode();
        let rating = SkillRating::for_config(config);
        let spotter = match fire_mode {
            FireMode::Indirect => select_spotter(
                &declaration.spotters,
                &firer,
                intended,
                rating,
                env.units,
                env.board,
            ),
            FireMode::Direct => None,
        };
        let key = intended.map(|hex| ConvergenceKey::new(declaration.firer, declaration.weapon, hex));
        let adjustment = key.and_then(|key| self.res.convergence.adjustment(key));
        let environment = strike
            .map(|hex| env.board.environment_modifiers(hex))
            .unwrap_or_default();
        let mut to_hit = evaluate(
            config,
            &ToHitInputs {
                firer_skill: firer.skill(rating),
                fire_mode,
                carried: &declaration.modifiers,
                environment: &environment,
                adjustment,
                spotter: spotter.as_ref(),
            },
        );

        // ----- intercept -----
        let mut penalty = 0;
        if profile.homing {
            if let Some(regime) = target.entity().and_then(|id| env.units.point_defenses(id)) {
                let seed = self.res.seeds.seed(RollContext::Intercept);
                let outcome = intercept(
                    &regime,
                    profile.missile_armor,
                    config,
                    self.sinks.cooldowns,
                    env.rng,
                    seed,
                );
                for defense in &outcome.defenses {
                    self.note(ReportKind::Defense {
                        defense: defense.defense,
                        status: defense.status,
                    });
                }
                let destroyed = outcome.destroyed();
                penalty = outcome.to_hit_penalty();
                self.report.intercept = Some(outcome);
                if destroyed {
                    self.report.to_hit = Some(to_hit);
                    self.note(ReportKind::DestroyedInFlight);
                    return ResolutionOutcome::DestroyedInFlight;
                }
            }
        }

        // ----- roll -----
        let roll = to_hit
            .needs_roll()
            .then(|| env.rng.roll_2d6(self.res.seeds.seed(RollContext::ToHit)));
        if penalty > 0 {
            to_hit.apply_late_modifier(Modifier::new("point defense", penalty));
        }
        let hit = to_hit.is_hit(roll);
        self.report.roll = roll;
        self.note(ReportKind::ToHit {
            to_hit: to_hit.clone(),
            roll,
        });

        // ----- adjust -----
        if let Some(key) = key {
            self.res.convergence.record_outcome(
                key,
                fire_mode,
                hit,
                spotter.as_ref(),
                config.convergence_step,
            );
        }

        // ----- land -----
        let rounds = declaration.rounds();
        let outcome = if hit {
            self.note(ReportKind::Hit { target });
            for round in 0..rounds {
                match strike {
                    Some(center) => self.impact(&profile, center, Some(direct_hit(target)), round),
                    None => self.offboard_hit(&profile, target),
                }
            }
            ResolutionOutcome::Hit
        } else {
            let margin_of_failure = roll.map_or(0, |roll| to_hit.margin_of_failure(roll));
            self.note(ReportKind::Missed { margin_of_failure });
            let rule = match fire_mode {
                FireMode::Indirect => config.indirect_scatter,
                FireMode::Direct => config.direct_scatter,
            };
            for round in 0..rounds {
                self.scatter(&profile, rule, intended, margin_of_failure, round);
            }
            ResolutionOutcome::Missed
        };

        self.report.to_hit = Some(to_hit);
        outcome
    }

    fn scatter(
        &mut self,
        profile: &MunitionProfile,
        rule: ScatterRule,
        aim: Option<Hex>,
        margin_of_failure: u32,
        round: usize,
    ) {
        let round = round as u8;
        let seed = self.res.seeds.seed(RollContext::Scatter(round));
        let scattered = scatter_round(
            rule,
            aim,
            margin_of_failure,
            round,
            self.env.board,
            self.env.rng,
            seed,
        );
        self.note(ReportKind::Scattered {
            round,
            direction: scattered.direction,
            landing: scattered.landing,
        });
        self.report.scatter.push(scattered);

        // A zero-displacement miss still only splashes.
        if let Landing::Hex(center) = scattered.landing {
            self.impact(profile, center, None, round as usize);
        }
    }

    fn impact(
        &mut self,
        profile: &MunitionProfile,
        center: Hex,
        direct: Option<DirectHit>,
        round: usize,
    ) {
        let impact = Impact {
            attack: self.res.attack,
            profile,
            center,
            direct,
            round: round as u8,
        };
        let ctx = DispatchContext {
            config: self.res.config,
            board: self.env.board,
            units: self.env.units,
            rng: self.env.rng,
            seeds: self.res.seeds,
        };
        let outcome = apply_impact(&impact, &ctx, self.sinks.damage);
        for kind in impact_entries(&outcome, profile) {
            self.note(kind);
        }
        self.report.impacts.push(outcome);
    }

    /// Direct hit on a unit with no board position: no blast to spread.
    fn offboard_hit(&mut self, profile: &MunitionProfile, target: TargetSpec) {
        let TargetSpec::Entity(entity) = target else {
            return;
        };
        if profile.category.is_area_blast() && profile.rated_damage > 0 {
            self.sinks
                .damage
                .damage_entity(self.res.attack, entity, profile.rated_damage);
            self.note(ReportKind::EntityDamaged {
                entity,
                amount: profile.rated_damage,
            });
        }
    }
}

fn direct_hit(target: TargetSpec) -> DirectHit {
    match target {
        TargetSpec::Entity(id) => DirectHit::Entity(id),
        TargetSpec::Building { building, .. } => DirectHit::Building(building),
        TargetSpec::Hex(_) => DirectHit::Hex,
    }
}

fn impact_entries(outcome: &ImpactOutcome, profile: &MunitionProfile) -> Vec<ReportKind> {
    let mut kinds = Vec::new();

    for absorption in &outcome.building_damage {
        kinds.push(ReportKind::BuildingDamaged {
            building: absorption.building,
            hex: absorption.hex,
            amount: absorption.amount,
        });
    }
    for damage in &outcome.entity_damage {
        kinds.push(ReportKind::EntityDamaged {
            entity: damage.entity,
            amount: damage.amount,
        });
    }
    for &hex in &outcome.affected_hexes {
        let kind = match profile.category {
            MunitionCategory::Incendiary => ReportKind::Ignited { hex },
            MunitionCategory::Illumination => ReportKind::Illuminated {
                hex,
                radius: profile.radius,
            },
            MunitionCategory::Mines { kind, .. } => ReportKind::MinefieldLaid { hex, kind },
            MunitionCategory::Smoke(kind) => ReportKind::SmokeDeployed { hex, kind },
            MunitionCategory::Kinetic | MunitionCategory::LargeYield => continue,
        };
        kinds.push(kind);
    }
    for event in &outcome.minefields {
        kinds.push(match event.result {
            MinefieldResult::Cleared => ReportKind::MinefieldCleared { hex: event.hex },
            MinefieldResult::Detonated => ReportKind::MinefieldDetonated { hex: event.hex },
        });
    }

    kinds
}
