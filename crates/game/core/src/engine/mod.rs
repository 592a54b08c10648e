//! Attack declaration, targeting ticks and resolution.
//!
//! The [`ResolutionEngine`] is the authoritative reducer for
//! [`ArtilleryState`]. The phase scheduler lends it the state for one call at
//! a time; collaborators come in through [`Env`] (read-only) and [`Sinks`]
//! (written to).

mod errors;
mod resolve;

pub use errors::{DeclareError, Phase, ResolveError};

use crate::attack::{AttackDeclaration, RoundFlags, TargetingTick};
use crate::config::ArtilleryConfig;
use crate::convergence::ConvergenceMemory;
use crate::effects::ImpactOutcome;
use crate::env::{CooldownTracker, DamageSink, Env, OracleError, RollSeeds};
use crate::homing::{HomingLock, TagDesignation};
use crate::intercept::InterceptReport;
use crate::report::{ReportEntry, ReportKind, ReportSink};
use crate::scatter::ScatteredRound;
use crate::state::{ArtilleryState, AttackId, EntityId, Hex, WeaponId};
use crate::tohit::ToHitResult;

/// How an attack ended.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResolutionOutcome {
    Hit,
    Missed,
    /// Could never have succeeded; ammunition spent, nothing happened.
    Impossible { reason: String },
    /// The target left the game before impact.
    TargetLost,
    /// Point defense killed the round.
    DestroyedInFlight,
}

/// Everything one resolution decided.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResolutionReport {
    pub attack: AttackId,
    pub outcome: ResolutionOutcome,
    pub to_hit: Option<ToHitResult>,
    pub roll: Option<u32>,
    pub homing: Option<HomingLock>,
    pub intercept: Option<InterceptReport>,
    pub scatter: Vec<ScatteredRound>,
    pub impacts: Vec<ImpactOutcome>,
    /// Entries also pushed to the report sink, in the same order.
    pub entries: Vec<ReportEntry>,
}

impl ResolutionReport {
    fn new(attack: AttackId) -> Self {
        Self {
            attack,
            outcome: ResolutionOutcome::Missed,
            to_hit: None,
            roll: None,
            homing: None,
            intercept: None,
            scatter: Vec::new(),
            impacts: Vec::new(),
            entries: Vec::new(),
        }
    }
}

/// Mutable collaborators for one resolution.
pub struct Sinks<'s> {
    pub damage: &'s mut dyn DamageSink,
    pub cooldowns: &'s mut dyn CooldownTracker,
    pub reports: &'s mut dyn ReportSink,
}

pub struct ResolutionEngine<'a> {
    state: &'a mut ArtilleryState,
    config: &'a ArtilleryConfig,
}

impl<'a> ResolutionEngine<'a> {
    pub fn new(state: &'a mut ArtilleryState, config: &'a ArtilleryConfig) -> Self {
        Self { state, config }
    }

    pub fn state(&self) -> &ArtilleryState {
        self.state
    }

    pub fn convergence(&self) -> &ConvergenceMemory {
        &self.state.convergence
    }

    /// Hexes `firer` now hits automatically, per weapon.
    pub fn auto_hit_hexes(&self, firer: EntityId) -> Vec<(WeaponId, Hex)> {
        self.state.convergence.auto_hit_hexes(firer)
    }

    /// Records a targeting-laser result for this turn.
    pub fn record_designation(&mut self, designation: TagDesignation) {
        self.state.designations.record(designation);
    }

    /// Accepts a shot made in the targeting phase.
    pub fn declare_attack(
        &mut self,
        declaration: AttackDeclaration,
        env: &Env<'_>,
        reports: &mut dyn ReportSink,
    ) -> Result<AttackId, DeclareError> {
        let units = env.units()?;
        let board = env.board()?;

        let firer = units
            .unit(declaration.firer)
            .ok_or(OracleError::UnitNotFound(declaration.firer))?;
        if firer.has_left_game() {
            return Err(DeclareError::FirerNotInPlay(declaration.firer));
        }
        if declaration.flags.contains(RoundFlags::BAY) && declaration.weapon_count == 0 {
            return Err(DeclareError::EmptyBay);
        }
        if let Some(hex) = declaration.target.fixed_hex() {
            if !board.contains(hex) {
                return Err(DeclareError::TargetOffBoard(hex));
            }
        }

        let kind = ReportKind::Declared {
            firer: declaration.firer,
            target: declaration.target,
            turns_until_impact: declaration.turns_until_impact,
        };
        let id = self.state.attacks.declare(declaration);
        reports.push(ReportEntry {
            turn: self.state.turn,
            attack: id,
            kind,
        });
        Ok(id)
    }

    /// Advances every in-flight attack by one targeting phase.
    ///
    /// Refused, with nothing moved, while an attack sits at impact unresolved.
    pub fn tick_targeting_phase(
        &mut self,
        reports: &mut dyn ReportSink,
    ) -> Result<Vec<TargetingTick>, ResolveError> {
        let turn = self.state.turn;
        let ticks = self
            .state
            .attacks
            .tick()
            .map_err(|error| {
                let attack = error.attack();
                ResolveError::lifecycle(error, attack, turn)
            })?;
        for tick in ticks.iter().filter(|tick| tick.imminent) {
            reports.push(ReportEntry {
                turn: self.state.turn,
                attack: tick.attack,
                kind: ReportKind::Imminent { firer: tick.firer },
            });
        }
        Ok(ticks)
    }

    /// Attacks the scheduler should resolve in `phase`, in declaration order.
    pub fn due_attacks(&self, phase: Phase) -> Vec<AttackId> {
        self.state
            .attacks
            .iter()
            .filter(|attack| attack.is_due() && resolution_phase(&attack.declaration) == phase)
            .map(|attack| attack.id)
            .collect()
    }

    /// Resolves one due attack.
    ///
    /// Errors are contract violations and leave the state untouched. Every
    /// game outcome, including failures, returns `Ok` with report entries.
    pub fn resolve(
        &mut self,
        attack: AttackId,
        phase: Phase,
        env: &Env<'_>,
        sinks: Sinks<'_>,
    ) -> Result<ResolutionReport, ResolveError> {
        let turn = self.state.turn;
        if !phase.resolves_attacks() {
            return Err(ResolveError::wrong_phase(attack, phase, turn));
        }

        let declaration = self
            .state
            .attacks
            .check_due(attack)
            .map_err(|error| ResolveError::lifecycle(error, attack, turn))?;
        if resolution_phase(declaration) != phase {
            return Err(ResolveError::wrong_phase(attack, phase, turn));
        }

        let oracle = |error: OracleError| ResolveError::oracle(error, attack, turn);
        let collaborators = resolve::Collaborators {
            board: env.board().map_err(oracle)?,
            units: env.units().map_err(oracle)?,
            munitions: env.munitions().map_err(oracle)?,
            rng: env.rng().map_err(oracle)?,
            arbiter: env.arbiter().map_err(oracle)?,
        };

        let declaration = self
            .state
            .attacks
            .begin_resolution(attack)
            .map_err(|error| ResolveError::lifecycle(error, attack, turn))?;

        let seeds = RollSeeds::new(self.state.session_seed, turn.0, attack.0, declaration.firer.0);
        let resolution = resolve::Resolution {
            config: self.config,
            convergence: &mut self.state.convergence,
            designations: &self.state.designations,
            turn,
            attack,
            seeds,
        };
        let report = resolution.run(&declaration, &collaborators, sinks);

        self.state.attacks.finish_resolution(attack);
        Ok(report)
    }
}

/// Off-board fire lands in its own phase ahead of on-board fire.
fn resolution_phase(declaration: &AttackDeclaration) -> Phase {
    if declaration.flags.contains(RoundFlags::OFFBOARD) {
        Phase::Offboard
    } else {
        Phase::Firing
    }
}
