//! Deterministic artillery rules shared by the runtime and offline tools.
//!
//! `barrage-core` resolves delayed, scattering, area-effect fire on a hex
//! board: declaration and flight time, to-hit with spotters and fire
//! adjustment, homing retargeting, point-defense interception, scatter on a
//! miss and the effects a landed round produces. All artillery state mutation
//! flows through [`engine::ResolutionEngine`]; everything the rules need from
//! the rest of the game comes in through the traits in [`env`].
pub mod attack;
pub mod config;
pub mod convergence;
pub mod effects;
pub mod engine;
pub mod env;
pub mod error;
pub mod homing;
pub mod intercept;
pub mod report;
pub mod scatter;
pub mod state;
pub mod tohit;

#[cfg(test)]
mod testing;

pub use attack::{
    AttackDeclaration, AttackLifecycle, AttackQueue, FireMode, LifecycleError, PendingAttack,
    RoundFlags, TargetSpec, TargetingTick,
};
pub use config::ArtilleryConfig;
pub use convergence::{ConvergenceKey, ConvergenceMemory, FireAdjustment};
pub use effects::{
    BlastShape, DirectHit, ImpactOutcome, MineKind, MunitionCategory, MunitionProfile, SmokeKind,
};
pub use engine::{
    DeclareError, Phase, ResolutionEngine, ResolutionOutcome, ResolutionReport, ResolveError,
    Sinks,
};
pub use env::{
    Arbiter, ArbitrationRequest, ArbitrationResponse, BoardOracle, BuildingView, CooldownTracker,
    DamageSink, Env, FixedArbiter, MinefieldView, MunitionOracle, OracleError, PcgRng, RngOracle,
    UnitOracle, UnitStatus, UnitView, UnlimitedCooldowns,
};
pub use error::{ErrorContext, ErrorSeverity, GameError};
pub use homing::{HomingCandidate, HomingLock, LockSelection, TagDesignation};
pub use intercept::{DefenseMode, DefenseRegime, DefenseStatus, DefenseSystem, InterceptReport};
pub use report::{ReportEntry, ReportKind, ReportLog, ReportSink};
pub use scatter::{Landing, ScatterRule, ScatteredRound};
pub use state::{
    AmmoId, ArtilleryState, AttackId, BuildingId, DefenseId, EntityId, Hex, HexDirection, TeamId,
    Turn, WeaponId,
};
pub use tohit::{Modifier, SkillRating, ToHitClass, ToHitResult};
