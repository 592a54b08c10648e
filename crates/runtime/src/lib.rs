//! Runtime orchestration for artillery resolution.
//!
//! This crate plays the phase scheduler around `barrage-core`: it owns the
//! artillery state, serves the oracles from an in-memory battlefield, bridges
//! async arbitration providers onto the synchronous rules, applies damage in
//! one batch per attack and broadcasts report lines to subscribers.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`oracle`] provides the collaborator implementations
//! - [`scenario`] loads and plays scripted sessions
pub mod api;
pub mod ledger;
pub mod oracle;
pub mod runtime;
pub mod scenario;

pub use api::{
    ArbitrationProvider, ClosestToOriginProvider, FixedChoiceProvider, LowestIdProvider,
    ReportEvent, Result, RuntimeError,
};
pub use ledger::{AppliedDamage, DamageCommand, DamageLedger};
pub use oracle::{Battlefield, BlockingArbiter, DefenseCooldowns, OracleBundle, UnitRecord};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
pub use scenario::{
    ArbitrationSpec, AttackSpec, BuildingSpec, DesignationSpec, Scenario, ScriptedTurn,
    TurnSummary, UnitSpec,
};
