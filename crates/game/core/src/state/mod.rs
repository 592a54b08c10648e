//! Canonical identifiers, board geometry and the artillery state aggregate.
//!
//! [`ArtilleryState`] is the only mutable state this crate owns. The phase
//! scheduler keeps it alive for the whole session and lends it to
//! [`crate::engine::ResolutionEngine`] whenever an artillery phase runs.
mod common;
mod hex;

pub use common::{AmmoId, AttackId, BuildingId, DefenseId, EntityId, TeamId, Turn, WeaponId};
pub use hex::{Hex, HexDirection};

use crate::attack::AttackQueue;
use crate::convergence::ConvergenceMemory;
use crate::homing::DesignationSet;

/// Session-long artillery bookkeeping.
///
/// Entity and building damage state is owned by the external game-state store;
/// this aggregate only holds what the artillery rules themselves remember.
#[derive(Clone, Debug, Default)]
pub struct ArtilleryState {
    /// Current game turn.
    pub turn: Turn,

    /// Seed fixed at session start; every dice roll is derived from it.
    pub session_seed: u64,

    /// Pending and resolved attacks in declaration order.
    pub attacks: AttackQueue,

    /// Fire-adjustment memory keyed by firer, weapon and hex.
    pub convergence: ConvergenceMemory,

    /// Laser designations recorded this turn.
    pub designations: DesignationSet,
}

impl ArtilleryState {
    pub fn new(session_seed: u64) -> Self {
        Self {
            turn: Turn::FIRST,
            session_seed,
            ..Self::default()
        }
    }

    /// Starts a new turn. Designations only live for the turn they were made in.
    pub fn advance_turn(&mut self) -> Turn {
        self.turn = self.turn.next();
        self.designations.clear();
        self.turn
    }
}
