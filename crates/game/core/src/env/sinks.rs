//! Mutable collaborators written to during resolution.
//!
//! The game-state store owns entity and building damage; the core only issues
//! explicit calls. One attack's calls are issued back to back and never
//! interleaved with another attack.

use crate::effects::{MineKind, SmokeKind};
use crate::state::{AttackId, BuildingId, DefenseId, EntityId, Hex};

/// Receiver of every state change an attack causes.
pub trait DamageSink {
    fn damage_entity(&mut self, attack: AttackId, target: EntityId, amount: u32);

    fn damage_building(&mut self, attack: AttackId, building: BuildingId, hex: Hex, amount: u32);

    fn ignite(&mut self, attack: AttackId, hex: Hex);

    fn illuminate(&mut self, attack: AttackId, hex: Hex, radius: u32);

    fn deploy_smoke(&mut self, attack: AttackId, hex: Hex, kind: SmokeKind);

    fn lay_minefield(&mut self, attack: AttackId, hex: Hex, kind: MineKind, density: u8);

    fn clear_minefield(&mut self, attack: AttackId, hex: Hex);

    fn detonate_minefield(&mut self, attack: AttackId, hex: Hex);
}

/// Heat and ammunition bookkeeping for point defenses.
pub trait CooldownTracker {
    /// Whether the defense can fire this turn.
    fn is_available(&self, defense: DefenseId) -> bool;

    /// Called once per engagement.
    fn record_engagement(&mut self, defense: DefenseId);
}

/// Tracker for boards where point defenses never run dry.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnlimitedCooldowns;

impl CooldownTracker for UnlimitedCooldowns {
    fn is_available(&self, _defense: DefenseId) -> bool {
        true
    }

    fn record_engagement(&mut self, _defense: DefenseId) {}
}
