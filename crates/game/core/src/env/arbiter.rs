//! Arbitration callback for ambiguous homing locks.
//!
//! When several designated targets qualify, a controller (human prompt or bot
//! heuristic) picks one. This is the only call in a resolution that may wait
//! on something outside the process.

use crate::homing::HomingCandidate;
use crate::state::{AttackId, EntityId, Hex, TeamId};

/// Choice presented to a controller.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArbitrationRequest {
    pub attack: AttackId,
    pub firer: EntityId,
    pub team: TeamId,
    /// Hex the round was originally aimed at.
    pub original_hex: Hex,
    pub candidates: Vec<HomingCandidate>,
}

/// Controller's answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ArbitrationResponse {
    /// Index into `ArbitrationRequest::candidates`.
    Chosen(usize),
    /// No answer within the allowed time.
    TimedOut,
    /// The controller went away.
    Disconnected,
}

/// Synchronous arbitration callback injected by the scheduler.
///
/// Implementations may block. They must always return; the resolver maps
/// anything other than a valid `Chosen` index onto the safe default.
pub trait Arbiter: Send + Sync {
    fn choose(&self, request: &ArbitrationRequest) -> ArbitrationResponse;
}

/// Arbiter that always answers with the same index.
#[derive(Clone, Copy, Debug)]
pub struct FixedArbiter(pub usize);

impl Arbiter for FixedArbiter {
    fn choose(&self, _request: &ArbitrationRequest) -> ArbitrationResponse {
        ArbitrationResponse::Chosen(self.0)
    }
}
