//! Error types for declaring and resolving attacks.
//!
//! Game outcomes (impossible shots, lost targets) are not errors. What remains
//! here is misuse: a declaration that cannot be accepted, or a scheduler that
//! breaks the resolution contract.

use crate::attack::LifecycleError;
use crate::env::OracleError;
use crate::error::{ErrorContext, ErrorSeverity, GameError};
use crate::state::{AttackId, EntityId, Hex, Turn};

/// Game phase the scheduler is running.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    Targeting,
    /// Off-board artillery lands before on-board fire.
    Offboard,
    Firing,
}

impl Phase {
    pub fn resolves_attacks(&self) -> bool {
        matches!(self, Phase::Offboard | Phase::Firing)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DeclareError {
    #[error("firer {0} is not in play")]
    FirerNotInPlay(EntityId),

    #[error("bay fired with no weapons")]
    EmptyBay,

    #[error("target hex {0} is not on the board")]
    TargetOffBoard(Hex),

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl GameError for DeclareError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            DeclareError::Oracle(error) => error.severity(),
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            DeclareError::FirerNotInPlay(_) => "DECLARE_FIRER_NOT_IN_PLAY",
            DeclareError::EmptyBay => "DECLARE_EMPTY_BAY",
            DeclareError::TargetOffBoard(_) => "DECLARE_TARGET_OFF_BOARD",
            DeclareError::Oracle(error) => error.error_code(),
        }
    }
}

/// Scheduler contract violations. All of them are fatal.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResolveError {
    #[error("{attack} cannot resolve during the {phase} phase")]
    WrongPhase {
        attack: AttackId,
        phase: Phase,
        context: ErrorContext,
    },

    #[error("{source}")]
    Lifecycle {
        #[source]
        source: LifecycleError,
        context: ErrorContext,
    },

    #[error("{source}")]
    Oracle {
        #[source]
        source: OracleError,
        context: ErrorContext,
    },
}

impl ResolveError {
    pub(crate) fn wrong_phase(attack: AttackId, phase: Phase, turn: Turn) -> Self {
        Self::WrongPhase {
            attack,
            phase,
            context: ErrorContext::new(turn).with_attack(attack),
        }
    }

    pub(crate) fn lifecycle(source: LifecycleError, attack: AttackId, turn: Turn) -> Self {
        Self::Lifecycle {
            source,
            context: ErrorContext::new(turn).with_attack(attack),
        }
    }

    pub(crate) fn oracle(source: OracleError, attack: AttackId, turn: Turn) -> Self {
        Self::Oracle {
            source,
            context: ErrorContext::new(turn).with_attack(attack),
        }
    }
}

impl GameError for ResolveError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn context(&self) -> Option<&ErrorContext> {
        match self {
            ResolveError::WrongPhase { context, .. }
            | ResolveError::Lifecycle { context, .. }
            | ResolveError::Oracle { context, .. } => Some(context),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            ResolveError::WrongPhase { .. } => "RESOLVE_WRONG_PHASE",
            ResolveError::Lifecycle { source, .. } => source.error_code(),
            ResolveError::Oracle { source, .. } => source.error_code(),
        }
    }
}
