//! Oracle access errors.

use crate::error::{ErrorSeverity, GameError};
use crate::state::EntityId;

/// Errors that occur when the environment is missing a collaborator.
///
/// A resolution cannot proceed without board, unit, munition and dice access,
/// so missing oracles are fatal.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OracleError {
    #[error("BoardOracle not available")]
    BoardNotAvailable,

    #[error("UnitOracle not available")]
    UnitsNotAvailable,

    #[error("MunitionOracle not available")]
    MunitionsNotAvailable,

    #[error("RngOracle not available")]
    RngNotAvailable,

    #[error("Arbiter not available")]
    ArbiterNotAvailable,

    /// Unit referenced by a declaration does not exist.
    #[error("unit {0} not found")]
    UnitNotFound(EntityId),
}

impl GameError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        use OracleError::*;
        match self {
            BoardNotAvailable | UnitsNotAvailable | MunitionsNotAvailable | RngNotAvailable
            | ArbiterNotAvailable => ErrorSeverity::Fatal,

            UnitNotFound(_) => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        use OracleError::*;
        match self {
            BoardNotAvailable => "ORACLE_BOARD_NOT_AVAILABLE",
            UnitsNotAvailable => "ORACLE_UNITS_NOT_AVAILABLE",
            MunitionsNotAvailable => "ORACLE_MUNITIONS_NOT_AVAILABLE",
            RngNotAvailable => "ORACLE_RNG_NOT_AVAILABLE",
            ArbiterNotAvailable => "ORACLE_ARBITER_NOT_AVAILABLE",
            UnitNotFound(_) => "ORACLE_UNIT_NOT_FOUND",
        }
    }
}
