//! Common error infrastructure for barrage-core.
//!
//! Domain-specific errors (`ResolveError`, `DeclareError`, `OracleError`) live
//! next to the operations that raise them. Game outcomes that merely fail (an
//! impossible shot, a target that left the map) are *not* errors: they are
//! [`crate::engine::ResolutionOutcome`] values with report entries. The types
//! here are reserved for misuse of the API and missing collaborators.
//!
//! # Design Principles
//!
//! - **Type Safety**: Each operation has its own error type with specific variants
//! - **Rich Context**: Errors carry the attack, unit and hex involved
//! - **Severity Classification**: Errors are categorized for recovery strategies

use crate::state::{AttackId, EntityId, Hex, Turn};

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: Temporary conditions that may succeed on retry
/// - **Validation**: Invalid input that should be rejected without retry
/// - **Internal**: Unexpected state inconsistencies that require investigation
/// - **Fatal**: Scheduler contract broken; the session cannot continue safely
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - can retry with same or alternative input.
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: declaration without weapons, unknown firer
    Validation,

    /// Internal error - unexpected state inconsistency.
    Internal,

    /// Fatal error - an invariant of the resolution contract was violated.
    ///
    /// Examples: resolving an attack twice, resolving before impact, resolving
    /// during the targeting phase, missing required oracle
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates a bug outside the game rules.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Contextual information attached to errors for debugging and diagnostics.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ErrorContext {
    /// Attack being processed (if applicable).
    pub attack: Option<AttackId>,

    /// Unit that triggered the error (if applicable).
    pub actor: Option<EntityId>,

    /// Hex involved (if applicable).
    pub hex: Option<Hex>,

    /// Turn at the time of error.
    pub turn: Turn,
}

impl ErrorContext {
    /// Creates a new error context for the given turn.
    #[must_use]
    pub const fn new(turn: Turn) -> Self {
        Self {
            attack: None,
            actor: None,
            hex: None,
            turn,
        }
    }

    #[must_use]
    pub const fn with_attack(mut self, attack: AttackId) -> Self {
        self.attack = Some(attack);
        self
    }

    #[must_use]
    pub const fn with_actor(mut self, actor: EntityId) -> Self {
        self.actor = Some(actor);
        self
    }

    #[must_use]
    pub const fn with_hex(mut self, hex: Hex) -> Self {
        self.hex = Some(hex);
        self
    }
}

/// Common trait for all barrage-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns the context information for this error, if available.
    fn context(&self) -> Option<&ErrorContext> {
        None
    }

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
