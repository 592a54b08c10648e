//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from the rules engine, content loading and scenario files so
//! clients can bubble them up with consistent context.
use barrage_core::{DeclareError, ErrorSeverity, GameError, ResolveError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("runtime requires a munition catalog before building")]
    MissingMunitions,

    #[error("arbitration needs a tokio runtime to run on")]
    NoAsyncRuntime(#[source] tokio::runtime::TryCurrentError),

    #[error("arbitration blocks a worker thread; use the multi-threaded tokio runtime")]
    CurrentThreadRuntime,

    #[error("attack declaration rejected")]
    Declare(#[from] DeclareError),

    #[error("resolution contract violated")]
    Resolve(#[from] ResolveError),

    #[error("invalid scenario: {0}")]
    InvalidScenario(String),

    #[error("failed to parse scenario RON")]
    ScenarioParse(#[from] ron::error::SpannedError),

    #[error("failed to read {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode report event")]
    Encode(#[from] serde_json::Error),

    #[error(transparent)]
    Content(#[from] anyhow::Error),
}

impl RuntimeError {
    /// Severity of the underlying rules error, if there is one.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            RuntimeError::Declare(error) => error.severity(),
            RuntimeError::Resolve(error) => error.severity(),
            RuntimeError::InvalidScenario(_) | RuntimeError::ScenarioParse(_) => {
                ErrorSeverity::Validation
            }
            _ => ErrorSeverity::Internal,
        }
    }
}
