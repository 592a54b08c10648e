//! Bridges an async [`ArbitrationProvider`] onto the synchronous core arbiter.

use std::sync::Arc;
use std::time::Duration;

use barrage_core::{Arbiter, ArbitrationRequest, ArbitrationResponse};
use tokio::runtime::Handle;

use crate::api::ArbitrationProvider;

/// Blocks the resolving thread until the provider answers or the timeout
/// expires.
///
/// Must be called from a multi-threaded tokio runtime or from a thread outside
/// any runtime; `block_in_place` panics on a current-thread runtime.
#[derive(Clone)]
pub struct BlockingArbiter {
    provider: Arc<dyn ArbitrationProvider>,
    timeout: Duration,
    handle: Handle,
}

impl BlockingArbiter {
    pub fn new(provider: Arc<dyn ArbitrationProvider>, timeout: Duration, handle: Handle) -> Self {
        Self {
            provider,
            timeout,
            handle,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Arbiter for BlockingArbiter {
    fn choose(&self, request: &ArbitrationRequest) -> ArbitrationResponse {
        tracing::debug!(
            attack = %request.attack,
            candidates = request.candidates.len(),
            "Requesting homing arbitration"
        );

        let pending = tokio::time::timeout(self.timeout, self.provider.choose(request));
        let answer = tokio::task::block_in_place(|| self.handle.block_on(pending));

        match answer {
            Ok(ArbitrationResponse::Disconnected) => {
                tracing::warn!(attack = %request.attack, "Arbitration provider disconnected");
                ArbitrationResponse::Disconnected
            }
            Ok(response) => response,
            Err(_) => {
                tracing::warn!(
                    attack = %request.attack,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Arbitration timed out, using safe default"
                );
                ArbitrationResponse::TimedOut
            }
        }
    }
}

impl std::fmt::Debug for BlockingArbiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockingArbiter")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
