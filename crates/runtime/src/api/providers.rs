//! Asynchronous abstraction for answering homing arbitration prompts.
//!
//! Runtime users plug in [`ArbitrationProvider`] implementations so ambiguous
//! homing locks can be settled by a human prompt, a bot heuristic or a
//! scripted fixture.
use async_trait::async_trait;
use barrage_core::{ArbitrationRequest, ArbitrationResponse, TargetSpec};

/// Trait for choosing one homing candidate.
///
/// Different implementations can handle:
/// - Player prompts (from UI/CLI)
/// - Bot heuristics
/// - Scripted/replayed answers
/// - Testing fixtures
#[async_trait]
pub trait ArbitrationProvider: Send + Sync {
    /// Pick one of `request.candidates` by index.
    ///
    /// Any answer is accepted; the rules map out-of-range indices and
    /// non-answers onto the safe default.
    async fn choose(&self, request: &ArbitrationRequest) -> ArbitrationResponse;
}

/// Always answers with the same index. Useful for replays and tests.
pub struct FixedChoiceProvider(pub usize);

#[async_trait]
impl ArbitrationProvider for FixedChoiceProvider {
    async fn choose(&self, _request: &ArbitrationRequest) -> ArbitrationResponse {
        ArbitrationResponse::Chosen(self.0)
    }
}

/// Picks the unit with the lowest id, falling back to the first candidate.
pub struct LowestIdProvider;

#[async_trait]
impl ArbitrationProvider for LowestIdProvider {
    async fn choose(&self, request: &ArbitrationRequest) -> ArbitrationResponse {
        let index = request
            .candidates
            .iter()
            .enumerate()
            .filter_map(|(index, candidate)| match candidate.target {
                TargetSpec::Entity(id) => Some((id, index)),
                _ => None,
            })
            .min()
            .map_or(0, |(_, index)| index);
        ArbitrationResponse::Chosen(index)
    }
}

/// Stays as close to the original aim point as possible.
pub struct ClosestToOriginProvider;

#[async_trait]
impl ArbitrationProvider for ClosestToOriginProvider {
    async fn choose(&self, request: &ArbitrationRequest) -> ArbitrationResponse {
        let index = request
            .candidates
            .iter()
            .enumerate()
            .min_by_key(|(index, candidate)| (candidate.distance, *index))
            .map_or(0, |(index, _)| index);
        ArbitrationResponse::Chosen(index)
    }
}
