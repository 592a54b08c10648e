//! Traits describing the collaborators a resolution talks to.
//!
//! Read-only oracles expose the board, units, munition catalog, dice and the
//! arbitration callback. The [`Env`] aggregate bundles them so the engine can
//! reach everything it needs without coupling to concrete implementations.
//! Mutable collaborators ([`DamageSink`], [`CooldownTracker`]) are passed
//! separately because they are written to.
mod arbiter;
mod board;
mod error;
mod munitions;
mod rng;
mod sinks;
mod units;

pub use arbiter::{Arbiter, ArbitrationRequest, ArbitrationResponse, FixedArbiter};
pub use board::{BoardOracle, BuildingView, MinefieldView};
pub use error::OracleError;
pub use munitions::MunitionOracle;
pub use rng::{PcgRng, RngOracle, RollContext, RollSeeds, attack_nonce, compute_seed};
pub use sinks::{CooldownTracker, DamageSink, UnlimitedCooldowns};
pub use units::{UnitOracle, UnitStatus, UnitView};

/// Aggregates read-only oracles required by the resolution pipeline.
#[derive(Clone, Copy)]
pub struct Env<'a> {
    board: Option<&'a dyn BoardOracle>,
    units: Option<&'a dyn UnitOracle>,
    munitions: Option<&'a dyn MunitionOracle>,
    rng: Option<&'a dyn RngOracle>,
    arbiter: Option<&'a dyn Arbiter>,
}

impl<'a> Env<'a> {
    pub fn new(
        board: Option<&'a dyn BoardOracle>,
        units: Option<&'a dyn UnitOracle>,
        munitions: Option<&'a dyn MunitionOracle>,
        rng: Option<&'a dyn RngOracle>,
        arbiter: Option<&'a dyn Arbiter>,
    ) -> Self {
        Self {
            board,
            units,
            munitions,
            rng,
            arbiter,
        }
    }

    pub fn with_all(
        board: &'a dyn BoardOracle,
        units: &'a dyn UnitOracle,
        munitions: &'a dyn MunitionOracle,
        rng: &'a dyn RngOracle,
        arbiter: &'a dyn Arbiter,
    ) -> Self {
        Self::new(
            Some(board),
            Some(units),
            Some(munitions),
            Some(rng),
            Some(arbiter),
        )
    }

    pub fn empty() -> Self {
        Self::new(None, None, None, None, None)
    }

    /// Returns the BoardOracle, or an error if not available.
    pub fn board(&self) -> Result<&'a dyn BoardOracle, OracleError> {
        self.board.ok_or(OracleError::BoardNotAvailable)
    }

    /// Returns the UnitOracle, or an error if not available.
    pub fn units(&self) -> Result<&'a dyn UnitOracle, OracleError> {
        self.units.ok_or(OracleError::UnitsNotAvailable)
    }

    /// Returns the MunitionOracle, or an error if not available.
    pub fn munitions(&self) -> Result<&'a dyn MunitionOracle, OracleError> {
        self.munitions.ok_or(OracleError::MunitionsNotAvailable)
    }

    /// Returns the RngOracle, or an error if not available.
    pub fn rng(&self) -> Result<&'a dyn RngOracle, OracleError> {
        self.rng.ok_or(OracleError::RngNotAvailable)
    }

    /// Returns the Arbiter, or an error if not available.
    pub fn arbiter(&self) -> Result<&'a dyn Arbiter, OracleError> {
        self.arbiter.ok_or(OracleError::ArbiterNotAvailable)
    }
}

impl core::fmt::Debug for Env<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Env")
            .field("board", &self.board.is_some())
            .field("units", &self.units.is_some())
            .field("munitions", &self.munitions.is_some())
            .field("rng", &self.rng.is_some())
            .field("arbiter", &self.arbiter.is_some())
            .finish()
    }
}
