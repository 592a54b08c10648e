//! Runtime implementations of the `barrage-core` collaborator traits.
//!
//! The [`Battlefield`] plays the game-state store, [`DefenseCooldowns`] the
//! point-defense heat tracker and [`BlockingArbiter`] the synchronous
//! arbitration callback. [`OracleBundle`] ties them to the munition catalog so
//! the runtime can build [`barrage_core::Env`] snapshots on demand.
mod arbiter;
mod battlefield;
mod cooldowns;

pub use arbiter::BlockingArbiter;
pub use battlefield::{Battlefield, UnitRecord};
pub use cooldowns::DefenseCooldowns;

use barrage_content::MunitionCatalog;
use barrage_core::{Env, PcgRng};

/// Read-only collaborators for one session.
pub struct OracleBundle {
    pub(crate) battlefield: Battlefield,
    pub(crate) munitions: MunitionCatalog,
    pub(crate) arbiter: BlockingArbiter,
    pub(crate) rng: PcgRng,
}

impl OracleBundle {
    pub fn new(battlefield: Battlefield, munitions: MunitionCatalog, arbiter: BlockingArbiter) -> Self {
        Self {
            battlefield,
            munitions,
            arbiter,
            rng: PcgRng, // PcgRng is stateless
        }
    }

    /// Converts the bundle into the environment the rules read from.
    pub fn as_env(&self) -> Env<'_> {
        Env::with_all(
            &self.battlefield,
            &self.battlefield,
            &self.munitions,
            &self.rng,
            &self.arbiter,
        )
    }

    pub fn battlefield(&self) -> &Battlefield {
        &self.battlefield
    }

    pub fn munitions(&self) -> &MunitionCatalog {
        &self.munitions
    }
}
