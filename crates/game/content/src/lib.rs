//! Data-driven artillery content and loaders.
//!
//! This crate provides loaders for the RON/TOML data files a session needs:
//! - Artillery rules (`ArtilleryConfig`, data-driven via TOML)
//! - Munition catalog (data-driven via RON)
//!
//! Content is consumed by runtime oracles and never appears in artillery state.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, ContentFactory, LoadResult, MunitionCatalog, MunitionLoader};
