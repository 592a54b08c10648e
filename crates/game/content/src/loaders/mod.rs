//! Content loaders for reading artillery data from files.
//!
//! Loaders convert RON/TOML files into `barrage-core` types and oracle
//! implementations.

pub mod config;
pub mod factory;
pub mod munitions;

pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use munitions::{MunitionCatalog, MunitionLoader};

use std::path::Path;

use anyhow::Context;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Reads a whole content file, naming the path on failure.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}
