//! Content factory for building oracles from data files.

use std::path::{Path, PathBuf};

use barrage_core::ArtilleryConfig;

use crate::loaders::{ConfigLoader, LoadResult, MunitionCatalog, MunitionLoader};

/// Content factory that loads all artillery content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── rules.toml
/// └── munitions.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Factory for the data shipped with this crate.
    pub fn bundled() -> Self {
        Self::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("data"))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Load artillery rules from `rules.toml`, or the defaults when the file is absent.
    pub fn load_config(&self) -> LoadResult<ArtilleryConfig> {
        let path = self.data_dir.join("rules.toml");
        if !path.exists() {
            return Ok(ArtilleryConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load the munition catalog from `munitions.ron`.
    pub fn load_munitions(&self) -> LoadResult<MunitionCatalog> {
        let path = self.data_dir.join("munitions.ron");
        MunitionLoader::load(&path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_content_loads() {
        let factory = ContentFactory::bundled();
        let config = factory.load_config().unwrap();
        let munitions = factory.load_munitions().unwrap();

        assert_eq!(config.homing_radius, ArtilleryConfig::DEFAULT_HOMING_RADIUS);
        assert!(munitions.by_name("high explosive").is_some());
    }

    #[test]
    fn missing_rules_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let factory = ContentFactory::new(dir.path());

        assert_eq!(factory.load_config().unwrap(), ArtilleryConfig::default());
        assert!(factory.load_munitions().is_err());
    }
}
