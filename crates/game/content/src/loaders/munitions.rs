//! Munition catalog loader.

use std::collections::BTreeMap;
use std::path::Path;

use barrage_core::{AmmoId, MunitionOracle, MunitionProfile};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Munition catalog structure for RON files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MunitionCatalog {
    pub munitions: Vec<MunitionProfile>,
}

impl MunitionCatalog {
    pub fn new(munitions: Vec<MunitionProfile>) -> Self {
        Self { munitions }
    }

    pub fn len(&self) -> usize {
        self.munitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.munitions.is_empty()
    }

    pub fn by_name(&self, name: &str) -> Option<&MunitionProfile> {
        self.munitions.iter().find(|profile| profile.name == name)
    }

    fn validate(&self) -> LoadResult<()> {
        let mut seen: BTreeMap<AmmoId, &str> = BTreeMap::new();
        for profile in &self.munitions {
            if let Some(previous) = seen.insert(profile.id, &profile.name) {
                anyhow::bail!(
                    "munition id {} used by both '{}' and '{}'",
                    profile.id.0,
                    previous,
                    profile.name
                );
            }
            if profile.homing && profile.missile_armor == 0 {
                anyhow::bail!("homing munition '{}' needs missile_armor", profile.name);
            }
            if profile.category.is_area_blast() && profile.rated_damage == 0 {
                anyhow::bail!("blast munition '{}' has no rated damage", profile.name);
            }
        }
        Ok(())
    }
}

impl MunitionOracle for MunitionCatalog {
    fn munition(&self, id: AmmoId) -> Option<MunitionProfile> {
        self.munitions.munition(id)
    }
}

/// Loader for the munition catalog from RON files.
pub struct MunitionLoader;

impl MunitionLoader {
    /// Load the munition catalog from a RON file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the RON file containing MunitionCatalog
    pub fn load(path: &Path) -> LoadResult<MunitionCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse and validate a catalog from RON text.
    pub fn parse(content: &str) -> LoadResult<MunitionCatalog> {
        let catalog: MunitionCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse munition catalog RON: {}", e))?;

        catalog.validate()?;
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use barrage_core::{MineKind, MunitionCategory, SmokeKind};

    use super::*;

    const CATALOG: &str = r#"
        (
            munitions: [
                (
                    id: (1),
                    name: "high explosive",
                    category: Kinetic,
                    rated_damage: 20,
                    falloff: 10,
                    radius: 1,
                ),
                (
                    id: (2),
                    name: "thunder",
                    category: Mines(kind: Vibrating(sensitivity: 20), density: 10),
                    rated_damage: 0,
                    falloff: 0,
                    radius: 0,
                ),
                (
                    id: (3),
                    name: "smoke",
                    category: Smoke(AntiSensor),
                    rated_damage: 0,
                    falloff: 0,
                    radius: 1,
                ),
                (
                    id: (4),
                    name: "homing",
                    category: Kinetic,
                    rated_damage: 20,
                    falloff: 10,
                    radius: 1,
                    homing: true,
                    missile_armor: 10,
                ),
            ],
        )
    "#;

    #[test]
    fn parses_every_category_shape() {
        let catalog = MunitionLoader::parse(CATALOG).unwrap();

        assert_eq!(catalog.len(), 4);
        assert_eq!(
            catalog.munition(AmmoId(2)).unwrap().category,
            MunitionCategory::Mines {
                kind: MineKind::Vibrating { sensitivity: 20 },
                density: 10
            }
        );
        assert_eq!(
            catalog.by_name("smoke").unwrap().category,
            MunitionCategory::Smoke(SmokeKind::AntiSensor)
        );
        let homing = catalog.munition(AmmoId(4)).unwrap();
        assert!(homing.homing);
        assert_eq!(homing.missile_armor, 10);
        assert!(!catalog.munition(AmmoId(1)).unwrap().homing);
        assert_eq!(catalog.munition(AmmoId(9)), None);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let text = r#"(munitions: [
            (id: (1), name: "a", category: Kinetic, rated_damage: 5, falloff: 5, radius: 0),
            (id: (1), name: "b", category: Incendiary, rated_damage: 0, falloff: 0, radius: 0),
        ])"#;
        let error = MunitionLoader::parse(text).unwrap_err();
        assert!(error.to_string().contains("'a' and 'b'"));
    }

    #[test]
    fn homing_without_armor_is_rejected() {
        let text = r#"(munitions: [
            (id: (1), name: "a", category: Kinetic, rated_damage: 5, falloff: 5, radius: 0, homing: true),
        ])"#;
        assert!(MunitionLoader::parse(text).is_err());
    }

    #[test]
    fn bundled_catalog_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/munitions.ron");
        let catalog = MunitionLoader::load(&path).unwrap();
        assert!(!catalog.is_empty());
    }
}
