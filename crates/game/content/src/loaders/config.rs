//! Artillery rules loader.

use std::path::Path;

use barrage_core::ArtilleryConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for artillery rules from TOML files.
///
/// Every field is optional; anything left out keeps the tabletop default.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load rules from a TOML file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the TOML file containing ArtilleryConfig
    pub fn load(path: &Path) -> LoadResult<ArtilleryConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse and validate rules from TOML text.
    pub fn parse(content: &str) -> LoadResult<ArtilleryConfig> {
        let config: ArtilleryConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse artillery config TOML: {}", e))?;

        validate(&config)?;
        Ok(config)
    }
}

fn validate(config: &ArtilleryConfig) -> LoadResult<()> {
    if config.indirect_scatter.divisor == 0 || config.direct_scatter.divisor == 0 {
        anyhow::bail!("scatter divisor must be at least 1");
    }
    if config.single_intercept_chance > 100 {
        anyhow::bail!(
            "single_intercept_chance is a percentage, got {}",
            config.single_intercept_chance
        );
    }
    let rolls = ArtilleryConfig::MIN_ROLL as u32..=ArtilleryConfig::MAX_ROLL as u32;
    if !rolls.contains(&config.minefield_clear_target) {
        anyhow::bail!(
            "minefield_clear_target {} is not a 2d6 result",
            config.minefield_clear_target
        );
    }
    if config.batch_max_penalty < 0 {
        anyhow::bail!("batch_max_penalty cannot be negative");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use barrage_core::ScatterRule;

    use super::*;

    #[test]
    fn empty_file_keeps_defaults() {
        let config = ConfigLoader::parse("").unwrap();
        assert_eq!(config, ArtilleryConfig::default());
    }

    #[test]
    fn overrides_are_applied() {
        let config = ConfigLoader::parse(
            r#"
            use_artillery_skill = true
            homing_radius = 5

            [direct_scatter]
            per_margin = 1
            divisor = 3
            "#,
        )
        .unwrap();

        assert!(config.use_artillery_skill);
        assert_eq!(config.homing_radius, 5);
        assert_eq!(
            config.direct_scatter,
            ScatterRule {
                per_margin: 1,
                divisor: 3
            }
        );
        assert_eq!(config.indirect_scatter, ScatterRule::INDIRECT);
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert!(ConfigLoader::parse("single_intercept_chance = 140").is_err());
        assert!(ConfigLoader::parse("minefield_clear_target = 13").is_err());
        assert!(ConfigLoader::parse("[indirect_scatter]\nper_margin = 1\ndivisor = 0").is_err());
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "convergence_step = 2").unwrap();

        let config = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(config.convergence_step, 2);
    }

    #[test]
    fn missing_file_names_the_path() {
        let error = ConfigLoader::load(Path::new("/nonexistent/rules.toml")).unwrap_err();
        assert!(error.to_string().contains("/nonexistent/rules.toml"));
    }
}
