//! Command-line driver configuration.
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Settings for one scripted run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CliConfig {
    /// Scenario file to play.
    pub scenario: Option<PathBuf>,
    /// Replaces the seed written in the scenario.
    pub seed: Option<u64>,
    /// Print report events as JSON lines instead of text.
    pub json: bool,
}

impl CliConfig {
    /// Construct configuration from process arguments and environment variables.
    ///
    /// The first positional argument wins over `BARRAGE_SCENARIO`.
    ///
    /// Environment variables:
    /// - `BARRAGE_SCENARIO` - Scenario file to play
    /// - `BARRAGE_SEED` - Session seed override
    /// - `BARRAGE_JSON` - Emit JSON lines (default: false)
    pub fn from_env() -> Self {
        let mut config = Self::from_lookup(|key| env::var(key).ok());
        if let Some(path) = env::args_os().nth(1) {
            config.scenario = Some(PathBuf::from(path));
        }
        config
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            scenario: lookup("BARRAGE_SCENARIO").map(PathBuf::from),
            seed: parse(&lookup, "BARRAGE_SEED"),
            json: parse(&lookup, "BARRAGE_JSON").unwrap_or(false),
        }
    }
}

fn parse<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|value| value.trim().parse().ok())
}
