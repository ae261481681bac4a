//! Application configuration: fare schedule, age brackets and snapshot location.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use ::config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::fare::{AgeBracket, FareCalculator, FareSchedule};

/// Directory under the user config dir holding `config.toml`.
pub const CONFIG_DIR: &str = "subway";
/// Prefix of environment overrides, e.g. `SUBWAY_FARE__BASE_FARE=1400`.
pub const ENV_PREFIX: &str = "SUBWAY";

/// Contents written by [`ensure_default_config`].
pub const DEFAULT_CONFIG: &str = r#"# Network snapshot used when no --snapshot is given.
# snapshot_path = "network.json"

[fare]
base_fare = 1250
base_distance = 10
middle_limit = 50
middle_unit = 5
long_unit = 8
middle_fare_per_unit = 100
long_fare_per_unit = 100

[[discounts]]
min_age = 0
max_age = 6
deduction = 0
rate_percent = 100

[[discounts]]
min_age = 6
max_age = 13
deduction = 350
rate_percent = 50

[[discounts]]
min_age = 13
max_age = 19
deduction = 350
rate_percent = 20
"#;

/// Settings shared by every front end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Distance tiers of the base fare.
    pub fare: FareSchedule,
    /// Age brackets, first match wins.
    pub discounts: Vec<AgeBracket>,
    /// Default network snapshot file.
    pub snapshot_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            fare: FareSchedule::default(),
            discounts: AgeBracket::defaults(),
            snapshot_path: None,
        }
    }
}

impl AppConfig {
    /// Load from the default location, layered with environment overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(config_path())
    }

    /// Load from `path` (optional) layered with environment overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        Self::load_layered(path.as_ref(), environment())
    }

    fn load_layered(path: &Path, environment: Environment) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(environment)
            .build()
            .with_context(|| format!("failed to read config {}", path.display()))?;
        settings
            .try_deserialize()
            .with_context(|| format!("failed to parse config {}", path.display()))
    }

    /// Calculator configured with this fare schedule and these brackets.
    pub fn fare_calculator(&self) -> FareCalculator {
        FareCalculator::new(self.fare.clone(), self.discounts.clone())
    }
}

/// `SUBWAY_FARE__BASE_FARE` maps to `fare.base_fare`.
fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
}

/// Default location of the configuration file.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR)
        .join("config.toml")
}

/// Write the default configuration when none exists yet.
pub fn ensure_default_config() -> Result<()> {
    write_default_config(config_path())
}

fn write_default_config(path: PathBuf) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create config directory {}", parent.display()))?;
    }
    fs::write(&path, DEFAULT_CONFIG)
        .with_context(|| format!("failed to write config {}", path.display()))?;
    info!(path = %path.display(), "Default config written");
    Ok(())
}
