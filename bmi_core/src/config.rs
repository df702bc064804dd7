//! Configuration file support for bmifit.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/bmifit/config.toml`.

use crate::{Error, HeightUnit, Result, UnitSystem};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub units: UnitsConfig,

    #[serde(default)]
    pub workout: WorkoutConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Default units offered when the user does not pick any
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UnitsConfig {
    #[serde(default = "default_system")]
    pub system: String,

    #[serde(default = "default_height_unit")]
    pub height_unit: String,
}

impl Default for UnitsConfig {
    fn default() -> Self {
        Self {
            system: default_system(),
            height_unit: default_height_unit(),
        }
    }
}

impl UnitsConfig {
    pub fn system(&self) -> Result<UnitSystem> {
        self.system
            .parse()
            .map_err(|_| Error::Config(format!("unknown unit system '{}'", self.system)))
    }

    pub fn height_unit(&self) -> Result<HeightUnit> {
        self.height_unit
            .parse()
            .map_err(|_| Error::Config(format!("unknown height unit '{}'", self.height_unit)))
    }
}

/// Workout timer configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkoutConfig {
    /// Milliseconds between timer ticks; each tick counts one second down
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

impl Default for WorkoutConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("bmifit")
}

fn default_system() -> String {
    "metric".into()
}

fn default_height_unit() -> String {
    "cm".into()
}

fn default_tick_interval_ms() -> u64 {
    1000
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Check that the unit names in the file are ones we understand
    pub fn validate(&self) -> Result<()> {
        self.units.system()?;
        self.units.height_unit()?;
        Ok(())
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));
        base.join("bmifit").join("config.toml")
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.units.system().unwrap(), UnitSystem::Metric);
        assert_eq!(config.units.height_unit().unwrap(), HeightUnit::Centimeters);
        assert_eq!(config.workout.tick_interval_ms, 1000);
        assert!(config.data.data_dir.ends_with("bmifit"));
    }

    #[test]
    fn test_config_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");

        let mut config = Config::default();
        config.units.system = "imperial".into();
        config.units.height_unit = "in".into();
        config.save_to(&path).unwrap();

        let parsed = Config::load_from(&path).unwrap();
        assert_eq!(parsed.units.system().unwrap(), UnitSystem::Imperial);
        assert_eq!(parsed.units.height_unit().unwrap(), HeightUnit::Inches);
        assert_eq!(parsed.data.data_dir, config.data.data_dir);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[workout]
tick_interval_ms = 250
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.workout.tick_interval_ms, 250);
        assert_eq!(config.units.system, "metric"); // default
    }

    #[test]
    fn test_unknown_units_rejected_on_load() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[units]\nsystem = \"cubits\"\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
