//! Configuration system for the simulation.
//!
//! Supports YAML configuration files with defaults matching the classic
//! 40x40 world.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub world: WorldConfig,
    pub animals: AnimalConfig,
    pub vegetation: VegetationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// World/grid configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Side length of the square grid
    pub dimension: usize,
    /// Number of animals created by genesis
    pub initial_population: usize,
    /// Turns between generation rollovers
    pub turns_per_generation: u64,
}

/// Animal behaviour configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimalConfig {
    /// Maximum feeding outcomes kept in an animal's history
    pub history_capacity: usize,
    /// Number of recent outcomes used for the satiety ratio
    pub satiety_window: usize,
    /// Probability a child takes a trait from a parent instead of its own roll
    pub inherit_probability: f64,
}

/// Vegetation cohort configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VegetationConfig {
    /// Lower bound of the per-generation cohort size
    pub min_count: usize,
    /// Upper bound of the cohort size (always used for generation 1)
    pub max_count: usize,
}

/// Logging, rendering and checkpoint configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Turns between checkpoints
    pub checkpoint_interval: u64,
    /// Turns between stats history records
    pub stats_interval: u64,
    /// The map is drawn only while the population is below this
    pub map_population_threshold: usize,
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            animals: AnimalConfig::default(),
            vegetation: VegetationConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            dimension: 40,
            initial_population: 10,
            turns_per_generation: 150,
        }
    }
}

impl Default for AnimalConfig {
    fn default() -> Self {
        Self {
            history_capacity: 100,
            satiety_window: 10,
            inherit_probability: 0.6,
        }
    }
}

impl Default for VegetationConfig {
    fn default() -> Self {
        Self {
            min_count: 200,
            max_count: 200,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            checkpoint_interval: 10,
            stats_interval: 50,
            map_population_threshold: 200,
            log_level: "info".to_string(),
        }
    }
}

/// Errors raised while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(msg.to_string()));

        if self.world.dimension < 2 || self.world.dimension > 255 {
            return invalid("dimension must be between 2 and 255");
        }
        if self.world.initial_population > self.world.dimension * self.world.dimension {
            return invalid("initial_population cannot exceed the number of grid cells");
        }
        if self.world.turns_per_generation == 0 {
            return invalid("turns_per_generation must be > 0");
        }
        if self.animals.history_capacity == 0 || self.animals.satiety_window == 0 {
            return invalid("history_capacity and satiety_window must be > 0");
        }
        if !(0.0..=1.0).contains(&self.animals.inherit_probability) {
            return invalid("inherit_probability must be within [0, 1]");
        }
        if self.vegetation.min_count > self.vegetation.max_count {
            return invalid("vegetation min_count cannot exceed max_count");
        }
        if self.logging.checkpoint_interval == 0 || self.logging.stats_interval == 0 {
            return invalid("checkpoint_interval and stats_interval must be > 0");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let loaded: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_overcrowded_genesis_rejected() {
        let mut config = Config::default();
        config.world.dimension = 3;
        config.world.initial_population = 10;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_inverted_vegetation_bounds_rejected() {
        let mut config = Config::default();
        config.vegetation.min_count = 300;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_logging_section_uses_defaults() {
        let yaml = "world:\n  dimension: 20\n  initial_population: 5\n  turns_per_generation: 50\n\
                    animals:\n  history_capacity: 100\n  satiety_window: 10\n  inherit_probability: 0.6\n\
                    vegetation:\n  min_count: 50\n  max_count: 80\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.logging, LoggingConfig::default());
        assert!(config.validate().is_ok());
    }
}
