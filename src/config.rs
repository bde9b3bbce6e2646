//! Configuration management with validation and defaults
//!
//! Table settings are loaded from an optional TOML file, then overridden by
//! `ROYALE_*` environment variables, then validated. The payout table and the
//! history cap are fixed by the rules of the game and are not configurable.

use crate::errors::{ConfigurationError, RoyaleResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::time::Duration;

/// Largest starting bankroll. A straight bet of the whole balance pays 36x,
/// which must still fit in a u64.
pub const MAX_STARTING_BALANCE: u64 = u64::MAX / 36;

/// Complete game configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RoyaleConfig {
    pub table: TableConfig,
    pub spin: SpinConfig,
    pub rng: RngConfig,
}

/// Table configuration: bankroll, chips and greeting
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TableConfig {
    pub starting_balance: u64,
    pub welcome_message: String,
    /// Chip values offered by the front end. The engine itself accepts any
    /// positive amount.
    pub chip_denominations: Vec<u64>,
    pub default_chip: u64,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            starting_balance: 1000,
            welcome_message: "Welcome to Monte Carlo Royale. Place your bets!".to_string(),
            chip_denominations: vec![5, 10, 25, 50, 100, 500],
            default_chip: 10,
        }
    }
}

/// Spin staging configuration
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SpinConfig {
    /// Delay between an accepted spin and its resolution
    pub resolve_delay_ms: u64,
    /// Whole turns added to the wheel rotation on every spin
    pub full_rotations: u32,
}

impl Default for SpinConfig {
    fn default() -> Self {
        Self {
            resolve_delay_ms: 6000,
            full_rotations: 5,
        }
    }
}

impl SpinConfig {
    pub fn resolve_delay(&self) -> Duration {
        Duration::from_millis(self.resolve_delay_ms)
    }
}

/// Outcome generator configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RngConfig {
    /// Fixed seed for reproducible sessions; OS entropy when absent
    pub seed: Option<u64>,
}

/// Configuration loader with environment variable support
#[derive(Default)]
pub struct ConfigLoader {
    config_path: Option<String>,
}

impl ConfigLoader {
    /// Create a new config loader
    pub fn new() -> Self {
        Self { config_path: None }
    }

    /// Set the configuration file path
    pub fn with_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_string_lossy().to_string());
        self
    }

    /// Load configuration from file and environment variables
    pub fn load(&self) -> RoyaleResult<RoyaleConfig> {
        let mut config = if let Some(ref path) = self.config_path {
            self.load_from_file(path)?
        } else {
            RoyaleConfig::default()
        };

        self.apply_env_overrides(&mut config)?;
        self.validate(&config)?;

        Ok(config)
    }

    /// Load configuration from TOML file
    fn load_from_file(&self, path: &str) -> RoyaleResult<RoyaleConfig> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigurationError::LoadFailed(format!("Failed to read {}: {}", path, e)))?;

        toml::from_str(&content)
            .map_err(|e| ConfigurationError::LoadFailed(format!("Failed to parse TOML: {}", e)).into())
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&self, config: &mut RoyaleConfig) -> RoyaleResult<()> {
        if let Ok(balance) = env::var("ROYALE_STARTING_BALANCE") {
            config.table.starting_balance = balance.parse()
                .map_err(|_| ConfigurationError::InvalidValue {
                    field: "ROYALE_STARTING_BALANCE".to_string(),
                    value: balance,
                    reason: "Invalid chip count".to_string(),
                })?;
        }

        if let Ok(delay) = env::var("ROYALE_RESOLVE_DELAY_MS") {
            config.spin.resolve_delay_ms = delay.parse()
                .map_err(|_| ConfigurationError::InvalidValue {
                    field: "ROYALE_RESOLVE_DELAY_MS".to_string(),
                    value: delay,
                    reason: "Invalid delay value".to_string(),
                })?;
        }

        if let Ok(seed) = env::var("ROYALE_RNG_SEED") {
            config.rng.seed = Some(seed.parse()
                .map_err(|_| ConfigurationError::InvalidValue {
                    field: "ROYALE_RNG_SEED".to_string(),
                    value: seed,
                    reason: "Invalid seed".to_string(),
                })?);
        }

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self, config: &RoyaleConfig) -> RoyaleResult<()> {
        let table = &config.table;

        if table.chip_denominations.is_empty() {
            return Err(ConfigurationError::MissingRequired("table.chip_denominations".to_string()).into());
        }

        if table.chip_denominations.contains(&0) {
            return Err(ConfigurationError::InvalidValue {
                field: "table.chip_denominations".to_string(),
                value: format!("{:?}", table.chip_denominations),
                reason: "Chip values must be positive".to_string(),
            }.into());
        }

        if !table.chip_denominations.contains(&table.default_chip) {
            return Err(ConfigurationError::InvalidValue {
                field: "table.default_chip".to_string(),
                value: table.default_chip.to_string(),
                reason: "Default chip must be one of the chip denominations".to_string(),
            }.into());
        }

        if table.starting_balance > MAX_STARTING_BALANCE {
            return Err(ConfigurationError::InvalidValue {
                field: "table.starting_balance".to_string(),
                value: table.starting_balance.to_string(),
                reason: format!("Must be at most {}", MAX_STARTING_BALANCE),
            }.into());
        }

        if config.spin.full_rotations == 0 {
            return Err(ConfigurationError::InvalidValue {
                field: "spin.full_rotations".to_string(),
                value: "0".to_string(),
                reason: "Wheel must turn at least once".to_string(),
            }.into());
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, config: &RoyaleConfig, path: &str) -> RoyaleResult<()> {
        let toml_string = toml::to_string_pretty(config)
            .map_err(|e| ConfigurationError::SaveFailed(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, toml_string)
            .map_err(|e| ConfigurationError::SaveFailed(format!("Failed to write to {}: {}", path, e)).into())
    }
}

/// Builder pattern for creating configurations
#[derive(Default)]
pub struct ConfigBuilder {
    config: RoyaleConfig,
}

impl ConfigBuilder {
    /// Create a new config builder with defaults
    pub fn new() -> Self {
        Self {
            config: RoyaleConfig::default(),
        }
    }

    pub fn starting_balance(mut self, balance: u64) -> Self {
        self.config.table.starting_balance = balance;
        self
    }

    pub fn welcome_message(mut self, message: impl Into<String>) -> Self {
        self.config.table.welcome_message = message.into();
        self
    }

    pub fn resolve_delay_ms(mut self, delay_ms: u64) -> Self {
        self.config.spin.resolve_delay_ms = delay_ms;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.rng.seed = Some(seed);
        self
    }

    /// Build the final configuration
    pub fn build(self) -> RoyaleConfig {
        self.config
    }
}

/// Generate a sample configuration file
pub fn generate_sample_config(path: &str) -> RoyaleResult<()> {
    let config = RoyaleConfig::default();
    ConfigLoader::new().save(&config, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = RoyaleConfig::default();
        assert_eq!(config.table.starting_balance, 1000);
        assert_eq!(config.table.default_chip, 10);
        assert_eq!(config.spin.resolve_delay_ms, 6000);
        assert!(config.rng.seed.is_none());
    }

    #[test]
    fn test_config_validation() {
        let loader = ConfigLoader::new();
        let mut config = RoyaleConfig::default();

        assert!(loader.validate(&config).is_ok());

        config.table.default_chip = 7;
        assert!(loader.validate(&config).is_err());

        config.table.default_chip = 10;
        config.spin.full_rotations = 0;
        assert!(loader.validate(&config).is_err());

        config.spin.full_rotations = 5;
        config.table.chip_denominations = vec![];
        assert!(loader.validate(&config).is_err());
    }

    #[test]
    fn test_starting_balance_cap() {
        let loader = ConfigLoader::new();

        let config = ConfigBuilder::new().starting_balance(MAX_STARTING_BALANCE).build();
        assert!(loader.validate(&config).is_ok());
        assert!(MAX_STARTING_BALANCE.checked_mul(36).is_some());

        let config = ConfigBuilder::new().starting_balance(MAX_STARTING_BALANCE + 1).build();
        assert!(loader.validate(&config).is_err());
    }

    #[test]
    fn test_config_builder() {
        let config = ConfigBuilder::new()
            .starting_balance(250)
            .resolve_delay_ms(0)
            .seed(42)
            .build();

        assert_eq!(config.table.starting_balance, 250);
        assert_eq!(config.spin.resolve_delay_ms, 0);
        assert_eq!(config.rng.seed, Some(42));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: RoyaleConfig = toml::from_str("[table]\nstarting_balance = 50\n").unwrap();
        assert_eq!(config.table.starting_balance, 50);
        assert_eq!(config.table.default_chip, 10);
        assert_eq!(config.spin.full_rotations, 5);
    }

    #[test]
    fn test_save_and_load_config() -> RoyaleResult<()> {
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path().to_str().unwrap();

        let original_config = ConfigBuilder::new().starting_balance(777).build();

        let loader = ConfigLoader::new();
        loader.save(&original_config, path)?;

        let loaded_config = ConfigLoader::new().with_path(path).load_from_file(path)?;
        assert_eq!(loaded_config, original_config);

        Ok(())
    }

    #[test]
    fn test_missing_file_fails() {
        let result = ConfigLoader::new()
            .with_path("/definitely/not/here/royale.toml")
            .load();
        assert!(result.is_err());
    }
}
