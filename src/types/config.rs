//! Configuration for popcache.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::PopcacheResult;

/// Default configuration file name.
pub const CONFIG_FILE: &str = "popcache.toml";

/// Main configuration for popcache.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// LRU cache settings.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Popularity gate settings.
    #[serde(default)]
    pub popularity: PopularityConfig,
}

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GeneralConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log format (text, json).
    #[serde(default = "default_log_format")]
    pub log_format: LogFormat,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> LogFormat {
    LogFormat::Text
}

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human readable lines.
    Text,
    /// One JSON object per event.
    Json,
}

/// LRU cache settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of entries. Zero disables retention.
    #[serde(default = "default_cache_capacity")]
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: default_cache_capacity(),
        }
    }
}

fn default_cache_capacity() -> usize {
    1000
}

/// Popularity gate settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PopularityConfig {
    /// Use count at which an object gets saved.
    #[serde(default = "default_min_uses")]
    pub min_uses: u64,

    /// How many object ids the use-count tracker remembers.
    #[serde(default = "default_tracker_capacity")]
    pub tracker_capacity: usize,
}

impl Default for PopularityConfig {
    fn default() -> Self {
        Self {
            min_uses: default_min_uses(),
            tracker_capacity: default_tracker_capacity(),
        }
    }
}

fn default_min_uses() -> u64 {
    3
}

fn default_tracker_capacity() -> usize {
    1000
}

impl Config {
    /// Loads configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> PopcacheResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Saves configuration to a TOML file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> PopcacheResult<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Creates default configuration.
    pub fn default_config() -> Self {
        Self {
            general: GeneralConfig::default(),
            cache: CacheConfig::default(),
            popularity: PopularityConfig::default(),
        }
    }

    /// Loads `path` when it exists, otherwise returns the defaults.
    ///
    /// A file that exists but fails to parse is still an error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> PopcacheResult<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default_config())
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default_config();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.general.log_format, LogFormat::Text);
        assert_eq!(config.cache.capacity, 1000);
        assert_eq!(config.popularity.min_uses, 3);
        assert_eq!(config.popularity.tracker_capacity, 1000);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [cache]
            capacity = 16

            [general]
            log_format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.cache.capacity, 16);
        assert_eq!(config.general.log_format, LogFormat::Json);
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.popularity, PopularityConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);

        let mut config = Config::default_config();
        config.cache.capacity = 0;
        config.popularity.min_uses = 7;
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let result = Config::load(dir.path().join("missing.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_or_default_without_file() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_or_default(dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config, Config::default_config());
    }

    #[test]
    fn test_load_or_default_reads_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[cache]\ncapacity = 5\n").unwrap();

        let config = Config::load_or_default(&path).unwrap();
        assert_eq!(config.cache.capacity, 5);

        std::fs::write(&path, "[cache\n").unwrap();
        assert!(Config::load_or_default(&path).is_err());
    }
}
