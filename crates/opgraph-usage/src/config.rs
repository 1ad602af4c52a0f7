//! Configuration for usage generation.
//!
//! Holds the tool constants interpolated into the usage pattern plus the
//! locations of the operator catalog and an optional custom pattern.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{UsageError, UsageResult};

/// Environment variable that points at an alternative config file.
pub const CONFIG_PATH_ENV: &str = "GPT_CONFIG";

/// Configuration for usage generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Tool name shown in usage lines.
    #[serde(default = "default_tool_name")]
    pub tool_name: String,

    /// Default target product path.
    #[serde(default = "default_target_path")]
    pub default_target_path: String,

    /// Default output format name.
    #[serde(default = "default_format_name")]
    pub default_format_name: String,

    /// Default tile cache size (in MB).
    #[serde(default = "default_tile_cache_size_mb")]
    pub tile_cache_size_mb: u64,

    /// Default tile scheduler parallelism.
    #[serde(default = "default_tile_scheduler_parallelism")]
    pub tile_scheduler_parallelism: usize,

    /// Custom usage pattern file; the bundled pattern is used when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_pattern_path: Option<PathBuf>,

    /// Operator catalog (JSON); the caller's bundled catalog is used when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_path: Option<PathBuf>,
}

fn default_tool_name() -> String {
    "gpt".to_string()
}

fn default_target_path() -> String {
    "./target.dim".to_string()
}

fn default_format_name() -> String {
    "BEAM-DIMAP".to_string()
}

fn default_tile_cache_size_mb() -> u64 {
    512
}

fn default_tile_scheduler_parallelism() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tool_name: default_tool_name(),
            default_target_path: default_target_path(),
            default_format_name: default_format_name(),
            tile_cache_size_mb: default_tile_cache_size_mb(),
            tile_scheduler_parallelism: default_tile_scheduler_parallelism(),
            usage_pattern_path: None,
            catalog_path: None,
        }
    }
}

impl Config {
    /// Load configuration from disk with environment overrides.
    pub fn load() -> UsageResult<Self> {
        let config = match Self::config_file_path() {
            Some(path) if path.exists() => Self::load_from(&path)?,
            _ => Self::default(),
        };

        config.with_overrides(|key| std::env::var(key).ok())
    }

    /// Load configuration from a specific file.
    pub fn load_from(path: &Path) -> UsageResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Apply `GPT_*` overrides looked up through `lookup`.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> UsageResult<Self> {
        for (var, key) in [
            ("GPT_TOOL_NAME", "tool_name"),
            ("GPT_TARGET_PATH", "default_target_path"),
            ("GPT_FORMAT", "default_format_name"),
            ("GPT_TILE_CACHE_SIZE_MB", "tile_cache_size_mb"),
            ("GPT_PARALLELISM", "tile_scheduler_parallelism"),
            ("GPT_USAGE_PATTERN", "usage_pattern_path"),
            ("GPT_CATALOG", "catalog_path"),
        ] {
            if let Some(value) = lookup(var) {
                self.set(key, &value)?;
            }
        }
        Ok(self)
    }

    /// Save configuration to disk.
    pub fn save(&self) -> UsageResult<()> {
        if let Some(path) = Self::config_file_path() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let contents = serde_json::to_string_pretty(self)?;
            std::fs::write(&path, contents)?;
        }
        Ok(())
    }

    /// Get the path to the configuration file.
    pub fn config_file_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            return Some(PathBuf::from(path));
        }
        ProjectDirs::from("org", "opgraph", "gpt").map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Get a configuration value by key.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "tool_name" => Some(self.tool_name.clone()),
            "default_target_path" => Some(self.default_target_path.clone()),
            "default_format_name" => Some(self.default_format_name.clone()),
            "tile_cache_size_mb" => Some(self.tile_cache_size_mb.to_string()),
            "tile_scheduler_parallelism" => Some(self.tile_scheduler_parallelism.to_string()),
            "usage_pattern_path" => self
                .usage_pattern_path
                .as_ref()
                .map(|p| p.display().to_string()),
            "catalog_path" => self.catalog_path.as_ref().map(|p| p.display().to_string()),
            _ => None,
        }
    }

    /// Set a configuration value by key.
    pub fn set(&mut self, key: &str, value: &str) -> UsageResult<()> {
        match key {
            "tool_name" => self.tool_name = value.to_string(),
            "default_target_path" => self.default_target_path = value.to_string(),
            "default_format_name" => self.default_format_name = value.to_string(),
            "tile_cache_size_mb" => {
                self.tile_cache_size_mb = value
                    .parse()
                    .map_err(|_| UsageError::Config(format!("Invalid number: {}", value)))?;
            }
            "tile_scheduler_parallelism" => {
                self.tile_scheduler_parallelism = value
                    .parse()
                    .map_err(|_| UsageError::Config(format!("Invalid number: {}", value)))?;
            }
            "usage_pattern_path" => self.usage_pattern_path = Some(PathBuf::from(value)),
            "catalog_path" => self.catalog_path = Some(PathBuf::from(value)),
            _ => {
                return Err(UsageError::Config(format!("Unknown config key: {}", key)));
            }
        }
        Ok(())
    }

    /// All keys understood by [`get`](Self::get) and [`set`](Self::set).
    pub fn keys() -> &'static [&'static str] {
        &[
            "tool_name",
            "default_target_path",
            "default_format_name",
            "tile_cache_size_mb",
            "tile_scheduler_parallelism",
            "usage_pattern_path",
            "catalog_path",
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.tool_name, "gpt");
        assert_eq!(config.default_target_path, "./target.dim");
        assert_eq!(config.default_format_name, "BEAM-DIMAP");
        assert_eq!(config.tile_cache_size_mb, 512);
        assert!(config.tile_scheduler_parallelism >= 1);
    }

    #[test]
    fn test_get_set_round_trip() {
        let mut config = Config::default();
        for key in Config::keys() {
            config.set(key, "7").unwrap();
            assert_eq!(config.get(key).as_deref(), Some("7"), "key {key}");
        }
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = Config::default();
        assert!(matches!(
            config.set("tile_cache_size_mb", "lots"),
            Err(UsageError::Config(_))
        ));
        assert!(matches!(
            config.set("no_such_key", "1"),
            Err(UsageError::Config(_))
        ));
    }

    #[test]
    fn test_overrides_take_precedence() {
        let config = Config::default()
            .with_overrides(|key| match key {
                "GPT_TOOL_NAME" => Some("mytool".to_string()),
                "GPT_CATALOG" => Some("/tmp/ops.json".to_string()),
                _ => None,
            })
            .unwrap();

        assert_eq!(config.tool_name, "mytool");
        assert_eq!(config.catalog_path, Some(PathBuf::from("/tmp/ops.json")));
        assert_eq!(config.default_format_name, "BEAM-DIMAP");
    }

    #[test]
    fn test_partial_config_file_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{ "tool_name": "pconvert" }"#).unwrap();
        assert_eq!(config.tool_name, "pconvert");
        assert_eq!(config.tile_cache_size_mb, 512);
        assert_eq!(config.catalog_path, None);
    }
}
