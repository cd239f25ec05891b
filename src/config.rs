//! Defaults applied to base skeletons, and where they come from.
//!
//! Resolution order: built-in defaults, then `~/.p8/dynsql.json` (or the file
//! named by `P8_DYNSQL_CONFIG`), then `P8_DYNSQL_*` environment overrides.

use crate::builder::PlaceholderFormat;
use crate::types::{DatabaseError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default config file location.
pub const DEFAULT_CONFIG_PATH: &str = "~/.p8/dynsql.json";

/// Predicates and caps every base skeleton starts with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryDefaults {
    /// Column that marks soft-deleted rows; base skeletons require it `IS NULL`.
    pub soft_delete_column: Option<String>,

    /// Row cap for list queries.
    pub default_limit: Option<u64>,

    /// Bind parameter syntax of the target driver.
    pub placeholder: PlaceholderFormat,
}

impl Default for QueryDefaults {
    fn default() -> Self {
        Self {
            soft_delete_column: Some("deleted_at".to_string()),
            default_limit: Some(500),
            placeholder: PlaceholderFormat::Question,
        }
    }
}

/// Configuration file contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base skeleton defaults.
    pub defaults: QueryDefaults,

    /// Namespace recorded on query spans (tenant or database name).
    pub namespace: Option<String>,
}

impl Config {
    /// Resolve the config file path (`P8_DYNSQL_CONFIG` or `~/.p8/dynsql.json`).
    pub fn config_file() -> Result<PathBuf> {
        let raw = std::env::var("P8_DYNSQL_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let expanded = shellexpand::full(&raw)
            .map_err(|e| DatabaseError::ConfigError(format!("Cannot expand '{}': {}", raw, e)))?;
        Ok(PathBuf::from(expanded.into_owned()))
    }

    /// Load from the default location (if present) and apply environment overrides.
    pub fn load() -> Result<Self> {
        let config_file = Self::config_file()?;

        let config = if config_file.exists() {
            Self::load_from(&config_file)?
        } else {
            debug!(path = %config_file.display(), "no config file, using defaults");
            Self::default()
        };

        config.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Load configuration from file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|e| DatabaseError::ConfigError(format!("Invalid config {}: {}", path.display(), e)))?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Save configuration to file, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| DatabaseError::ConfigError(format!("Serialize error: {}", e)))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Apply `P8_DYNSQL_*` overrides read through `lookup`.
    ///
    /// - `P8_DYNSQL_DEFAULT_LIMIT`: row cap, `0` or `none` disables it
    /// - `P8_DYNSQL_SOFT_DELETE_COLUMN`: column name, empty disables the filter
    /// - `P8_DYNSQL_PLACEHOLDER`: `question` or `dollar`
    /// - `P8_DYNSQL_NAMESPACE`: span namespace
    pub fn apply_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(limit) = lookup("P8_DYNSQL_DEFAULT_LIMIT") {
            self.defaults.default_limit = match limit.trim() {
                "" | "0" | "none" => None,
                n => Some(n.parse().map_err(|_| {
                    DatabaseError::ConfigError(format!("P8_DYNSQL_DEFAULT_LIMIT must be a number, got '{}'", n))
                })?),
            };
        }
        if let Some(column) = lookup("P8_DYNSQL_SOFT_DELETE_COLUMN") {
            let column = column.trim();
            self.defaults.soft_delete_column = (!column.is_empty()).then(|| column.to_string());
        }
        if let Some(format) = lookup("P8_DYNSQL_PLACEHOLDER") {
            self.defaults.placeholder = format.parse()?;
        }
        if let Some(namespace) = lookup("P8_DYNSQL_NAMESPACE") {
            self.namespace = Some(namespace);
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.defaults.soft_delete_column.as_deref(), Some("deleted_at"));
        assert_eq!(config.defaults.default_limit, Some(500));
        assert_eq!(config.defaults.placeholder, PlaceholderFormat::Question);
    }

    #[test]
    fn test_config_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("dynsql.json");

        let mut config = Config::default();
        config.defaults.default_limit = Some(50);
        config.defaults.placeholder = PlaceholderFormat::Dollar;
        config.namespace = Some("tenant1".to_string());
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dynsql.json");
        fs::write(&path, r#"{"defaults": {"placeholder": "dollar"}}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.defaults.placeholder, PlaceholderFormat::Dollar);
        assert_eq!(config.defaults.default_limit, Some(500));
    }

    #[test]
    fn test_invalid_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dynsql.json");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(Config::load_from(&path), Err(DatabaseError::ConfigError(_))));
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::default()
            .apply_overrides(env(&[
                ("P8_DYNSQL_DEFAULT_LIMIT", "none"),
                ("P8_DYNSQL_SOFT_DELETE_COLUMN", ""),
                ("P8_DYNSQL_PLACEHOLDER", "dollar"),
                ("P8_DYNSQL_NAMESPACE", "tenant-9"),
            ]))
            .unwrap();
        assert_eq!(config.defaults.default_limit, None);
        assert_eq!(config.defaults.soft_delete_column, None);
        assert_eq!(config.defaults.placeholder, PlaceholderFormat::Dollar);
        assert_eq!(config.namespace.as_deref(), Some("tenant-9"));

        let config = Config::default()
            .apply_overrides(env(&[("P8_DYNSQL_DEFAULT_LIMIT", "25")]))
            .unwrap();
        assert_eq!(config.defaults.default_limit, Some(25));
    }

    #[test]
    fn test_bad_env_limit() {
        let result = Config::default().apply_overrides(env(&[("P8_DYNSQL_DEFAULT_LIMIT", "lots")]));
        assert!(matches!(result, Err(DatabaseError::ConfigError(_))));
    }
}
