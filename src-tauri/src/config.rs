//! Console Configuration
//!
//! Optional `console.json` in the app config dir. Every field has a default,
//! so a partial file only overrides what it names.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::domain::{DomainError, DomainResult};

pub const CONFIG_FILE_NAME: &str = "console.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// SQLite file name inside the app data dir
    pub db_file_name: String,
    /// How long the frontend waits for a mutation before reporting a failure
    pub mutation_timeout_ms: u64,
    /// Size at which the log file is rotated
    pub log_max_bytes: u64,
    /// Rotated log files kept next to the live one
    pub log_max_files: usize,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            db_file_name: "node_console.db".to_string(),
            mutation_timeout_ms: 15_000,
            log_max_bytes: 2 * 1024 * 1024,
            log_max_files: 3,
        }
    }
}

/// The part of the configuration the frontend needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    pub mutation_timeout_ms: u64,
}

impl ConsoleConfig {
    pub fn ui(&self) -> UiConfig {
        UiConfig {
            mutation_timeout_ms: self.mutation_timeout_ms,
        }
    }

    fn validate(self) -> DomainResult<Self> {
        if self.db_file_name.trim().is_empty() {
            return Err(DomainError::Validation("db_file_name must not be empty".into()));
        }
        if self.mutation_timeout_ms == 0 {
            return Err(DomainError::Validation("mutation_timeout_ms must be positive".into()));
        }
        Ok(self)
    }
}

/// Load `console.json` from `config_dir`.
///
/// A missing file yields the defaults; an unreadable or malformed one is an error.
pub fn load_config(config_dir: &Path) -> DomainResult<ConsoleConfig> {
    let path = config_dir.join(CONFIG_FILE_NAME);
    if !path.exists() {
        return Ok(ConsoleConfig::default());
    }

    let raw = std::fs::read_to_string(&path)
        .map_err(|e| DomainError::Storage(format!("failed to read {}: {}", path.display(), e)))?;
    let config: ConsoleConfig = serde_json::from_str(&raw)
        .map_err(|e| DomainError::Validation(format!("malformed {}: {}", path.display(), e)))?;
    config.validate()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_config(dir.path()).unwrap(), ConsoleConfig::default());
    }

    #[test]
    fn test_partial_file_overrides() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), r#"{ "mutation_timeout_ms": 5000 }"#).unwrap();

        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.mutation_timeout_ms, 5000);
        assert_eq!(config.db_file_name, "node_console.db");
        assert_eq!(config.ui().mutation_timeout_ms, 5000);
    }

    #[test]
    fn test_malformed_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "{ not json").unwrap();
        assert!(matches!(load_config(dir.path()), Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), r#"{ "mutation_timeout_ms": 0 }"#).unwrap();
        assert!(matches!(load_config(dir.path()), Err(DomainError::Validation(_))));
    }
}
