//! Configuration for the admin tooling.
//!
//! Loaded from a TOML file; every field has a default so a missing or
//! partial file still yields a usable configuration. `seed_defaults` is
//! consumed exactly once, when the store bootstraps an empty database.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Path to the SQLite database file
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
    /// Directory holding user-uploaded attachments (cleared by reset)
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,
    /// Insert default lookup rows when bootstrapping an empty database
    #[serde(default)]
    pub seed_defaults: bool,
}

fn default_database_path() -> PathBuf {
    PathBuf::from("warehouse.db")
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("uploads")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            upload_dir: default_upload_dir(),
            seed_defaults: false,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Cannot read {}: {}", path.display(), e)))?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Cannot parse {}: {}", path.display(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.database_path, PathBuf::from("warehouse.db"));
        assert_eq!(config.upload_dir, PathBuf::from("uploads"));
        assert!(!config.seed_defaults);
    }

    #[test]
    fn test_partial_file() {
        let config: Config = toml::from_str("seed_defaults = true").unwrap();
        assert!(config.seed_defaults);
        assert_eq!(config.database_path, PathBuf::from("warehouse.db"));
    }
}
