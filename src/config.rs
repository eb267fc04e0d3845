use crate::core::db::SqliteConnector;
use crate::core::{Result, SqldeskError};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Database file used when nothing else is configured.
pub const DEFAULT_DATABASE_PATH: &str = "database/consultas.db";

/// Top-level configuration structure parsed from a TOML file.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

/// Database-related configuration.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: PathBuf,
    /// Create and populate the sample tables on start
    pub seed: bool,
    pub foreign_keys: bool,
    pub busy_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            path: PathBuf::from(DEFAULT_DATABASE_PATH),
            seed: true,
            foreign_keys: false,
            busy_timeout_ms: 5000,
        }
    }
}

impl DatabaseConfig {
    /// Builds the connection factory every request opens through.
    pub fn connector(&self) -> SqliteConnector {
        SqliteConnector::new(&self.path)
            .with_foreign_keys(self.foreign_keys)
            .with_busy_timeout(Duration::from_millis(self.busy_timeout_ms))
    }
}

/// Logging configuration.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
        }
    }
}

/// Loads configuration from a TOML file at the given path.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .map_err(|e| SqldeskError::Config(format!("{}: {}", path.display(), e)))?;
    toml::from_str(&content).map_err(|e| SqldeskError::Config(format!("{}: {}", path.display(), e)))
}

/// Default location of the config file: `<config_dir>/sqldesk/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("sqldesk").join("config.toml"))
}

/// Resolves the configuration for this run.
///
/// An explicit path must exist. Without one, the default location is used
/// when present; otherwise built-in defaults apply.
pub fn resolve_config(explicit: Option<&Path>) -> Result<Config> {
    if let Some(path) = explicit {
        return load_config(path);
    }

    match default_config_path() {
        Some(path) if path.exists() => {
            debug!("Loading config from {}", path.display());
            load_config(path)
        }
        _ => Ok(Config::default()),
    }
}
