//! # Dashboard Configuration
//!
//! Settings loaded once at startup.
//!
//! ## Sources (later overrides earlier)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  1. Defaults (this file)                                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  2. Config file                                                        │
//! │     ~/.config/ventes/ventes.toml (Linux)                               │
//! │     ~/Library/Application Support/com.fagafijo.ventes/ventes.toml      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  3. Environment (VENTES_DB_PATH, VENTES_COLLECTION, VENTES_YEAR,       │
//! │     VENTES_REPORT_DIR)                                                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example Config File
//! ```toml
//! [database]
//! path = "/var/lib/ventes/ventes.db"
//! max_connections = 5
//!
//! [store]
//! collection = "ventes/"
//!
//! [tracking]
//! year = 2025
//!
//! [report]
//! title = "FAGAFIJO"
//! file_prefix = "rapport-ventes-quotidiennes"
//! output_dir = "."
//!
//! [logging]
//! filter = "info,ventes=debug,sqlx=warn"
//! ```

use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};
use ventes_core::DEFAULT_COLLECTION;
use ventes_report::ReportOptions;

/// Default tracing filter when neither `RUST_LOG` nor the file sets one.
pub const DEFAULT_LOG_FILTER: &str = "info,ventes=debug,sqlx=warn";

/// Config file name inside the platform config directory.
const CONFIG_FILE_NAME: &str = "ventes.toml";

/// Database file name inside the platform data directory.
const DATABASE_FILE_NAME: &str = "ventes.db";

// =============================================================================
// Errors
// =============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Sections
// =============================================================================

/// `[database]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// SQLite file.
    pub path: PathBuf,

    /// Pool size.
    pub max_connections: u32,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: default_database_path(),
            max_connections: 5,
        }
    }
}

/// `[store]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Collection path holding the date-keyed records.
    pub collection: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            collection: DEFAULT_COLLECTION.to_string(),
        }
    }
}

/// `[tracking]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingSettings {
    /// Year of the monthly and quarterly views. `None` means the current
    /// calendar year at startup.
    pub year: Option<i32>,
}

/// `[report]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    pub title: String,
    pub file_prefix: String,
    pub output_dir: PathBuf,
}

impl Default for ReportSettings {
    fn default() -> Self {
        let defaults = ReportOptions::default();
        ReportSettings {
            title: defaults.title,
            file_prefix: defaults.file_prefix,
            output_dir: defaults.output_dir,
        }
    }
}

impl ReportSettings {
    /// Options handed to the exporter.
    pub fn to_options(&self) -> ReportOptions {
        ReportOptions {
            title: self.title.clone(),
            file_prefix: self.file_prefix.clone(),
            output_dir: self.output_dir.clone(),
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `EnvFilter` directives, used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

// =============================================================================
// App Config
// =============================================================================

/// Complete dashboard configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub store: StoreSettings,

    #[serde(default)]
    pub tracking: TrackingSettings,

    #[serde(default)]
    pub report: ReportSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// An explicit `config_path` must exist; the default path is optional.
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = match config_path {
            Some(path) => Self::from_file(&path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => {
                    debug!("No config file found, using defaults");
                    Self::default()
                }
            },
        };

        config.apply_overrides(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    /// Reads a TOML file.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        info!(path = %path.display(), "Loading config file");
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses TOML text. Missing sections and fields keep their defaults.
    pub fn from_toml_str(contents: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Applies `VENTES_*` overrides read through `lookup`.
    ///
    /// A `VENTES_YEAR` that does not parse is ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("VENTES_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = PathBuf::from(path);
        }

        if let Some(collection) = lookup("VENTES_COLLECTION") {
            self.store.collection = collection;
        }

        if let Some(year) = lookup("VENTES_YEAR") {
            match year.trim().parse::<i32>() {
                Ok(y) => self.tracking.year = Some(y),
                Err(_) => tracing::warn!(value = %year, "Ignoring invalid VENTES_YEAR"),
            }
        }

        if let Some(dir) = lookup("VENTES_REPORT_DIR") {
            self.report.output_dir = PathBuf::from(dir);
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.store.collection.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "store.collection must not be empty".into(),
            ));
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.max_connections must be greater than 0".into(),
            ));
        }

        if let Some(year) = self.tracking.year {
            if !(1970..=9999).contains(&year) {
                return Err(ConfigError::Invalid(format!(
                    "tracking.year must be between 1970 and 9999, got {}",
                    year
                )));
            }
        }

        Ok(())
    }

    /// The tracked year: configured, else the year of `today`.
    pub fn tracked_year(&self, today: NaiveDate) -> i32 {
        self.tracking.year.unwrap_or_else(|| today.year())
    }
}

/// Platform config file path, if a home directory is known.
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "fagafijo", "ventes")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

/// Platform database path, falling back to the working directory.
///
/// ## Platform-Specific Paths
/// - **macOS**: `~/Library/Application Support/com.fagafijo.ventes/ventes.db`
/// - **Windows**: `%APPDATA%\fagafijo\ventes\data\ventes.db`
/// - **Linux**: `~/.local/share/ventes/ventes.db`
pub fn default_database_path() -> PathBuf {
    ProjectDirs::from("com", "fagafijo", "ventes")
        .map(|dirs| dirs.data_dir().join(DATABASE_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(DATABASE_FILE_NAME))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.store.collection, "ventes/");
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.report.title, "FAGAFIJO");
        assert_eq!(config.report.file_prefix, "rapport-ventes-quotidiennes");
        assert_eq!(config.logging.filter, DEFAULT_LOG_FILTER);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [tracking]
            year = 2024

            [report]
            output_dir = "/tmp/rapports"
            "#,
        )
        .unwrap();

        assert_eq!(config.tracking.year, Some(2024));
        assert_eq!(config.report.output_dir, PathBuf::from("/tmp/rapports"));
        assert_eq!(config.report.title, "FAGAFIJO");
        assert_eq!(config.store.collection, "ventes/");
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("VENTES_DB_PATH", "/data/ventes.db"),
            ("VENTES_COLLECTION", "boutique/"),
            ("VENTES_YEAR", "2023"),
            ("VENTES_REPORT_DIR", "/out"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config.apply_overrides(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(config.database.path, PathBuf::from("/data/ventes.db"));
        assert_eq!(config.store.collection, "boutique/");
        assert_eq!(config.tracking.year, Some(2023));
        assert_eq!(config.report.output_dir, PathBuf::from("/out"));
    }

    #[test]
    fn test_bad_year_override_is_ignored() {
        let mut config = AppConfig::default();
        config.apply_overrides(|name| (name == "VENTES_YEAR").then(|| "vingt".to_string()));
        assert_eq!(config.tracking.year, None);
    }

    #[test]
    fn test_validation() {
        let mut config = AppConfig::default();
        config.store.collection = "  ".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = AppConfig::default();
        config.database.max_connections = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.tracking.year = Some(1900);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_tracked_year_defaults_to_today() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let mut config = AppConfig::default();
        assert_eq!(config.tracked_year(today), 2026);

        config.tracking.year = Some(2025);
        assert_eq!(config.tracked_year(today), 2025);
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ventes.toml");
        std::fs::write(&path, "[store]\ncollection = \"test/\"\n").unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.store.collection, "test/");

        let err = AppConfig::from_toml_str("[store\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
