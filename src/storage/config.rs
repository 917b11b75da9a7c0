//! Application configuration.
//!
//! Loaded from `config.toml` in the platform data directory. A missing file
//! yields defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::workouts::dates::DateLocale;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Application version
    pub version: String,
    /// Data directory path
    #[serde(skip)]
    pub data_dir: PathBuf,
    /// Import settings
    pub import: ImportSettings,
    /// Personal record settings
    pub records: RecordSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            data_dir: PathBuf::new(),
            import: ImportSettings::default(),
            records: RecordSettings::default(),
        }
    }
}

impl AppConfig {
    /// Path of the SQLite database inside the data directory.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("liftlog.db")
    }
}

/// Import-related settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportSettings {
    /// Month-name locales tried in order when parsing session times
    pub date_locales: Vec<DateLocale>,
    /// Largest accepted import file
    pub max_file_size_mb: f64,
    /// Weight outlier correction thresholds
    pub outliers: OutlierSettings,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            date_locales: DateLocale::defaults(),
            max_file_size_mb: 50.0,
            outliers: OutlierSettings::default(),
        }
    }
}

/// Thresholds for weight outlier correction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlierSettings {
    /// Positive-weight samples an exercise needs before anything is corrected
    pub min_samples: usize,
    /// A weight must exceed `median * spike_factor` to be considered
    pub spike_factor: f64,
    /// Divisor applied to a suspected weight
    pub divisor: f64,
    /// Corrected weight must exceed `median * accept_low`
    pub accept_low: f64,
    /// Corrected weight must stay below `median * accept_high`
    pub accept_high: f64,
}

impl Default for OutlierSettings {
    fn default() -> Self {
        Self {
            min_samples: 3,
            spike_factor: 5.0,
            divisor: 10.0,
            accept_low: 0.3,
            accept_high: 3.0,
        }
    }
}

/// Personal record settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordSettings {
    /// Sets with this many reps or more are not record candidates
    pub max_reps: u32,
}

impl Default for RecordSettings {
    fn default() -> Self {
        Self { max_reps: 37 }
    }
}

/// Get the application data directory.
pub fn get_data_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "liftlog", "LiftLog")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Get the configuration file path.
pub fn get_config_path() -> PathBuf {
    get_data_dir().join("config.toml")
}

/// Load application configuration from a specific file.
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    let data_dir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(get_data_dir);

    if !path.exists() {
        tracing::debug!("No config at {}, using defaults", path.display());
        return Ok(AppConfig {
            data_dir,
            ..Default::default()
        });
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

    let mut config: AppConfig =
        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;

    config.data_dir = data_dir;

    Ok(config)
}

/// Save application configuration to a specific file.
pub fn save_config_to(config: &AppConfig, path: &Path) -> Result<(), ConfigError> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
    }

    let content =
        toml::to_string_pretty(config).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| ConfigError::IoError(e.to_string()))?;

    Ok(())
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}
