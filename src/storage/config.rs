//! Application configuration.
//!
//! Loaded from `config.toml` in the platform data directory. Every section
//! has defaults, so a missing file or a partial file is fine.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::analytics::{StreakSettings, TagSpec};
use crate::club::{default_badge_tiers, BadgeTier};
use crate::geocode::provider::NOMINATIM_ENDPOINT;
use crate::geocode::RefreshSchedule;
use crate::ingest::MeetColumns;

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Application version
    pub version: String,
    /// Data directory path
    #[serde(skip)]
    pub data_dir: PathBuf,
    /// Sheet exports to read
    pub sources: SourceSettings,
    /// Meets table header names
    pub columns: MeetColumns,
    pub milestones: MilestoneSettings,
    pub streaks: StreakSettings,
    pub leaderboard: LeaderboardSettings,
    /// Tagged-row features, e.g. pints and babies
    pub tags: Vec<TagSpec>,
    pub geocode: GeocodeSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            data_dir: PathBuf::new(),
            sources: SourceSettings::default(),
            columns: MeetColumns::default(),
            milestones: MilestoneSettings::default(),
            streaks: StreakSettings::default(),
            leaderboard: LeaderboardSettings::default(),
            tags: vec![TagSpec::pints(), TagSpec::babies()],
            geocode: GeocodeSettings::default(),
        }
    }
}

impl AppConfig {
    /// Resolve a configured path against the data directory.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.data_dir.join(path)
        }
    }

    /// Reject settings that would make analytics meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.milestones.tiers.iter().any(|t| t.threshold == 0) {
            return Err(ConfigError::InvalidValue(
                "milestone thresholds must be positive".to_string(),
            ));
        }

        let mut names = HashSet::new();
        for tag in &self.tags {
            if !names.insert(tag.name.as_str()) {
                return Err(ConfigError::InvalidValue(format!(
                    "duplicate tag feature: {}",
                    tag.name
                )));
            }
        }

        if self.geocode.enabled && self.geocode.user_agent.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "geocode.user_agent is required when geocoding is enabled".to_string(),
            ));
        }

        Ok(())
    }
}

/// Locations of the two sheet exports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    /// Meets table export
    pub meets_path: PathBuf,
    /// Runners table export
    pub runners_path: PathBuf,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            meets_path: PathBuf::from("meets.json"),
            runners_path: PathBuf::from("runners.json"),
        }
    }
}

/// Milestone tiers and the size of the "latest awards" list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MilestoneSettings {
    pub tiers: Vec<BadgeTier>,
    pub recent_limit: usize,
}

impl Default for MilestoneSettings {
    fn default() -> Self {
        Self {
            tiers: default_badge_tiers(),
            recent_limit: 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeaderboardSettings {
    /// Runners below this many runs are left off
    pub min_count: u32,
}

impl Default for LeaderboardSettings {
    fn default() -> Self {
        Self { min_count: 3 }
    }
}

/// External geocoder settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocodeSettings {
    /// Query the geocoder for unknown locations
    pub enabled: bool,
    /// Sent with every request; the public service requires one
    pub user_agent: String,
    pub endpoint: String,
    /// Minimum delay between requests in milliseconds
    pub min_delay_ms: u64,
    /// Days on which lookups are allowed
    pub schedule: RefreshSchedule,
    /// SQLite cache file
    pub cache_path: PathBuf,
}

impl Default for GeocodeSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            user_agent: "runclub-geocoder".to_string(),
            endpoint: NOMINATIM_ENDPOINT.to_string(),
            min_delay_ms: 1000,
            schedule: RefreshSchedule::default(),
            cache_path: PathBuf::from("locations.db"),
        }
    }
}

/// Get the application data directory.
pub fn get_data_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "runclub", "RunClub")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Get the configuration file path.
pub fn get_config_path() -> PathBuf {
    get_data_dir().join("config.toml")
}

/// Load application configuration from the default location.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let mut config = load_config_from(&get_config_path())?;
    config.data_dir = get_data_dir();
    Ok(config)
}

/// Load configuration from a file; the file's directory becomes `data_dir`.
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    let data_dir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    if !path.exists() {
        tracing::info!("No config at {}, using defaults", path.display());
        return Ok(AppConfig {
            data_dir,
            ..Default::default()
        });
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

    let mut config: AppConfig =
        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;

    config.data_dir = data_dir;
    config.validate()?;

    Ok(config)
}

/// Save application configuration to the default location.
pub fn save_config(config: &AppConfig) -> Result<(), ConfigError> {
    save_config_to(config, &get_config_path())
}

/// Save application configuration to a file.
pub fn save_config_to(config: &AppConfig, path: &Path) -> Result<(), ConfigError> {
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

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}
