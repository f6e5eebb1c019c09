//! Storage module for the location database and configuration.

pub mod config;
pub mod database;
pub mod schema;

pub use config::{
    AppConfig, ConfigError, GeocodeSettings, LeaderboardSettings, MilestoneSettings,
    SourceSettings,
};
pub use database::{Database, DatabaseError};
