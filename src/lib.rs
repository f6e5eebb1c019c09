//! RunClub - Run club attendance analytics
//!
//! Turns the club's meets and runners spreadsheets into dashboard data:
//! weekly streaks, run-count milestones and badges, leaderboards, location
//! heatmaps, tagged-row features and per-runner wrapped summaries.

pub mod analytics;
pub mod club;
pub mod dashboard;
pub mod geocode;
pub mod ingest;
pub mod storage;

// Re-export commonly used types
pub use club::{AttendanceStore, RunnerRegistry};
pub use dashboard::{ClubData, DashboardSnapshot, DataCache, FileDataSource, RunnerProfile};
pub use storage::config::AppConfig;
