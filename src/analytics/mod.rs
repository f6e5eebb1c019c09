//! Attendance analytics module.
//!
//! Pure functions over an [`AttendanceStore`](crate::club::AttendanceStore):
//! - Weekly streaks (longest and current)
//! - Run-count milestones and the latest awards feed
//! - Club totals, attendance leaderboard and location frequency
//! - Tagged-row aggregation (pints, baby announcements)
//! - Per-runner wrapped summaries

pub mod aggregation;
pub mod error;
pub mod milestones;
pub mod streaks;
pub mod tagged;
pub mod wrapped;

// Re-exports for convenience
pub use aggregation::{
    attendance_leaderboard, club_distance_total, heat_points, location_stats, round_km,
    AttendanceCount, HeatPoint, LocationStat,
};
pub use error::{AnalyticsError, AnalyticsResult};
pub use milestones::{latest_awards, latest_milestones, milestones_for, Award};
pub use streaks::{
    current_streak, longest_streak, recent_attendance, StreakBoard, StreakEntry, StreakMode,
    StreakSettings, WeekPolicy,
};
pub use tagged::{aggregate_tagged, Recency, TagSpec, TagValue, TaggedEntry, TaggedSummary};
pub use wrapped::{MonthlyRuns, RunnerSummary};
