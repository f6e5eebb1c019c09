//! Core types for club attendance.
//!
//! Defines meets, exploded attendance records, runners and milestone events.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single scheduled club session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meet {
    /// Week index as recorded; may be fractional or missing.
    pub week: Option<f64>,
    /// Calendar date of the meet.
    pub date: NaiveDate,
    /// Trimmed, non-empty runner names.
    pub runners: Vec<String>,
    /// Free-text venue name.
    pub location: String,
    /// Distance in kilometers, `None` when absent or unparseable.
    pub distance_km: Option<f64>,
    /// Marker columns carried per meet (non-empty values only).
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

impl Meet {
    /// Number of attending runners.
    pub fn attendee_count(&self) -> usize {
        self.runners.len()
    }

    /// Value of a marker column, if set for this meet.
    pub fn tag(&self, column: &str) -> Option<&str> {
        self.tags.get(column).map(String::as_str)
    }
}

/// One runner's attendance at one meet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub runner: String,
    pub week: Option<f64>,
    pub date: NaiveDate,
    pub location: String,
    pub distance_km: Option<f64>,
    /// Index of the originating meet in the store.
    pub meet_index: usize,
}

/// A registered club member.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Runner {
    pub name: String,
    pub capnumber: u32,
}

impl Runner {
    /// Create a runner, trimming the name.
    pub fn new(name: impl AsRef<str>, capnumber: u32) -> Self {
        Self {
            name: name.as_ref().trim().to_string(),
            capnumber,
        }
    }
}

/// Cumulative-attendance tier with its display icon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeTier {
    /// Number of runs required.
    pub threshold: u32,
    pub name: String,
    pub icon: String,
}

impl BadgeTier {
    pub fn new(threshold: u32, name: &str, icon: &str) -> Self {
        Self {
            threshold,
            name: name.to_string(),
            icon: icon.to_string(),
        }
    }
}

/// Default tiers: 5, 10, 15, 20, 25, 50 and 100 runs.
pub fn default_badge_tiers() -> Vec<BadgeTier> {
    vec![
        BadgeTier::new(5, "5 Runs", "5️⃣"),
        BadgeTier::new(10, "10 Runs", "🔟"),
        BadgeTier::new(15, "15 Runs", "⚡"),
        BadgeTier::new(20, "20 Runs", "🚀"),
        BadgeTier::new(25, "25 Runs", "🥉"),
        BadgeTier::new(50, "50 Runs", "🥈"),
        BadgeTier::new(100, "100 Runs", "🏅"),
    ]
}

/// The date a runner first reached a run-count threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilestoneEvent {
    pub runner: String,
    pub threshold: u32,
    pub date_reached: NaiveDate,
}
