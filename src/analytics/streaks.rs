//! Weekly attendance streaks.
//!
//! Streaks work on whole-week identifiers. Raw week values from the sheet may
//! be fractional (a second meet in the same week is often entered as `12.5`),
//! so every input goes through [`WeekPolicy::normalize`] first:
//! - `Floor` buckets fractional weeks into the week they fall in
//! - `IntegerOnly` discards any week that is not already a whole number
//!
//! The current streak is anchored to the club's latest week, not the
//! runner's own latest attendance.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::club::AttendanceStore;

/// How raw week values are turned into whole-week identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekPolicy {
    /// Floor fractional weeks into their containing week.
    #[default]
    Floor,
    /// Keep integral weeks only.
    IntegerOnly,
}

impl WeekPolicy {
    /// Convert one raw value, dropping anything non-finite or rejected.
    pub fn week_id(self, week: f64) -> Option<i64> {
        if !week.is_finite() {
            return None;
        }
        match self {
            WeekPolicy::Floor => Some(week.floor() as i64),
            WeekPolicy::IntegerOnly => (week.fract() == 0.0).then_some(week as i64),
        }
    }

    /// Deduplicated, ascending whole-week identifiers.
    pub fn normalize(self, weeks: &[f64]) -> BTreeSet<i64> {
        weeks.iter().filter_map(|&w| self.week_id(w)).collect()
    }
}

/// Length of the longest run of consecutive weeks.
pub fn longest_streak(weeks: &[f64], policy: WeekPolicy) -> u32 {
    let normalized = policy.normalize(weeks);

    let mut longest = 0;
    let mut current = 0;
    let mut previous: Option<i64> = None;
    for week in normalized {
        current = match previous {
            Some(p) if p.checked_add(1) == Some(week) => current + 1,
            _ => 1,
        };
        longest = longest.max(current);
        previous = Some(week);
    }
    longest
}

/// Consecutive weeks attended, counting back from the club's latest week.
pub fn current_streak(weeks: &[f64], all_weeks: &[f64], policy: WeekPolicy) -> u32 {
    let attended = policy.normalize(weeks);
    let club_weeks = policy.normalize(all_weeks);

    club_weeks
        .iter()
        .rev()
        .take_while(|week| attended.contains(week))
        .count() as u32
}

/// Attendance over the club's last `window` weeks, oldest first.
pub fn recent_attendance(
    weeks: &[f64],
    all_weeks: &[f64],
    window: usize,
    policy: WeekPolicy,
) -> Vec<(i64, bool)> {
    let attended = policy.normalize(weeks);
    let club_weeks = policy.normalize(all_weeks);
    let skip = club_weeks.len().saturating_sub(window);

    club_weeks
        .into_iter()
        .skip(skip)
        .map(|week| (week, attended.contains(&week)))
        .collect()
}

/// Latest whole week the club met, if any.
pub fn latest_week(all_weeks: &[f64], policy: WeekPolicy) -> Option<i64> {
    policy.normalize(all_weeks).last().copied()
}

/// Which streak a board ranks by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakMode {
    Current,
    AllTime,
}

/// One row of a streak table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreakEntry {
    pub runner: String,
    pub streak: u32,
}

/// Streak settings used to build display tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreakSettings {
    pub week_policy: WeekPolicy,
    /// Minimum current streak shown in the table.
    pub current_min: u32,
    /// Minimum longest streak shown in the table.
    pub longest_min: u32,
    /// Minimum current streak for the headline callout.
    pub highlight_min: u32,
    /// Number of recent club weeks in the attendance strip.
    pub recent_window: usize,
}

impl Default for StreakSettings {
    fn default() -> Self {
        Self {
            week_policy: WeekPolicy::Floor,
            current_min: 2,
            longest_min: 3,
            highlight_min: 4,
            recent_window: 6,
        }
    }
}

/// Ranked streak table for every runner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreakBoard {
    pub mode: StreakMode,
    pub entries: Vec<StreakEntry>,
}

impl StreakBoard {
    /// Compute the table for `mode`, filtered by the mode's display minimum.
    ///
    /// Sorted by streak descending, then runner name.
    pub fn build(store: &AttendanceStore, mode: StreakMode, settings: &StreakSettings) -> Self {
        let all_weeks = store.all_weeks();
        let minimum = match mode {
            StreakMode::Current => settings.current_min,
            StreakMode::AllTime => settings.longest_min,
        };

        let mut entries: Vec<StreakEntry> = store
            .runner_names()
            .into_iter()
            .filter_map(|runner| {
                let weeks = store.weeks_for(runner);
                let streak = match mode {
                    StreakMode::Current => current_streak(&weeks, &all_weeks, settings.week_policy),
                    StreakMode::AllTime => longest_streak(&weeks, settings.week_policy),
                };
                (streak >= minimum).then(|| StreakEntry {
                    runner: runner.to_string(),
                    streak,
                })
            })
            .collect();

        entries.sort_by(|a, b| b.streak.cmp(&a.streak).then_with(|| a.runner.cmp(&b.runner)));

        Self { mode, entries }
    }

    /// Top current streak worth a headline, if it reaches `highlight_min`.
    pub fn highlight(&self, settings: &StreakSettings) -> Option<&StreakEntry> {
        if self.mode != StreakMode::Current {
            return None;
        }
        self.entries
            .first()
            .filter(|e| e.streak >= settings.highlight_min)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
