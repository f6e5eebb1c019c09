//! Per-runner "wrapped" summary.
//!
//! Everything a runner sees after looking themselves up by cap-number, plus
//! the plain-text report they can download.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use super::aggregation::round_km;
use super::milestones::run_dates;
use super::streaks::{current_streak, longest_streak, WeekPolicy};
use crate::club::AttendanceStore;

/// Runs in one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthlyRuns {
    pub year: i32,
    pub month: u32,
    pub runs: u32,
}

impl MonthlyRuns {
    /// `MM-YYYY`, as shown in the report.
    pub fn label(&self) -> String {
        format!("{:02}-{}", self.month, self.year)
    }
}

/// Summary statistics for one runner.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunnerSummary {
    pub runner: String,
    pub total_runs: u32,
    pub unique_locations: usize,
    pub first_run: NaiveDate,
    pub last_run: NaiveDate,
    pub most_common_location: String,
    /// Rounded to one decimal place.
    pub total_km: f64,
    pub longest_streak: u32,
    pub current_streak: u32,
    /// Chronological.
    pub monthly: Vec<MonthlyRuns>,
}

impl RunnerSummary {
    /// Build a summary, or `None` if the runner has no attendance.
    pub fn build(store: &AttendanceStore, runner: &str, policy: WeekPolicy) -> Option<Self> {
        let dates = run_dates(store, runner);
        let first_run = *dates.first()?;
        let last_run = *dates.last()?;

        // Location visit counts, remembering the first visit for tie-breaks.
        let mut visits: HashMap<&str, (u32, NaiveDate)> = HashMap::new();
        let mut total_km = 0.0;
        for record in store.records_for(runner) {
            let entry = visits.entry(record.location.as_str()).or_insert((0, record.date));
            entry.0 += 1;
            entry.1 = entry.1.min(record.date);
            if let Some(d) = record.distance_km.filter(|d| d.is_finite()) {
                total_km += d;
            }
        }
        let most_common_location = visits
            .iter()
            .max_by(|a, b| {
                a.1 .0
                    .cmp(&b.1 .0)
                    .then_with(|| b.1 .1.cmp(&a.1 .1))
                    .then_with(|| b.0.cmp(a.0))
            })
            .map(|(loc, _)| loc.to_string())
            .unwrap_or_default();

        let mut months: BTreeMap<(i32, u32), u32> = BTreeMap::new();
        for date in &dates {
            *months.entry((date.year(), date.month())).or_insert(0) += 1;
        }
        let monthly = months
            .into_iter()
            .map(|((year, month), runs)| MonthlyRuns { year, month, runs })
            .collect();

        let weeks = store.weeks_for(runner);
        let all_weeks = store.all_weeks();

        Some(Self {
            runner: runner.to_string(),
            total_runs: dates.len() as u32,
            unique_locations: visits.len(),
            first_run,
            last_run,
            most_common_location,
            total_km: round_km(total_km),
            longest_streak: longest_streak(&weeks, policy),
            current_streak: current_streak(&weeks, &all_weeks, policy),
            monthly,
        })
    }

    /// File name offered for the downloadable report.
    pub fn file_name(&self) -> String {
        format!("{}_wrapped.txt", self.runner)
    }

    /// Plain-text report.
    pub fn render_text(&self) -> String {
        let mut out = format!(
            "Runner Unwrapped for {}\n\n\
             Total runs: {}\n\
             Unique locations: {}\n\
             Longest streak: {} consecutive weeks\n\
             Current streak: {} weeks\n\
             Total distance: {:.1} km\n\
             Most common location: {}\n\
             First run: {}\n\
             Last run: {}\n\n\
             Runs per month:\n",
            self.runner,
            self.total_runs,
            self.unique_locations,
            self.longest_streak,
            self.current_streak,
            self.total_km,
            self.most_common_location,
            self.first_run.format("%d/%m/%Y"),
            self.last_run.format("%d/%m/%Y"),
        );
        for month in &self.monthly {
            out.push_str(&format!("{}  {}\n", month.label(), month.runs));
        }
        out
    }
}
