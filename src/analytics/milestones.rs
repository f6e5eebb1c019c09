//! Run-count milestones.
//!
//! A milestone is reached on the date of a runner's Nth run. The club feed
//! shows the most recent achievements across all runners.

use chrono::NaiveDate;
use serde::Serialize;

use crate::club::{AttendanceStore, BadgeTable, BadgeTier, MilestoneEvent};

/// Milestones reached by one runner.
///
/// `dates` must be sorted ascending; `thresholds` is read in the order given.
pub fn milestones_for(runner: &str, dates: &[NaiveDate], thresholds: &[u32]) -> Vec<MilestoneEvent> {
    thresholds
        .iter()
        .filter(|&&t| t > 0)
        .filter_map(|&threshold| {
            dates
                .get(threshold as usize - 1)
                .map(|&date_reached| MilestoneEvent {
                    runner: runner.to_string(),
                    threshold,
                    date_reached,
                })
        })
        .collect()
}

/// Sorted attendance dates for one runner.
pub fn run_dates(store: &AttendanceStore, runner: &str) -> Vec<NaiveDate> {
    let mut dates: Vec<NaiveDate> = store.records_for(runner).map(|r| r.date).collect();
    dates.sort();
    dates
}

/// Every milestone event in the club.
///
/// Runners are visited by name, thresholds ascending.
pub fn all_milestones(store: &AttendanceStore, thresholds: &[u32]) -> Vec<MilestoneEvent> {
    let mut thresholds = thresholds.to_vec();
    thresholds.sort_unstable();
    thresholds.dedup();

    store
        .runner_names()
        .into_iter()
        .flat_map(|runner| milestones_for(runner, &run_dates(store, runner), &thresholds))
        .collect()
}

/// The `limit` most recent milestone events, newest first.
///
/// The sort is stable, so events on the same date keep runner-name then
/// threshold order.
pub fn latest_milestones(store: &AttendanceStore, thresholds: &[u32], limit: usize) -> Vec<MilestoneEvent> {
    let mut events = all_milestones(store, thresholds);
    events.sort_by(|a, b| b.date_reached.cmp(&a.date_reached));
    events.truncate(limit);
    events
}

/// Milestone event paired with its badge, for the awards feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Award {
    pub event: MilestoneEvent,
    pub badge: Option<BadgeTier>,
}

/// Latest awards using the badge table's thresholds.
pub fn latest_awards(store: &AttendanceStore, badges: &BadgeTable, limit: usize) -> Vec<Award> {
    latest_milestones(store, &badges.thresholds(), limit)
        .into_iter()
        .map(|event| Award {
            badge: badges.tier(event.threshold).cloned(),
            event,
        })
        .collect()
}
