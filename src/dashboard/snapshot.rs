//! One-pass dashboard computation.

use serde::Serialize;
use std::collections::BTreeMap;

use super::session::{SessionFlags, SessionId, NEW_RUNNER_WELCOMED};
use super::ClubData;
use crate::analytics::streaks::latest_week;
use crate::analytics::{
    aggregate_tagged, attendance_leaderboard, club_distance_total, heat_points, latest_awards,
    location_stats, recent_attendance, round_km, AnalyticsResult, AttendanceCount, Award,
    HeatPoint, LocationStat, RunnerSummary, StreakBoard, StreakEntry, StreakMode, TaggedSummary,
};
use crate::club::registry::registry_with_badges;
use crate::club::{BadgeTable, BadgeTier, LookupError, RegistryEntry, Runner};
use crate::geocode::CoordinateLookup;
use crate::storage::AppConfig;

/// Result of one tagged-row feature.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureOutcome {
    Ready(TaggedSummary),
    Unavailable(String),
}

impl From<AnalyticsResult<TaggedSummary>> for FeatureOutcome {
    fn from(result: AnalyticsResult<TaggedSummary>) -> Self {
        match result {
            Ok(summary) => Self::Ready(summary),
            Err(e) => Self::Unavailable(e.to_string()),
        }
    }
}

/// Rows dropped at ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DataQuality {
    pub meets_quarantined: usize,
    pub runners_quarantined: usize,
}

/// Every dashboard output for one load of the club data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub runners: Vec<RegistryEntry>,
    pub newest_runner: Option<Runner>,
    pub meet_count: usize,
    /// Rounded to one decimal place.
    pub total_km: f64,
    pub latest_awards: Vec<Award>,
    pub leaderboard: Vec<AttendanceCount>,
    pub current_streaks: StreakBoard,
    pub longest_streaks: StreakBoard,
    pub streak_highlight: Option<StreakEntry>,
    pub locations: Vec<LocationStat>,
    pub heat_points: Vec<HeatPoint>,
    /// Keyed by feature name.
    pub tagged: BTreeMap<String, FeatureOutcome>,
    pub data_quality: DataQuality,
}

impl DashboardSnapshot {
    /// Compute the snapshot. A failing tagged feature is reported in place
    /// and never fails the snapshot.
    pub fn build(data: &ClubData, config: &AppConfig, coords: &dyn CoordinateLookup) -> Self {
        let store = &data.store;
        let badges = BadgeTable::new(config.milestones.tiers.clone());
        let streaks = &config.streaks;

        let current_streaks = StreakBoard::build(store, StreakMode::Current, streaks);
        let longest_streaks = StreakBoard::build(store, StreakMode::AllTime, streaks);
        let streak_highlight = current_streaks.highlight(streaks).cloned();

        let locations = location_stats(store, coords);
        let points = heat_points(&locations);

        let tagged = config
            .tags
            .iter()
            .map(|spec| {
                let outcome = aggregate_tagged(store, &data.registry, spec, streaks.week_policy);
                if let Err(e) = &outcome {
                    tracing::warn!("Tagged feature {} unavailable: {}", spec.name, e);
                }
                (spec.name.clone(), FeatureOutcome::from(outcome))
            })
            .collect();

        Self {
            runners: registry_with_badges(&data.registry, |name| store.run_count(name), &badges),
            newest_runner: data.registry.newest().cloned(),
            meet_count: store.meets().len(),
            total_km: round_km(club_distance_total(store)),
            latest_awards: latest_awards(store, &badges, config.milestones.recent_limit),
            leaderboard: attendance_leaderboard(store, config.leaderboard.min_count),
            current_streaks,
            longest_streaks,
            streak_highlight,
            locations,
            heat_points: points,
            tagged,
            data_quality: DataQuality {
                meets_quarantined: data.meets_report.quarantined.len(),
                runners_quarantined: data.runners_report.quarantined.len(),
            },
        }
    }

    /// The newest runner, returned only the first time per session.
    pub fn welcome_newest(&self, flags: &SessionFlags, session: SessionId) -> Option<&Runner> {
        let runner = self.newest_runner.as_ref()?;
        flags.mark_once(session, NEW_RUNNER_WELCOMED).then_some(runner)
    }
}

/// A single runner's page: badge, recent attendance strip and summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunnerProfile {
    pub runner: Runner,
    pub runs: u32,
    pub badge: Option<BadgeTier>,
    /// Last few club weeks, oldest first, with whether the runner attended.
    pub recent_weeks: Vec<(i64, bool)>,
    pub latest_club_week: Option<i64>,
    /// `None` when the runner has never attended.
    pub summary: Option<RunnerSummary>,
}

impl RunnerProfile {
    /// Look up a runner from typed cap-number input and build their profile.
    pub fn lookup(data: &ClubData, input: &str, config: &AppConfig) -> Result<Self, LookupError> {
        let runner = data.registry.lookup_input(input)?.clone();
        let store = &data.store;
        let policy = config.streaks.week_policy;
        let badges = BadgeTable::new(config.milestones.tiers.clone());

        let runs = store.run_count(&runner.name);
        let all_weeks = store.all_weeks();
        let recent_weeks = recent_attendance(
            &store.weeks_for(&runner.name),
            &all_weeks,
            config.streaks.recent_window,
            policy,
        );

        Ok(Self {
            runs,
            badge: badges.badge_for(runs).cloned(),
            recent_weeks,
            latest_club_week: latest_week(&all_weeks, policy),
            summary: RunnerSummary::build(store, &runner.name, policy),
            runner,
        })
    }
}
