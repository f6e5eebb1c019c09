//! Unit tests for club aggregates and tagged rows

use chrono::NaiveDate;
use std::collections::BTreeMap;

use runclub::analytics::{
    aggregate_tagged, attendance_leaderboard, club_distance_total, TagSpec, WeekPolicy,
};
use runclub::club::{AttendanceStore, Meet, RunnerRegistry};

fn meet(week: f64, attendees: usize, distance: Option<f64>, pints: bool) -> Meet {
    let mut tags = BTreeMap::new();
    if pints {
        tags.insert("Pints".to_string(), "Y".to_string());
    }
    Meet {
        week: Some(week),
        date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap() + chrono::Duration::weeks(week as i64),
        runners: (0..attendees).map(|i| format!("Runner {i}")).collect(),
        location: "Arrowe Park".to_string(),
        distance_km: distance,
        tags,
    }
}

#[test]
fn test_distance_total() {
    let store = AttendanceStore::from_meets(vec![
        meet(1.0, 2, Some(5.0), false),
        meet(2.0, 3, Some(4.0), false),
        meet(3.0, 4, None, false),
    ]);
    assert_eq!(club_distance_total(&store), 22.0);
}

#[test]
fn test_pints_estimate() {
    let store = AttendanceStore::new(
        vec![
            meet(1.0, 10, Some(5.0), true),
            meet(2.0, 4, Some(5.0), false),
            meet(3.0, 5, Some(5.0), true),
        ],
        vec!["Pints".to_string()],
    );
    let summary =
        aggregate_tagged(&store, &RunnerRegistry::default(), &TagSpec::pints(), WeekPolicy::Floor)
            .unwrap();

    assert_eq!(summary.by_week.get(&1), Some(&8.0));
    assert_eq!(summary.total, 12.0);
    // Untagged week 2 does not count towards the average.
    assert_eq!(summary.active_weeks, 2);
    assert_eq!(summary.average_per_active_week, Some(6.0));
    assert_eq!(summary.peak.map(|p| p.week), Some(1));
}

#[test]
fn test_leaderboard_threshold() {
    let store = AttendanceStore::from_meets(vec![
        meet(1.0, 3, Some(5.0), false),
        meet(2.0, 2, Some(5.0), false),
        meet(3.0, 1, Some(5.0), false),
    ]);
    let board = attendance_leaderboard(&store, 2);
    let names: Vec<&str> = board.iter().map(|r| r.runner.as_str()).collect();
    assert_eq!(names, vec!["Runner 0", "Runner 1"]);
    assert_eq!(board[0].count, 3);
}
