//! Unit tests for milestones and badges

use chrono::{Duration, NaiveDate};
use runclub::analytics::milestones_for;
use runclub::club::BadgeTable;

fn weekly_dates(count: usize) -> Vec<NaiveDate> {
    let start = NaiveDate::from_ymd_opt(2025, 1, 3).unwrap();
    (0..count).map(|i| start + Duration::weeks(i as i64)).collect()
}

#[test]
fn test_threshold_reached_on_nth_date() {
    let dates = weekly_dates(12);
    let events = milestones_for("Alice", &dates, &[5, 10, 15]);

    assert_eq!(events.len(), 2);
    assert_eq!(events[0].threshold, 5);
    assert_eq!(events[0].date_reached, dates[4]);
    assert_eq!(events[1].threshold, 10);
    assert_eq!(events[1].date_reached, dates[9]);
    assert!(events.iter().all(|e| e.runner == "Alice"));
}

#[test]
fn test_no_events_below_first_threshold() {
    assert!(milestones_for("Bob", &weekly_dates(4), &[5]).is_empty());
    assert!(milestones_for("Bob", &[], &[5]).is_empty());
}

#[test]
fn test_badge_boundaries() {
    let badges = BadgeTable::default();
    assert_eq!(badges.badge_for(4), None);
    assert_eq!(badges.badge_for(25).map(|b| b.threshold), Some(25));
    assert_eq!(badges.badge_for(24).map(|b| b.threshold), Some(20));
    assert_eq!(badges.badge_for(1000).map(|b| b.threshold), Some(100));
}
