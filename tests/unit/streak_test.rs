//! Unit tests for weekly streaks

use runclub::analytics::streaks::latest_week;
use runclub::analytics::{current_streak, longest_streak, recent_attendance, WeekPolicy};

fn club_weeks(last: u32) -> Vec<f64> {
    (1..=last).map(f64::from).collect()
}

#[test]
fn test_longest_streak_examples() {
    let policy = WeekPolicy::default();
    assert_eq!(longest_streak(&[], policy), 0);
    assert_eq!(longest_streak(&[3.0], policy), 1);
    assert_eq!(longest_streak(&[1.0, 2.0, 3.0, 5.0, 6.0], policy), 3);
    assert_eq!(longest_streak(&[1.0, 2.0, 2.0, 3.0], policy), 3);
}

#[test]
fn test_longest_streak_ignores_order() {
    let policy = WeekPolicy::Floor;
    assert_eq!(longest_streak(&[6.0, 1.0, 5.0, 3.0, 2.0], policy), 3);
}

#[test]
fn test_current_streak_examples() {
    let policy = WeekPolicy::default();
    let all = club_weeks(7);
    assert_eq!(current_streak(&[5.0, 6.0, 7.0], &all, policy), 3);
    assert_eq!(current_streak(&[5.0, 6.0], &all, policy), 0);
    assert_eq!(current_streak(&[], &all, policy), 0);
    assert_eq!(current_streak(&[1.0], &[], policy), 0);
}

#[test]
fn test_current_never_exceeds_longest() {
    let policy = WeekPolicy::default();
    let all = club_weeks(10);
    let samples: [&[f64]; 4] = [
        &[1.0, 2.0, 3.0, 9.0, 10.0],
        &[10.0],
        &[4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0],
        &[2.0, 4.0, 6.0],
    ];
    for weeks in samples {
        assert!(current_streak(weeks, &all, policy) <= longest_streak(weeks, policy));
    }
}

#[test]
fn test_fractional_weeks_by_policy() {
    let weeks = [1.0, 1.5, 2.0, 3.0];
    assert_eq!(longest_streak(&weeks, WeekPolicy::Floor), 3);
    assert_eq!(longest_streak(&weeks, WeekPolicy::IntegerOnly), 3);

    // Week 2 held only as a half week: bridges under Floor, not otherwise.
    let weeks = [1.0, 2.5, 3.0];
    assert_eq!(longest_streak(&weeks, WeekPolicy::Floor), 3);
    assert_eq!(longest_streak(&weeks, WeekPolicy::IntegerOnly), 1);
}

#[test]
fn test_recent_attendance_strip() {
    let strip = recent_attendance(&[2.0, 4.0], &club_weeks(5), 3, WeekPolicy::Floor);
    assert_eq!(strip, vec![(3, false), (4, true), (5, false)]);
    assert_eq!(latest_week(&club_weeks(5), WeekPolicy::Floor), Some(5));
    assert_eq!(latest_week(&[], WeekPolicy::Floor), None);
}
