//! Integration tests for the full dashboard pipeline.
//!
//! Sheet exports on disk -> ingestion -> snapshot -> runner wrapped report.

use std::collections::HashMap;
use std::sync::Arc;

use runclub::analytics::Recency;
use runclub::club::{BadgeTier, LookupError};
use runclub::dashboard::{
    ClubData, DashboardSnapshot, DataCache, DataSource, FeatureOutcome, FileDataSource,
    RunnerProfile,
};
use runclub::geocode::Coordinates;
use runclub::ingest::{MeetColumns, RawTable};
use runclub::storage::config::{load_config_from, save_config_to};
use runclub::storage::AppConfig;

const MEETS: &str = r#"{"range":"Meets!A1:G9","values":[
    ["Week","Date","Runners","Location","Distance","Pints","Run Club Baby Count"],
    [1,"03/01/2025","Alice, Bob, Carol","Arrowe Park",5,"Y",""],
    [2,"10/01/2025","Alice, Bob","West Kirby",5.5,"",""],
    [3,"17/01/2025","Alice, Bob, Carol, Dan","Arrowe Park",5,"Y","Congrats cap2 and cap3 on baby Evie!"],
    [4,"24/01/2025","Alice, Carol","Arrowe Park",5,"",""],
    [5,"31/01/2025","Alice, Carol","Royden Park",6,"",""],
    [6,"07/02/2025","Alice, Carol, Dan","Arrowe Park",5,"Y",""],
    ["","","","","","",""],
    [7,"not a date","Alice","Arrowe Park",5,"",""]
]}"#;

const RUNNERS: &str = r#"{"values":[
    ["name","capnumber"],
    ["Alice",1],
    ["Bob",2],
    ["Carol",3],
    ["Dan",4],
    ["Bob",9]
]}"#;

fn workspace() -> (tempfile::TempDir, AppConfig) {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("meets.json"), MEETS).unwrap();
    std::fs::write(dir.path().join("runners.json"), RUNNERS).unwrap();

    let config_path = dir.path().join("config.toml");
    let mut config = AppConfig::default();
    config.geocode.enabled = false;
    save_config_to(&config, &config_path).unwrap();

    let config = load_config_from(&config_path).unwrap();
    (dir, config)
}

fn coords() -> HashMap<String, Coordinates> {
    HashMap::from([
        ("Arrowe Park".to_string(), Coordinates::new(53.37, -3.10)),
        ("West Kirby".to_string(), Coordinates::new(53.37, -3.18)),
    ])
}

#[test]
fn test_pipeline_end_to_end() {
    let (_dir, config) = workspace();
    let data = FileDataSource::from_config(&config).load().unwrap();

    assert_eq!(data.meets_report.quarantined.len(), 1);
    assert_eq!(data.runners_report.quarantined.len(), 1);

    let snapshot = DashboardSnapshot::build(&data, &config, &coords());

    assert_eq!(snapshot.meet_count, 6);
    // 3*5 + 2*5.5 + 4*5 + 2*5 + 2*6 + 3*5
    assert_eq!(snapshot.total_km, 83.0);
    assert_eq!(snapshot.newest_runner.as_ref().map(|r| r.name.as_str()), Some("Dan"));

    let alice = snapshot.runners.iter().find(|r| r.name == "Alice").unwrap();
    assert_eq!(alice.runs, 6);
    assert_eq!(alice.badge.as_ref().map(|b| b.threshold), Some(5));

    assert_eq!(snapshot.latest_awards.len(), 2);
    assert!(snapshot
        .latest_awards
        .windows(2)
        .all(|w| w[0].event.date_reached >= w[1].event.date_reached));

    assert_eq!(snapshot.leaderboard[0].runner, "Alice");
    assert_eq!(snapshot.current_streaks.entries[0].runner, "Alice");
    assert_eq!(snapshot.current_streaks.entries[0].streak, 6);
    assert_eq!(snapshot.longest_streaks.entries.len(), 3);

    assert_eq!(snapshot.locations.len(), 3);
    assert_eq!(snapshot.heat_points.len(), 2);

    match &snapshot.tagged["pints"] {
        FeatureOutcome::Ready(pints) => {
            assert_eq!(pints.active_weeks, 3);
            assert_eq!(pints.recent().count(), 2);
            assert_eq!(pints.archival().count(), 1);
        }
        other => panic!("expected pints, got {other:?}"),
    }
    match &snapshot.tagged["babies"] {
        FeatureOutcome::Ready(babies) => {
            assert_eq!(babies.total, 1.0);
            let entry = &babies.entries[0];
            assert_eq!(entry.linked_runners, vec!["Bob", "Carol"]);
            assert_eq!(entry.recency, Recency::Recent);
        }
        other => panic!("expected babies, got {other:?}"),
    }
}

#[test]
fn test_pipeline_is_idempotent() {
    let (_dir, config) = workspace();
    let source = FileDataSource::from_config(&config);

    let first = DashboardSnapshot::build(&source.load().unwrap(), &config, &coords());
    let second = DashboardSnapshot::build(&source.load().unwrap(), &config, &coords());

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string_pretty(&first).unwrap(),
        serde_json::to_string_pretty(&second).unwrap()
    );
}

#[test]
fn test_cache_reload_picks_up_new_rows() {
    let (dir, config) = workspace();
    let cache = DataCache::new(FileDataSource::from_config(&config));

    let before = cache.get().unwrap();
    let updated = MEETS.replace(
        r#"[7,"not a date""#,
        r#"[7,"14/02/2025","Alice","Arrowe Park",5,"",""],[8,"not a date""#,
    );
    std::fs::write(dir.path().join("meets.json"), updated).unwrap();

    assert!(Arc::ptr_eq(&before, &cache.get().unwrap()));
    cache.invalidate();
    let after = cache.get().unwrap();
    assert_eq!(after.store.meets().len(), before.store.meets().len() + 1);
}

#[test]
fn test_wrapped_report() {
    let (_dir, config) = workspace();
    let data = FileDataSource::from_config(&config).load().unwrap();

    let profile = RunnerProfile::lookup(&data, "3", &config).unwrap();
    let summary = profile.summary.unwrap();

    assert_eq!(summary.file_name(), "Carol_wrapped.txt");
    assert_eq!(summary.total_runs, 5);
    assert_eq!(summary.most_common_location, "Arrowe Park");

    let text = summary.render_text();
    assert!(text.starts_with("Runner Unwrapped for Carol"));
    assert!(text.contains("Total runs: 5"));
    assert!(text.contains("Current streak: 4 weeks"));
    assert!(text.contains("First run: 03/01/2025"));
    assert!(text.contains("01-2025  4"));
    assert!(text.contains("02-2025  1"));
}

const GUEST_MEETS: &str = r#"{"values":[
    ["week","date","runners","location","distance","pints"],
    [1,"03/01/2025","Alice","Arrowe Park",5,""],
    [2,"10/01/2025","Alice, Eve","Arrowe Park",5,"Y"],
    [3,"17/01/2025","Eve","West Kirby",5,""],
    [4,"24/01/2025","Eve","West Kirby",5,"Y"]
]}"#;

const GUEST_RUNNERS: &str = r#"{"values":[["name","capnumber"],["Alice",1]]}"#;

fn guest_data() -> ClubData {
    ClubData::from_tables(
        &RawTable::from_sheet_json(GUEST_MEETS).unwrap(),
        &RawTable::from_sheet_json(GUEST_RUNNERS).unwrap(),
        &MeetColumns::default(),
    )
    .unwrap()
}

fn guest_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.milestones.tiers = vec![BadgeTier::new(3, "3 Runs", "3️⃣")];
    config.leaderboard.min_count = 1;
    config.streaks.current_min = 1;
    config.streaks.longest_min = 1;
    config
}

#[test]
fn test_unregistered_runner_left_out_of_registry_outputs() {
    let data = guest_data();
    let config = guest_config();
    let snapshot = DashboardSnapshot::build(&data, &config, &coords());

    let names: Vec<&str> = snapshot.runners.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Alice"]);
    assert_eq!(snapshot.newest_runner.as_ref().map(|r| r.name.as_str()), Some("Alice"));

    assert_eq!(
        RunnerProfile::lookup(&data, "2", &config).unwrap_err(),
        LookupError::NotFound(2)
    );
    assert_eq!(RunnerProfile::lookup(&data, "1", &config).unwrap().runs, 2);
}

#[test]
fn test_unregistered_runner_counted_in_club_totals() {
    let snapshot = DashboardSnapshot::build(&guest_data(), &guest_config(), &coords());

    // Eve's three runs count towards the club distance
    assert_eq!(snapshot.total_km, 25.0);

    let leaders: Vec<(&str, u32)> = snapshot
        .leaderboard
        .iter()
        .map(|r| (r.runner.as_str(), r.count))
        .collect();
    assert_eq!(leaders, vec![("Eve", 3), ("Alice", 2)]);

    assert_eq!(snapshot.current_streaks.entries[0].runner, "Eve");
    assert_eq!(snapshot.current_streaks.entries[0].streak, 3);
    assert_eq!(snapshot.longest_streaks.entries[0].runner, "Eve");

    assert_eq!(snapshot.latest_awards.len(), 1);
    assert_eq!(snapshot.latest_awards[0].event.runner, "Eve");
    assert_eq!(snapshot.latest_awards[0].event.threshold, 3);
}

#[test]
fn test_lowercase_headers_keep_tagged_features() {
    let snapshot = DashboardSnapshot::build(&guest_data(), &guest_config(), &coords());

    match &snapshot.tagged["pints"] {
        FeatureOutcome::Ready(summary) => {
            assert_eq!(summary.active_weeks, 2);
            // 0.8 per attendee: two at week 2, one at week 4
            assert!((summary.total - 2.4).abs() < 1e-9);
        }
        other => panic!("expected pints summary, got {other:?}"),
    }
}
