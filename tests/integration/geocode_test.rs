//! Integration tests for cache-first location resolution.

use chrono::Weekday;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use runclub::analytics::location_stats;
use runclub::club::{AttendanceStore, Meet};
use runclub::geocode::{
    Coordinates, GeocodeError, Geocoder, LocationResolver, RefreshSchedule, SqliteLocationCache,
};
use runclub::storage::Database;

/// Geocoder that resolves every query to the same point and counts calls.
struct CountingGeocoder {
    calls: Arc<AtomicUsize>,
}

impl Geocoder for CountingGeocoder {
    async fn geocode(&self, query: &str) -> Result<Option<Coordinates>, GeocodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if query == "Atlantis" {
            return Ok(None);
        }
        Ok(Some(Coordinates::new(53.4, -3.1)))
    }
}

fn resolver(
    path: &std::path::Path,
    calls: &Arc<AtomicUsize>,
) -> LocationResolver<SqliteLocationCache, CountingGeocoder> {
    let db = Arc::new(Database::open(path).unwrap());
    LocationResolver::new(
        SqliteLocationCache::new(db),
        CountingGeocoder {
            calls: Arc::clone(calls),
        },
        RefreshSchedule::default(),
        Duration::from_millis(1),
    )
}

#[tokio::test]
async fn test_resolved_locations_persist_between_runs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("locations.db");
    let calls = Arc::new(AtomicUsize::new(0));

    let first = resolver(&path, &calls)
        .resolve(["Arrowe Park", "West Kirby", "Atlantis"], Weekday::Sat)
        .await
        .unwrap();
    assert_eq!(first.newly_cached.len(), 2);
    assert_eq!(first.unresolved, vec!["Atlantis".to_string()]);
    assert_eq!(calls.load(Ordering::SeqCst), 3);

    // A weekday run reads the cache only.
    let second = resolver(&path, &calls)
        .resolve(["Arrowe Park", "West Kirby", "Atlantis"], Weekday::Wed)
        .await
        .unwrap();
    assert_eq!(second.resolved.len(), 2);
    assert!(!second.refreshed);
    assert_eq!(calls.load(Ordering::SeqCst), 3);

    let cache = SqliteLocationCache::new(Arc::new(Database::open(&path).unwrap()));
    assert_eq!(cache.count().unwrap(), 2);
}

#[tokio::test]
async fn test_stats_join_resolved_coordinates() {
    let dir = tempfile::tempdir().unwrap();
    let calls = Arc::new(AtomicUsize::new(0));
    let store = AttendanceStore::from_meets(vec![
        Meet {
            week: Some(1.0),
            date: chrono::NaiveDate::from_ymd_opt(2025, 1, 3).unwrap(),
            runners: vec!["Alice".to_string()],
            location: "Arrowe Park".to_string(),
            distance_km: Some(5.0),
            tags: Default::default(),
        },
        Meet {
            week: Some(2.0),
            date: chrono::NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
            runners: vec!["Alice".to_string()],
            location: "Atlantis".to_string(),
            distance_km: Some(5.0),
            tags: Default::default(),
        },
    ]);

    let report = resolver(&dir.path().join("locations.db"), &calls)
        .resolve(["Arrowe Park", "Atlantis"], Weekday::Fri)
        .await
        .unwrap();
    let stats = location_stats(&store, &report);

    assert_eq!(stats.len(), 2);
    let atlantis = stats.iter().find(|s| s.location == "Atlantis").unwrap();
    assert_eq!(atlantis.coordinates, None);
    let park = stats.iter().find(|s| s.location == "Arrowe Park").unwrap();
    assert_eq!(park.coordinates, Some(Coordinates::new(53.4, -3.1)));
}
