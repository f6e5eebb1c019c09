//! Cache-first location resolution.
//!
//! Reads are unconditional. New lookups happen only on scheduled days, one at
//! a time behind a fixed minimum delay. A failed lookup leaves that location
//! unresolved; it is not retried in the same pass.

use chrono::Weekday;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use std::collections::{BTreeSet, HashMap};
use std::time::Duration;

use super::{CoordinateLookup, Coordinates, GeocodeError, Geocoder, LocationCache, RefreshSchedule};

/// Outcome of resolving a set of locations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolveReport {
    /// Every requested location with known coordinates.
    pub resolved: HashMap<String, Coordinates>,
    /// Requested locations still without coordinates, sorted.
    pub unresolved: Vec<String>,
    /// Locations added to the cache during this pass, sorted.
    pub newly_cached: Vec<String>,
    /// Whether the schedule allowed geocoding in this pass.
    pub refreshed: bool,
}

impl CoordinateLookup for ResolveReport {
    fn coordinates(&self, location: &str) -> Option<Coordinates> {
        self.resolved.get(location).copied()
    }
}

/// Resolves locations against a cache, falling back to a geocoder.
pub struct LocationResolver<C, G> {
    cache: C,
    geocoder: G,
    schedule: RefreshSchedule,
    limiter: Option<DefaultDirectRateLimiter>,
}

impl<C: LocationCache, G: Geocoder> LocationResolver<C, G> {
    /// Create a resolver. A zero `min_delay` disables rate limiting.
    pub fn new(cache: C, geocoder: G, schedule: RefreshSchedule, min_delay: Duration) -> Self {
        let limiter = Quota::with_period(min_delay).map(RateLimiter::direct);
        Self {
            cache,
            geocoder,
            schedule,
            limiter,
        }
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Resolve distinct location names as of `today`.
    pub async fn resolve<I, S>(&self, locations: I, today: Weekday) -> Result<ResolveReport, GeocodeError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let wanted: BTreeSet<String> = locations
            .into_iter()
            .map(|l| l.as_ref().to_string())
            .collect();
        let known = self.cache.all()?;

        let mut report = ResolveReport::default();
        let mut missing = Vec::new();
        for location in wanted {
            match known.get(&location) {
                Some(&coords) => {
                    report.resolved.insert(location, coords);
                }
                None => missing.push(location),
            }
        }

        if missing.is_empty() {
            return Ok(report);
        }

        if !self.schedule.allows(today) {
            tracing::debug!(
                "Skipping geocode refresh on {}: {} locations unresolved",
                today,
                missing.len()
            );
            report.unresolved = missing;
            return Ok(report);
        }

        report.refreshed = true;
        tracing::info!("Geocoding {} new locations", missing.len());

        for location in missing {
            if let Some(limiter) = &self.limiter {
                limiter.until_ready().await;
            }

            match self.geocoder.geocode(&location).await {
                Ok(Some(coords)) => {
                    match self.cache.insert(&location, coords) {
                        Ok(true) => report.newly_cached.push(location.clone()),
                        Ok(false) => {}
                        Err(e) => tracing::warn!("Failed to cache {}: {}", location, e),
                    }
                    report.resolved.insert(location, coords);
                }
                Ok(None) => {
                    tracing::debug!("No geocode match for {}", location);
                    report.unresolved.push(location);
                }
                Err(e) => {
                    tracing::warn!("Geocoding {} failed: {}", location, e);
                    report.unresolved.push(location);
                }
            }
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocode::MemoryLocationCache;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Geocoder that knows a fixed set of places and fails on "Broken".
    #[derive(Default)]
    struct FakeGeocoder {
        calls: AtomicUsize,
    }

    impl Geocoder for FakeGeocoder {
        async fn geocode(&self, query: &str) -> Result<Option<Coordinates>, GeocodeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match query {
                "West Kirby" => Ok(Some(Coordinates::new(53.37, -3.18))),
                "Royden Park" => Ok(Some(Coordinates::new(53.36, -3.13))),
                "Broken" => Err(GeocodeError::NetworkError("connection reset".to_string())),
                _ => Ok(None),
            }
        }
    }

    fn cache() -> MemoryLocationCache {
        MemoryLocationCache::with_entries(vec![(
            "Arrowe Park".to_string(),
            Coordinates::new(53.37, -3.10),
        )])
    }

    #[tokio::test]
    async fn test_cache_hits_skip_geocoder() {
        let resolver = LocationResolver::new(
            cache(),
            FakeGeocoder::default(),
            RefreshSchedule::always(),
            Duration::from_millis(1),
        );
        let report = resolver.resolve(["Arrowe Park"], Weekday::Fri).await.unwrap();
        assert_eq!(report.resolved.len(), 1);
        assert!(!report.refreshed);
        assert_eq!(resolver.geocoder.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_refresh_skipped_outside_schedule() {
        let resolver = LocationResolver::new(
            cache(),
            FakeGeocoder::default(),
            RefreshSchedule::default(),
            Duration::from_millis(1),
        );
        let report = resolver
            .resolve(["Arrowe Park", "West Kirby"], Weekday::Tue)
            .await
            .unwrap();
        assert!(!report.refreshed);
        assert_eq!(report.unresolved, vec!["West Kirby".to_string()]);
        assert_eq!(resolver.geocoder.calls.load(Ordering::SeqCst), 0);
        assert_eq!(resolver.cache().len(), 1);
    }

    #[tokio::test]
    async fn test_failures_do_not_abort_batch() {
        let resolver = LocationResolver::new(
            cache(),
            FakeGeocoder::default(),
            RefreshSchedule::default(),
            Duration::from_millis(1),
        );
        let report = resolver
            .resolve(
                ["Arrowe Park", "Broken", "Nowhere", "Royden Park", "West Kirby"],
                Weekday::Sat,
            )
            .await
            .unwrap();

        assert!(report.refreshed);
        assert_eq!(report.resolved.len(), 3);
        assert_eq!(report.unresolved, vec!["Broken".to_string(), "Nowhere".to_string()]);
        assert_eq!(
            report.newly_cached,
            vec!["Royden Park".to_string(), "West Kirby".to_string()]
        );
        assert_eq!(resolver.geocoder.calls.load(Ordering::SeqCst), 4);
        assert_eq!(resolver.cache().len(), 3);
    }

    #[tokio::test]
    async fn test_second_pass_uses_cache() {
        let resolver = LocationResolver::new(
            MemoryLocationCache::new(),
            FakeGeocoder::default(),
            RefreshSchedule::always(),
            Duration::ZERO,
        );
        resolver.resolve(["West Kirby"], Weekday::Mon).await.unwrap();
        let again = resolver.resolve(["West Kirby"], Weekday::Mon).await.unwrap();

        assert!(again.newly_cached.is_empty());
        assert_eq!(resolver.cache().len(), 1);
        assert_eq!(resolver.geocoder.calls.load(Ordering::SeqCst), 1);
        assert!(again.coordinates("West Kirby").is_some());
    }
}
