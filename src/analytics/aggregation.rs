//! Club-wide aggregates.
//!
//! Distance totals, the attendance leaderboard and location frequency joined
//! against the coordinate cache.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::club::AttendanceStore;
use crate::geocode::{CoordinateLookup, Coordinates};

/// Total kilometers run by the club.
///
/// Each meet contributes attendees × distance; a meet without a usable
/// distance contributes nothing.
pub fn club_distance_total(store: &AttendanceStore) -> f64 {
    store
        .meets()
        .iter()
        .filter_map(|meet| {
            meet.distance_km
                .filter(|d| d.is_finite())
                .map(|d| d * meet.attendee_count() as f64)
        })
        .sum()
}

/// Round to one decimal place for display.
pub fn round_km(km: f64) -> f64 {
    (km * 10.0).round() / 10.0
}

/// One row of the attendance leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttendanceCount {
    pub runner: String,
    pub count: u32,
}

/// Attendance per runner with at least `min_count` runs.
///
/// Sorted by count descending, then runner name.
pub fn attendance_leaderboard(store: &AttendanceStore, min_count: u32) -> Vec<AttendanceCount> {
    let mut rows: Vec<AttendanceCount> = store
        .run_counts()
        .into_iter()
        .filter(|&(_, count)| count >= min_count)
        .map(|(runner, count)| AttendanceCount {
            runner: runner.to_string(),
            count,
        })
        .collect();

    rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.runner.cmp(&b.runner)));
    rows
}

/// Meet count for one location, with its coordinates if known.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationStat {
    pub location: String,
    pub meets: u32,
    pub coordinates: Option<Coordinates>,
}

/// A weighted point for the location heatmap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeatPoint {
    pub lat: f64,
    pub lon: f64,
    pub weight: f64,
}

/// Number of meets held at each location, keyed by exact name.
pub fn location_counts(store: &AttendanceStore) -> BTreeMap<&str, u32> {
    let mut counts = BTreeMap::new();
    for meet in store.meets() {
        *counts.entry(meet.location.as_str()).or_insert(0) += 1;
    }
    counts
}

/// Location frequency left-joined against known coordinates.
///
/// Sorted by meet count descending, then location name.
pub fn location_stats(store: &AttendanceStore, lookup: &dyn CoordinateLookup) -> Vec<LocationStat> {
    let mut stats: Vec<LocationStat> = location_counts(store)
        .into_iter()
        .map(|(location, meets)| LocationStat {
            location: location.to_string(),
            meets,
            coordinates: lookup.coordinates(location),
        })
        .collect();

    stats.sort_by(|a, b| b.meets.cmp(&a.meets).then_with(|| a.location.cmp(&b.location)));
    stats
}

/// Heatmap weight for a meet count: `ln(1 + count)`.
pub fn heat_weight(count: u32) -> f64 {
    (count as f64).ln_1p()
}

/// Spatial output: resolved locations only, log-weighted.
pub fn heat_points(stats: &[LocationStat]) -> Vec<HeatPoint> {
    stats
        .iter()
        .filter_map(|stat| {
            stat.coordinates.map(|c| HeatPoint {
                lat: c.lat,
                lon: c.lon,
                weight: heat_weight(stat.meets),
            })
        })
        .collect()
}
