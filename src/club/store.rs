//! In-memory attendance store.
//!
//! Holds the ingested meets and the per-runner attendance rows exploded from
//! them. Everything downstream reads from here; nothing mutates it after
//! construction.

use std::collections::{BTreeMap, BTreeSet};

use super::types::{AttendanceRecord, Meet};

/// Ordered collection of meets and their attendance records.
#[derive(Debug, Clone, Default)]
pub struct AttendanceStore {
    meets: Vec<Meet>,
    records: Vec<AttendanceRecord>,
    columns: BTreeSet<String>,
}

impl AttendanceStore {
    /// Build a store from meets, exploding one record per attending runner.
    ///
    /// `columns` is the set of column names present in the source table and is
    /// used to tell a missing marker column apart from an empty one.
    pub fn new(meets: Vec<Meet>, columns: impl IntoIterator<Item = String>) -> Self {
        let records = meets
            .iter()
            .enumerate()
            .flat_map(|(meet_index, meet)| {
                meet.runners.iter().map(move |runner| AttendanceRecord {
                    runner: runner.clone(),
                    week: meet.week,
                    date: meet.date,
                    location: meet.location.clone(),
                    distance_km: meet.distance_km,
                    meet_index,
                })
            })
            .collect();

        Self {
            meets,
            records,
            columns: columns.into_iter().collect(),
        }
    }

    /// Build a store whose known columns are exactly the tags seen on meets.
    pub fn from_meets(meets: Vec<Meet>) -> Self {
        let columns: BTreeSet<String> = meets
            .iter()
            .flat_map(|m| m.tags.keys().cloned())
            .collect();
        Self::new(meets, columns)
    }

    pub fn meets(&self) -> &[Meet] {
        &self.meets
    }

    pub fn records(&self) -> &[AttendanceRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.meets.is_empty()
    }

    /// Whether the source table carried the given column.
    pub fn has_column(&self, column: &str) -> bool {
        self.resolve_column(column).is_some()
    }

    /// Source spelling of a column, matched trimmed and ignoring ASCII case.
    pub fn resolve_column(&self, column: &str) -> Option<&str> {
        let wanted = column.trim();
        self.columns
            .iter()
            .find(|c| c.trim().eq_ignore_ascii_case(wanted))
            .map(String::as_str)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(String::as_str)
    }

    /// Records belonging to one runner, in meet order.
    pub fn records_for<'a>(&'a self, runner: &'a str) -> impl Iterator<Item = &'a AttendanceRecord> {
        self.records.iter().filter(move |r| r.runner == runner)
    }

    /// Distinct runner names, sorted.
    pub fn runner_names(&self) -> Vec<&str> {
        let names: BTreeSet<&str> = self.records.iter().map(|r| r.runner.as_str()).collect();
        names.into_iter().collect()
    }

    /// Raw week values for one runner.
    pub fn weeks_for(&self, runner: &str) -> Vec<f64> {
        self.records_for(runner).filter_map(|r| r.week).collect()
    }

    /// Raw week values for every meet (the club's week axis).
    pub fn all_weeks(&self) -> Vec<f64> {
        self.meets.iter().filter_map(|m| m.week).collect()
    }

    /// Lifetime attendance count per runner.
    pub fn run_counts(&self) -> BTreeMap<&str, u32> {
        let mut counts = BTreeMap::new();
        for record in &self.records {
            *counts.entry(record.runner.as_str()).or_insert(0) += 1;
        }
        counts
    }

    /// Attendance count for one runner (0 if never seen).
    pub fn run_count(&self, runner: &str) -> u32 {
        self.records_for(runner).count() as u32
    }
}
