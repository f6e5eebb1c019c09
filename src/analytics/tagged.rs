//! Tagged-row aggregation.
//!
//! Some meets carry a marker column ("went to the pub", "baby announced").
//! A [`TagSpec`] says which column to read, how to value each tagged meet and
//! whether runner cap-numbers embedded in the text should be resolved.
//!
//! Meets without a usable week are skipped.

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::error::{AnalyticsError, AnalyticsResult};
use super::streaks::WeekPolicy;
use crate::club::{AttendanceStore, RunnerRegistry};

/// How a tagged meet is valued.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TagValue {
    /// Each tagged meet counts as one.
    Count,
    /// `factor × attendees` per tagged meet.
    PerAttendee { factor: f64 },
}

impl TagValue {
    fn value_for(self, attendees: usize) -> f64 {
        match self {
            TagValue::Count => 1.0,
            TagValue::PerAttendee { factor } => factor * attendees as f64,
        }
    }
}

/// Configuration for one tagged-row feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagSpec {
    /// Feature key used in the snapshot, e.g. `"pints"`.
    pub name: String,
    /// Marker column on the meets table.
    pub column: String,
    pub value: TagValue,
    /// Literal prefix of embedded cap-number references, e.g. `"cap"`.
    #[serde(default)]
    pub id_prefix: Option<String>,
    /// Entries within this many weeks of the latest club week are recent.
    #[serde(default = "default_recent_weeks")]
    pub recent_weeks: u32,
}

fn default_recent_weeks() -> u32 {
    4
}

impl TagSpec {
    /// Pints estimate: 0.8 pints per runner on pub weeks.
    pub fn pints() -> Self {
        Self {
            name: "pints".to_string(),
            column: "Pints".to_string(),
            value: TagValue::PerAttendee { factor: 0.8 },
            id_prefix: None,
            recent_weeks: default_recent_weeks(),
        }
    }

    /// Baby announcements naming parents by cap-number.
    pub fn babies() -> Self {
        Self {
            name: "babies".to_string(),
            column: "Run Club Baby Count".to_string(),
            value: TagValue::Count,
            id_prefix: Some("cap".to_string()),
            recent_weeks: default_recent_weeks(),
        }
    }

    fn id_pattern(&self) -> AnalyticsResult<Option<Regex>> {
        match self.id_prefix.as_deref() {
            None => Ok(None),
            Some(prefix) if prefix.trim().is_empty() => Err(AnalyticsError::InvalidConfig(
                format!("{}: id_prefix must not be empty", self.name),
            )),
            Some(prefix) => Regex::new(&format!(r"{}(\d+)", regex::escape(prefix)))
                .map(Some)
                .map_err(|e| AnalyticsError::InvalidConfig(e.to_string())),
        }
    }
}

/// Display treatment bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recency {
    Recent,
    Archival,
}

/// One tagged meet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaggedEntry {
    pub week: i64,
    pub date: NaiveDate,
    pub attendees: usize,
    pub value: f64,
    /// Raw marker text.
    pub raw: String,
    /// Text before the first `(`, if any.
    pub label: Option<String>,
    /// Registry names for embedded cap-numbers that resolved.
    pub linked_runners: Vec<String>,
    pub recency: Recency,
}

/// Value for a single week.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeekValue {
    pub week: i64,
    pub value: f64,
}

/// Result of one tagged-row aggregation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaggedSummary {
    pub name: String,
    pub total: f64,
    pub by_week: BTreeMap<i64, f64>,
    /// Highest single week; earliest week wins a tie.
    pub peak: Option<WeekValue>,
    pub active_weeks: usize,
    /// `total / active_weeks`, `None` when nothing is tagged.
    pub average_per_active_week: Option<f64>,
    /// Newest first.
    pub entries: Vec<TaggedEntry>,
}

impl TaggedSummary {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn recent(&self) -> impl Iterator<Item = &TaggedEntry> {
        self.entries.iter().filter(|e| e.recency == Recency::Recent)
    }

    pub fn archival(&self) -> impl Iterator<Item = &TaggedEntry> {
        self.entries.iter().filter(|e| e.recency == Recency::Archival)
    }
}

/// Extract cap-numbers referenced in free text (`"Ada (cap3+cap12)"` → `[3, 12]`).
pub fn extract_ids(pattern: &Regex, text: &str) -> Vec<u32> {
    pattern
        .captures_iter(text)
        .filter_map(|c| c.get(1)?.as_str().parse().ok())
        .collect()
}

/// Narrative label: text before the first `(`, trimmed.
pub fn narrative_label(text: &str) -> Option<String> {
    let label = text.split('(').next().unwrap_or_default().trim();
    (!label.is_empty()).then(|| label.to_string())
}

/// Aggregate meets tagged in `spec.column`.
///
/// Fails only if the column is absent from the source table.
pub fn aggregate_tagged(
    store: &AttendanceStore,
    registry: &RunnerRegistry,
    spec: &TagSpec,
    policy: WeekPolicy,
) -> AnalyticsResult<TaggedSummary> {
    let Some(column) = store.resolve_column(&spec.column) else {
        return Err(AnalyticsError::MissingColumns {
            missing: vec![spec.column.clone()],
            found: store.columns().map(str::to_string).collect(),
        });
    };
    let pattern = spec.id_pattern()?;
    let latest = policy.normalize(&store.all_weeks()).last().copied();

    let mut entries = Vec::new();
    for meet in store.meets() {
        let Some(raw) = meet.tag(column).map(str::trim).filter(|v| !v.is_empty()) else {
            continue;
        };
        let Some(week) = meet.week.and_then(|w| policy.week_id(w)) else {
            tracing::debug!("{}: skipping tagged meet on {} without a week", spec.name, meet.date);
            continue;
        };

        let linked_runners = pattern
            .as_ref()
            .map(|re| {
                extract_ids(re, raw)
                    .into_iter()
                    .filter_map(|cap| registry.by_cap_number(cap).map(|r| r.name.clone()))
                    .collect()
            })
            .unwrap_or_default();

        let recent = latest
            .is_some_and(|latest| latest.saturating_sub(week) < i64::from(spec.recent_weeks));
        let recency = if recent {
            Recency::Recent
        } else {
            Recency::Archival
        };

        entries.push(TaggedEntry {
            week,
            date: meet.date,
            attendees: meet.attendee_count(),
            value: spec.value.value_for(meet.attendee_count()),
            raw: raw.to_string(),
            label: narrative_label(raw),
            linked_runners,
            recency,
        });
    }

    let mut by_week: BTreeMap<i64, f64> = BTreeMap::new();
    for entry in &entries {
        *by_week.entry(entry.week).or_insert(0.0) += entry.value;
    }

    let total: f64 = by_week.values().sum();
    let active_weeks = by_week.len();
    let peak = by_week.iter().fold(None::<WeekValue>, |best, (&week, &value)| match best {
        Some(b) if b.value >= value => Some(b),
        _ => Some(WeekValue { week, value }),
    });

    entries.sort_by(|a, b| b.week.cmp(&a.week).then_with(|| b.date.cmp(&a.date)));

    Ok(TaggedSummary {
        name: spec.name.clone(),
        total,
        by_week,
        peak,
        active_weeks,
        average_per_active_week: (active_weeks > 0).then(|| total / active_weeks as f64),
        entries,
    })
}
