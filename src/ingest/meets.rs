//! Meets table ingestion.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{parse_date, parse_distance, parse_number, split_runners, IngestError, IngestReport, RawTable};
use crate::club::{AttendanceStore, Meet};

/// Header names of the required meets columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeetColumns {
    pub week: String,
    pub date: String,
    pub runners: String,
    pub location: String,
    pub distance: String,
}

impl Default for MeetColumns {
    fn default() -> Self {
        Self {
            week: "Week".to_string(),
            date: "Date".to_string(),
            runners: "Runners".to_string(),
            location: "Location".to_string(),
            distance: "Distance".to_string(),
        }
    }
}

impl MeetColumns {
    fn names(&self) -> [&str; 5] {
        [
            self.week.as_str(),
            self.date.as_str(),
            self.runners.as_str(),
            self.location.as_str(),
            self.distance.as_str(),
        ]
    }
}

/// Typed meets plus the columns the source table carried.
#[derive(Debug, Clone, Default)]
pub struct MeetsImport {
    pub meets: Vec<Meet>,
    /// Every non-empty header in the source table.
    pub columns: Vec<String>,
    pub report: IngestReport,
}

impl MeetsImport {
    pub fn into_store(self) -> AttendanceStore {
        AttendanceStore::new(self.meets, self.columns)
    }
}

/// Validate and coerce the meets table.
///
/// Rows without a parseable date are quarantined. Week and distance fall back
/// to `None` when unparseable. Columns other than the required five become
/// per-meet tags.
pub fn ingest_meets(table: &RawTable, columns: &MeetColumns) -> Result<MeetsImport, IngestError> {
    let missing = table.missing_columns(&columns.names());
    if !missing.is_empty() {
        return Err(IngestError::MissingColumns {
            missing: missing.into_iter().map(str::to_string).collect(),
            found: table.headers.clone(),
        });
    }

    // Every required column is present past this point.
    let index = |name: &str| table.column_index(name).unwrap_or_default();
    let week_idx = index(&columns.week);
    let date_idx = index(&columns.date);
    let runners_idx = index(&columns.runners);
    let location_idx = index(&columns.location);
    let distance_idx = index(&columns.distance);
    let required = [week_idx, date_idx, runners_idx, location_idx, distance_idx];

    let tag_columns: Vec<(usize, &str)> = table
        .headers
        .iter()
        .enumerate()
        .filter(|(i, h)| !required.contains(i) && !h.is_empty())
        .map(|(i, h)| (i, h.as_str()))
        .collect();

    let mut import = MeetsImport {
        columns: table.headers.iter().filter(|h| !h.is_empty()).cloned().collect(),
        ..Default::default()
    };

    for (i, row) in table.rows.iter().enumerate() {
        if row.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }

        let cell = |idx: usize| row.get(idx).map(String::as_str).unwrap_or_default();

        let raw_date = cell(date_idx).trim();
        if raw_date.is_empty() {
            import.report.quarantine(i, "blank date");
            continue;
        }
        let Some(date) = parse_date(raw_date) else {
            import.report.quarantine(i, format!("unparseable date {:?}", raw_date));
            continue;
        };

        let tags: BTreeMap<String, String> = tag_columns
            .iter()
            .filter_map(|&(idx, name)| {
                let value = cell(idx).trim();
                (!value.is_empty()).then(|| (name.to_string(), value.to_string()))
            })
            .collect();

        import.meets.push(Meet {
            week: parse_number(cell(week_idx)),
            date,
            runners: split_runners(cell(runners_idx)),
            location: cell(location_idx).trim().to_string(),
            distance_km: parse_distance(cell(distance_idx)),
            tags,
        });
    }

    import.report.accepted = import.meets.len();
    tracing::info!(
        "Ingested {} meets ({} quarantined)",
        import.report.accepted,
        import.report.quarantined.len()
    );

    Ok(import)
}
