//! Ingestion boundary
//!
//! Turns raw spreadsheet tables into typed meets and runners. This is the
//! single place where cell values are validated and coerced; rows that
//! cannot be used are quarantined here with a reason.

pub mod meets;
pub mod runners;
pub mod table;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use meets::{ingest_meets, MeetColumns, MeetsImport};
pub use runners::{ingest_runners, RunnersImport};
pub use table::RawTable;

/// Ingestion errors. Only structural problems are errors; bad cells are not.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngestError {
    #[error("Missing expected columns: {missing:?}. Found: {found:?}")]
    MissingColumns {
        missing: Vec<String>,
        found: Vec<String>,
    },

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// A source row that was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quarantined {
    /// 1-based sheet row number, counting the header as row 1.
    pub row: usize,
    pub reason: String,
}

/// Rows rejected during one ingestion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReport {
    pub accepted: usize,
    pub quarantined: Vec<Quarantined>,
}

impl IngestReport {
    pub(crate) fn quarantine(&mut self, index: usize, reason: impl Into<String>) {
        let entry = Quarantined {
            row: index + 2,
            reason: reason.into(),
        };
        tracing::warn!("Quarantined row {}: {}", entry.row, entry.reason);
        self.quarantined.push(entry);
    }

    pub fn is_clean(&self) -> bool {
        self.quarantined.is_empty()
    }
}

const DATE_FORMATS: [&str; 5] = ["%d/%m/%Y", "%d/%m/%y", "%d-%m-%Y", "%d.%m.%Y", "%Y-%m-%d"];

/// Parse a day-first calendar date.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .filter_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .find(|d| d.year() >= 1900)
}

/// Parse a finite number, `None` for blanks and junk.
pub fn parse_number(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a distance in km; negative distances are rejected.
pub fn parse_distance(value: &str) -> Option<f64> {
    parse_number(value).filter(|&d| d >= 0.0)
}

/// Split a comma-separated runner list into trimmed, non-empty names.
pub fn split_runners(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
