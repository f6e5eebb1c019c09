//! Raw spreadsheet tables.
//!
//! A [`RawTable`] is the untyped grid exported from a sheet: one header row
//! and string cells. Nothing downstream of `ingest` sees this type.

use serde_json::Value;

use super::IngestError;

/// Untyped grid of cells with a header row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Build from a full grid whose first row is the header.
    ///
    /// Short rows are padded with empty cells; headers are trimmed.
    pub fn from_values(values: Vec<Vec<String>>) -> Self {
        let mut iter = values.into_iter();
        let headers: Vec<String> = iter
            .next()
            .unwrap_or_default()
            .into_iter()
            .map(|h| h.trim().to_string())
            .collect();
        let width = headers.len();

        let rows = iter
            .map(|mut row| {
                if row.len() < width {
                    row.resize(width, String::new());
                }
                row
            })
            .collect();

        Self { headers, rows }
    }

    /// Parse a sheet export of the form `{"values": [[...], ...]}`.
    ///
    /// Numeric and boolean cells are stringified; nulls become empty cells.
    pub fn from_sheet_json(json: &str) -> Result<Self, IngestError> {
        let doc: Value =
            serde_json::from_str(json).map_err(|e| IngestError::ParseError(e.to_string()))?;

        let values = doc
            .get("values")
            .and_then(Value::as_array)
            .ok_or_else(|| IngestError::ParseError("missing \"values\" array".to_string()))?;

        let grid = values
            .iter()
            .map(|row| match row.as_array() {
                Some(cells) => cells.iter().map(cell_to_string).collect(),
                None => Vec::new(),
            })
            .collect();

        Ok(Self::from_values(grid))
    }

    /// Index of a column, matched trimmed and case-insensitively.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let wanted = name.trim();
        self.headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(wanted))
    }

    /// Names from `wanted` that have no matching column.
    pub fn missing_columns<'a>(&self, wanted: &[&'a str]) -> Vec<&'a str> {
        wanted
            .iter()
            .copied()
            .filter(|name| self.column_index(name).is_none())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn cell_to_string(cell: &Value) -> String {
    match cell {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
