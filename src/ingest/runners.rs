//! Runners table ingestion.

use super::{IngestError, IngestReport, RawTable};
use crate::club::{Runner, RunnerRegistry};

/// Typed runner registry plus rejected rows.
#[derive(Debug, Clone, Default)]
pub struct RunnersImport {
    pub registry: RunnerRegistry,
    pub report: IngestReport,
}

/// Validate the runners table (`name`, `capnumber`).
///
/// Blank names, non-numeric cap-numbers and duplicates are quarantined.
pub fn ingest_runners(table: &RawTable) -> Result<RunnersImport, IngestError> {
    let missing = table.missing_columns(&["name", "capnumber"]);
    if !missing.is_empty() {
        return Err(IngestError::MissingColumns {
            missing: missing.into_iter().map(str::to_string).collect(),
            found: table.headers.clone(),
        });
    }

    let name_idx = table.column_index("name").unwrap_or_default();
    let cap_idx = table.column_index("capnumber").unwrap_or_default();

    let mut import = RunnersImport::default();
    for (i, row) in table.rows.iter().enumerate() {
        let name = row.get(name_idx).map(|s| s.trim()).unwrap_or_default();
        let cap = row.get(cap_idx).map(|s| s.trim()).unwrap_or_default();

        if name.is_empty() && cap.is_empty() {
            continue;
        }
        if name.is_empty() {
            import.report.quarantine(i, format!("blank name for capnumber {:?}", cap));
            continue;
        }
        let Ok(capnumber) = cap.parse::<u32>() else {
            import.report.quarantine(i, format!("invalid capnumber {:?} for {}", cap, name));
            continue;
        };
        if !import.registry.insert(Runner::new(name, capnumber)) {
            import.report.quarantine(i, format!("duplicate runner {} / cap{}", name, capnumber));
        }
    }

    import.report.accepted = import.registry.len();
    tracing::info!(
        "Ingested {} runners ({} quarantined)",
        import.report.accepted,
        import.report.quarantined.len()
    );
    Ok(import)
}
