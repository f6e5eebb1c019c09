//! Loaded club data and its cache.

use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use crate::club::{AttendanceStore, RunnerRegistry};
use crate::ingest::{
    ingest_meets, ingest_runners, IngestError, IngestReport, MeetColumns, RawTable,
};
use crate::storage::AppConfig;

/// Both tables after ingestion.
#[derive(Debug, Clone, Default)]
pub struct ClubData {
    pub store: AttendanceStore,
    pub registry: RunnerRegistry,
    pub meets_report: IngestReport,
    pub runners_report: IngestReport,
}

impl ClubData {
    /// Ingest the meets and runners tables.
    pub fn from_tables(
        meets: &RawTable,
        runners: &RawTable,
        columns: &MeetColumns,
    ) -> Result<Self, IngestError> {
        let meets = ingest_meets(meets, columns)?;
        let runners = ingest_runners(runners)?;
        let meets_report = meets.report.clone();

        Ok(Self {
            store: meets.into_store(),
            registry: runners.registry,
            meets_report,
            runners_report: runners.report,
        })
    }

    /// Distinct meet locations, sorted.
    pub fn locations(&self) -> Vec<String> {
        let mut locations: Vec<String> = self
            .store
            .meets()
            .iter()
            .map(|m| m.location.clone())
            .filter(|l| !l.is_empty())
            .collect();
        locations.sort();
        locations.dedup();
        locations
    }
}

/// Where club data comes from.
pub trait DataSource {
    fn load(&self) -> Result<ClubData, IngestError>;
}

/// Reads two sheet JSON exports from disk.
#[derive(Debug, Clone)]
pub struct FileDataSource {
    meets_path: PathBuf,
    runners_path: PathBuf,
    columns: MeetColumns,
}

impl FileDataSource {
    pub fn new(meets_path: PathBuf, runners_path: PathBuf, columns: MeetColumns) -> Self {
        Self {
            meets_path,
            runners_path,
            columns,
        }
    }

    /// Source paths resolved against the config's data directory.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.resolve_path(&config.sources.meets_path),
            config.resolve_path(&config.sources.runners_path),
            config.columns.clone(),
        )
    }

    fn read_table(path: &Path) -> Result<RawTable, IngestError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| IngestError::IoError(format!("{}: {}", path.display(), e)))?;
        RawTable::from_sheet_json(&json)
    }
}

impl DataSource for FileDataSource {
    fn load(&self) -> Result<ClubData, IngestError> {
        tracing::info!(
            "Loading club data from {} and {}",
            self.meets_path.display(),
            self.runners_path.display()
        );
        let meets = Self::read_table(&self.meets_path)?;
        let runners = Self::read_table(&self.runners_path)?;
        ClubData::from_tables(&meets, &runners, &self.columns)
    }
}

/// Loads club data once and serves it until invalidated.
pub struct DataCache<S> {
    source: S,
    cached: RwLock<Option<Arc<ClubData>>>,
}

impl<S: DataSource> DataCache<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            cached: RwLock::new(None),
        }
    }

    /// Cached data, loading from the source on a miss.
    ///
    /// A failed load is not cached; the next call retries.
    pub fn get(&self) -> Result<Arc<ClubData>, IngestError> {
        if let Some(data) = self
            .cached
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            return Ok(Arc::clone(data));
        }

        let mut cached = self.cached.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(data) = cached.as_ref() {
            return Ok(Arc::clone(data));
        }

        let data = Arc::new(self.source.load()?);
        *cached = Some(Arc::clone(&data));
        Ok(data)
    }

    /// Drop the cached data; the next `get` reloads.
    pub fn invalidate(&self) {
        *self.cached.write().unwrap_or_else(PoisonError::into_inner) = None;
        tracing::debug!("Club data cache invalidated");
    }

    pub fn is_loaded(&self) -> bool {
        self.cached
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}
