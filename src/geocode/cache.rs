//! Location coordinate cache.
//!
//! The cache only ever grows: inserting a location that is already known is a
//! no-op, so resolving the same place twice never duplicates a row.

use chrono::Utc;
use rusqlite::OptionalExtension;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::{CoordinateLookup, Coordinates, GeocodeError};
use crate::storage::Database;

/// Append-only store of resolved locations.
pub trait LocationCache {
    /// Every cached location.
    fn all(&self) -> Result<HashMap<String, Coordinates>, GeocodeError>;

    /// Coordinates for one location, if cached.
    fn get(&self, location: &str) -> Result<Option<Coordinates>, GeocodeError> {
        Ok(self.all()?.get(location).copied())
    }

    /// Add a location. Returns `false` if it was already cached.
    fn insert(&self, location: &str, coordinates: Coordinates) -> Result<bool, GeocodeError>;
}

/// In-process cache, used in tests and when persistence is disabled.
#[derive(Debug, Default)]
pub struct MemoryLocationCache {
    entries: RwLock<HashMap<String, Coordinates>>,
}

impl MemoryLocationCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: impl IntoIterator<Item = (String, Coordinates)>) -> Self {
        Self {
            entries: RwLock::new(entries.into_iter().collect()),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LocationCache for MemoryLocationCache {
    fn all(&self) -> Result<HashMap<String, Coordinates>, GeocodeError> {
        self.entries
            .read()
            .map(|e| e.clone())
            .map_err(|e| GeocodeError::CacheError(e.to_string()))
    }

    fn insert(&self, location: &str, coordinates: Coordinates) -> Result<bool, GeocodeError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| GeocodeError::CacheError(e.to_string()))?;
        if entries.contains_key(location) {
            return Ok(false);
        }
        entries.insert(location.to_string(), coordinates);
        Ok(true)
    }
}

impl CoordinateLookup for MemoryLocationCache {
    fn coordinates(&self, location: &str) -> Option<Coordinates> {
        self.entries.read().ok()?.get(location).copied()
    }
}

/// SQLite-backed cache that persists across runs.
pub struct SqliteLocationCache {
    db: Arc<Database>,
}

impl SqliteLocationCache {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Number of cached locations.
    pub fn count(&self) -> Result<usize, GeocodeError> {
        let count: i64 = self
            .db
            .connection()
            .query_row("SELECT COUNT(*) FROM location_cache", [], |row| row.get(0))
            .map_err(|e| GeocodeError::CacheError(e.to_string()))?;
        Ok(count as usize)
    }
}

impl LocationCache for SqliteLocationCache {
    fn all(&self) -> Result<HashMap<String, Coordinates>, GeocodeError> {
        let conn = self.db.connection();
        let mut stmt = conn
            .prepare("SELECT location, lat, lon FROM location_cache")
            .map_err(|e| GeocodeError::CacheError(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, f64>(1)?,
                    row.get::<_, f64>(2)?,
                ))
            })
            .map_err(|e| GeocodeError::CacheError(e.to_string()))?;

        let mut entries = HashMap::new();
        for row in rows {
            let (location, lat, lon) = row.map_err(|e| GeocodeError::CacheError(e.to_string()))?;
            entries.insert(location, Coordinates::new(lat, lon));
        }

        Ok(entries)
    }

    fn get(&self, location: &str) -> Result<Option<Coordinates>, GeocodeError> {
        self.db
            .connection()
            .query_row(
                "SELECT lat, lon FROM location_cache WHERE location = ?1",
                [location],
                |row| Ok(Coordinates::new(row.get(0)?, row.get(1)?)),
            )
            .optional()
            .map_err(|e| GeocodeError::CacheError(e.to_string()))
    }

    fn insert(&self, location: &str, coordinates: Coordinates) -> Result<bool, GeocodeError> {
        let inserted = self
            .db
            .connection()
            .execute(
                "INSERT OR IGNORE INTO location_cache (location, lat, lon, resolved_at)
                 VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![
                    location,
                    coordinates.lat,
                    coordinates.lon,
                    Utc::now().to_rfc3339(),
                ],
            )
            .map_err(|e| GeocodeError::CacheError(e.to_string()))?;

        if inserted > 0 {
            tracing::info!("Cached coordinates for {}", location);
        }

        Ok(inserted > 0)
    }
}
