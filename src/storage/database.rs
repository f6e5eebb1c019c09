//! SQLite handle for the location cache.
//!
//! The cache is the only persisted state; everything else is recomputed
//! from the sheets on each load.

use rusqlite::{Connection, OptionalExtension};
use std::path::Path;
use thiserror::Error;

use crate::storage::schema::{MIGRATIONS, SCHEMA_VERSION_TABLE};

/// Migrated SQLite connection.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create the database file, creating parent directories.
    pub fn open(path: &Path) -> Result<Self, DatabaseError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| DatabaseError::IoError(e.to_string()))?;
        }

        let conn =
            Connection::open(path).map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;
        tracing::debug!("Opened location database at {}", path.display());
        Self::with_connection(conn)
    }

    /// In-memory database, used by tests.
    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self, DatabaseError> {
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Highest applied migration, 0 for a fresh file.
    pub fn schema_version(&self) -> Result<i32, DatabaseError> {
        self.conn
            .query_row("SELECT MAX(version) FROM schema_version", [], |row| {
                row.get::<_, Option<i32>>(0)
            })
            .optional()
            .map(|v| v.flatten().unwrap_or(0))
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))
    }

    /// Apply every migration newer than the stored version, each in its own
    /// transaction.
    fn migrate(&self) -> Result<(), DatabaseError> {
        self.conn
            .execute_batch(SCHEMA_VERSION_TABLE)
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;

        let applied = self.schema_version()?;
        for &(version, sql) in MIGRATIONS.iter().filter(|(v, _)| *v > applied) {
            let tx = self
                .conn
                .unchecked_transaction()
                .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
            tx.execute_batch(sql)
                .and_then(|_| {
                    tx.execute(
                        "INSERT INTO schema_version (version, applied_at) VALUES (?1, datetime('now'))",
                        [version],
                    )
                })
                .and_then(|_| tx.commit())
                .map_err(|e| DatabaseError::MigrationFailed(format!("v{}: {}", version, e)))?;

            tracing::info!("Location database migrated to version {}", version);
        }

        Ok(())
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

/// Database errors.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Failed to open database: {0}")]
    ConnectionFailed(String),

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),
}
