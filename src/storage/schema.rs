//! Location cache schema.

/// Version bookkeeping, created before any migration runs.
pub const SCHEMA_VERSION_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL
);
"#;

/// Ordered migrations; each entry brings the schema up to its version.
pub const MIGRATIONS: &[(i32, &str)] = &[(
    1,
    r#"
-- Geocoded venues, append-only
CREATE TABLE IF NOT EXISTS location_cache (
    location TEXT PRIMARY KEY,
    lat REAL NOT NULL,
    lon REAL NOT NULL,
    resolved_at TEXT NOT NULL
);
"#,
)];

/// Latest schema version.
pub const CURRENT_VERSION: i32 = 1;
