//! Database schema and version tracking.

use rusqlite::Connection;

use crate::error::Result;

/// Current schema version.
pub const SCHEMA_VERSION: i32 = 1;

/// Initialize the database schema.
pub fn initialize(conn: &Connection) -> Result<()> {
    let version = get_schema_version(conn)?;

    if version == 0 {
        create_schema_v1(conn)?;
        set_schema_version(conn, SCHEMA_VERSION)?;
    }

    Ok(())
}

/// Get the current schema version.
fn get_schema_version(conn: &Connection) -> Result<i32> {
    let exists: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name='schema_version'",
        [],
        |row| row.get(0),
    )?;

    if !exists {
        return Ok(0);
    }

    let version: i32 =
        conn.query_row("SELECT version FROM schema_version", [], |row| row.get(0))?;

    Ok(version)
}

/// Set the schema version.
fn set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO schema_version (id, version) VALUES (1, ?)",
        [version],
    )?;
    Ok(())
}

/// Create the initial schema (version 1).
///
/// Measurement columns only ever hold integers or NULL, so every value read
/// back is a well-formed `Option<i64>`. Timestamps stay free text and are
/// parsed on read.
fn create_schema_v1(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            version INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS readings (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            sensor_id TEXT NOT NULL,
            area TEXT NOT NULL,
            timestamp TEXT NOT NULL,
            noise_db INTEGER CHECK (noise_db IS NULL OR typeof(noise_db) = 'integer'),
            traffic_count INTEGER CHECK (traffic_count IS NULL OR typeof(traffic_count) = 'integer'),
            pm25 INTEGER CHECK (pm25 IS NULL OR typeof(pm25) = 'integer')
        );
        CREATE INDEX IF NOT EXISTS idx_readings_area ON readings(area);
        CREATE INDEX IF NOT EXISTS idx_readings_timestamp ON readings(timestamp);
        CREATE INDEX IF NOT EXISTS idx_readings_noise ON readings(noise_db);
        CREATE INDEX IF NOT EXISTS idx_readings_traffic ON readings(traffic_count);
        CREATE INDEX IF NOT EXISTS idx_readings_pm25 ON readings(pm25);
        "#,
    )?;

    Ok(())
}
