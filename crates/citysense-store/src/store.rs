//! SQLite-backed record store.

use std::path::Path;

use citysense_types::{MetricField, ParseError, SensorReading, hour_of_day};
use rusqlite::functions::FunctionFlags;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, Row};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::grouping::{GroupRow, GroupValue, finish_grouping};
use crate::queries::{GroupKey, Grouping, Projection, READING_COLUMNS, ReadingFilter};
use crate::schema;
use crate::traits::RecordStore;

/// Outcome of a JSON Lines import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportResult {
    /// Non-blank lines seen.
    pub total: usize,
    /// Readings written to the store.
    pub imported: usize,
    /// One message per rejected line.
    pub errors: Vec<String>,
}

/// SQLite-based store for city sensor readings.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open or create a database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| Error::CreateDirectory {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        info!("Opening database at {}", path.display());
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;

        Self::prepare(conn)
    }

    /// Open the default database location.
    pub fn open_default() -> Result<Self> {
        Self::open(crate::default_db_path())
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        Self::prepare(Connection::open_in_memory()?)
    }

    fn prepare(conn: Connection) -> Result<Self> {
        register_functions(&conn)?;
        schema::initialize(&conn)?;
        Ok(Self { conn })
    }
}

/// Register `utc_hour(ts)`, which maps a stored timestamp to its UTC hour or
/// NULL when the timestamp cannot be parsed.
fn register_functions(conn: &Connection) -> Result<()> {
    conn.create_scalar_function(
        "utc_hour",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let hour = match ctx.get_raw(0) {
                ValueRef::Text(bytes) => std::str::from_utf8(bytes)
                    .ok()
                    .and_then(|ts| hour_of_day(ts).ok())
                    .map(i64::from),
                _ => None,
            };
            Ok(hour)
        },
    )?;
    Ok(())
}

/// Decode one JSON object into a reading.
///
/// Identity fields are required. Measurements that are absent, null or not
/// integers become `None`.
fn decode_reading(line: &str) -> std::result::Result<SensorReading, ParseError> {
    let value: serde_json::Value =
        serde_json::from_str(line).map_err(|e| ParseError::MalformedRecord(e.to_string()))?;
    let object = value
        .as_object()
        .ok_or_else(|| ParseError::MalformedRecord("expected a JSON object".to_string()))?;

    let text = |name: &str| -> std::result::Result<String, ParseError> {
        object
            .get(name)
            .and_then(serde_json::Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| ParseError::MalformedRecord(format!("`{name}` must be a string")))
    };

    let area = text("area")?;
    if area.is_empty() {
        return Err(ParseError::MalformedRecord("`area` must not be empty".to_string()));
    }

    let mut reading = SensorReading {
        sensor_id: text("sensor_id")?,
        area,
        timestamp: text("timestamp")?,
        noise_db: None,
        traffic_count: None,
        pm25: None,
    };

    for field in MetricField::ALL {
        let raw = object.get(field.column());
        let value = raw.and_then(serde_json::Value::as_i64);
        if value.is_none() && raw.is_some_and(|v| !v.is_null()) {
            debug!("Treating non-integer {} as missing for sensor {}", field, reading.sensor_id);
        }
        match field {
            MetricField::NoiseDb => reading.noise_db = value,
            MetricField::TrafficCount => reading.traffic_count = value,
            MetricField::Pm25 => reading.pm25 = value,
        }
    }

    Ok(reading)
}

fn reading_from_row(row: &Row<'_>) -> rusqlite::Result<SensorReading> {
    Ok(SensorReading {
        sensor_id: row.get(0)?,
        area: row.get(1)?,
        timestamp: row.get(2)?,
        noise_db: row.get(3)?,
        traffic_count: row.get(4)?,
        pm25: row.get(5)?,
    })
}

// Write operations
impl Store {
    /// Insert a single reading.
    pub fn insert_reading(&self, reading: &SensorReading) -> Result<i64> {
        self.conn.execute(
            &format!("INSERT INTO readings ({READING_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)"),
            rusqlite::params![
                reading.sensor_id,
                reading.area,
                reading.timestamp,
                reading.noise_db,
                reading.traffic_count,
                reading.pm25,
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    /// Insert readings in a single transaction.
    pub fn insert_readings(&self, readings: &[SensorReading]) -> Result<usize> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare(&format!(
                "INSERT INTO readings ({READING_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)"
            ))?;
            for reading in readings {
                stmt.execute(rusqlite::params![
                    reading.sensor_id,
                    reading.area,
                    reading.timestamp,
                    reading.noise_db,
                    reading.traffic_count,
                    reading.pm25,
                ])?;
            }
        }
        tx.commit()?;

        info!("Inserted {} readings", readings.len());
        Ok(readings.len())
    }

    /// Import readings from JSON Lines text, one reading object per line.
    ///
    /// Blank lines are ignored. A line without a string `sensor_id`, a
    /// non-empty string `area` and a string `timestamp` is rejected and
    /// reported in [`ImportResult::errors`]. A measurement that is not an
    /// integer is stored as missing rather than rejecting the line. Accepted
    /// readings are written in one transaction.
    pub fn import_json_lines(&self, data: &str) -> Result<ImportResult> {
        let mut result = ImportResult::default();
        let mut readings = Vec::new();

        for (index, line) in data.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            result.total += 1;

            match decode_reading(line) {
                Ok(reading) => readings.push(reading),
                Err(source) => {
                    let err = Error::InvalidRecord {
                        line: index + 1,
                        source,
                    };
                    debug!("{}", err);
                    result.errors.push(err.to_string());
                }
            }
        }

        if !result.errors.is_empty() {
            warn!("Rejected {} of {} lines during import", result.errors.len(), result.total);
        }

        result.imported = self.insert_readings(&readings)?;
        Ok(result)
    }

    /// Import a JSON Lines file. See [`Store::import_json_lines`].
    pub fn import_file<P: AsRef<Path>>(&self, path: P) -> Result<ImportResult> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)?;
        info!("Importing readings from {}", path.display());
        self.import_json_lines(&data)
    }

    /// Count every stored reading.
    pub fn count_readings(&self) -> Result<u64> {
        self.run_count(&ReadingFilter::new())
    }
}

impl RecordStore for Store {
    fn run_grouping(&self, filter: &ReadingFilter, grouping: &Grouping) -> Result<Vec<GroupRow>> {
        let (where_clause, params) = filter.build_where();
        let sql = grouping.build_sql(&where_clause);

        debug!("Executing grouping: {}", sql);

        let params_ref: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();
        let mut stmt = self.conn.prepare(&sql)?;

        let rows = match grouping.key {
            GroupKey::Area => stmt
                .query_map(params_ref.as_slice(), |row| {
                    Ok(Some(GroupRow::new(GroupValue::Area(row.get(0)?), row.get(1)?)))
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?,
            GroupKey::Hour => stmt
                .query_map(params_ref.as_slice(), |row| {
                    let hour: i64 = row.get(0)?;
                    let metric: f64 = row.get(1)?;
                    Ok(u8::try_from(hour)
                        .ok()
                        .map(|h| GroupRow::new(GroupValue::Hour(h), metric)))
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?,
            GroupKey::All => stmt
                .query_map(params_ref.as_slice(), |row| {
                    let count: i64 = row.get(1)?;
                    if count == 0 {
                        return Ok(None);
                    }
                    Ok(Some(GroupRow::new(GroupValue::All, row.get(0)?)))
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?,
        };

        Ok(finish_grouping(rows.into_iter().flatten().collect(), grouping))
    }

    fn run_projection(
        &self,
        filter: &ReadingFilter,
        projection: &Projection,
    ) -> Result<Vec<SensorReading>> {
        let (where_clause, params) = filter.build_where();
        let sql = projection.build_sql(&where_clause);

        debug!("Executing projection: {}", sql);

        let params_ref: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();
        let mut stmt = self.conn.prepare(&sql)?;
        let readings = stmt
            .query_map(params_ref.as_slice(), reading_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(readings)
    }

    fn run_count(&self, filter: &ReadingFilter) -> Result<u64> {
        let (where_clause, params) = filter.build_where();
        let sql = format!("SELECT COUNT(*) FROM readings {}", where_clause);

        let params_ref: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();
        let count: i64 = self
            .conn
            .query_row(&sql, params_ref.as_slice(), |row| row.get(0))?;

        Ok(count as u64)
    }

    fn distinct_areas(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT area FROM readings ORDER BY area")?;
        let areas = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;

        Ok(areas)
    }
}
