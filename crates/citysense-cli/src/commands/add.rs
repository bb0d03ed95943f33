//! Add command - insert one reading by hand.

use std::io::Write;

use anyhow::{Context, Result, bail};
use citysense_core::AreaCache;
use citysense_store::Store;
use citysense_types::{SensorReading, parse_timestamp};
use time::OffsetDateTime;
use time::macros::format_description;
use tracing::info;

use crate::cli::OutputFormat;
use crate::format::{as_json, format_readings_text};

/// Field values for a manually entered reading.
#[derive(Debug, Clone)]
pub struct ManualEntry {
    pub area: String,
    pub sensor_id: Option<String>,
    pub timestamp: Option<String>,
    pub noise_db: i64,
    pub traffic_count: i64,
    pub pm25: i64,
}

impl ManualEntry {
    /// Build the reading to store.
    ///
    /// The area is trimmed and must not be empty. A blank or missing sensor
    /// id becomes a random UUID. The timestamp is normalized to UTC at
    /// minute precision, and `now` is used when none was given.
    pub fn into_reading(self, now: OffsetDateTime) -> Result<SensorReading> {
        let area = self.area.trim();
        if area.is_empty() {
            bail!("Area is required");
        }

        let sensor_id = self
            .sensor_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        let taken_at = match self.timestamp.as_deref() {
            Some(raw) => parse_timestamp(raw)?,
            None => now,
        };
        let timestamp = taken_at
            .to_offset(time::UtcOffset::UTC)
            .format(format_description!("[year]-[month]-[day]T[hour]:[minute]"))
            .context("Failed to format timestamp")?;

        Ok(SensorReading {
            sensor_id,
            area: area.to_string(),
            timestamp,
            noise_db: Some(self.noise_db),
            traffic_count: Some(self.traffic_count),
            pm25: Some(self.pm25),
        })
    }
}

/// Execute the add command.
///
/// The area cache is invalidated so a new area shows up in the area list.
pub fn cmd_add<W: Write>(
    store: &Store,
    cache: &AreaCache,
    entry: ManualEntry,
    format: OutputFormat,
    out: &mut W,
) -> Result<SensorReading> {
    let reading = entry.into_reading(OffsetDateTime::now_utc())?;

    store
        .insert_reading(&reading)
        .context("Failed to insert reading")?;
    cache.invalidate();
    info!("Inserted reading from {} in {}", reading.sensor_id, reading.area);

    let rendered = match format {
        OutputFormat::Text => format!(
            "Inserted reading\n{}",
            format_readings_text(std::slice::from_ref(&reading))
        ),
        OutputFormat::Json => as_json(&reading)?,
    };
    out.write_all(rendered.as_bytes())?;

    Ok(reading)
}
