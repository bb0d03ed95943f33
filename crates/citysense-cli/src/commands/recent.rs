//! Recent command - newest readings first.

use std::io::Write;

use anyhow::{Context, Result};
use citysense_core::recent_readings;
use citysense_store::RecordStore;

use crate::cli::OutputFormat;
use crate::format::{as_json, format_readings_text};

/// Execute the recent command.
pub fn cmd_recent<S: RecordStore + ?Sized, W: Write>(
    store: &S,
    limit: u32,
    format: OutputFormat,
    out: &mut W,
) -> Result<()> {
    let readings = recent_readings(store, limit).context("Failed to load recent readings")?;

    let rendered = match format {
        OutputFormat::Text => format_readings_text(&readings),
        OutputFormat::Json => as_json(&readings)?,
    };
    out.write_all(rendered.as_bytes())?;
    Ok(())
}
