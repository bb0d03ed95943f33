//! Areas command - list distinct areas.

use std::io::Write;

use anyhow::{Context, Result};
use citysense_core::AreaCache;
use citysense_store::RecordStore;

use crate::cli::OutputFormat;
use crate::format::{as_json, format_areas_text};

/// Execute the areas command.
pub fn cmd_areas<S: RecordStore + ?Sized, W: Write>(
    store: &S,
    cache: &AreaCache,
    format: OutputFormat,
    out: &mut W,
) -> Result<()> {
    let areas = cache.areas(store).context("Failed to list areas")?;

    let rendered = match format {
        OutputFormat::Text => format_areas_text(&areas),
        OutputFormat::Json => as_json(&areas)?,
    };
    out.write_all(rendered.as_bytes())?;
    Ok(())
}
