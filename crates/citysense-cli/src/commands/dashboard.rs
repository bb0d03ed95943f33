//! Dashboard command - one full refresh.

use std::io::Write;

use anyhow::{Context, Result};
use citysense_core::{compose_filter, refresh};
use citysense_store::RecordStore;
use tracing::debug;

use crate::cli::OutputFormat;
use crate::format::{as_json, format_dashboard_text};

/// Execute the dashboard command.
///
/// `selection` is the requested area list; empty shows every area.
pub fn cmd_dashboard<S: RecordStore + ?Sized, W: Write>(
    store: &S,
    selection: &[String],
    format: OutputFormat,
    out: &mut W,
) -> Result<()> {
    debug!("Dashboard selection: {:?}", selection);
    let filter = compose_filter(selection);
    let snapshot = refresh(store, &filter).context("Failed to refresh dashboard")?;

    let rendered = match format {
        OutputFormat::Text => format_dashboard_text(&snapshot),
        OutputFormat::Json => as_json(&snapshot)?,
    };
    out.write_all(rendered.as_bytes())?;
    Ok(())
}
