//! Import command - load JSON Lines readings into the database.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use citysense_core::AreaCache;
use citysense_store::{ImportResult, Store};
use tracing::{info, warn};

/// Execute the import command.
///
/// The area cache is invalidated after a successful write, since the file
/// may introduce new areas.
pub fn cmd_import<W: Write>(
    store: &Store,
    cache: &AreaCache,
    file: &Path,
    quiet: bool,
    out: &mut W,
) -> Result<ImportResult> {
    let result = store
        .import_file(file)
        .with_context(|| format!("Failed to import {}", file.display()))?;

    if result.imported > 0 {
        cache.invalidate();
    }

    for error in &result.errors {
        warn!("{}", error);
    }
    info!(
        "Imported {} of {} readings from {}",
        result.imported,
        result.total,
        file.display()
    );

    if !quiet {
        writeln!(
            out,
            "Imported {} readings ({} rejected)",
            result.imported,
            result.errors.len()
        )?;
    }

    Ok(result)
}
