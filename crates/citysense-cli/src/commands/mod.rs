//! Command implementations for the CLI.

mod add;
mod areas;
mod config;
mod dashboard;
mod import;
mod recent;

use std::path::Path;

use anyhow::{Context, Result};
use citysense_store::Store;

pub use add::{ManualEntry, cmd_add};
pub use areas::cmd_areas;
pub use config::cmd_config;
pub use dashboard::cmd_dashboard;
pub use import::cmd_import;
pub use recent::cmd_recent;

/// Open the readings database, creating it if needed.
pub fn open_store(path: &Path) -> Result<Store> {
    Store::open(path).with_context(|| format!("Failed to open database {}", path.display()))
}
