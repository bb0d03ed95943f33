//! Record store adapters for city sensor readings.
//!
//! This crate defines the [`RecordStore`] contract the analytics engine runs
//! against, the query builders passed through it, and two implementations:
//!
//! - [`Store`]: SQLite-backed, file or in-memory
//! - [`MemoryStore`]: a plain vector of readings
//!
//! # Features
//!
//! - Area selection and abnormal-only filtering ([`ReadingFilter`])
//! - Grouped averages by area, by UTC hour, or overall ([`Grouping`])
//! - Timestamp-ordered, limited listings ([`Projection`])
//! - Uncapped counts and the distinct-area list
//! - JSON Lines import for loading readings
//!
//! # Example
//!
//! ```no_run
//! use citysense_store::{Grouping, ReadingFilter, RecordStore, Store};
//! use citysense_types::MetricField;
//!
//! let store = Store::open_default()?;
//!
//! let filter = ReadingFilter::new().areas(["Industrial Zone"]);
//! let by_hour = store.run_grouping(&filter, &Grouping::by_hour(MetricField::TrafficCount))?;
//! # Ok::<(), citysense_store::Error>(())
//! ```

mod error;
mod grouping;
mod memory;
mod queries;
mod schema;
mod store;
mod traits;

pub use error::{Error, Result};
pub use grouping::{GroupRow, GroupValue, finish_grouping};
pub use memory::MemoryStore;
pub use queries::{GroupKey, GroupOrder, Grouping, Projection, ReadingFilter};
pub use store::{ImportResult, Store};
pub use traits::RecordStore;

/// Default database path following platform conventions.
///
/// - Linux: `~/.local/share/citysense/readings.db`
/// - macOS: `~/Library/Application Support/citysense/readings.db`
/// - Windows: `C:\Users\<user>\AppData\Local\citysense\readings.db`
pub fn default_db_path() -> std::path::PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("citysense")
        .join("readings.db")
}
