//! Command-line dashboard for city environmental sensor readings.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `dashboard` | Aggregations, KPIs and abnormal readings for an area selection |
//! | `areas` | Distinct areas in the database |
//! | `recent` | Most recently timestamped readings |
//! | `import` | Load readings from a JSON Lines file |
//! | `config` | Manage the configuration file |
//! | `completions` | Generate shell completions |
//!
//! # Output Formats
//!
//! - **Text** (default): aligned, human-readable tables
//! - **JSON**: the dashboard snapshot or reading list, pretty-printed
//!
//! Logs go to stderr, so JSON on stdout can be piped.
//!
//! # Configuration
//!
//! The CLI reads `~/.config/citysense/config.toml` (or platform equivalent),
//! or the file given with `--config`:
//!
//! - `database`: readings database path
//! - `areas`: default dashboard selection
//! - `area_cache_ttl_secs`: area list cache lifetime (1-3600)
//! - `recent_limit`: default row count for `recent`
//! - `format`: default output format
//!
//! # Environment Variables
//!
//! - `CITYSENSE_DB`: database path (overridden by `--database`)
//! - `CITYSENSE_CONFIG`: config file path (overridden by `--config`)
//! - `RUST_LOG`: log filter when neither `--verbose` nor `--quiet` is given
//!
//! # Examples
//!
//! ```bash
//! citysense import readings.jsonl
//! citysense dashboard --area "City Center" --area "Park Area"
//! citysense dashboard --format json > snapshot.json
//! citysense recent -n 20
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod format;
