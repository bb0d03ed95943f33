//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Output format for commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    /// Resolve the format: an explicit flag wins over the config value.
    pub fn resolve(flag: Option<Self>, config: Option<&str>) -> Self {
        flag.or_else(|| config.and_then(|s| Self::from_str(s, true).ok()))
            .unwrap_or_default()
    }
}

/// Reusable output format arguments
#[derive(Debug, Clone, Args)]
pub struct OutputArgs {
    /// Output format (defaults to the config value, then text)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,
}

#[derive(Parser)]
#[command(name = "citysense")]
#[command(
    author,
    version,
    about = "Dashboard for city environmental sensor readings",
    long_about = None
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the config file
    #[arg(long, global = true, env = "CITYSENSE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Path to the readings database (overrides the config file)
    #[arg(long, global = true, env = "CITYSENSE_DB")]
    pub database: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show aggregations, KPIs and abnormal readings
    Dashboard {
        /// Area to include; repeat for several. Defaults to the config
        /// selection, and an empty selection shows every area.
        #[arg(short, long = "area", value_name = "AREA")]
        areas: Vec<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// List the distinct areas in the database
    Areas {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Show the most recently timestamped readings
    Recent {
        /// Number of readings to show (defaults to the config value)
        #[arg(short = 'n', long)]
        limit: Option<u32>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Insert a single reading
    Add {
        /// Area the sensor belongs to
        #[arg(short, long)]
        area: String,

        /// Sensor identifier (a random UUID when omitted)
        #[arg(long)]
        sensor_id: Option<String>,

        /// Reading time, e.g. 2024-05-01T08:30 (defaults to now, UTC)
        #[arg(long)]
        timestamp: Option<String>,

        /// Noise level in dB (0-150)
        #[arg(long, value_parser = parse_noise)]
        noise: i64,

        /// Vehicle count (0-1000)
        #[arg(long, value_parser = parse_traffic)]
        traffic: i64,

        /// PM2.5 concentration (0-500)
        #[arg(long, value_parser = parse_pm25)]
        pm25: i64,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Import readings from a JSON Lines file
    Import {
        /// File with one reading object per line
        file: PathBuf,
    },

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum ConfigAction {
    /// Print the config file path
    Path,
    /// Print the effective configuration
    Show,
    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Largest accepted manual noise value in dB.
pub const MAX_NOISE_DB: i64 = 150;

/// Largest accepted manual traffic count.
pub const MAX_TRAFFIC_COUNT: i64 = 1000;

/// Largest accepted manual PM2.5 value.
pub const MAX_PM25: i64 = 500;

fn parse_measurement(s: &str, name: &str, max: i64) -> Result<i64, String> {
    let value: i64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid whole number", s))?;
    if (0..=max).contains(&value) {
        Ok(value)
    } else {
        Err(format!("{} must be between 0 and {}, got {}", name, max, value))
    }
}

fn parse_noise(s: &str) -> Result<i64, String> {
    parse_measurement(s, "noise", MAX_NOISE_DB)
}

fn parse_traffic(s: &str) -> Result<i64, String> {
    parse_measurement(s, "traffic", MAX_TRAFFIC_COUNT)
}

fn parse_pm25(s: &str) -> Result<i64, String> {
    parse_measurement(s, "pm25", MAX_PM25)
}
