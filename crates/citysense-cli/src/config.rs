//! Configuration file management.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cli::OutputFormat;

/// Default area cache lifetime in seconds.
pub const DEFAULT_AREA_CACHE_TTL_SECS: u64 = 60;

/// Longest accepted area cache lifetime in seconds.
pub const MAX_AREA_CACHE_TTL_SECS: u64 = 3600;

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Readings database path. Defaults to the platform data directory.
    pub database: Option<PathBuf>,

    /// Default area selection for `dashboard`. Empty means every area.
    pub areas: Vec<String>,

    /// How long the distinct-area list stays cached, in seconds.
    ///
    /// A single CLI invocation reads the list at most once, so this only
    /// changes behavior for programs that keep an `AreaCache` alive.
    pub area_cache_ttl_secs: u64,

    /// Default number of readings shown by `recent`.
    pub recent_limit: u32,

    /// Default output format ("text" or "json").
    pub format: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: None,
            areas: Vec::new(),
            area_cache_ttl_secs: DEFAULT_AREA_CACHE_TTL_SECS,
            recent_limit: citysense_core::DEFAULT_RECENT_LIMIT,
            format: None,
        }
    }
}

impl Config {
    /// Load configuration from `path`, or from the default path.
    ///
    /// A missing file yields the default configuration, so `config init`
    /// can create it later.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(default_config_path);
        if path.exists() {
            Self::load_validated(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Read {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.as_ref().to_path_buf(),
            source: e,
        })
    }

    /// Save configuration to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;

        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        std::fs::write(path.as_ref(), content).map_err(|e| ConfigError::Write {
            path: path.as_ref().to_path_buf(),
            source: e,
        })
    }

    /// Validate the configuration, reporting every problem at once.
    ///
    /// ```
    /// use citysense_cli::config::Config;
    ///
    /// Config::default().validate().expect("default config is valid");
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if !(1..=MAX_AREA_CACHE_TTL_SECS).contains(&self.area_cache_ttl_secs) {
            errors.push(ValidationError {
                field: "area_cache_ttl_secs".to_string(),
                message: format!(
                    "must be between 1 and {MAX_AREA_CACHE_TTL_SECS}, got {}",
                    self.area_cache_ttl_secs
                ),
            });
        }

        if self.recent_limit == 0 {
            errors.push(ValidationError {
                field: "recent_limit".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        if let Some(ref format) = self.format {
            if <OutputFormat as clap::ValueEnum>::from_str(format, true).is_err() {
                errors.push(ValidationError {
                    field: "format".to_string(),
                    message: format!("unknown format '{format}', expected 'text' or 'json'"),
                });
            }
        }

        if let Some(ref database) = self.database {
            if database.as_os_str().is_empty() {
                errors.push(ValidationError {
                    field: "database".to_string(),
                    message: "path must not be empty".to_string(),
                });
            }
        }

        for (i, area) in self.areas.iter().enumerate() {
            if area.is_empty() {
                errors.push(ValidationError {
                    field: format!("areas[{i}]"),
                    message: "area must not be empty".to_string(),
                });
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Load and validate configuration from a file.
    pub fn load_validated<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = Self::load(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Database path: the command-line value, else the config value, else
    /// the platform default.
    pub fn database_path(&self, cli_database: Option<&Path>) -> PathBuf {
        cli_database
            .map(Path::to_path_buf)
            .or_else(|| self.database.clone())
            .unwrap_or_else(citysense_store::default_db_path)
    }

    /// Area cache lifetime.
    pub fn area_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.area_cache_ttl_secs)
    }
}

/// Errors raised while loading or saving the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),
    #[error("Failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    Validation(Vec<ValidationError>),
}

/// A single invalid configuration field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The field path (e.g., `recent_limit` or `areas[2]`).
    pub field: String,
    /// Description of the validation failure.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Default configuration file path.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("citysense")
        .join("config.toml")
}
