//! Config command - manage the configuration file.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::cli::ConfigAction;
use crate::config::Config;

/// Execute the config command.
///
/// `path` is the config file in use and `config` its loaded contents.
pub fn cmd_config<W: Write>(
    action: ConfigAction,
    path: &Path,
    config: &Config,
    out: &mut W,
) -> Result<()> {
    match action {
        ConfigAction::Path => {
            writeln!(out, "{}", path.display())?;
        }
        ConfigAction::Show => {
            let content =
                toml::to_string_pretty(config).context("Failed to serialize config")?;
            write!(out, "{content}")?;
        }
        ConfigAction::Init { force } => {
            if path.exists() && !force {
                bail!(
                    "Config file already exists at {} (use --force to overwrite)",
                    path.display()
                );
            }
            Config::default().save(path)?;
            writeln!(out, "Wrote default config to {}", path.display())?;
        }
    }
    Ok(())
}
