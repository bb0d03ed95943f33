use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use citysense_cli::cli::{Cli, Commands, ConfigAction, OutputFormat};
use citysense_cli::commands::{
    ManualEntry, cmd_add, cmd_areas, cmd_config, cmd_dashboard, cmd_import, cmd_recent,
    open_store,
};
use citysense_cli::config::{Config, default_config_path};
use citysense_core::AreaCache;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Completions need neither logging nor config
    if let Commands::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "citysense", &mut io::stdout());
        return Ok(());
    }

    let filter = if cli.quiet {
        EnvFilter::new("warn")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let config_path = cli.config.clone().unwrap_or_else(default_config_path);

    // `config init --force` must be able to replace an unreadable file
    if let Commands::Config { action: action @ ConfigAction::Init { .. } } = &cli.command {
        return cmd_config(action.clone(), &config_path, &Config::default(), &mut io::stdout());
    }

    let config = Config::load_or_default(cli.config.as_deref()).context("Failed to load config")?;
    // Lives for this one command; the TTL only matters to long-running embedders
    let cache = AreaCache::new(config.area_cache_ttl());
    let db_path = config.database_path(cli.database.as_deref());

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Dashboard { areas, output } => {
            let store = open_store(&db_path)?;
            let selection = if areas.is_empty() { &config.areas } else { &areas };
            let format = OutputFormat::resolve(output.format, config.format.as_deref());
            cmd_dashboard(&store, selection, format, &mut out)?;
        }
        Commands::Areas { output } => {
            let store = open_store(&db_path)?;
            let format = OutputFormat::resolve(output.format, config.format.as_deref());
            cmd_areas(&store, &cache, format, &mut out)?;
        }
        Commands::Recent { limit, output } => {
            let store = open_store(&db_path)?;
            let limit = limit.unwrap_or(config.recent_limit);
            let format = OutputFormat::resolve(output.format, config.format.as_deref());
            cmd_recent(&store, limit, format, &mut out)?;
        }
        Commands::Add {
            area,
            sensor_id,
            timestamp,
            noise,
            traffic,
            pm25,
            output,
        } => {
            let store = open_store(&db_path)?;
            let entry = ManualEntry {
                area,
                sensor_id,
                timestamp,
                noise_db: noise,
                traffic_count: traffic,
                pm25,
            };
            let format = OutputFormat::resolve(output.format, config.format.as_deref());
            cmd_add(&store, &cache, entry, format, &mut out)?;
        }
        Commands::Import { file } => {
            let store = open_store(&db_path)?;
            cmd_import(&store, &cache, &file, cli.quiet, &mut out)?;
        }
        Commands::Config { action } => {
            cmd_config(action, &config_path, &config, &mut out)?;
        }
        Commands::Completions { .. } => unreachable!("handled before logging setup"),
    }

    out.flush()?;
    Ok(())
}
