mod commands;
mod utils;

use std::path::{Path, PathBuf};

use anyhow::Result;
use calnotify_core::config::Settings;
use chrono::{DateTime, FixedOffset};
use clap::{Parser, Subcommand};

use commands::print::View;

#[derive(Parser)]
#[command(name = "calnotify")]
#[command(about = "Desktop reminders and terminal calendar views for your calendars")]
struct Cli {
    /// Path to the config file (default: ~/.config/calnotify/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch upcoming events from every calendar and cache them
    Get,
    /// Send notifications for reminders due now, using cached events
    Notify {
        /// Evaluate reminders at this instant instead of now (RFC 3339)
        #[arg(long, value_parser = parse_instant)]
        at: Option<DateTime<FixedOffset>>,

        /// Print notification commands instead of running them
        #[arg(long)]
        dry_run: bool,
    },
    /// Print events to the console
    Print {
        #[arg(value_enum, default_value_t = View::Day)]
        period: View,

        /// Render cached events instead of querying providers
        #[arg(long)]
        cached: bool,
    },
}

fn parse_instant(s: &str) -> Result<DateTime<FixedOffset>, String> {
    DateTime::parse_from_rfc3339(s).map_err(|e| format!("Invalid instant '{s}': {e}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    utils::logger::init(cli.verbose);

    let settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Get => {
            require_calendars(&settings, cli.config.as_deref())?;
            commands::get::run(&settings).await
        }
        Commands::Notify { at, dry_run } => commands::notify::run(&settings, at, dry_run),
        Commands::Print { period, cached } => {
            if !cached {
                require_calendars(&settings, cli.config.as_deref())?;
            }
            commands::print::run(&settings, period.into(), cached).await
        }
    }
}

fn require_calendars(settings: &Settings, config: Option<&Path>) -> Result<()> {
    if settings.enabled_calendars().next().is_none() {
        let config_path = match config {
            Some(path) => path.to_path_buf(),
            None => Settings::config_path()?,
        };
        anyhow::bail!(
            "No calendars configured.\n\n\
            Add one to {}:\n  \
            [calendars.personal]\n  \
            provider = \"google\"",
            config_path.display()
        );
    }

    Ok(())
}
