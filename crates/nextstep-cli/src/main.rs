//! Next Step CLI - climbing school bookings from the terminal

mod commands;
mod config;
mod logging;
mod render;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use commands::Commands;
use std::path::PathBuf;
use tracing::{Level, debug, error};

#[derive(Parser)]
#[command(name = "nextstep")]
#[command(about = "Book climbing classes, courses and trainings")]
#[command(version)]
struct Cli {
    /// Set logging level
    #[arg(short = 'l', long, global = true, default_value = "warn")]
    log_level: LogLevel,

    /// Settings file (TOML or YAML)
    #[arg(short = 'c', long, global = true, env = "NEXTSTEP_CONFIG")]
    config: Option<PathBuf>,

    /// Booking server origin, overrides the settings file
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Request timeout in seconds (0 = no timeout)
    #[arg(short = 't', long, global = true)]
    timeout: Option<u64>,

    /// Print raw JSON instead of text where both are available
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init_logging(cli.log_level.into())?;

    let mut settings = config::Settings::load(cli.config.as_deref())?;
    if let Some(base_url) = cli.base_url {
        settings.base_url = base_url;
    }
    if let Some(timeout) = cli.timeout {
        settings.timeout_secs = timeout;
    }
    debug!(base_url = %settings.base_url, state_dir = %settings.state_dir().display(), "Loaded settings");

    let client = commands::build_client(&settings)?;

    if let Err(e) = cli.command.execute(&client, cli.json).await {
        error!("Command failed: {e:#}");
        std::process::exit(1);
    }

    Ok(())
}

#[derive(Clone, Debug, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(log_level: LogLevel) -> Self {
        match log_level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}
