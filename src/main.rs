use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use rusty_vk_bootstrap::{config::LogLevel, init_logging, window, NegotiationConfig};
use tracing::debug;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML file with window, validation, device and swap chain settings
    #[arg(long)]
    config: Option<PathBuf>,
    /// Force validation layers on or off
    #[arg(long)]
    validation: Option<bool>,
    /// Overrides `log_level` from the config file
    #[arg(long, value_enum)]
    log_level: Option<LogLevel>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => NegotiationConfig::load(path)?,
        None => NegotiationConfig::default(),
    };
    if let Some(enabled) = args.validation {
        config.validation.enabled = enabled;
    }
    if let Some(level) = args.log_level {
        config.log_level = level;
    }

    init_logging(config.log_level.into())?;
    debug!("{:?}", config);

    window::run(config)
}
