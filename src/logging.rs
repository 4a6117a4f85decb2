use anyhow::{Context, Result};
use log::LevelFilter;
use simple_logger::{set_up_color_terminal, SimpleLogger};

/// Installs the global logger. `RUST_LOG` still wins over `level` when set.
pub fn init_logging(level: LevelFilter) -> Result<()> {
    set_up_color_terminal();
    SimpleLogger::new()
        .with_level(level)
        .env()
        .init()
        .context("Failed to install logger")?;
    Ok(())
}
