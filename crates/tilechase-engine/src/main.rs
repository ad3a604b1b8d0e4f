//! # Tilechase Engine
//!
//! Headless driver for the Tilechase simulation.
//!
//! Usage: `tilechase [config.toml]`
//!
//! Loads the configuration (defaulting to `tilechase.toml` in the working
//! directory, which is written with default values on first run), builds the
//! grid and population, then runs a scripted player for the configured
//! number of ticks.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

mod app;
mod config;
mod timing;

use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::EngineConfig;

/// Main entry point.
fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("tilechase=info".parse()?))
        .init();

    info!("Tilechase starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = match std::env::args_os().nth(1) {
        Some(path) => EngineConfig::load_from(path),
        None => {
            let config = EngineConfig::load();
            let path = EngineConfig::config_path();
            if !path.exists() {
                if let Err(e) = config.save_to(&path) {
                    warn!("Failed to write default config: {e}");
                }
            }
            config
        },
    };

    let summary = app::run(&config)?;

    info!(
        seed = summary.seed,
        predators_left = summary.predators_left,
        "Tilechase shutdown complete"
    );
    Ok(())
}
