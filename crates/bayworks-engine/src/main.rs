//! Engine binary for the Bayworks colony simulation.
//!
//! Loads configuration, builds the colony, and runs the tick loop for the
//! configured number of ticks. The binary holds no game rules; everything
//! it does goes through `bayworks-core`.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from `bayworks-config.yaml`, or the path given as
//!    the first argument
//! 3. Build the colony
//! 4. Run the simulation loop
//! 5. Log the result

mod error;

use std::path::PathBuf;

use bayworks_core::colony::Colony;
use bayworks_core::config::SimulationConfig;
use bayworks_core::runner;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

/// Default configuration file, relative to the working directory.
const DEFAULT_CONFIG: &str = "bayworks-config.yaml";

/// Application entry point for the engine.
///
/// # Errors
///
/// Returns an error if configuration cannot be loaded, the colony cannot
/// be built, or a tick fails.
fn main() -> Result<(), EngineError> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("bayworks-engine starting");

    // 2. Load configuration.
    let config = load_config()?;
    info!(
        max_ticks = config.simulation.max_ticks,
        resources = config.resources.len(),
        recipes = config.recipes.len(),
        knowledge = config.knowledge.len(),
        citizens = config.citizens.len(),
        "Configuration loaded"
    );

    // 3. Build the colony.
    let mut colony = Colony::from_config(&config)?;

    // 4. Run the simulation loop.
    let result = runner::run_simulation(&mut colony, config.simulation.max_ticks)?;

    // 5. Log the result.
    runner::log_simulation_end(&result);
    for bay in colony.production_bays() {
        info!(
            bay = bay.name(),
            pool = bay.energy().pool().quantity(),
            reserve = bay.energy().reserve().quantity(),
            volume_used = bay.resources().volume_used(),
            "Production bay final state"
        );
    }
    for bay in colony.research_bays() {
        info!(
            bay = bay.name(),
            researched = bay.repository().len(),
            active = bay.active().map(|k| k.name.as_str()),
            "Research bay final state"
        );
    }

    Ok(())
}

/// Load configuration from the first argument or `bayworks-config.yaml`.
///
/// Falls back to [`SimulationConfig::default`] when no path is given and
/// the default file does not exist.
fn load_config() -> Result<SimulationConfig, EngineError> {
    if let Some(path) = std::env::args_os().nth(1) {
        return Ok(SimulationConfig::from_file(&PathBuf::from(path))?);
    }
    let config_path = PathBuf::from(DEFAULT_CONFIG);
    if config_path.exists() {
        Ok(SimulationConfig::from_file(&config_path)?)
    } else {
        info!("Config file not found, using defaults");
        Ok(SimulationConfig::default())
    }
}
