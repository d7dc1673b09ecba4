//! Interactive gyroscope HIL simulation.
//!
//! Wires the operator console, the stdin reader, and the real-time tick
//! loop together, then writes the run artifacts.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `hil-config.yaml` (or the path given as the
//!    first argument)
//! 2. Initialize structured logging (tracing) on stderr
//! 3. Print operator instructions
//! 4. Start the stdin reader thread
//! 5. Run the tick loop until the duration elapses or the operator stops
//! 6. Write the log and plot artifacts

mod console;
mod error;

use std::path::{Path, PathBuf};

use hil_core::command::CommandChannel;
use hil_core::config::SimulationConfig;
use hil_core::input::{self, ChannelInput};
use hil_core::report;
use hil_core::runner::{self, SimulationResult};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::console::StdoutConsole;
use crate::error::SimError;

/// Default configuration file, relative to the working directory.
const DEFAULT_CONFIG_PATH: &str = "hil-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration is invalid, the input reader cannot
/// start, or an artifact cannot be written.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let Some(config_path) = config_path_from_args() else {
        print_usage();
        return Ok(());
    };

    // 1. Load configuration.
    let config = load_config(&config_path)?;

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    if !config_path.exists() {
        info!(config_path = %config_path.display(), "Config file not found, using defaults");
    }
    info!(
        config_path = %config_path.display(),
        duration_secs = config.simulation.duration_secs,
        dt_secs = config.simulation.dt_secs,
        seed = ?config.simulation.seed,
        "Configuration loaded"
    );

    // 3. Operator instructions.
    console::print_instructions();

    // 4. Operator input.
    let input = input::spawn_stdin_reader().map_err(SimError::from)?;

    // 5. Run.
    let result = run(&config, input).await?;
    runner::log_simulation_end(&result);

    // 6. Artifacts.
    write_artifacts(&config, &result)?;
    println!(
        "\nSimulation complete. Log saved to '{}' and plot saved to '{}'.",
        config.output.log_path.display(),
        config.output.plot_path.display()
    );

    Ok(())
}

/// Run the tick loop with the configured noise source.
async fn run(config: &SimulationConfig, input: ChannelInput) -> Result<SimulationResult, SimError> {
    let params = config.sensor.to_params()?;
    let mut commands = CommandChannel::new(input);
    let mut console = StdoutConsole::new();

    let result = if let Some(seed) = config.simulation.seed {
        let mut rng = StdRng::seed_from_u64(seed);
        runner::run_simulation(&config.simulation, params, &mut commands, &mut rng, &mut console)
            .await?
    } else {
        let mut rng = rand::rng();
        runner::run_simulation(&config.simulation, params, &mut commands, &mut rng, &mut console)
            .await?
    };
    Ok(result)
}

/// Write the log and plot artifacts for a finished run.
fn write_artifacts(config: &SimulationConfig, result: &SimulationResult) -> Result<(), SimError> {
    report::write_log(&config.output.log_path, &result.samples)?;
    info!(path = %config.output.log_path.display(), rows = result.samples.len(), "Log written");
    report::write_plot(&config.output.plot_path, &result.samples)?;
    info!(path = %config.output.plot_path.display(), "Plot written");
    Ok(())
}

/// Load configuration, falling back to defaults when the file is missing.
fn load_config(path: &Path) -> Result<SimulationConfig, SimError> {
    if path.exists() {
        Ok(SimulationConfig::from_file(path)?)
    } else {
        let config = SimulationConfig::default();
        config.validate()?;
        Ok(config)
    }
}

/// Config path from the first argument, or `None` when help was requested.
fn config_path_from_args() -> Option<PathBuf> {
    match std::env::args_os().nth(1) {
        Some(arg) if arg == "-h" || arg == "--help" => None,
        Some(arg) => Some(PathBuf::from(arg)),
        None => Some(PathBuf::from(DEFAULT_CONFIG_PATH)),
    }
}

fn print_usage() {
    println!("Usage: hil-sim [CONFIG]");
    println!();
    println!("Runs the interactive gyroscope simulation. CONFIG defaults to {DEFAULT_CONFIG_PATH};");
    println!("built-in defaults are used when it does not exist.");
    println!();
    console::print_instructions();
}
