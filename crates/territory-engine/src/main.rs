//! Terminal binary for the Territory simulation.
//!
//! Wires configuration, the initial grid, the keyboard task, and the
//! renderer (or headless reporter) around the core tick loop.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `territory-config.yaml` (or `TERRITORY_CONFIG`)
//! 2. Initialize structured logging (tracing, to stderr)
//! 3. Resolve the world seed and build the initial state
//! 4. Create operator state from simulation bounds
//! 5. Start the keyboard task and terminal, or the headless reporter
//! 6. Run the simulation loop
//! 7. Restore the terminal and log the result

mod error;
mod headless;
mod input;
mod render;

use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use territory_core::config::SimulationConfig;
use territory_core::draws::SeededDraws;
use territory_core::operator::OperatorState;
use territory_core::runner::{self, SimulationResult};
use territory_core::setup::build_state;
use territory_core::tick::SimulationState;
use territory_types::InputEvent;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::headless::HeadlessReporter;
use crate::render::{TerminalGuard, TerminalRenderer};

const DEFAULT_CONFIG_PATH: &str = "territory-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if any initialization step or the simulation itself fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let (config, loaded_from) = load_config()?;

    // 2. Initialize structured logging. With the UI on the same tty, log
    // lines would land on the alternate screen, so stay quiet unless
    // RUST_LOG asks otherwise or stderr is redirected.
    let ui_on_stderr = !config.display.headless && std::io::stderr().is_terminal();
    let default_filter = if ui_on_stderr {
        "off"
    } else {
        config.logging.filter.as_str()
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    info!("territory-engine starting");
    match loaded_from {
        Some(path) => info!(path = %path.display(), "Configuration loaded"),
        None => info!("Config file not found, using defaults"),
    }
    config.validate()?;

    // 3. Resolve the seed and build the initial state.
    let seed = config.world.seed.unwrap_or_else(rand::random);
    let (mut state, seeds) = build_state(&config, seed)?;
    info!(
        seed,
        width = config.world.width,
        height = config.world.height,
        agents = state.roster.len(),
        seeds_claimed = seeds.claimed.len(),
        seeds_skipped = seeds.skipped,
        "World seeded"
    );
    let draws = SeededDraws::new(seed);

    // 4. Create operator state.
    let operator = Arc::new(OperatorState::new(
        config.world.tick_interval_ms,
        &config.simulation,
    ));

    // 5-6. Run under the chosen front end.
    let (tx, mut rx) = mpsc::unbounded_channel();
    let result = if config.display.headless {
        let stopper = Arc::clone(&operator);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Ctrl-C received, stopping");
                stopper.request_stop();
            }
        });

        let mut reporter = HeadlessReporter::new(config.display.summary_every_ticks, &state);
        let result =
            runner::run_simulation(&mut state, &draws, &operator, &mut rx, &mut reporter).await?;
        drop(tx);

        if let Some(path) = &config.display.report_path {
            reporter
                .report(seed, &state, &result)
                .write_json(Path::new(path))?;
        }
        result
    } else {
        run_in_terminal(&mut state, &draws, &operator, tx, &mut rx).await?
    };

    // 7. Log results.
    runner::log_simulation_end(&result);
    info!(
        end_reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        "territory-engine shutdown complete"
    );

    Ok(())
}

/// Run with the keyboard task and the full-screen renderer.
///
/// The terminal is restored before this returns, whether the run succeeded
/// or not.
async fn run_in_terminal(
    state: &mut SimulationState,
    draws: &SeededDraws,
    operator: &Arc<OperatorState>,
    tx: mpsc::UnboundedSender<InputEvent>,
    rx: &mut UnboundedReceiver<InputEvent>,
) -> Result<SimulationResult, EngineError> {
    let guard = TerminalGuard::enter()?;
    let mut renderer = TerminalRenderer::stdout()?;
    renderer.draw(state, None)?;

    let stop_input = Arc::new(AtomicBool::new(false));
    let input_task = input::spawn_input_task(tx, Arc::clone(&stop_input));

    let result = runner::run_simulation(state, draws, operator, rx, &mut renderer).await;

    stop_input.store(true, Ordering::Release);
    if let Err(err) = input_task.await {
        warn!(error = %err, "input task did not shut down cleanly");
        drop(guard);
        return Err(EngineError::InputTask {
            message: err.to_string(),
        });
    }
    drop(guard);

    Ok(result?)
}

/// Load the simulation configuration.
///
/// Reads `TERRITORY_CONFIG` if set, otherwise `territory-config.yaml` in the
/// working directory. A missing file yields the defaults with environment
/// overrides applied.
fn load_config() -> Result<(SimulationConfig, Option<PathBuf>), EngineError> {
    let config_path = std::env::var_os("TERRITORY_CONFIG")
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    if config_path.exists() {
        let config = SimulationConfig::from_file(&config_path)?;
        Ok((config, Some(config_path)))
    } else {
        let mut config = SimulationConfig::default();
        config.apply_env_overrides();
        Ok((config, None))
    }
}
