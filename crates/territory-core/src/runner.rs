//! The simulation loop.
//!
//! [`run_simulation`] drives ticks at a fixed cadence. Each iteration:
//!
//! 1. Honors a pending stop request or an expired time limit.
//! 2. Drains at most one input event without blocking. A move is applied to
//!    the controlled avatar; a terminate ends the run before the tick, so no
//!    tick is ever abandoned half way.
//! 3. Runs one tick and hands the result to the [`TickCallback`].
//! 4. Honors the tick limit, then sleeps for the tick interval.
//!
//! Events left in the channel stay there for later ticks.

use std::sync::Arc;

use territory_types::{InputEvent, Point};
use territory_world::WorldError;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::mpsc::error::TryRecvError;
use tracing::{debug, info, warn};

use crate::draws::DrawSource;
use crate::operator::{OperatorState, SimulationEndReason};
use crate::tick::{self, SimulationState, TickError, TickSummary};

/// Errors that can occur during the simulation run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// A tick execution failed.
    #[error("tick error: {source}")]
    Tick {
        /// The underlying tick error.
        #[from]
        source: TickError,
    },

    /// Applying an input event failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },
}

/// Result of the simulation run.
#[derive(Debug)]
pub struct SimulationResult {
    /// The reason the simulation ended.
    pub end_reason: SimulationEndReason,
    /// The last tick summary, if any tick completed.
    pub final_summary: Option<TickSummary>,
    /// Total number of ticks executed.
    pub total_ticks: u64,
}

/// Callback invoked after each tick completes.
///
/// The terminal renderer and the headless reporter implement this. The
/// state is read-only: presentation never feeds back into the simulation.
pub trait TickCallback: Send {
    /// Called after a tick completes successfully.
    fn on_tick(&mut self, summary: &TickSummary, state: &SimulationState);
}

/// A no-op tick callback for testing.
pub struct NoOpCallback;

impl TickCallback for NoOpCallback {
    fn on_tick(&mut self, _summary: &TickSummary, _state: &SimulationState) {}
}

/// What applying one input event did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    /// The controlled avatar now stands here.
    Moved(Point),
    /// The run should end.
    Terminate,
}

/// Apply one input event to the controlled agent.
///
/// # Errors
///
/// Returns [`RunnerError::World`] if the controlled agent is not in the
/// roster.
pub fn apply_input(
    state: &mut SimulationState,
    event: InputEvent,
) -> Result<InputOutcome, RunnerError> {
    match event {
        InputEvent::Move(direction) => {
            let position = state.roster.move_agent(state.controlled, direction)?;
            debug!(?direction, %position, "avatar moved");
            Ok(InputOutcome::Moved(position))
        }
        InputEvent::Terminate => Ok(InputOutcome::Terminate),
    }
}

/// Run the simulation loop until a termination condition is met.
///
/// # Arguments
///
/// * `state` - Mutable simulation state (grid, agents, clock)
/// * `draws` - Per-cell draw source
/// * `operator` - Shared run control state
/// * `input` - Receiving half of the input channel
/// * `callback` - Called after each tick for presentation
///
/// # Errors
///
/// Returns [`RunnerError`] if a tick execution fails unrecoverably.
pub async fn run_simulation(
    state: &mut SimulationState,
    draws: &dyn DrawSource,
    operator: &Arc<OperatorState>,
    input: &mut UnboundedReceiver<InputEvent>,
    callback: &mut dyn TickCallback,
) -> Result<SimulationResult, RunnerError> {
    let mut last_summary: Option<TickSummary> = None;
    let mut total_ticks: u64 = 0;
    let mut input_closed = false;

    info!(
        max_ticks = operator.max_ticks(),
        max_real_time_seconds = operator.max_real_time_seconds(),
        tick_interval_ms = operator.tick_interval_ms(),
        "Simulation starting"
    );

    loop {
        // --- Check stop request (before tick) ---
        if operator.is_stop_requested() {
            info!("Operator stop requested");
            return Ok(finish(SimulationEndReason::OperatorStop, last_summary, total_ticks));
        }

        // --- Check time limit (before tick) ---
        if operator.time_limit_reached() {
            info!(
                max_seconds = operator.max_real_time_seconds(),
                elapsed = operator.elapsed_seconds(),
                "Real-time limit reached"
            );
            return Ok(finish(
                SimulationEndReason::MaxRealTimeReached,
                last_summary,
                total_ticks,
            ));
        }

        // --- Drain at most one input event ---
        match input.try_recv() {
            Ok(event) => {
                if apply_input(state, event)? == InputOutcome::Terminate {
                    info!("Terminate requested");
                    return Ok(finish(
                        SimulationEndReason::TerminateRequested,
                        last_summary,
                        total_ticks,
                    ));
                }
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                if !input_closed {
                    warn!("Input channel closed, continuing without input");
                    input_closed = true;
                }
            }
        }

        // --- Execute tick ---
        let summary = tick::run_tick(state, draws)?;
        total_ticks = total_ticks.saturating_add(1);

        // --- Notify callback ---
        callback.on_tick(&summary, state);

        // --- Check tick limit (after tick) ---
        if operator.tick_limit_reached(summary.tick) {
            info!(
                tick = summary.tick,
                max_ticks = operator.max_ticks(),
                "Tick limit reached"
            );
            return Ok(finish(
                SimulationEndReason::MaxTicksReached,
                Some(summary),
                total_ticks,
            ));
        }

        last_summary = Some(summary);

        // --- Sleep for tick interval ---
        let interval_ms = operator.tick_interval_ms();
        if interval_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(interval_ms)).await;
        }
    }
}

const fn finish(
    reason: SimulationEndReason,
    final_summary: Option<TickSummary>,
    total_ticks: u64,
) -> SimulationResult {
    SimulationResult {
        end_reason: reason,
        final_summary,
        total_ticks,
    }
}

/// Log the simulation end sequence.
pub fn log_simulation_end(result: &SimulationResult) {
    info!(
        reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        final_tick = result.final_summary.as_ref().map(|s| s.tick),
        "Simulation ended"
    );

    if let Some(ref summary) = result.final_summary {
        info!(
            tick = summary.tick,
            territory = ?summary.territory.per_agent,
            unowned = summary.territory.unowned,
            "Final tick summary"
        );
    } else {
        warn!("Simulation ended with no ticks executed");
    }
}
