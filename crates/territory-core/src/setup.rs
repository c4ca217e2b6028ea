//! Assembling the initial [`SimulationState`] from configuration.
//!
//! Agents are registered in config order (so the first configured agent is
//! the keyboard-controlled one), then every agent's seed cells are claimed
//! with an RNG derived from the world seed.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use territory_world::{AgentRoster, OwnershipGrid, SeedReport, SeedSpec, WorldError, seed_grid};
use tracing::info;

use crate::clock::TickClock;
use crate::config::SimulationConfig;
use crate::tick::SimulationState;

/// Errors that can occur while building the initial state.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    /// Grid creation, registration, or seeding failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },

    /// The configuration names no agents.
    #[error("no agents configured")]
    NoAgents,
}

/// Build the initial state for a run.
///
/// `seed` drives random seed-cell placement only; per-cell tick draws come
/// from the [`DrawSource`](crate::draws::DrawSource) handed to the runner.
///
/// # Errors
///
/// Returns [`SetupError::NoAgents`] for an empty agent list, or
/// [`SetupError::World`] if the grid size, an agent, or a seed cell is
/// invalid.
pub fn build_state(
    config: &SimulationConfig,
    seed: u64,
) -> Result<(SimulationState, SeedReport), SetupError> {
    let size = config.grid_size();
    let mut grid = OwnershipGrid::new(size)?;
    let mut roster = AgentRoster::new(size);

    let mut specs = Vec::with_capacity(config.agents.len());
    for agent in &config.agents {
        let id = roster.register(&agent.name, agent.symbol, agent.color, agent.start)?;
        specs.push(SeedSpec {
            agent: id,
            cells: agent.seed_cells.clone(),
            random: agent.random_seeds,
        });
    }
    let controlled = specs.first().map(|spec| spec.agent).ok_or(SetupError::NoAgents)?;

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let report = seed_grid(&mut grid, &roster, &specs, &mut rng)?;

    info!(
        width = size.width,
        height = size.height,
        agents = roster.len(),
        seed,
        claimed = report.claimed.len(),
        "Simulation state built"
    );

    let state = SimulationState {
        clock: TickClock::new(),
        grid,
        roster,
        controlled,
        influence: config.influence,
    };
    Ok((state, report))
}
