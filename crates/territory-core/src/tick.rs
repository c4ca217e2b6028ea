//! The tick driver.
//!
//! One tick is an indivisible unit:
//!
//! 1. Advance the clock.
//! 2. Snapshot every avatar position.
//! 3. For every cell, apply the transition rule against `current` only,
//!    writing `next`. Rows run in parallel; every cell draws from
//!    `(tick, cell index)` so visit order cannot affect the result.
//! 4. Count changed cells, swap the buffers, clear the stale one.
//!
//! The tick is deterministic given the same initial state and draw source.

use serde::{Deserialize, Serialize};
use territory_types::AgentId;
use territory_world::{AgentRoster, OwnershipGrid, TerritoryCounts};
use tracing::debug;

use crate::clock::TickClock;
use crate::draws::DrawSource;
use crate::influence::InfluenceParams;
use crate::transition;

/// Errors that can occur during tick execution.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// A clock operation failed.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: crate::clock::ClockError,
    },
}

/// Everything a tick reads or writes.
#[derive(Debug, Clone)]
pub struct SimulationState {
    /// Tick counter.
    pub clock: TickClock,
    /// Double-buffered ownership grid.
    pub grid: OwnershipGrid,
    /// Agents in registration order.
    pub roster: AgentRoster,
    /// The agent whose avatar receives input events.
    pub controlled: AgentId,
    /// Influence model and transition constants.
    pub influence: InfluenceParams,
}

/// Summary of a single tick's execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickSummary {
    /// The tick number that was executed.
    pub tick: u64,
    /// Territory held after the tick.
    pub territory: TerritoryCounts,
    /// Cells whose owner changed during the tick.
    pub changed_cells: usize,
}

/// Execute one tick.
///
/// # Errors
///
/// Returns [`TickError::Clock`] if the tick counter overflows; the grid is
/// untouched in that case.
pub fn run_tick(
    state: &mut SimulationState,
    draws: &dyn DrawSource,
) -> Result<TickSummary, TickError> {
    let tick = state.clock.advance()?;
    let positions = state.roster.positions();
    let params = state.influence;
    let size = state.grid.size();

    state.grid.fill_next(|cell, current| {
        let index = size.index_of(cell).unwrap_or_default();
        transition::next_owner(cell, current, &positions, &params, draws.draws(tick, index))
    });

    let changed_cells = state.grid.changed_cells();
    state.grid.advance();

    let territory = state.grid.territory_counts(state.roster.len());
    debug!(
        tick,
        changed_cells,
        unowned = territory.unowned,
        owned = territory.owned_total(),
        "tick complete"
    );

    Ok(TickSummary {
        tick,
        territory,
        changed_cells,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use territory_types::{AgentColor, GridSize, Owner, Point};

    use super::*;
    use crate::draws::{FixedDraws, ScriptedDraws, SeededDraws};
    use crate::transition::CellDraws;

    const A: Owner = Some(AgentId(0));

    fn state(width: u32, height: u32, avatar: Point) -> SimulationState {
        let size = GridSize::new(width, height);
        let mut roster = AgentRoster::new(size);
        let controlled = roster
            .register("david", 'B', AgentColor::Green, avatar)
            .unwrap();
        SimulationState {
            clock: TickClock::new(),
            grid: OwnershipGrid::new(size).unwrap(),
            roster,
            controlled,
            influence: InfluenceParams::default(),
        }
    }

    #[test]
    fn tick_advances_clock_and_reports() {
        let mut s = state(4, 4, Point::new(0, 0));
        s.grid.seed(Point::new(1, 1), A).unwrap();
        let summary = run_tick(&mut s, &FixedDraws(CellDraws::new(0.0, 0.0))).unwrap();
        assert_eq!(summary.tick, 1);
        assert_eq!(s.clock.tick(), 1);
        assert_eq!(summary.territory.owned_by(0), 1);
        assert_eq!(summary.changed_cells, 0);
    }

    #[test]
    fn swap_leaves_fresh_next_and_computed_current() {
        // No owned cells anywhere: every cell computes to unowned.
        let mut s = state(6, 5, Point::new(0, 0));
        run_tick(&mut s, &FixedDraws(CellDraws::new(0.95, 0.3))).unwrap();
        assert!(s.grid.next_view().cells().iter().all(Option::is_none));
        assert!(s.grid.view().cells().iter().all(Option::is_none));
    }

    #[test]
    fn takeover_spreads_to_every_neighbor() {
        // z = 0 on the minority branch picks the first weighted agent.
        let mut s = state(5, 5, Point::new(2, 2));
        s.grid.seed(Point::new(2, 2), A).unwrap();
        let summary = run_tick(&mut s, &FixedDraws(CellDraws::new(0.95, 0.0))).unwrap();
        assert_eq!(summary.changed_cells, 8);
        assert_eq!(summary.territory.owned_by(0), 9);
        for y in 1..=3 {
            for x in 1..=3 {
                assert_eq!(s.grid.read(Point::new(x, y)), A);
            }
        }
        assert_eq!(s.grid.read(Point::new(0, 0)), None);
        assert!(s.grid.next_view().cells().iter().all(Option::is_none));
    }

    #[test]
    fn each_cell_follows_its_own_draws() {
        // Cells 0 and 4 take the minority branch, every other cell keeps
        // its owner.
        let mut s = state(3, 3, Point::new(2, 2));
        s.grid.seed(Point::new(1, 1), A).unwrap();
        let takeover = CellDraws::new(0.95, 0.0);
        let inertia = CellDraws::new(0.0, 0.0);
        let draws = ScriptedDraws::new(
            vec![takeover, inertia, inertia, inertia, takeover],
            CellDraws::new(0.0, 0.5),
        );
        let summary = run_tick(&mut s, &draws).unwrap();
        assert_eq!(summary.changed_cells, 1);
        assert_eq!(summary.territory.owned_by(0), 2);
        assert_eq!(s.grid.read(Point::new(0, 0)), A);
        assert_eq!(s.grid.read(Point::new(1, 1)), A);
        for cell in [(1, 0), (2, 0), (0, 1), (2, 1), (0, 2), (1, 2), (2, 2)] {
            assert_eq!(s.grid.read(Point::new(cell.0, cell.1)), None, "{cell:?}");
        }
    }

    #[test]
    fn same_state_and_draws_reproduce() {
        let mut first = state(30, 20, Point::new(10, 10));
        for x in 5..15 {
            first.grid.seed(Point::new(x, 10), A).unwrap();
        }
        let mut second = first.clone();
        let draws = SeededDraws::new(1234);
        for _ in 0..10 {
            let a = run_tick(&mut first, &draws).unwrap();
            let b = run_tick(&mut second, &draws).unwrap();
            assert_eq!(a, b);
        }
        assert_eq!(first.grid, second.grid);
    }

    #[test]
    fn clock_overflow_leaves_grid_untouched() {
        let mut s = state(3, 3, Point::new(0, 0));
        s.grid.seed(Point::new(1, 1), A).unwrap();
        s.clock = TickClock::at(u64::MAX);
        let before = s.grid.clone();
        assert!(run_tick(&mut s, &FixedDraws(CellDraws::new(0.95, 0.0))).is_err());
        assert_eq!(s.grid, before);
    }
}
