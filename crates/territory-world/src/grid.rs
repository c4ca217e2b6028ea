//! The double-buffered ownership grid.
//!
//! The grid is the sole authoritative store of which agent owns which cell.
//! It holds two same-shaped buffers:
//!
//! - `current` -- the state every cell's transition reads from during a
//!   tick, and the state the renderer presents afterwards.
//! - `next` -- scratch space the tick driver fills in a single pass.
//!
//! # Tick Protocol
//!
//! 1. [`OwnershipGrid::fill_next`] evaluates a pure function for every cell
//!    against a read-only [`GridView`] of `current` and writes `next`. Rows
//!    are computed in parallel; no cell can observe another cell's `next`.
//! 2. [`OwnershipGrid::swap`] exchanges the buffers in O(1).
//! 3. [`OwnershipGrid::clear`] resets the now-stale buffer to unowned.
//!
//! [`OwnershipGrid::advance`] performs steps 2 and 3 together.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use territory_types::{GridSize, Owner, Point};

use crate::error::WorldError;
use crate::neighborhood::{Neighborhood, OFFSETS};

/// Which of the two buffers an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferRole {
    /// The buffer read during a tick and presented after it.
    Current,
    /// The scratch buffer written during a tick.
    Next,
}

/// Number of cells held by each agent, plus the unowned remainder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerritoryCounts {
    /// Cells owned per agent, indexed by registration order.
    pub per_agent: Vec<usize>,
    /// Cells owned by nobody.
    pub unowned: usize,
}

impl TerritoryCounts {
    /// Cells owned by the agent at `index`, zero if unknown.
    pub fn owned_by(&self, index: usize) -> usize {
        self.per_agent.get(index).copied().unwrap_or(0)
    }

    /// Total number of owned cells.
    pub fn owned_total(&self) -> usize {
        self.per_agent
            .iter()
            .fold(0_usize, |acc, count| acc.saturating_add(*count))
    }
}

/// Read-only view over one buffer.
///
/// This is what per-cell transition functions receive, so they can sample
/// neighborhoods without any way to reach the buffer being written.
#[derive(Debug, Clone, Copy)]
pub struct GridView<'a> {
    size: GridSize,
    cells: &'a [Owner],
}

impl<'a> GridView<'a> {
    /// Grid dimensions.
    pub const fn size(&self) -> GridSize {
        self.size
    }

    /// Owner of a cell. Coordinates outside the grid read as unowned.
    pub fn read(&self, point: Point) -> Owner {
        self.size
            .index_of(point)
            .and_then(|index| self.cells.get(index).copied())
            .flatten()
    }

    /// Sample the 3x3 neighborhood centered on `point`.
    pub fn neighborhood(&self, point: Point) -> Neighborhood {
        let samples = OFFSETS.map(|(dx, dy)| {
            match (point.x.checked_add(dx), point.y.checked_add(dy)) {
                (Some(x), Some(y)) => self.read(Point::new(x, y)),
                _ => None,
            }
        });
        Neighborhood::from_samples(samples)
    }

    /// All cells in row-major order.
    pub const fn cells(&self) -> &'a [Owner] {
        self.cells
    }

    /// Iterate the rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &'a [Owner]> + 'a {
        let width = usize::try_from(self.size.width).unwrap_or(usize::MAX).max(1);
        self.cells.chunks(width)
    }
}

/// The double-buffered ownership matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnershipGrid {
    size: GridSize,
    current: Vec<Owner>,
    next: Vec<Owner>,
}

impl OwnershipGrid {
    /// Allocate both buffers, every cell unowned.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidGridSize`] if either dimension is zero,
    /// does not fit a signed coordinate, or the cell count overflows.
    pub fn new(size: GridSize) -> Result<Self, WorldError> {
        let invalid = || WorldError::InvalidGridSize {
            width: size.width,
            height: size.height,
        };
        if size.width == 0 || size.height == 0 {
            return Err(invalid());
        }
        if i32::try_from(size.width).is_err() || i32::try_from(size.height).is_err() {
            return Err(invalid());
        }
        let cell_count = size.cell_count().ok_or_else(invalid)?;
        Ok(Self {
            size,
            current: vec![None; cell_count],
            next: vec![None; cell_count],
        })
    }

    /// Grid dimensions.
    pub const fn size(&self) -> GridSize {
        self.size
    }

    /// Read-only view of the current buffer.
    pub fn view(&self) -> GridView<'_> {
        GridView {
            size: self.size,
            cells: &self.current,
        }
    }

    /// Read-only view of the next buffer.
    pub fn next_view(&self) -> GridView<'_> {
        GridView {
            size: self.size,
            cells: &self.next,
        }
    }

    /// Owner of a cell in the current buffer. Out-of-bounds reads are unowned.
    pub fn read(&self, point: Point) -> Owner {
        self.view().read(point)
    }

    /// Sample the 3x3 neighborhood of `point` from the current buffer.
    pub fn neighborhood(&self, point: Point) -> Neighborhood {
        self.view().neighborhood(point)
    }

    /// Set one cell of the next buffer.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::OutOfBounds`] if `point` is outside the grid.
    pub fn write(&mut self, point: Point, owner: Owner) -> Result<(), WorldError> {
        let cell = self
            .size
            .index_of(point)
            .and_then(|index| self.next.get_mut(index))
            .ok_or(WorldError::OutOfBounds(point))?;
        *cell = owner;
        Ok(())
    }

    /// Set one cell in both buffers, so the first frame is consistent.
    ///
    /// Only meaningful before the first tick.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::OutOfBounds`] if `point` is outside the grid.
    pub fn seed(&mut self, point: Point, owner: Owner) -> Result<(), WorldError> {
        let index = self
            .size
            .index_of(point)
            .ok_or(WorldError::OutOfBounds(point))?;
        for buffer in [&mut self.current, &mut self.next] {
            let cell = buffer
                .get_mut(index)
                .ok_or(WorldError::OutOfBounds(point))?;
            *cell = owner;
        }
        Ok(())
    }

    /// Compute every cell of the next buffer from the current one.
    ///
    /// `transition` receives the cell coordinate and a view of `current`.
    /// Rows are evaluated in parallel, so the result must depend only on
    /// those inputs.
    pub fn fill_next<F>(&mut self, transition: F)
    where
        F: Fn(Point, &GridView<'_>) -> Owner + Sync,
    {
        let view = GridView {
            size: self.size,
            cells: &self.current,
        };
        let Ok(width) = usize::try_from(self.size.width) else {
            return;
        };
        self.next
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(row, cells)| {
                let Ok(y) = i32::try_from(row) else {
                    return;
                };
                for (column, cell) in cells.iter_mut().enumerate() {
                    if let Ok(x) = i32::try_from(column) {
                        *cell = transition(Point::new(x, y), &view);
                    }
                }
            });
    }

    /// Exchange the roles of the two buffers. O(1): only the handles move.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.current, &mut self.next);
    }

    /// Reset every cell of one buffer to unowned.
    pub fn clear(&mut self, role: BufferRole) {
        match role {
            BufferRole::Current => self.current.fill(None),
            BufferRole::Next => self.next.fill(None),
        }
    }

    /// Finish a tick: promote `next` to `current` and clear the stale buffer.
    pub fn advance(&mut self) {
        self.swap();
        self.clear(BufferRole::Next);
    }

    /// Number of cells whose owner differs between `current` and `next`.
    pub fn changed_cells(&self) -> usize {
        self.current
            .iter()
            .zip(&self.next)
            .filter(|(before, after)| before != after)
            .count()
    }

    /// Count the cells each agent owns in the current buffer.
    ///
    /// Cells referencing an index at or past `agent_count` are not counted
    /// for any agent.
    pub fn territory_counts(&self, agent_count: usize) -> TerritoryCounts {
        let mut counts = TerritoryCounts {
            per_agent: vec![0; agent_count],
            unowned: 0,
        };
        for owner in &self.current {
            match owner {
                Some(agent) => {
                    if let Some(count) = counts.per_agent.get_mut(agent.index()) {
                        *count = count.saturating_add(1);
                    }
                }
                None => counts.unowned = counts.unowned.saturating_add(1),
            }
        }
        counts
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use territory_types::AgentId;

    use super::*;
    use crate::neighborhood::{
        CENTER, DOWN, LEFT, LOWER_LEFT, LOWER_RIGHT, RIGHT, SAMPLE_COUNT, UP, UPPER_LEFT,
        UPPER_RIGHT,
    };

    const A: Owner = Some(AgentId(0));
    const B: Owner = Some(AgentId(1));

    fn grid(width: u32, height: u32) -> OwnershipGrid {
        OwnershipGrid::new(GridSize::new(width, height)).unwrap()
    }

    #[test]
    fn new_grid_is_entirely_unowned() {
        let g = grid(4, 3);
        assert!(g.view().cells().iter().all(Option::is_none));
        assert!(g.next_view().cells().iter().all(Option::is_none));
        assert_eq!(g.view().cells().len(), 12);
    }

    #[test]
    fn zero_sized_grid_is_rejected() {
        assert!(OwnershipGrid::new(GridSize::new(0, 5)).is_err());
        assert!(OwnershipGrid::new(GridSize::new(5, 0)).is_err());
        assert!(OwnershipGrid::new(GridSize::new(u32::MAX, 1)).is_err());
    }

    #[test]
    fn out_of_bounds_read_is_unowned() {
        let mut g = grid(2, 2);
        g.seed(Point::new(0, 0), A).unwrap();
        assert_eq!(g.read(Point::new(0, 0)), A);
        assert_eq!(g.read(Point::new(-1, 0)), None);
        assert_eq!(g.read(Point::new(0, 2)), None);
        assert_eq!(g.read(Point::new(i32::MAX, i32::MIN)), None);
    }

    #[test]
    fn seed_writes_both_buffers() {
        let mut g = grid(3, 3);
        g.seed(Point::new(2, 1), B).unwrap();
        assert_eq!(g.view().read(Point::new(2, 1)), B);
        assert_eq!(g.next_view().read(Point::new(2, 1)), B);
        assert!(g.seed(Point::new(3, 1), B).is_err());
    }

    #[test]
    fn write_targets_only_next() {
        let mut g = grid(3, 3);
        g.write(Point::new(1, 1), A).unwrap();
        assert_eq!(g.read(Point::new(1, 1)), None);
        assert_eq!(g.next_view().read(Point::new(1, 1)), A);
        assert!(g.write(Point::new(-1, 1), A).is_err());
    }

    #[test]
    fn neighborhood_of_documented_three_by_three_case() {
        let mut g = grid(3, 3);
        g.seed(Point::new(0, 0), A).unwrap();
        g.seed(Point::new(2, 0), A).unwrap();

        let hood = g.neighborhood(Point::new(1, 1));
        for index in 0..SAMPLE_COUNT {
            if index == UPPER_LEFT || index == UPPER_RIGHT {
                assert_eq!(hood.get(index), A, "index {index}");
            } else {
                assert_eq!(hood.get(index), None, "index {index}");
            }
        }

        g.seed(Point::new(1, 1), A).unwrap();
        let hood = g.neighborhood(Point::new(1, 1));
        assert_eq!(hood.get(CENTER), A);
        assert_eq!(hood.get(UP), None);
    }

    #[test]
    fn neighborhood_at_corner_treats_outside_as_unowned() {
        let mut g = grid(2, 2);
        for point in [
            Point::new(0, 0),
            Point::new(1, 0),
            Point::new(0, 1),
            Point::new(1, 1),
        ] {
            g.seed(point, B).unwrap();
        }
        let hood = g.neighborhood(Point::new(0, 0));
        assert_eq!(hood.get(UPPER_LEFT), None);
        assert_eq!(hood.get(UP), None);
        assert_eq!(hood.get(UPPER_RIGHT), None);
        assert_eq!(hood.get(LEFT), None);
        assert_eq!(hood.get(LOWER_LEFT), None);
        assert_eq!(hood.get(CENTER), B);
        assert_eq!(hood.get(RIGHT), B);
        assert_eq!(hood.get(DOWN), B);
        assert_eq!(hood.get(LOWER_RIGHT), B);
    }

    #[test]
    fn fill_next_reads_only_current() {
        let mut g = grid(5, 1);
        g.seed(Point::new(0, 0), A).unwrap();
        // Each cell copies its left neighbor. If any cell observed a
        // freshly written `next`, ownership would ripple across the row.
        g.fill_next(|point, view| view.neighborhood(point).get(LEFT));
        assert_eq!(g.next_view().read(Point::new(1, 0)), A);
        assert_eq!(g.next_view().read(Point::new(2, 0)), None);
        assert_eq!(g.next_view().read(Point::new(0, 0)), None);
    }

    #[test]
    fn swap_then_clear_leaves_next_unowned() {
        let mut g = grid(3, 2);
        g.fill_next(|point, _| if point.x == 1 { A } else { None });
        assert_eq!(g.changed_cells(), 2);

        g.advance();
        assert!(g.next_view().cells().iter().all(Option::is_none));
        assert_eq!(g.read(Point::new(1, 0)), A);
        assert_eq!(g.read(Point::new(1, 1)), A);
        assert_eq!(g.read(Point::new(0, 0)), None);
    }

    #[test]
    fn swap_exchanges_without_clearing() {
        let mut g = grid(2, 1);
        g.write(Point::new(0, 0), B).unwrap();
        g.swap();
        assert_eq!(g.read(Point::new(0, 0)), B);
        assert_eq!(g.next_view().read(Point::new(0, 0)), None);
        g.clear(BufferRole::Current);
        assert_eq!(g.read(Point::new(0, 0)), None);
    }

    #[test]
    fn territory_counts_cover_every_cell() {
        let mut g = grid(3, 3);
        g.seed(Point::new(0, 0), A).unwrap();
        g.seed(Point::new(1, 0), A).unwrap();
        g.seed(Point::new(2, 2), B).unwrap();
        let counts = g.territory_counts(2);
        assert_eq!(counts.per_agent, vec![2, 1]);
        assert_eq!(counts.unowned, 6);
        assert_eq!(counts.owned_total(), 3);
        assert_eq!(counts.owned_by(5), 0);
    }

    #[test]
    fn rows_split_row_major() {
        let mut g = grid(3, 2);
        g.seed(Point::new(2, 1), A).unwrap();
        let view = g.view();
        let rows: Vec<&[Owner]> = view.rows().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows.last().unwrap(), &[None, None, A].as_slice());
    }
}
