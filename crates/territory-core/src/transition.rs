//! The per-cell transition rule.
//!
//! Each cell consumes two independent uniform draws from `[0, 1)`:
//!
//! - `stability` -- below [`InfluenceParams::stability`] the cell keeps its
//!   current owner (the inertia branch, no neighbor evaluation).
//! - `z` -- on the minority branch, selects the next owner from the
//!   [`Distribution`] of the cell's neighborhood.

use territory_types::{Owner, Point};
use territory_world::GridView;

use crate::influence::{Distribution, InfluenceParams};

/// The two uniform draws consumed by one cell in one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellDraws {
    /// Decides between the inertia branch and the takeover branch.
    pub stability: f64,
    /// Selects the takeover outcome.
    pub z: f64,
}

impl CellDraws {
    /// Create a pair of draws.
    pub const fn new(stability: f64, z: f64) -> Self {
        Self { stability, z }
    }
}

/// Next owner of `cell` given the current buffer and avatar positions.
pub fn next_owner(
    cell: Point,
    current: &GridView<'_>,
    positions: &[Point],
    params: &InfluenceParams,
    draws: CellDraws,
) -> Owner {
    if draws.stability < params.stability {
        return current.read(cell);
    }
    let neighborhood = current.neighborhood(cell);
    Distribution::compute(&neighborhood, cell, positions, params).select(draws.z)
}
