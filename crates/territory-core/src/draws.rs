//! Sources of the uniform draws each cell consumes per tick.
//!
//! Draws are addressed by `(tick, cell index)` rather than pulled from one
//! shared stream, so the draws a cell receives never depend on the order in
//! which cells are visited. That is what allows the tick driver to evaluate
//! rows in parallel and still be reproducible.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::transition::CellDraws;

/// Supplier of per-cell draws.
pub trait DrawSource: Sync {
    /// The draws for one cell in one tick. Must be a pure function of its
    /// arguments.
    fn draws(&self, tick: u64, cell_index: usize) -> CellDraws;
}

/// Production draw source: a ChaCha8 stream per `(seed, tick, cell)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeededDraws {
    seed: u64,
}

impl SeededDraws {
    /// Create a draw source for a world seed.
    pub const fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl DrawSource for SeededDraws {
    fn draws(&self, tick: u64, cell_index: usize) -> CellDraws {
        let cell = u64::try_from(cell_index).unwrap_or(u64::MAX);
        let mut rng = ChaCha8Rng::seed_from_u64(mix(self.seed, tick, cell));
        let stability: f64 = rng.random();
        let z: f64 = rng.random();
        CellDraws { stability, z }
    }
}

/// The same draws for every cell and tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedDraws(pub CellDraws);

impl DrawSource for FixedDraws {
    fn draws(&self, _tick: u64, _cell_index: usize) -> CellDraws {
        self.0
    }
}

/// Explicit draws per cell index, with a fallback for unlisted cells.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptedDraws {
    per_cell: Vec<CellDraws>,
    fallback: CellDraws,
}

impl ScriptedDraws {
    /// Create a script; cell `i` receives `per_cell[i]` every tick.
    pub const fn new(per_cell: Vec<CellDraws>, fallback: CellDraws) -> Self {
        Self { per_cell, fallback }
    }
}

impl DrawSource for ScriptedDraws {
    fn draws(&self, _tick: u64, cell_index: usize) -> CellDraws {
        self.per_cell.get(cell_index).copied().unwrap_or(self.fallback)
    }
}

/// Fold seed, tick, and cell into one well-distributed 64-bit stream seed
/// (splitmix64 finalizer over each component).
fn mix(seed: u64, tick: u64, cell: u64) -> u64 {
    [tick, cell]
        .into_iter()
        .fold(splitmix(seed), |acc, part| splitmix(acc ^ part))
}

const fn splitmix(value: u64) -> u64 {
    let mut z = value.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
