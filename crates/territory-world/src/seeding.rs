//! Initial territory claims.
//!
//! Each agent starts with one or more seed cells, given explicitly or drawn
//! at random. Seeds are applied to both buffers through
//! [`OwnershipGrid::seed`] so the first frame is consistent.
//!
//! Claims never overwrite each other: the first agent (in registration
//! order) to claim a cell keeps it. An explicit seed landing on an owned cell
//! is skipped; a random seed retries a bounded number of times.

use rand::Rng;
use serde::{Deserialize, Serialize};
use territory_types::{AgentId, Point};
use tracing::{debug, warn};

use crate::agent::AgentRoster;
use crate::error::WorldError;
use crate::grid::OwnershipGrid;

/// Attempts per random seed before giving up on a crowded grid.
const MAX_RANDOM_ATTEMPTS: u32 = 64;

/// The seed cells one agent should claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedSpec {
    /// Agent making the claims.
    pub agent: AgentId,
    /// Cells claimed at fixed coordinates.
    pub cells: Vec<Point>,
    /// Number of additional cells claimed at random unowned coordinates.
    pub random: u32,
}

/// Outcome of seeding the grid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedReport {
    /// Every cell claimed, in claim order.
    pub claimed: Vec<(AgentId, Point)>,
    /// Seeds dropped because the target cell was already owned or no free
    /// cell was found.
    pub skipped: u32,
}

/// Apply initial claims to both buffers of `grid`.
///
/// # Errors
///
/// Returns [`WorldError::AgentNotFound`] if a spec names an unregistered
/// agent, or [`WorldError::OutOfBounds`] for an explicit cell outside the
/// grid.
pub fn seed_grid<R: Rng + ?Sized>(
    grid: &mut OwnershipGrid,
    roster: &AgentRoster,
    specs: &[SeedSpec],
    rng: &mut R,
) -> Result<SeedReport, WorldError> {
    let mut report = SeedReport::default();
    let size = grid.size();

    for spec in specs {
        if roster.get(spec.agent).is_none() {
            return Err(WorldError::AgentNotFound(spec.agent));
        }

        for &cell in &spec.cells {
            if !size.contains(cell) {
                return Err(WorldError::OutOfBounds(cell));
            }
            if grid.read(cell).is_some() {
                debug!(agent = %spec.agent, %cell, "seed cell already claimed, skipping");
                report.skipped = report.skipped.saturating_add(1);
                continue;
            }
            grid.seed(cell, Some(spec.agent))?;
            report.claimed.push((spec.agent, cell));
        }

        for _ in 0..spec.random {
            match find_free_cell(grid, rng) {
                Some(cell) => {
                    grid.seed(cell, Some(spec.agent))?;
                    report.claimed.push((spec.agent, cell));
                }
                None => {
                    warn!(agent = %spec.agent, "no free cell found for random seed");
                    report.skipped = report.skipped.saturating_add(1);
                }
            }
        }
    }

    debug!(
        claimed = report.claimed.len(),
        skipped = report.skipped,
        "grid seeded"
    );
    Ok(report)
}

/// Draw uniformly random cells until an unowned one turns up.
fn find_free_cell<R: Rng + ?Sized>(grid: &OwnershipGrid, rng: &mut R) -> Option<Point> {
    let size = grid.size();
    let width = i32::try_from(size.width).ok()?;
    let height = i32::try_from(size.height).ok()?;
    (0..MAX_RANDOM_ATTEMPTS)
        .map(|_| Point::new(rng.random_range(0..width), rng.random_range(0..height)))
        .find(|&cell| grid.read(cell).is_none())
}
