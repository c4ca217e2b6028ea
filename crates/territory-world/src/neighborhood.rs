//! The 3x3 neighborhood snapshot read by the transition rule.
//!
//! A snapshot is nine owners sampled from the current buffer, row-major over
//! the window centered on one cell. The index order is fixed:
//!
//! ```text
//! 0 UPPER_LEFT   1 UP      2 UPPER_RIGHT
//! 3 LEFT         4 CENTER  5 RIGHT
//! 6 LOWER_LEFT   7 DOWN    8 LOWER_RIGHT
//! ```
//!
//! Samples that fall outside the grid are unowned.

use territory_types::Owner;

/// Number of samples in a snapshot.
pub const SAMPLE_COUNT: usize = 9;

/// Index of the upper-left sample.
pub const UPPER_LEFT: usize = 0;
/// Index of the sample directly above the center.
pub const UP: usize = 1;
/// Index of the upper-right sample.
pub const UPPER_RIGHT: usize = 2;
/// Index of the sample left of the center.
pub const LEFT: usize = 3;
/// Index of the center cell itself.
pub const CENTER: usize = 4;
/// Index of the sample right of the center.
pub const RIGHT: usize = 5;
/// Index of the lower-left sample.
pub const LOWER_LEFT: usize = 6;
/// Index of the sample directly below the center.
pub const DOWN: usize = 7;
/// Index of the lower-right sample.
pub const LOWER_RIGHT: usize = 8;

/// `(dx, dy)` offsets in snapshot order.
pub(crate) const OFFSETS: [(i32, i32); SAMPLE_COUNT] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (0, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Nine owners sampled around (and including) one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Neighborhood {
    samples: [Owner; SAMPLE_COUNT],
}

impl Neighborhood {
    /// Build a snapshot from owners already in snapshot order.
    pub const fn from_samples(samples: [Owner; SAMPLE_COUNT]) -> Self {
        Self { samples }
    }

    /// Owner at a snapshot index; indices past the window read as unowned.
    pub fn get(&self, index: usize) -> Owner {
        self.samples.get(index).copied().flatten()
    }

    /// Iterate the samples in snapshot order.
    pub fn iter(&self) -> impl Iterator<Item = Owner> + '_ {
        self.samples.iter().copied()
    }
}
