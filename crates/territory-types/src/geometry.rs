//! Grid geometry: points, grid dimensions, and cardinal directions.
//!
//! Coordinates are signed so that neighborhood sampling can address the
//! ring of cells just outside the grid. Those cells are never stored; they
//! read as unowned.

use serde::{Deserialize, Serialize};

/// An integer `(x, y)` coordinate. `x` grows rightward, `y` grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl Point {
    /// Create a point.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance between two points.
    pub const fn manhattan(self, other: Self) -> u32 {
        self.x
            .abs_diff(other.x)
            .saturating_add(self.y.abs_diff(other.y))
    }

    /// Return the point one step away in `direction`, or `None` if the
    /// coordinate would overflow.
    pub fn step(self, direction: Direction) -> Option<Self> {
        let (dx, dy) = direction.delta();
        Some(Self {
            x: self.x.checked_add(dx)?,
            y: self.y.checked_add(dy)?,
        })
    }
}

impl core::fmt::Display for Point {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// Dimensions of the ownership grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    /// Number of columns.
    pub width: u32,
    /// Number of rows.
    pub height: u32,
}

impl GridSize {
    /// Create a grid size.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Whether the x coordinate lies in `[0, width)`.
    pub fn contains_x(self, x: i32) -> bool {
        u32::try_from(x).is_ok_and(|x| x < self.width)
    }

    /// Whether the y coordinate lies in `[0, height)`.
    pub fn contains_y(self, y: i32) -> bool {
        u32::try_from(y).is_ok_and(|y| y < self.height)
    }

    /// Whether the point lies inside the grid.
    pub fn contains(self, point: Point) -> bool {
        self.contains_x(point.x) && self.contains_y(point.y)
    }

    /// Total number of cells, or `None` if it does not fit in `usize`.
    pub fn cell_count(self) -> Option<usize> {
        let width = usize::try_from(self.width).ok()?;
        let height = usize::try_from(self.height).ok()?;
        width.checked_mul(height)
    }

    /// Row-major index of an in-bounds point, `None` when out of bounds.
    pub fn index_of(self, point: Point) -> Option<usize> {
        if !self.contains(point) {
            return None;
        }
        let x = usize::try_from(point.x).ok()?;
        let y = usize::try_from(point.y).ok()?;
        let width = usize::try_from(self.width).ok()?;
        y.checked_mul(width)?.checked_add(x)
    }

    /// Inverse of [`index_of`](Self::index_of).
    pub fn point_of(self, index: usize) -> Option<Point> {
        let width = usize::try_from(self.width).ok()?;
        let x = index.checked_rem(width)?;
        let y = index.checked_div(width)?;
        let point = Point::new(i32::try_from(x).ok()?, i32::try_from(y).ok()?);
        self.contains(point).then_some(point)
    }
}

/// One of the four cardinal movement directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Toward row 0.
    Up,
    /// Away from row 0.
    Down,
    /// Toward column 0.
    Left,
    /// Away from column 0.
    Right,
}

impl Direction {
    /// The `(dx, dy)` offset of a single step.
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn manhattan_distance_is_symmetric() {
        let a = Point::new(2, 5);
        let b = Point::new(-1, 9);
        assert_eq!(a.manhattan(b), 7);
        assert_eq!(b.manhattan(a), 7);
        assert_eq!(a.manhattan(a), 0);
    }

    #[test]
    fn contains_checks_each_axis() {
        let size = GridSize::new(3, 2);
        assert!(size.contains(Point::new(0, 0)));
        assert!(size.contains(Point::new(2, 1)));
        assert!(!size.contains(Point::new(3, 0)));
        assert!(!size.contains(Point::new(0, 2)));
        assert!(!size.contains(Point::new(-1, 0)));
        assert!(size.contains_x(2));
        assert!(!size.contains_y(2));
    }

    #[test]
    fn index_and_point_are_inverse() {
        let size = GridSize::new(4, 3);
        assert_eq!(size.cell_count(), Some(12));
        for index in 0..12 {
            let point = size.point_of(index).unwrap();
            assert_eq!(size.index_of(point), Some(index));
        }
        assert_eq!(size.index_of(Point::new(4, 0)), None);
        assert_eq!(size.point_of(12), None);
    }

    #[test]
    fn step_moves_one_cell() {
        let origin = Point::new(5, 5);
        assert_eq!(origin.step(Direction::Up), Some(Point::new(5, 4)));
        assert_eq!(origin.step(Direction::Down), Some(Point::new(5, 6)));
        assert_eq!(origin.step(Direction::Left), Some(Point::new(4, 5)));
        assert_eq!(origin.step(Direction::Right), Some(Point::new(6, 5)));
        assert_eq!(Point::new(i32::MAX, 0).step(Direction::Right), None);
    }
}
