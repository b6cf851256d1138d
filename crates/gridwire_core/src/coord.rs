//! Lattice coordinates and grid bounds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A cell on the 3-D routing lattice.
///
/// Coordinates are signed so that padding can extend the grid below the
/// gate bounding box. Ordering is lexicographic on `(x, y, z)`, which gives
/// deterministic iteration wherever coordinates are kept in sorted sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

/// The six axis-aligned unit offsets of the lattice.
pub const NEIGHBOUR_OFFSETS: [Coord; 6] = [
    Coord { x: 1, y: 0, z: 0 },
    Coord { x: -1, y: 0, z: 0 },
    Coord { x: 0, y: 1, z: 0 },
    Coord { x: 0, y: -1, z: 0 },
    Coord { x: 0, y: 0, z: 1 },
    Coord { x: 0, y: 0, z: -1 },
];

impl Coord {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Manhattan distance to another coordinate.
    pub fn manhattan(&self, other: &Coord) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y) + self.z.abs_diff(other.z)
    }

    /// True when the two cells share a unit edge.
    pub fn is_neighbour_of(&self, other: &Coord) -> bool {
        self.manhattan(other) == 1
    }

    fn offset(&self, d: &Coord) -> Coord {
        Coord::new(self.x + d.x, self.y + d.y, self.z + d.z)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.x, self.y, self.z)
    }
}

/// Lowest and highest z-layer of every chip grid.
pub const Z_RANGE: (i32, i32) = (0, 7);

/// Inclusive grid boundaries of a chip.
///
/// The x/y ranges are the gate bounding box expanded by the padding; the
/// z range is fixed to [`Z_RANGE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridBounds {
    pub x: (i32, i32),
    pub y: (i32, i32),
    pub z: (i32, i32),
}

impl GridBounds {
    /// Builds bounds around the given gate coordinates.
    ///
    /// Panics when `padding` is zero or no gate coordinates are supplied;
    /// a grid without gates has no meaningful extent.
    pub fn around_gates<'a>(gates: impl IntoIterator<Item = &'a Coord>, padding: i32) -> Self {
        assert!(padding >= 1, "grid padding must be at least 1");

        let mut min_x = i32::MAX;
        let mut max_x = i32::MIN;
        let mut min_y = i32::MAX;
        let mut max_y = i32::MIN;
        let mut seen = false;

        for coord in gates {
            seen = true;
            min_x = min_x.min(coord.x);
            max_x = max_x.max(coord.x);
            min_y = min_y.min(coord.y);
            max_y = max_y.max(coord.y);
        }
        assert!(seen, "cannot size a grid without gates");

        Self {
            x: (min_x - padding, max_x + padding),
            y: (min_y - padding, max_y + padding),
            z: Z_RANGE,
        }
    }

    pub fn contains(&self, c: &Coord) -> bool {
        self.x.0 <= c.x
            && c.x <= self.x.1
            && self.y.0 <= c.y
            && c.y <= self.y.1
            && self.z.0 <= c.z
            && c.z <= self.z.1
    }

    /// The up-to-six in-bounds lattice neighbours of `c`.
    pub fn neighbours(&self, c: &Coord) -> Vec<Coord> {
        NEIGHBOUR_OFFSETS
            .iter()
            .map(|d| c.offset(d))
            .filter(|n| self.contains(n))
            .collect()
    }
}
