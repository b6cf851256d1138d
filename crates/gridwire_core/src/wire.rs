//! A single wire between two gates.

use crate::coord::Coord;
use serde::{Deserialize, Serialize};

/// An ordered lattice path realizing one netlist connection.
///
/// A freshly created wire holds only its two gate endpoints and is not yet
/// connected; routing inserts interior cells between them. The endpoints
/// are never removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wire {
    endpoints: [Coord; 2],
    segments: Vec<Coord>,
}

impl Wire {
    /// Creates an unrouted wire between two gate cells.
    pub fn new(gate_1: Coord, gate_2: Coord) -> Self {
        Self {
            endpoints: [gate_1, gate_2],
            segments: vec![gate_1, gate_2],
        }
    }

    pub fn endpoints(&self) -> [Coord; 2] {
        self.endpoints
    }

    pub fn segments(&self) -> &[Coord] {
        &self.segments
    }

    /// Number of unit edges in the path.
    pub fn length(&self) -> usize {
        self.segments.len() - 1
    }

    /// Whether `coord` is one of the two gate endpoints.
    pub fn is_endpoint(&self, coord: &Coord) -> bool {
        self.endpoints.contains(coord)
    }

    /// Grows the wire by one interior cell.
    ///
    /// The cell is inserted before the final endpoint when it neighbours the
    /// second-to-last segment, or after the first endpoint when it
    /// neighbours the second segment. Endpoint cells and cells adjacent to
    /// neither growing end are ignored; callers always propose cells next
    /// to one end, so the silent ignore keeps the adjacency invariant
    /// without burdening every call site.
    ///
    /// Returns `true` when the cell was actually inserted, so occupancy
    /// bookkeeping can stay in lock-step with the segment list.
    pub fn append_segment(&mut self, coord: Coord) -> bool {
        if self.is_endpoint(&coord) {
            return false;
        }

        let n = self.segments.len();
        if coord.is_neighbour_of(&self.segments[n - 2]) {
            self.segments.insert(n - 1, coord);
            return true;
        }
        if coord.is_neighbour_of(&self.segments[1]) {
            self.segments.insert(1, coord);
            return true;
        }

        false
    }

    /// Grows the wire by a list of interior cells, in order.
    /// Returns the cells that were actually inserted.
    pub fn append_segments(&mut self, coords: &[Coord]) -> Vec<Coord> {
        coords
            .iter()
            .copied()
            .filter(|&c| self.append_segment(c))
            .collect()
    }

    /// True when every consecutive pair of segments shares a unit edge.
    pub fn is_connected(&self) -> bool {
        self.segments
            .windows(2)
            .all(|pair| pair[0].is_neighbour_of(&pair[1]))
    }

    /// True when the path visits some cell twice.
    pub fn intersects_itself(&self) -> bool {
        let mut seen = std::collections::HashSet::new();
        self.segments.iter().any(|c| !seen.insert(*c))
    }

    /// Drops all interior cells. Occupancy is the caller's responsibility.
    pub fn reset(&mut self) {
        self.segments.clear();
        self.segments.extend_from_slice(&self.endpoints);
    }

    /// The unordered unit edges traversed by this wire, with each edge's
    /// cells in sorted order so edges compare independently of direction.
    pub fn edge_set(&self) -> std::collections::HashSet<(Coord, Coord)> {
        self.segments
            .windows(2)
            .map(|pair| {
                if pair[0] < pair[1] {
                    (pair[0], pair[1])
                } else {
                    (pair[1], pair[0])
                }
            })
            .collect()
    }
}
