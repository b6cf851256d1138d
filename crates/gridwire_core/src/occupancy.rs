//! Per-cell occupancy bookkeeping.
//!
//! The occupancy identifies which wires (and gates) sit on each lattice
//! cell. Wires are owned by the chip, so the occupancy stores stable
//! [`WireId`] handles rather than references; dereferencing goes through
//! the chip.

use crate::coord::Coord;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Stable handle of a wire slot inside a chip. Slot order equals netlist
/// order and never changes for the chip's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WireId(pub usize);

/// A single occupant of a lattice cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Occupant {
    Gate,
    Wire(WireId),
}

/// Maps each cell to its occupants.
///
/// Two views are kept in lock-step: `all` contains gates and wires,
/// `wires` only the wire handles. Gate entries are permanent; wire entries
/// mirror the wire's segment list exactly, endpoints included.
#[derive(Debug, Clone, Default)]
pub struct Occupancy {
    all: HashMap<Coord, HashSet<Occupant>>,
    wires: HashMap<Coord, HashSet<WireId>>,
}

// Lookup misses borrow a shared empty set, so unoccupied cells never
// allocate.
fn empty_occupants() -> &'static HashSet<Occupant> {
    static SET: std::sync::OnceLock<HashSet<Occupant>> = std::sync::OnceLock::new();
    SET.get_or_init(HashSet::new)
}

fn empty_wires() -> &'static HashSet<WireId> {
    static SET: std::sync::OnceLock<HashSet<WireId>> = std::sync::OnceLock::new();
    SET.get_or_init(HashSet::new)
}

impl Occupancy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a cell as holding a gate. Gates are never removed.
    pub fn add_gate(&mut self, coord: Coord) {
        self.all.entry(coord).or_default().insert(Occupant::Gate);
    }

    pub fn add_gates(&mut self, coords: impl IntoIterator<Item = Coord>) {
        for coord in coords {
            self.add_gate(coord);
        }
    }

    /// Registers one wire cell in both views.
    pub fn add_wire_segment(&mut self, coord: Coord, wire: WireId) {
        self.all
            .entry(coord)
            .or_default()
            .insert(Occupant::Wire(wire));
        self.wires.entry(coord).or_default().insert(wire);
    }

    /// Registers every cell of a segment list under the same wire handle.
    pub fn add_wire(&mut self, segments: &[Coord], wire: WireId) {
        for &coord in segments {
            self.add_wire_segment(coord, wire);
        }
    }

    /// Removes one wire cell from both views.
    ///
    /// Cells holding a gate are left untouched: a wire's entries at its own
    /// gate endpoints are permanent, like the gate marks themselves.
    pub fn remove_wire_segment(&mut self, coord: Coord, wire: WireId) {
        let Some(occupants) = self.all.get_mut(&coord) else {
            return;
        };
        if occupants.contains(&Occupant::Gate) {
            return;
        }

        occupants.remove(&Occupant::Wire(wire));
        if occupants.is_empty() {
            self.all.remove(&coord);
        }
        if let Some(wires) = self.wires.get_mut(&coord) {
            wires.remove(&wire);
            if wires.is_empty() {
                self.wires.remove(&coord);
            }
        }
    }

    /// Removes every cell of a segment list under the given handle.
    pub fn remove_wire(&mut self, segments: &[Coord], wire: WireId) {
        for &coord in segments {
            self.remove_wire_segment(coord, wire);
        }
    }

    /// All occupants of a cell, gates included.
    pub fn occupants_at(&self, coord: &Coord) -> &HashSet<Occupant> {
        self.all.get(coord).unwrap_or_else(|| empty_occupants())
    }

    /// The wires passing through a cell.
    pub fn wires_at(&self, coord: &Coord) -> &HashSet<WireId> {
        self.wires.get(coord).unwrap_or_else(|| empty_wires())
    }

    pub fn has_gate(&self, coord: &Coord) -> bool {
        self.occupants_at(coord).contains(&Occupant::Gate)
    }

    /// Iterates over every cell that holds at least one wire.
    pub fn wire_cells(&self) -> impl Iterator<Item = (&Coord, &HashSet<WireId>)> {
        self.wires.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_survives_wire_removal() {
        let mut occ = Occupancy::new();
        let g = Coord::new(0, 0, 0);
        occ.add_gate(g);
        occ.add_wire_segment(g, WireId(0));

        occ.remove_wire_segment(g, WireId(0));

        // gate cells are never cleared, so the wire entry stays as well
        assert!(occ.has_gate(&g));
        assert!(occ.wires_at(&g).contains(&WireId(0)));
    }

    #[test]
    fn test_wire_removal_clears_interior_cell() {
        let mut occ = Occupancy::new();
        let c = Coord::new(1, 0, 0);
        occ.add_wire_segment(c, WireId(3));
        assert_eq!(occ.wires_at(&c).len(), 1);

        occ.remove_wire_segment(c, WireId(3));
        assert!(occ.wires_at(&c).is_empty());
        assert!(occ.occupants_at(&c).is_empty());
    }

    #[test]
    fn test_removal_targets_only_the_named_wire() {
        let mut occ = Occupancy::new();
        let c = Coord::new(1, 1, 0);
        occ.add_wire_segment(c, WireId(0));
        occ.add_wire_segment(c, WireId(1));

        occ.remove_wire_segment(c, WireId(0));
        assert!(!occ.wires_at(&c).contains(&WireId(0)));
        assert!(occ.wires_at(&c).contains(&WireId(1)));
    }

    #[test]
    fn test_views_stay_in_lock_step() {
        let mut occ = Occupancy::new();
        let segments = [Coord::new(0, 0, 0), Coord::new(1, 0, 0), Coord::new(2, 0, 0)];
        occ.add_wire(&segments, WireId(2));

        for c in &segments {
            assert!(occ.occupants_at(c).contains(&Occupant::Wire(WireId(2))));
            assert!(occ.wires_at(c).contains(&WireId(2)));
        }

        occ.remove_wire(&segments, WireId(2));
        for c in &segments {
            assert!(occ.occupants_at(c).is_empty());
            assert!(occ.wires_at(c).is_empty());
        }
    }

    #[test]
    fn test_empty_lookup_allocates_nothing() {
        let occ = Occupancy::new();
        assert!(occ.occupants_at(&Coord::new(9, 9, 9)).is_empty());
        assert!(occ.wires_at(&Coord::new(9, 9, 9)).is_empty());
    }
}
