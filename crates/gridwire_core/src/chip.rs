//! The chip: gates, netlist, wires and occupancy under one roof.

use crate::coord::{Coord, GridBounds};
use crate::cost::{cost_function, CostBreakdown};
use crate::error::{GridwireError, Result};
use crate::occupancy::{Occupancy, WireId};
use crate::wire::Wire;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Identifier of a placed gate, as given in the print file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GateId(pub u32);

/// One netlist row: an unordered gate pair with its source orientation
/// preserved for output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetEntry {
    pub a: GateId,
    pub b: GateId,
}

/// A chip under routing.
///
/// The chip owns all wires and the occupancy; sequencers and optimizers
/// borrow it and mutate through its methods, which keep wire segments and
/// occupancy in lock-step. Wire slots are created in netlist order (sorted
/// ascending by Manhattan distance at construction) and never reordered,
/// so [`WireId`] handles stay valid for the chip's lifetime.
#[derive(Debug, Clone)]
pub struct Chip {
    chip_id: u32,
    net_id: u32,
    gates: HashMap<GateId, Coord>,
    gate_at: HashMap<Coord, GateId>,
    gate_coords: HashSet<Coord>,
    netlist: Vec<NetEntry>,
    wires: Vec<Wire>,
    occupancy: Occupancy,
    bounds: GridBounds,
    manhattan_sum: u64,
}

impl Chip {
    /// Builds a chip from placed gates and a netlist.
    ///
    /// The netlist is sorted ascending by Manhattan distance (stable among
    /// ties) before wire slots are created: short nets route first and long
    /// nets pack around them. Gates and each wire's endpoint cells are
    /// registered in occupancy immediately.
    pub fn new(
        chip_id: u32,
        net_id: u32,
        gates: Vec<(GateId, Coord)>,
        netlist: Vec<(GateId, GateId)>,
        padding: i32,
    ) -> Result<Self> {
        let mut gate_map = HashMap::with_capacity(gates.len());
        let mut gate_at = HashMap::with_capacity(gates.len());

        for (id, coord) in gates {
            if gate_map.insert(id, coord).is_some() {
                return Err(GridwireError::DuplicateGate(id.0));
            }
            if let Some(prev) = gate_at.insert(coord, id) {
                return Err(GridwireError::OverlappingGates(
                    prev.0,
                    id.0,
                    coord.to_string(),
                ));
            }
        }

        let mut entries = Vec::with_capacity(netlist.len());
        for (a, b) in netlist {
            if a == b {
                return Err(GridwireError::SelfConnection(a.0));
            }
            for id in [a, b] {
                if !gate_map.contains_key(&id) {
                    return Err(GridwireError::UnknownGate(id.0));
                }
            }
            entries.push(NetEntry { a, b });
        }

        // short and easy nets first; stable among equal distances
        entries.sort_by_key(|net| gate_map[&net.a].manhattan(&gate_map[&net.b]));

        let manhattan_sum = entries
            .iter()
            .map(|net| gate_map[&net.a].manhattan(&gate_map[&net.b]) as u64)
            .sum();

        let gate_coords: HashSet<Coord> = gate_map.values().copied().collect();
        let bounds = GridBounds::around_gates(gate_coords.iter(), padding);

        let mut occupancy = Occupancy::new();
        occupancy.add_gates(gate_coords.iter().copied());

        let mut wires = Vec::with_capacity(entries.len());
        for (slot, net) in entries.iter().enumerate() {
            let wire = Wire::new(gate_map[&net.a], gate_map[&net.b]);
            occupancy.add_wire(wire.segments(), WireId(slot));
            wires.push(wire);
        }

        Ok(Self {
            chip_id,
            net_id,
            gates: gate_map,
            gate_at,
            gate_coords,
            netlist: entries,
            wires,
            occupancy,
            bounds,
            manhattan_sum,
        })
    }

    pub fn chip_id(&self) -> u32 {
        self.chip_id
    }

    pub fn net_id(&self) -> u32 {
        self.net_id
    }

    pub fn bounds(&self) -> &GridBounds {
        &self.bounds
    }

    /// Regrows the x/y bounds, e.g. after replaying a solution that was
    /// routed on a wider grid than the current padding allows.
    pub fn set_padding(&mut self, padding: i32) {
        self.bounds = GridBounds::around_gates(self.gate_coords.iter(), padding);
    }

    pub fn netlist(&self) -> &[NetEntry] {
        &self.netlist
    }

    pub fn wires(&self) -> &[Wire] {
        &self.wires
    }

    pub fn wire(&self, id: WireId) -> &Wire {
        &self.wires[id.0]
    }

    pub fn wire_count(&self) -> usize {
        self.wires.len()
    }

    pub fn wire_ids(&self) -> impl Iterator<Item = WireId> {
        (0..self.wires.len()).map(WireId)
    }

    pub fn gate_coord(&self, id: GateId) -> Option<Coord> {
        self.gates.get(&id).copied()
    }

    pub fn gate_at(&self, coord: &Coord) -> Option<GateId> {
        self.gate_at.get(coord).copied()
    }

    pub fn is_gate_coord(&self, coord: &Coord) -> bool {
        self.gate_coords.contains(coord)
    }

    pub fn gate_coords(&self) -> impl Iterator<Item = &Coord> {
        self.gate_coords.iter()
    }

    /// Theoretical minimum total wire length of this netlist.
    pub fn manhattan_sum(&self) -> u64 {
        self.manhattan_sum
    }

    /// In-bounds lattice neighbours of a cell.
    pub fn neighbours(&self, coord: &Coord) -> Vec<Coord> {
        self.bounds.neighbours(coord)
    }

    pub fn occupants_at(&self, coord: &Coord) -> &HashSet<crate::occupancy::Occupant> {
        self.occupancy.occupants_at(coord)
    }

    pub fn wires_at(&self, coord: &Coord) -> &HashSet<WireId> {
        self.occupancy.wires_at(coord)
    }

    /// Every cell currently holding at least one wire, with its wire set.
    pub fn wire_cells(&self) -> impl Iterator<Item = (&Coord, &HashSet<WireId>)> {
        self.occupancy.wire_cells()
    }

    /// True when every wire satisfies the unit-edge adjacency invariant.
    pub fn is_fully_connected(&self) -> bool {
        self.wires.iter().all(Wire::is_connected)
    }

    // ========================================================================
    // Intersection & collision accounting
    // ========================================================================

    /// Non-gate cells shared by at least two wires, in sorted order so
    /// callers iterate deterministically.
    pub fn intersection_coords(&self) -> BTreeSet<Coord> {
        self.occupancy
            .wire_cells()
            .filter(|(coord, wires)| wires.len() >= 2 && !self.gate_coords.contains(*coord))
            .map(|(coord, _)| *coord)
            .collect()
    }

    /// Number of pairwise intersections: a cell carrying n wires counts
    /// n − 1, so three wires through one cell count twice.
    pub fn wire_intersect_count(&self) -> u64 {
        self.occupancy
            .wire_cells()
            .filter(|(coord, _)| !self.gate_coords.contains(*coord))
            .map(|(_, wires)| (wires.len().saturating_sub(1)) as u64)
            .sum()
    }

    /// Whether two wires traverse at least one common unit edge.
    pub fn wires_in_collision(&self, a: WireId, b: WireId) -> bool {
        let edges_a = self.wires[a.0].edge_set();
        let edges_b = self.wires[b.0].edge_set();
        !edges_a.is_disjoint(&edges_b)
    }

    /// Whether laying an edge between `a` and `b` would duplicate an edge
    /// some wire already traverses.
    ///
    /// Sharing both cells is not enough: two wires can pass through the
    /// same two cells without ever connecting them directly. Only wires
    /// present on both cells are scanned, and each is checked for `a` and
    /// `b` appearing as a consecutive segment pair.
    pub fn edge_causes_collision(&self, a: &Coord, b: &Coord) -> bool {
        let wires_a = self.occupancy.wires_at(a);
        if wires_a.is_empty() {
            return false;
        }
        let wires_b = self.occupancy.wires_at(b);
        if wires_b.is_empty() {
            return false;
        }

        wires_a.intersection(wires_b).any(|shared| {
            self.wires[shared.0].segments().windows(2).any(|pair| {
                (pair[0] == *a && pair[1] == *b) || (pair[0] == *b && pair[1] == *a)
            })
        })
    }

    /// Number of unordered wire pairs sharing at least one unit edge.
    pub fn collision_count(&self) -> u64 {
        self.colliding_pairs(false).len() as u64
    }

    /// Early-return collision probe.
    pub fn has_collision(&self) -> bool {
        !self.colliding_pairs(true).is_empty()
    }

    fn colliding_pairs(&self, first_only: bool) -> BTreeSet<(WireId, WireId)> {
        // only wires meeting at an intersection cell can collide
        let mut candidates: BTreeSet<(WireId, WireId)> = BTreeSet::new();
        for coord in self.intersection_coords() {
            let mut ids: Vec<WireId> = self.occupancy.wires_at(&coord).iter().copied().collect();
            ids.sort_unstable();
            for (i, &w1) in ids.iter().enumerate() {
                for &w2 in &ids[i + 1..] {
                    candidates.insert((w1, w2));
                }
            }
        }

        let mut colliding = BTreeSet::new();
        for (w1, w2) in candidates {
            if self.wires_in_collision(w1, w2) {
                colliding.insert((w1, w2));
                if first_only {
                    return colliding;
                }
            }
        }
        colliding
    }

    // ========================================================================
    // Cost
    // ========================================================================

    pub fn wire_length_sum(&self) -> u64 {
        self.wires.iter().map(|w| w.length() as u64).sum()
    }

    /// Total layout cost: length + 300·intersections + 1 000 000·collisions.
    pub fn total_cost(&self) -> u64 {
        cost_function(
            self.wire_length_sum(),
            self.wire_intersect_count(),
            self.collision_count(),
        )
    }

    pub fn cost_breakdown(&self) -> CostBreakdown {
        let wire_length = self.wire_length_sum();
        let intersections = self.wire_intersect_count();
        let collisions = self.collision_count();
        CostBreakdown {
            wire_length,
            intersections,
            collisions,
            total: cost_function(wire_length, intersections, collisions),
        }
    }

    // ========================================================================
    // Mutation: every change goes through here to keep occupancy in step
    // ========================================================================

    /// Clears a wire back to its two endpoints, purging its interior cells
    /// from occupancy first.
    pub fn reset_wire(&mut self, id: WireId) {
        let segments: Vec<Coord> = self.wires[id.0].segments().to_vec();
        self.occupancy.remove_wire(&segments, id);
        self.wires[id.0].reset();
    }

    pub fn reset_wires(&mut self, ids: &[WireId]) {
        for &id in ids {
            self.reset_wire(id);
        }
    }

    pub fn reset_all_wires(&mut self) {
        for slot in 0..self.wires.len() {
            self.reset_wire(WireId(slot));
        }
    }

    /// Commits a found route: appends the interior cells to the wire and
    /// registers exactly the cells the wire accepted.
    pub fn append_route(&mut self, id: WireId, interior: &[Coord]) {
        for &coord in interior {
            assert!(
                self.bounds.contains(&coord),
                "route cell {coord} outside grid bounds {:?}",
                self.bounds
            );
            if self.wires[id.0].append_segment(coord) {
                self.occupancy.add_wire_segment(coord, id);
            }
        }
    }

    /// Puts a wire back to a previously snapshotted full segment list.
    pub fn restore_route(&mut self, id: WireId, segments: &[Coord]) {
        assert!(
            segments.len() >= 2,
            "snapshot for wire {} lost its endpoints",
            id.0
        );
        self.reset_wire(id);
        self.append_route(id, &segments[1..segments.len() - 1]);
    }

    /// Snapshot of every wire's segments, in slot (netlist) order.
    pub fn wire_segment_list(&self) -> Vec<Vec<Coord>> {
        self.wires.iter().map(|w| w.segments().to_vec()).collect()
    }

    /// Restores a snapshot taken with [`Chip::wire_segment_list`].
    pub fn restore_all(&mut self, segments: &[Vec<Coord>]) {
        assert_eq!(
            segments.len(),
            self.wires.len(),
            "snapshot size does not match wire count"
        );
        for (slot, segs) in segments.iter().enumerate() {
            self.restore_route(WireId(slot), segs);
        }
    }

    /// Installs a complete wire path into the slot whose endpoints match
    /// the path's first and last cell (unordered). Used when replaying a
    /// saved solution. Unrouted slots are preferred so duplicate nets
    /// replay into distinct slots.
    pub fn add_entire_wire(&mut self, path: &[Coord]) -> Result<WireId> {
        if path.len() < 2 {
            return Err(GridwireError::TruncatedWire(path.len()));
        }
        let first = path[0];
        let last = path[path.len() - 1];

        let matches = |wire: &Wire| {
            let [e1, e2] = wire.endpoints();
            (e1 == first && e2 == last) || (e1 == last && e2 == first)
        };

        let slot = self
            .wires
            .iter()
            .position(|w| matches(w) && w.segments().len() == 2)
            .or_else(|| self.wires.iter().position(matches))
            .ok_or_else(|| GridwireError::NoMatchingNet(first.to_string(), last.to_string()))?;

        let id = WireId(slot);
        self.reset_wire(id);

        // the slot's own endpoint order may be flipped relative to the path
        let interior = &path[1..path.len() - 1];
        if self.wires[slot].endpoints()[0] == first {
            self.append_route(id, interior);
        } else {
            let reversed: Vec<Coord> = interior.iter().rev().copied().collect();
            self.append_route(id, &reversed);
        }
        Ok(id)
    }

    pub fn add_entire_wires<'a>(
        &mut self,
        paths: impl IntoIterator<Item = &'a [Coord]>,
    ) -> Result<()> {
        for path in paths {
            self.add_entire_wire(path)?;
        }
        Ok(())
    }
}
