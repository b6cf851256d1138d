//! A* search with a penalty-aware heuristic.

use gridwire_core::prelude::*;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};

/// Abort the search after this many pops; a frontier this large means the
/// instance offers no reasonable route.
pub const DEFAULT_FRONTIER_CAP: usize = 100_000;

struct Node {
    coord: Coord,
    parent: Option<usize>,
    edges: u32,
}

/// A* shortest-path from `start` to `end`.
///
/// The priority is `f = g + h + extra` where `g` counts edges so far, `h`
/// is the Manhattan distance to the goal, and `extra` charges the global
/// cost model's penalties up front: 300 for stepping onto a cell another
/// wire occupies and 1 000 000 for duplicating an existing wire edge.
/// Collisions are costed rather than pruned, so a colliding route is only
/// ever returned when no non-colliding alternative exists at all.
///
/// The penalty term makes the heuristic inadmissible on purpose: the
/// search optimizes layout cost, not path length, which is exactly the
/// gradient the optimizer needs. Ties break by insertion order.
pub fn astar_route(
    chip: &Chip,
    start: Coord,
    end: Coord,
    allow_short_circuit: bool,
    frontier_cap: usize,
) -> Option<Vec<Coord>> {
    let mut arena = vec![Node {
        coord: start,
        parent: None,
        edges: 0,
    }];
    // (f, insertion sequence, arena index)
    let mut frontier: BinaryHeap<Reverse<(u64, u64, usize)>> = BinaryHeap::new();
    frontier.push(Reverse((start.manhattan(&end) as u64, 0, 0)));

    let mut visited: HashSet<Coord> = HashSet::from([start]);
    let mut sequence: u64 = 0;
    let mut pops: usize = 0;

    while let Some(Reverse((_, _, index))) = frontier.pop() {
        pops += 1;
        if pops > frontier_cap {
            return None;
        }

        let current = arena[index].coord;
        if current == end {
            return Some(reconstruct(&arena, index));
        }
        let edges = arena[index].edges;

        for next in chip.neighbours(&current) {
            if visited.contains(&next) {
                continue;
            }
            if chip.is_gate_coord(&next) && next != end {
                continue;
            }
            if !allow_short_circuit && !chip.is_gate_coord(&next) && !chip.wires_at(&next).is_empty()
            {
                continue;
            }

            let g = edges as u64 + 1;
            let h = next.manhattan(&end) as u64;
            let f = g + h + extra_cost(chip, &current, &next);

            sequence += 1;
            let child = arena.len();
            arena.push(Node {
                coord: next,
                parent: Some(index),
                edges: edges + 1,
            });
            frontier.push(Reverse((f, sequence, child)));
            visited.insert(next);
        }
    }

    None
}

/// Penalty share of a candidate step onto `cell` coming from `parent`.
fn extra_cost(chip: &Chip, parent: &Coord, cell: &Coord) -> u64 {
    // gates neither intersect nor collide
    if chip.is_gate_coord(cell) {
        return 0;
    }

    let mut extra = 0;
    if !chip.wires_at(cell).is_empty() {
        extra += INTERSECTION_COST;
        if chip.edge_causes_collision(parent, cell) {
            extra += COLLISION_COST;
        }
    }
    extra
}

fn reconstruct(arena: &[Node], goal: usize) -> Vec<Coord> {
    let mut path = Vec::new();
    let mut cursor = Some(goal);
    while let Some(index) = cursor {
        path.push(arena[index].coord);
        cursor = arena[index].parent;
    }
    path.reverse();
    path[1..path.len() - 1].to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridwire_core::chip::GateId;

    fn c(x: i32, y: i32, z: i32) -> Coord {
        Coord::new(x, y, z)
    }

    fn crossing_chip() -> Chip {
        Chip::new(
            0,
            1,
            vec![
                (GateId(1), c(0, 1, 0)),
                (GateId(2), c(2, 1, 0)),
                (GateId(3), c(1, 0, 0)),
                (GateId(4), c(1, 2, 0)),
            ],
            vec![(GateId(1), GateId(2)), (GateId(3), GateId(4))],
            1,
        )
        .unwrap()
    }

    #[test]
    fn test_astar_direct_route_on_empty_grid() {
        let chip = crossing_chip();
        let path = astar_route(&chip, c(0, 1, 0), c(2, 1, 0), true, DEFAULT_FRONTIER_CAP).unwrap();
        assert_eq!(path, vec![c(1, 1, 0)]);
    }

    #[test]
    fn test_astar_prefers_detour_over_intersection() {
        let mut chip = crossing_chip();
        chip.add_entire_wire(&[c(0, 1, 0), c(1, 1, 0), c(2, 1, 0)]).unwrap();

        // crossing (1,1,0) costs 300; a two-edge detour costs 2
        let path = astar_route(&chip, c(1, 0, 0), c(1, 2, 0), true, DEFAULT_FRONTIER_CAP).unwrap();
        assert!(!path.contains(&c(1, 1, 0)));
        assert_eq!(path.len(), 3);

        let mut full = vec![c(1, 0, 0)];
        full.extend(&path);
        full.push(c(1, 2, 0));
        assert!(full.windows(2).all(|p| p[0].is_neighbour_of(&p[1])));
    }

    #[test]
    fn test_astar_without_short_circuit_prunes_occupied_cells() {
        let mut chip = crossing_chip();
        chip.add_entire_wire(&[c(0, 1, 0), c(1, 1, 0), c(2, 1, 0)]).unwrap();

        // with short circuits forbidden the crossing is pruned outright,
        // so the detour is the only option
        let blocked =
            astar_route(&chip, c(1, 0, 0), c(1, 2, 0), false, DEFAULT_FRONTIER_CAP).unwrap();
        assert!(!blocked.contains(&c(1, 1, 0)));
        assert_eq!(blocked.len(), 3);
    }

    #[test]
    fn test_astar_interior_is_six_connected() {
        let chip = Chip::new(
            0,
            1,
            vec![(GateId(1), c(0, 0, 0)), (GateId(2), c(4, 3, 0))],
            vec![(GateId(1), GateId(2))],
            2,
        )
        .unwrap();
        let path = astar_route(&chip, c(0, 0, 0), c(4, 3, 0), true, DEFAULT_FRONTIER_CAP).unwrap();
        assert_eq!(path.len() as u32 + 1, c(0, 0, 0).manhattan(&c(4, 3, 0)));
        let mut full = vec![c(0, 0, 0)];
        full.extend(&path);
        full.push(c(4, 3, 0));
        assert!(full.windows(2).all(|p| p[0].is_neighbour_of(&p[1])));
    }

    #[test]
    fn test_astar_frontier_cap_returns_none() {
        let chip = crossing_chip();
        assert!(astar_route(&chip, c(0, 1, 0), c(2, 1, 0), true, 1).is_none());
    }

    #[test]
    fn test_astar_adjacent_gates() {
        let chip = Chip::new(
            0,
            1,
            vec![(GateId(1), c(0, 0, 0)), (GateId(2), c(1, 0, 0))],
            vec![(GateId(1), GateId(2))],
            1,
        )
        .unwrap();
        let path = astar_route(&chip, c(0, 0, 0), c(1, 0, 0), true, DEFAULT_FRONTIER_CAP).unwrap();
        assert!(path.is_empty());
    }
}
