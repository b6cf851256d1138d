//! Breadth-first path searches.

use gridwire_core::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::collections::{HashMap, HashSet, VecDeque};

/// Shortest-first search from `start` to `end`, allowing at most
/// `manhattan(start, end) + offset` edges.
///
/// A neighbour is pruned when it was already visited, when stepping onto
/// it would duplicate an edge some wire already traverses, when it is a
/// gate cell other than `end`, or, unless `allow_short_circuit`, when
/// another wire occupies it. Passing an RNG shuffles the expansion order
/// per node, diversifying equal-length results; without one the search is
/// fully deterministic with insertion-order tie-breaks.
pub fn bounded_bfs(
    chip: &Chip,
    start: Coord,
    end: Coord,
    offset: usize,
    allow_short_circuit: bool,
    mut rng: Option<&mut StdRng>,
) -> Option<Vec<Coord>> {
    let limit = start.manhattan(&end) as usize + offset;

    let mut parent: HashMap<Coord, Coord> = HashMap::new();
    let mut visited: HashSet<Coord> = HashSet::from([start]);
    let mut queue: VecDeque<(Coord, usize)> = VecDeque::from([(start, 0)]);

    while let Some((current, edges)) = queue.pop_front() {
        if current == end {
            return Some(reconstruct(&parent, start, end));
        }
        if edges >= limit {
            continue;
        }

        let mut neighbours = chip.neighbours(&current);
        if let Some(rng) = rng.as_deref_mut() {
            neighbours.shuffle(rng);
        }

        for next in neighbours {
            if visited.contains(&next) {
                continue;
            }
            if chip.edge_causes_collision(&current, &next) {
                continue;
            }
            if chip.is_gate_coord(&next) && next != end {
                continue;
            }
            if !allow_short_circuit && !chip.is_gate_coord(&next) && !chip.wires_at(&next).is_empty()
            {
                continue;
            }

            visited.insert(next);
            parent.insert(next, current);
            queue.push_back((next, edges + 1));
        }
    }

    None
}

/// Finds a path with exactly `target_edges` edges from `start` to `end`.
///
/// Used by the randomized placement stage: deliberately inefficient routes
/// give the rerouting stage room to work. The visited set is keyed on
/// (cell, depth) so a cell may be re-entered at a different step index,
/// but a single path never revisits its own cells. Other wires' cells are
/// passable (intersections are the accepted currency here) while foreign
/// gates and edge collisions stay forbidden.
pub fn exact_length_bfs(
    chip: &Chip,
    start: Coord,
    end: Coord,
    target_edges: usize,
    mut rng: Option<&mut StdRng>,
) -> Option<Vec<Coord>> {
    let mut visited: HashSet<(Coord, usize)> = HashSet::new();
    let mut queue: VecDeque<Vec<Coord>> = VecDeque::from([vec![start]]);

    while let Some(path) = queue.pop_front() {
        let current = *path.last().expect("queued paths are never empty");
        let edges = path.len() - 1;

        if current == end && edges == target_edges {
            return Some(path[1..path.len() - 1].to_vec());
        }
        if edges >= target_edges {
            continue;
        }

        let mut neighbours = chip.neighbours(&current);
        if let Some(rng) = rng.as_deref_mut() {
            neighbours.shuffle(rng);
        }

        for next in neighbours {
            if path.contains(&next) {
                continue;
            }
            if chip.is_gate_coord(&next) && next != end {
                continue;
            }
            if chip.edge_causes_collision(&current, &next) {
                continue;
            }
            if visited.insert((next, edges + 1)) {
                let mut grown = path.clone();
                grown.push(next);
                queue.push_back(grown);
            }
        }
    }

    None
}

/// Exact-length search that ignores occupancy and collisions entirely.
///
/// Wires may pass through anything except their own path and foreign
/// premature arrivals at `end`. Expansion order is always shuffled.
pub fn exact_length_bfs_unconstrained(
    chip: &Chip,
    start: Coord,
    end: Coord,
    target_edges: usize,
    rng: &mut StdRng,
) -> Option<Vec<Coord>> {
    let mut queue: VecDeque<Vec<Coord>> = VecDeque::from([vec![start]]);

    while let Some(path) = queue.pop_front() {
        let current = *path.last().expect("queued paths are never empty");
        let edges = path.len() - 1;

        if current == end && edges == target_edges {
            return Some(path[1..path.len() - 1].to_vec());
        }
        if edges >= target_edges {
            continue;
        }

        let mut neighbours = chip.neighbours(&current);
        neighbours.shuffle(rng);

        for next in neighbours {
            if path.contains(&next) {
                continue;
            }
            // entering the goal early would strand the path there
            if next == end && edges + 1 != target_edges {
                continue;
            }
            let mut grown = path.clone();
            grown.push(next);
            queue.push_back(grown);
        }
    }

    None
}

fn reconstruct(parent: &HashMap<Coord, Coord>, start: Coord, end: Coord) -> Vec<Coord> {
    let mut path = vec![end];
    let mut cursor = end;
    while cursor != start {
        cursor = parent[&cursor];
        path.push(cursor);
    }
    path.reverse();
    path[1..path.len() - 1].to_vec()
}
