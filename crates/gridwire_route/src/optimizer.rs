//! A*-based post-optimizer.
//!
//! Takes a fully-connected chip and iteratively lowers its total cost by
//! ripping out k-tuples of wires and rerouting them with the penalty-aware
//! A* search. Every attempt is transactional: either the whole tuple is
//! rerouted and accepted, or every wire of the tuple is restored exactly.

use crate::search::{astar_route, DEFAULT_FRONTIER_CAP};
use gridwire_core::prelude::*;
use itertools::Itertools;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info};

/// Summary of an optimizer run, for reporting.
#[derive(Debug, Clone, Serialize)]
pub struct OptimizeReport {
    pub starting_cost: u64,
    pub lowest_cost: u64,
    pub cycles: usize,
    pub tuples_tried: usize,
}

pub struct AStarOptimizer {
    config: OptimizerConfig,
    rng: StdRng,
    frontier_cap: usize,
}

impl AStarOptimizer {
    pub fn new(config: OptimizerConfig, seed: Option<u64>) -> Self {
        Self {
            config,
            rng: seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64),
            frontier_cap: DEFAULT_FRONTIER_CAP,
        }
    }

    /// Runs the optimizer. For k = 1..=K, cycles over ordered k-tuples of
    /// wires (exhaustively while P(N,k) stays under the permutation
    /// limit, sampled otherwise) and repeats each k's cycle until one
    /// completes without lowering the best cost. The chip ends on the best
    /// layout seen.
    pub fn optimize(&mut self, chip: &mut Chip) -> OptimizeReport {
        assert!(
            chip.is_fully_connected(),
            "optimizer requires a fully connected chip"
        );

        let starting_cost = chip.total_cost();
        let mut lowest_cost = starting_cost;
        let mut best_segments = chip.wire_segment_list();
        let wire_count = chip.wire_count();

        let mut cycles = 0;
        let mut tuples_tried = 0;

        for k in 1..=self.config.reroute_n_wires.min(wire_count) {
            info!(k, lowest_cost, "optimizer pass");
            let mut first_cycle = true;

            loop {
                cycles += 1;
                let cost_before_cycle = lowest_cost;
                let mut temperature = self.config.annealing.start_temperature;
                let mut attempts: u32 = 0;

                for tuple in self.tuples_for_cycle(wire_count, k) {
                    tuples_tried += 1;
                    attempts += 1;
                    self.try_tuple(
                        chip,
                        &tuple,
                        &mut lowest_cost,
                        &mut best_segments,
                        first_cycle,
                        temperature,
                    );
                    if self.config.annealing.is_enabled() {
                        temperature = self.config.annealing.temperature(attempts);
                    }
                }

                first_cycle = false;
                if lowest_cost >= cost_before_cycle {
                    break;
                }
                debug!(k, lowest_cost, "cycle improved, repeating");
            }
        }

        chip.restore_all(&best_segments);
        info!(starting_cost, lowest_cost, cycles, "optimizer done");

        OptimizeReport {
            starting_cost,
            lowest_cost,
            cycles,
            tuples_tried,
        }
    }

    /// Ordered k-tuples of distinct wire slots for one cycle.
    fn tuples_for_cycle(&mut self, n: usize, k: usize) -> Vec<Vec<usize>> {
        if permutation_count(n, k) < self.config.total_permutations_limit {
            (0..n).permutations(k).collect()
        } else {
            (0..self.config.random_iterations)
                .map(|_| rand::seq::index::sample(&mut self.rng, n, k).into_vec())
                .collect()
        }
    }

    /// One transactional tuple attempt.
    fn try_tuple(
        &mut self,
        chip: &mut Chip,
        tuple: &[usize],
        lowest_cost: &mut u64,
        best_segments: &mut Vec<Vec<Coord>>,
        first_cycle: bool,
        temperature: f64,
    ) {
        let ids: Vec<WireId> = tuple.iter().map(|&slot| WireId(slot)).collect();
        let snapshots: Vec<Vec<Coord>> = ids
            .iter()
            .map(|id| chip.wire(*id).segments().to_vec())
            .collect();
        let old_intersections = chip.wire_intersect_count();
        let current_cost = chip.total_cost();

        for &id in &ids {
            chip.reset_wire(id);
        }

        let mut failed = false;
        for &id in &ids {
            let [start, end] = chip.wire(id).endpoints();
            match astar_route(chip, start, end, true, self.frontier_cap) {
                Some(path) => chip.append_route(id, &path),
                None => {
                    failed = true;
                    break;
                }
            }
        }

        let mut accepted = false;
        if !failed {
            let new_cost = chip.total_cost();
            let fully_connected = chip.is_fully_connected();

            if self.config.annealing.is_enabled() {
                let p = AnnealingSchedule::acceptance_probability(
                    new_cost,
                    current_cost,
                    temperature,
                );
                accepted = fully_connected && self.rng.gen::<f64>() < p;
            } else if fully_connected && chip.wire_intersect_count() <= old_intersections {
                // first cycle may switch between equal-cost configurations
                accepted = if first_cycle {
                    new_cost <= *lowest_cost
                } else {
                    new_cost < *lowest_cost
                };
            }

            if accepted && new_cost < *lowest_cost {
                debug!(new_cost, "optimizer improved");
                *lowest_cost = new_cost;
                *best_segments = chip.wire_segment_list();
            }
        }

        if !accepted {
            for (id, snapshot) in ids.iter().zip(&snapshots) {
                chip.restore_route(*id, snapshot);
            }
        }
    }
}

/// P(n, k) = n·(n−1)·…·(n−k+1), saturating.
fn permutation_count(n: usize, k: usize) -> u64 {
    let mut product: u64 = 1;
    for i in 0..k {
        product = product.saturating_mul((n - i) as u64);
    }
    product
}
