//! Iterative Random Rerouting Algorithm.

use super::{AStarSequencer, PseudoRandom, Sequencer};
use crate::search::{astar_route, bounded_bfs, DEFAULT_FRONTIER_CAP};
use gridwire_core::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

/// IRRA: repeatedly generate an input solution, resolve its intersections
/// by rerouting one wire at a time, locally optimize, and keep the best
/// layout seen.
///
/// The input solution comes from either the pseudo-random sequencer or the
/// shuffled A* sequencer. Rerouting runs bounded BFS (optionally behind a
/// simulated-annealing acceptance stage that may take a worse route to
/// escape a local minimum) or A* with an intersections-first acceptance
/// rule.
pub struct Irra {
    config: IrraConfig,
    rng: StdRng,
    /// Cost recorded at the end of every iteration, for parameter studies.
    pub all_costs: Vec<u64>,
    /// Best cost seen across all iterations.
    pub best_cost: u64,
}

impl Irra {
    pub fn new(config: IrraConfig, seed: Option<u64>) -> Self {
        Self {
            config,
            rng: seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64),
            all_costs: Vec::new(),
            best_cost: u64::MAX,
        }
    }

    pub fn config(&self) -> &IrraConfig {
        &self.config
    }

    fn make_input_sequencer(&mut self) -> Box<dyn Sequencer> {
        match self.config.input {
            IrraInput::PseudoRandom => Box::new(PseudoRandom::new(
                RandomConfig {
                    max_offset: self.config.max_offset,
                },
                Some(self.rng.gen()),
            )),
            IrraInput::AStar => Box::new(AStarSequencer::new(
                WireOrder::Shuffled,
                Some(self.rng.gen()),
            )),
        }
    }

    /// Regenerates input solutions until one is fully connected with an
    /// acceptable intersection count.
    fn generate_input(&mut self, chip: &mut Chip, input: &mut dyn Sequencer) {
        let mut discarded = 0u32;
        loop {
            chip.reset_all_wires();
            input.run(chip);
            let intersections = chip.wire_intersect_count();
            if chip.is_fully_connected() && intersections < self.config.acceptable_intersection {
                if discarded > 0 {
                    debug!(discarded, intersections, "input solution accepted");
                }
                return;
            }
            discarded += 1;
        }
    }

    // ========================================================================
    // Rerouting stage
    // ========================================================================

    /// Picks one wire at a random intersection cell and tries to relocate
    /// it; a successful reroute restarts the scan with fresh intersection
    /// coordinates. Stops when a whole scan makes no progress.
    fn reroute_intersections_bfs(&mut self, chip: &mut Chip) {
        let annealing = matches!(self.config.routing, RoutingMode::SimulatedAnnealing);
        let schedule = self.config.annealing;
        let mut attempts: u32 = 0;
        let mut temperature = if annealing {
            schedule.start_temperature
        } else {
            0.0
        };

        loop {
            if chip.wire_intersect_count() == 0 {
                return;
            }
            let coords = chip.intersection_coords();
            if coords.is_empty() {
                return;
            }

            let mut improved = false;
            for coord in &coords {
                let Some(target) = self.pick_wire_at(chip, coord) else {
                    continue;
                };

                attempts += 1;
                let rerouted = self.reroute_wire_bfs(chip, target, temperature);
                if annealing {
                    temperature = schedule.temperature(attempts);
                }
                if rerouted {
                    improved = true;
                    break;
                }
            }

            if !improved {
                return;
            }
            debug!(
                intersections = chip.wire_intersect_count(),
                cost = chip.total_cost(),
                "rerouting pass improved"
            );
        }
    }

    fn reroute_intersections_astar(&mut self, chip: &mut Chip) {
        loop {
            if chip.wire_intersect_count() == 0 {
                return;
            }
            let coords = chip.intersection_coords();

            let mut improved = false;
            for coord in &coords {
                let Some(target) = self.pick_wire_at(chip, coord) else {
                    continue;
                };
                if self.reroute_wire_astar(chip, target) {
                    improved = true;
                    break;
                }
            }

            if !improved {
                return;
            }
        }
    }

    /// Uniformly picks one of the ≥2 wires crossing at `coord`.
    fn pick_wire_at(&mut self, chip: &Chip, coord: &Coord) -> Option<WireId> {
        let mut ids: Vec<WireId> = chip.wires_at(coord).iter().copied().collect();
        if ids.len() < 2 {
            return None;
        }
        ids.sort_unstable();
        Some(ids[self.rng.gen_range(0..ids.len())])
    }

    /// Transactional BFS reroute of one wire.
    ///
    /// With annealing active and a warm temperature, a short-circuiting
    /// route is proposed first and kept only if the acceptance rule takes
    /// it. Otherwise (or on refusal) a clean route is searched; if found it
    /// is committed even when it raises the cost: it still removes this
    /// wire's intersections, and the local optimization pass mops up.
    fn reroute_wire_bfs(&mut self, chip: &mut Chip, id: WireId, temperature: f64) -> bool {
        let snapshot = chip.wire(id).segments().to_vec();
        let old_cost = chip.total_cost();
        let [start, end] = chip.wire(id).endpoints();
        let offset = self.config.rerouting_offset;

        chip.reset_wire(id);

        let annealing = matches!(self.config.routing, RoutingMode::SimulatedAnnealing);
        if annealing && temperature > 0.0 {
            if let Some(path) = bounded_bfs(chip, start, end, offset, true, None) {
                chip.append_route(id, &path);
                let new_cost = chip.total_cost();
                let p = AnnealingSchedule::acceptance_probability(new_cost, old_cost, temperature);
                if new_cost != old_cost
                    && chip.is_fully_connected()
                    && self.rng.gen::<f64>() < p
                {
                    if new_cost > old_cost {
                        debug!(old_cost, new_cost, temperature, "annealing took a regression");
                    }
                    return true;
                }
                chip.reset_wire(id);
            }
        }

        if let Some(path) = bounded_bfs(chip, start, end, offset, false, None) {
            chip.append_route(id, &path);
            return true;
        }

        chip.restore_route(id, &snapshot);
        false
    }

    /// Transactional A* reroute: accepted only when it strictly reduces
    /// intersections, or ties them and strictly reduces cost.
    fn reroute_wire_astar(&mut self, chip: &mut Chip, id: WireId) -> bool {
        let snapshot = chip.wire(id).segments().to_vec();
        let old_intersections = chip.wire_intersect_count();
        let old_cost = chip.total_cost();
        let [start, end] = chip.wire(id).endpoints();

        chip.reset_wire(id);

        if let Some(path) = astar_route(chip, start, end, true, DEFAULT_FRONTIER_CAP) {
            chip.append_route(id, &path);
            let fully_connected = chip.is_fully_connected();
            let intersections = chip.wire_intersect_count();

            if fully_connected && intersections < old_intersections {
                debug!(intersections, "astar reroute reduced intersections");
                return true;
            }
            if fully_connected
                && intersections == old_intersections
                && chip.total_cost() < old_cost
            {
                return true;
            }
        }

        chip.restore_route(id, &snapshot);
        false
    }

    // ========================================================================
    // Local optimization
    // ========================================================================

    /// One pass over every wire: rip it out, search a fresh route, keep it
    /// only when the total cost strictly drops and the chip stays fully
    /// connected.
    fn local_optimize(&mut self, chip: &mut Chip) {
        for slot in 0..chip.wire_count() {
            let id = WireId(slot);
            let snapshot = chip.wire(id).segments().to_vec();
            let old_cost = chip.total_cost();
            let [start, end] = chip.wire(id).endpoints();

            chip.reset_wire(id);

            let path = match self.config.routing {
                RoutingMode::AStar => astar_route(chip, start, end, true, DEFAULT_FRONTIER_CAP),
                _ => bounded_bfs(
                    chip,
                    start,
                    end,
                    self.config.rerouting_offset,
                    false,
                    None,
                ),
            };

            match path {
                Some(path) => {
                    chip.append_route(id, &path);
                    if chip.total_cost() >= old_cost || !chip.is_fully_connected() {
                        chip.restore_route(id, &snapshot);
                    }
                }
                None => chip.restore_route(id, &snapshot),
            }
        }
    }
}

impl Sequencer for Irra {
    fn name(&self) -> &'static str {
        match (self.config.input, self.config.routing) {
            (IrraInput::PseudoRandom, RoutingMode::AStar) => "irra_pr_astar",
            (IrraInput::PseudoRandom, RoutingMode::SimulatedAnnealing) => "irra_pr_annealing",
            (IrraInput::PseudoRandom, RoutingMode::Bfs) => "irra_pr",
            (IrraInput::AStar, RoutingMode::AStar) => "irra_astar_astar",
            (IrraInput::AStar, RoutingMode::SimulatedAnnealing) => "irra_astar_annealing",
            (IrraInput::AStar, RoutingMode::Bfs) => "irra_astar",
        }
    }

    fn run(&mut self, chip: &mut Chip) {
        let mut input = self.make_input_sequencer();
        let mut best_cost = u64::MAX;
        let mut best_segments = chip.wire_segment_list();
        let mut optimal_streak: usize = 0;

        for iteration in 1..=self.config.iterations {
            info!(
                iteration,
                total = self.config.iterations,
                input = input.name(),
                "irra iteration"
            );

            self.generate_input(chip, input.as_mut());

            match self.config.routing {
                RoutingMode::AStar => self.reroute_intersections_astar(chip),
                _ => self.reroute_intersections_bfs(chip),
            }

            self.local_optimize(chip);

            let cost = chip.total_cost();
            let intersections = chip.wire_intersect_count();
            self.all_costs.push(cost);
            info!(iteration, cost, best = best_cost.min(cost), intersections, "irra iteration done");

            if cost < best_cost {
                best_cost = cost;
                best_segments = chip.wire_segment_list();
                optimal_streak = 0;
            }
            if cost == best_cost {
                optimal_streak += 1;
            }

            if intersections <= self.config.intersection_limit
                && optimal_streak > self.config.early_stopping_patience
            {
                info!(iteration, cost, "intersection limit reached, stopping early");
                break;
            }
        }

        chip.restore_all(&best_segments);
        self.best_cost = best_cost;
        info!(
            best_cost,
            intersections = chip.wire_intersect_count(),
            "irra done"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridwire_core::chip::GateId;

    fn c(x: i32, y: i32, z: i32) -> Coord {
        Coord::new(x, y, z)
    }

    /// Crossing pair whose minimum-length routes share one cell.
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

    fn pr_config() -> IrraConfig {
        IrraConfig {
            iterations: 5,
            acceptable_intersection: 2,
            intersection_limit: 0,
            early_stopping_patience: 999_999,
            max_offset: 6,
            rerouting_offset: 6,
            routing: RoutingMode::Bfs,
            input: IrraInput::PseudoRandom,
            annealing: AnnealingSchedule::disabled(),
        }
    }

    #[test]
    fn test_irra_resolves_crossing_to_zero_intersections() {
        let mut chip = crossing_chip();
        let mut irra = Irra::new(pr_config(), Some(42));
        irra.run(&mut chip);

        assert!(chip.is_fully_connected());
        assert_eq!(chip.wire_intersect_count(), 0);
        assert_eq!(chip.collision_count(), 0);
        // one wire takes the two-edge detour; the other stays minimal
        assert_eq!(chip.total_cost(), chip.manhattan_sum() + 2);
        assert_eq!(irra.all_costs.len(), 5);
    }

    #[test]
    fn test_irra_astar_routing_variant() {
        let mut chip = crossing_chip();
        let mut config = pr_config();
        config.routing = RoutingMode::AStar;
        let mut irra = Irra::new(config, Some(7));
        irra.run(&mut chip);

        assert!(chip.is_fully_connected());
        assert_eq!(chip.wire_intersect_count(), 0);
        assert_eq!(chip.total_cost(), chip.manhattan_sum() + 2);
    }

    #[test]
    fn test_irra_astar_input_variant() {
        let mut chip = crossing_chip();
        let mut config = pr_config();
        config.input = IrraInput::AStar;
        // the A* input already avoids the crossing; IRRA must not undo it
        let mut irra = Irra::new(config, Some(3));
        irra.run(&mut chip);

        assert!(chip.is_fully_connected());
        assert_eq!(chip.wire_intersect_count(), 0);
        assert_eq!(chip.total_cost(), chip.manhattan_sum() + 2);
    }

    #[test]
    fn test_irra_annealing_variant_stays_valid() {
        let mut chip = crossing_chip();
        let mut config = pr_config();
        config.routing = RoutingMode::SimulatedAnnealing;
        config.annealing = AnnealingSchedule::new(2000.0, 0.9);
        let mut irra = Irra::new(config, Some(11));
        irra.run(&mut chip);

        assert!(chip.is_fully_connected());
        assert_eq!(chip.collision_count(), 0);
        // the restored best solution is at least as good as any logged one
        let best = *irra.all_costs.iter().min().unwrap();
        assert_eq!(chip.total_cost(), best);
    }

    #[test]
    fn test_irra_seed_reproducibility() {
        let run = |seed| {
            let mut chip = crossing_chip();
            Irra::new(pr_config(), Some(seed)).run(&mut chip);
            chip.wire_segment_list()
        };
        assert_eq!(run(123), run(123));
    }

    #[test]
    fn test_irra_early_stopping() {
        let mut chip = crossing_chip();
        let mut config = pr_config();
        config.iterations = 50;
        config.early_stopping_patience = 2;
        let mut irra = Irra::new(config, Some(42));
        irra.run(&mut chip);

        // once the optimum repeats three times the loop stops early
        assert!(irra.all_costs.len() < 50);
        assert_eq!(chip.wire_intersect_count(), 0);
    }
}
