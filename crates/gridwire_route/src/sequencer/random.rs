//! Randomized-length sequencers.

use super::{wire_order, Sequencer};
use crate::search::{exact_length_bfs, exact_length_bfs_unconstrained};
use gridwire_core::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::debug;

/// Routes each wire at a randomly drawn length near its Manhattan minimum.
///
/// For a wire of Manhattan distance `m`, candidate cell counts
/// `{m−1, m+1, …}` up to `m+max_offset` are shuffled and tried until an
/// exact-length search succeeds. The resulting length diversity is what
/// gives the IRRA rerouting stage room to untangle intersections. The low
/// candidate below the minimum can never match and is harmless; it keeps
/// the pool parity-aligned with the minimum length.
pub struct PseudoRandom {
    config: RandomConfig,
    rng: StdRng,
}

impl PseudoRandom {
    pub fn new(config: RandomConfig, seed: Option<u64>) -> Self {
        Self {
            config,
            rng: seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64),
        }
    }
}

impl Sequencer for PseudoRandom {
    fn name(&self) -> &'static str {
        "pseudo_random"
    }

    fn run(&mut self, chip: &mut Chip) {
        let order = wire_order(chip, WireOrder::Shuffled, Some(&mut self.rng));

        for id in order {
            if chip.wire(id).is_connected() {
                continue;
            }

            chip.reset_wire(id);
            let [start, end] = chip.wire(id).endpoints();
            let min_cells = start.manhattan(&end) as usize;

            let mut candidates: Vec<usize> = (min_cells.saturating_sub(1)
                ..=min_cells + self.config.max_offset)
                .step_by(2)
                .collect();
            candidates.shuffle(&mut self.rng);

            for cells in candidates {
                if cells < 2 {
                    continue;
                }
                if let Some(path) = exact_length_bfs(chip, start, end, cells - 1, None) {
                    debug!(wire = id.0, edges = cells - 1, "placed at random length");
                    chip.append_route(id, &path);
                    break;
                }
            }
        }
    }
}

/// Pseudo-random placement that ignores every constraint except staying on
/// the grid and not revisiting its own path. Useful as a worst-case
/// baseline in experiments.
pub struct TrueRandom {
    config: RandomConfig,
    rng: StdRng,
}

impl TrueRandom {
    pub fn new(config: RandomConfig, seed: Option<u64>) -> Self {
        Self {
            config,
            rng: seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64),
        }
    }
}

impl Sequencer for TrueRandom {
    fn name(&self) -> &'static str {
        "true_random"
    }

    fn run(&mut self, chip: &mut Chip) {
        let order = wire_order(chip, WireOrder::Shuffled, Some(&mut self.rng));

        for id in order {
            if chip.wire(id).is_connected() {
                continue;
            }

            chip.reset_wire(id);
            let [start, end] = chip.wire(id).endpoints();
            let min_cells = start.manhattan(&end) as usize;

            let mut candidates: Vec<usize> = (min_cells.saturating_sub(1)
                ..=min_cells + self.config.max_offset)
                .step_by(2)
                .collect();
            candidates.shuffle(&mut self.rng);

            for cells in candidates {
                if cells < 2 {
                    continue;
                }
                if let Some(path) =
                    exact_length_bfs_unconstrained(chip, start, end, cells - 1, &mut self.rng)
                {
                    chip.append_route(id, &path);
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridwire_core::chip::GateId;

    fn c(x: i32, y: i32, z: i32) -> Coord {
        Coord::new(x, y, z)
    }

    fn chip() -> Chip {
        Chip::new(
            0,
            1,
            vec![
                (GateId(1), c(0, 0, 0)),
                (GateId(2), c(3, 0, 0)),
                (GateId(3), c(0, 2, 0)),
                (GateId(4), c(3, 2, 0)),
            ],
            vec![(GateId(1), GateId(2)), (GateId(3), GateId(4))],
            1,
        )
        .unwrap()
    }

    #[test]
    fn test_pseudo_random_connects_open_layout() {
        let mut chip = chip();
        let mut seq = PseudoRandom::new(RandomConfig { max_offset: 10 }, Some(1));
        seq.run(&mut chip);
        assert!(chip.is_fully_connected());
        assert_eq!(chip.collision_count(), 0);
    }

    #[test]
    fn test_pseudo_random_is_seed_reproducible() {
        let mut chip_a = chip();
        let mut chip_b = chip();
        PseudoRandom::new(RandomConfig::default(), Some(42)).run(&mut chip_a);
        PseudoRandom::new(RandomConfig::default(), Some(42)).run(&mut chip_b);

        // segment-by-segment equality across the whole layout
        assert_eq!(chip_a.wire_segment_list(), chip_b.wire_segment_list());
    }

    #[test]
    fn test_pseudo_random_different_seeds_diverge_eventually() {
        // with a generous candidate pool some pair of seeds disagrees on
        // at least one wire's path
        let layouts: Vec<_> = (0..6)
            .map(|seed| {
                let mut chip = chip();
                PseudoRandom::new(RandomConfig { max_offset: 12 }, Some(seed)).run(&mut chip);
                chip.wire_segment_list()
            })
            .collect();
        assert!(
            layouts.iter().any(|l| *l != layouts[0]),
            "six seeds produced identical layouts"
        );
    }

    #[test]
    fn test_true_random_connects_and_reproduces() {
        // small offset pool: the unconstrained search has no visited set,
        // so long targets explode combinatorially
        let config = RandomConfig { max_offset: 4 };
        let mut chip_a = chip();
        let mut chip_b = chip();
        TrueRandom::new(config.clone(), Some(9)).run(&mut chip_a);
        TrueRandom::new(config, Some(9)).run(&mut chip_b);

        assert!(chip_a.is_fully_connected());
        assert_eq!(chip_a.wire_segment_list(), chip_b.wire_segment_list());
    }
}
