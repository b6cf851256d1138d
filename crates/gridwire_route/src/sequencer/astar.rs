//! One-shot A* sequencer.

use super::{wire_order, Sequencer};
use crate::search::{astar_route, DEFAULT_FRONTIER_CAP};
use gridwire_core::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, warn};

/// Routes every wire once with the penalty-aware A* search, short circuits
/// allowed. Crossings that A* accepts are left for a rerouting stage or
/// the optimizer to clean up.
pub struct AStarSequencer {
    order: WireOrder,
    rng: Option<StdRng>,
    frontier_cap: usize,
}

impl AStarSequencer {
    pub fn new(order: WireOrder, seed: Option<u64>) -> Self {
        let rng = match order {
            WireOrder::Shuffled => {
                Some(seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64))
            }
            _ => None,
        };
        Self {
            order,
            rng,
            frontier_cap: DEFAULT_FRONTIER_CAP,
        }
    }

    pub fn with_frontier_cap(mut self, cap: usize) -> Self {
        self.frontier_cap = cap;
        self
    }
}

impl Default for AStarSequencer {
    fn default() -> Self {
        Self::new(WireOrder::Netlist, None)
    }
}

impl Sequencer for AStarSequencer {
    fn name(&self) -> &'static str {
        "astar"
    }

    fn run(&mut self, chip: &mut Chip) {
        let order = wire_order(chip, self.order, self.rng.as_mut());

        for id in order {
            if chip.wire(id).is_connected() {
                continue;
            }

            chip.reset_wire(id);
            let [start, end] = chip.wire(id).endpoints();

            match astar_route(chip, start, end, true, self.frontier_cap) {
                Some(path) => {
                    debug!(wire = id.0, edges = path.len() + 1, "astar route committed");
                    chip.append_route(id, &path);
                }
                None => warn!(wire = id.0, "astar found no route"),
            }
        }
    }
}
