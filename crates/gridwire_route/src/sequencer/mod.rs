//! Multi-wire sequencing strategies.
//!
//! A sequencer borrows a chip and routes (or reroutes) its wires through
//! the chip's mutation API. Sequencers may leave the chip not fully
//! connected; callers inspect `Chip::is_fully_connected` afterwards.
//!
//! Wire order is expressed as a permutation of slot indices; the chip's
//! wire slots themselves stay in netlist order, so saved solutions always
//! line up with their netlist rows.

mod astar;
mod greedy;
mod irra;
mod random;

pub use astar::AStarSequencer;
pub use greedy::{Greedy, GreedyRandom};
pub use irra::Irra;
pub use random::{PseudoRandom, TrueRandom};

use gridwire_core::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// A multi-wire routing strategy.
pub trait Sequencer {
    fn name(&self) -> &'static str;

    /// Routes the chip's wires in place.
    fn run(&mut self, chip: &mut Chip);
}

/// Materializes a wire-order policy into a slot permutation.
pub(crate) fn wire_order(chip: &Chip, order: WireOrder, rng: Option<&mut StdRng>) -> Vec<WireId> {
    let mut ids: Vec<WireId> = chip.wire_ids().collect();
    match order {
        WireOrder::Netlist => {}
        WireOrder::Sorted => {
            // netlist order is already ascending-Manhattan; re-sorting is
            // for callers that shuffled in between
            ids.sort_by_key(|id| {
                let [a, b] = chip.wire(*id).endpoints();
                a.manhattan(&b)
            });
        }
        WireOrder::Shuffled => {
            ids.shuffle(rng.expect("shuffled wire order needs an rng"));
        }
    }
    ids
}
