//! Random-order driver: repeat a sequencer across reshuffled wire orders.

use crate::sequencer::Sequencer;
use gridwire_core::prelude::*;
use tracing::info;

/// Runs `sequencer` `iterations` times from a clean slate, keeping the
/// cheapest fully-connected layout, which is restored into the chip at the
/// end. Returns the best cost, or `None` when no run fully connected.
///
/// Order diversity comes from the sequencer itself: pair this with a
/// shuffled-order sequencer, otherwise every run explores the same order.
pub fn run_random_orders(
    chip: &mut Chip,
    sequencer: &mut dyn Sequencer,
    iterations: usize,
) -> Option<u64> {
    let mut best_cost: Option<u64> = None;
    let mut best_segments = chip.wire_segment_list();

    for iteration in 0..iterations {
        chip.reset_all_wires();
        sequencer.run(chip);

        let cost = chip.total_cost();
        if chip.is_fully_connected() && best_cost.map_or(true, |best| cost < best) {
            best_cost = Some(cost);
            best_segments = chip.wire_segment_list();
        }
        info!(
            iteration,
            cost,
            best = ?best_cost,
            algorithm = sequencer.name(),
            "random order pass"
        );
    }

    chip.restore_all(&best_segments);
    best_cost
}
