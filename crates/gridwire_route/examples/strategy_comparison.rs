//! Strategy Comparison
//!
//! Routes the same congested board with every sequencer strategy and
//! prints the resulting cost breakdowns side by side.

use gridwire_core::prelude::*;
use gridwire_route::{
    AStarSequencer, Greedy, GreedyRandom, Irra, PseudoRandom, Sequencer,
};

/// A 5-pair board whose mirrored nets all want the same corridor.
fn build_board() -> Chip {
    let pairs = 5;
    let mut gates = Vec::new();
    let mut netlist = Vec::new();
    for i in 0..pairs {
        let bottom = GateId((2 * i + 1) as u32);
        let top = GateId((2 * i + 2) as u32);
        gates.push((bottom, Coord::new(i as i32, 0, 0)));
        gates.push((top, Coord::new((pairs - 1 - i) as i32, 6, 0)));
        netlist.push((bottom, top));
    }
    Chip::new(0, 1, gates, netlist, 1).expect("board is well formed")
}

fn run_strategy(label: &str, sequencer: &mut dyn Sequencer) {
    let mut chip = build_board();
    sequencer.run(&mut chip);

    let breakdown = chip.cost_breakdown();
    println!(
        "  {label:<16} connected={:<5} length={:<4} intersections={:<3} collisions={:<2} cost={}",
        chip.is_fully_connected(),
        breakdown.wire_length,
        breakdown.intersections,
        breakdown.collisions,
        breakdown.total,
    );
}

fn main() {
    println!("╔═══════════════════════════════════════════════════════════════╗");
    println!("║              Sequencer Strategy Comparison                    ║");
    println!("║              5 mirrored nets on a 5×7 board                   ║");
    println!("╚═══════════════════════════════════════════════════════════════╝");
    println!();
    println!("📊 Theoretical minimum: {}", build_board().manhattan_sum());
    println!();

    println!("═════════════════════════════════════════════════════════════════");
    println!("🔬 Deterministic strategies");
    println!("═════════════════════════════════════════════════════════════════");
    run_strategy(
        "greedy",
        &mut Greedy::new(GreedyConfig {
            max_offset: 20,
            allow_short_circuit: true,
        }),
    );
    run_strategy("astar", &mut AStarSequencer::default());

    println!();
    println!("═════════════════════════════════════════════════════════════════");
    println!("🔬 Randomized strategies (seed 42)");
    println!("═════════════════════════════════════════════════════════════════");
    run_strategy(
        "greedy_random",
        &mut GreedyRandom::new(
            GreedyConfig {
                max_offset: 20,
                allow_short_circuit: true,
            },
            Some(42),
        ),
    );
    run_strategy(
        "pseudo_random",
        &mut PseudoRandom::new(RandomConfig { max_offset: 12 }, Some(42)),
    );

    println!();
    println!("═════════════════════════════════════════════════════════════════");
    println!("🔬 IRRA (pseudo-random input, 10 iterations)");
    println!("═════════════════════════════════════════════════════════════════");
    for (label, routing) in [
        ("irra bfs", RoutingMode::Bfs),
        ("irra annealing", RoutingMode::SimulatedAnnealing),
        ("irra astar", RoutingMode::AStar),
    ] {
        let config = IrraConfig {
            iterations: 10,
            acceptable_intersection: 100,
            max_offset: 12,
            rerouting_offset: 12,
            routing,
            ..IrraConfig::default()
        };
        run_strategy(label, &mut Irra::new(config, Some(42)));
    }

    println!();
    println!("Lower cost wins; collisions would add 1 000 000 each.");
}
