//! Optimizer Walkthrough
//!
//! Routes a board greedily, then shows how the A* optimizer lowers the
//! cost as the rerouted tuple size k grows.

use gridwire_core::prelude::*;
use gridwire_route::{AStarOptimizer, GreedyRandom, Sequencer};

fn build_board() -> Chip {
    let gates = vec![
        (GateId(1), Coord::new(0, 0, 0)),
        (GateId(2), Coord::new(6, 4, 0)),
        (GateId(3), Coord::new(6, 0, 0)),
        (GateId(4), Coord::new(0, 4, 0)),
        (GateId(5), Coord::new(3, 0, 0)),
        (GateId(6), Coord::new(3, 4, 0)),
        (GateId(7), Coord::new(0, 2, 0)),
        (GateId(8), Coord::new(6, 2, 0)),
    ];
    let netlist = vec![
        (GateId(1), GateId(2)),
        (GateId(3), GateId(4)),
        (GateId(5), GateId(6)),
        (GateId(7), GateId(8)),
    ];
    Chip::new(0, 1, gates, netlist, 1).expect("board is well formed")
}

fn main() {
    println!("╔═══════════════════════════════════════════════════════════════╗");
    println!("║              A* Optimizer Walkthrough                         ║");
    println!("╚═══════════════════════════════════════════════════════════════╝");
    println!();

    let mut chip = build_board();
    GreedyRandom::new(
        GreedyConfig {
            max_offset: 20,
            allow_short_circuit: true,
        },
        Some(7),
    )
    .run(&mut chip);

    let start = chip.cost_breakdown();
    println!("📊 Greedy starting point:");
    println!(
        "   length={} intersections={} collisions={} cost={}",
        start.wire_length, start.intersections, start.collisions, start.total
    );
    println!("   theoretical minimum: {}", chip.manhattan_sum());
    println!();

    for k in 1..=3 {
        println!("═════════════════════════════════════════════════════════════════");
        println!("🔬 reroute_n_wires = {k}");
        println!("═════════════════════════════════════════════════════════════════");

        let mut working = chip.clone();
        let report = AStarOptimizer::new(
            OptimizerConfig {
                reroute_n_wires: k,
                annealing: AnnealingSchedule::disabled(),
                ..OptimizerConfig::default()
            },
            Some(0),
        )
        .optimize(&mut working);

        println!(
            "   {} -> {} over {} cycles ({} tuples tried)",
            report.starting_cost, report.lowest_cost, report.cycles, report.tuples_tried
        );
    }

    println!();
    println!("═════════════════════════════════════════════════════════════════");
    println!("🔬 Same run with annealing (T0=5, alpha=0.99)");
    println!("═════════════════════════════════════════════════════════════════");
    let mut working = chip.clone();
    let report = AStarOptimizer::new(
        OptimizerConfig {
            reroute_n_wires: 2,
            annealing: AnnealingSchedule::new(5.0, 0.99),
            ..OptimizerConfig::default()
        },
        Some(0),
    )
    .optimize(&mut working);
    println!(
        "   {} -> {} over {} cycles ({} tuples tried)",
        report.starting_cost, report.lowest_cost, report.cycles, report.tuples_tried
    );
}
