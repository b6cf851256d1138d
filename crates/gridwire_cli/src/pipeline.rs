//! Gridwire system - integrated pipeline for chip routing.
//!
//! This module provides the main integration point for the gridwire
//! components:
//! - Netlist loading via gridwire_io
//! - Routing via a configurable sequencer strategy
//! - Post-optimization via the A* optimizer
//! - Solution persistence and verification
//!
//! ## Pipeline overview
//!
//! ```text
//! print/netlist CSV
//!       │
//!       ▼
//! ┌─────────────┐
//! │  Sequencer   │ ─── routed chip
//! └─────────────┘
//!       │
//!       ▼
//! ┌─────────────┐
//! │  Optimizer   │ ─── lowered cost
//! └─────────────┘
//!       │
//!       ▼
//! solution CSV + verification
//! ```

use gridwire_core::prelude::*;
use gridwire_route::{AStarOptimizer, Greedy, GreedyRandom, Irra, OptimizeReport, Sequencer};
use std::time::{Duration, Instant};
use tracing::info;

/// Which sequencer the pipeline runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Greedy,
    GreedyRandom,
    IrraPr,
    IrraAStar,
}

/// Configuration for the routing pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Sequencer strategy
    pub strategy: Strategy,
    /// Greedy configuration (greedy strategies)
    pub greedy: GreedyConfig,
    /// IRRA configuration (IRRA strategies)
    pub irra: IrraConfig,
    /// Run the A* optimizer after sequencing
    pub optimize: bool,
    /// Optimizer configuration
    pub optimizer: OptimizerConfig,
    /// RNG seed for the randomized stages
    pub seed: Option<u64>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::GreedyRandom,
            greedy: GreedyConfig {
                max_offset: 20,
                allow_short_circuit: true,
            },
            irra: IrraConfig::default(),
            optimize: true,
            optimizer: OptimizerConfig::default(),
            seed: None,
        }
    }
}

/// Result of the full routing pipeline.
#[derive(Debug, Clone)]
pub struct PipelineResult {
    /// Cost after sequencing, before optimization
    pub routed_cost: u64,
    /// Final cost
    pub final_cost: u64,
    /// Cost breakdown of the final layout
    pub breakdown: CostBreakdown,
    /// Theoretical minimum total wire length
    pub theoretical_minimum: u64,
    /// Whether every wire connected
    pub fully_connected: bool,
    /// Optimizer report, when optimization ran
    pub optimization: Option<OptimizeReport>,
    /// Time breakdown
    pub timing: PipelineTiming,
}

/// Timing breakdown for pipeline stages.
#[derive(Debug, Clone, Default)]
pub struct PipelineTiming {
    pub routing_time: Duration,
    pub optimization_time: Duration,
}

/// Main integration point: routes and optimizes chips under one config.
pub struct RoutingSystem {
    config: PipelineConfig,
}

impl Default for RoutingSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl RoutingSystem {
    pub fn new() -> Self {
        Self::with_config(PipelineConfig::default())
    }

    pub fn with_config(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    fn build_sequencer(&self) -> Box<dyn Sequencer> {
        match self.config.strategy {
            Strategy::Greedy => Box::new(Greedy::new(self.config.greedy.clone())),
            Strategy::GreedyRandom => Box::new(GreedyRandom::new(
                self.config.greedy.clone(),
                self.config.seed,
            )),
            Strategy::IrraPr => {
                let mut irra_config = self.config.irra.clone();
                irra_config.input = IrraInput::PseudoRandom;
                Box::new(Irra::new(irra_config, self.config.seed))
            }
            Strategy::IrraAStar => {
                let mut irra_config = self.config.irra.clone();
                irra_config.input = IrraInput::AStar;
                Box::new(Irra::new(irra_config, self.config.seed))
            }
        }
    }

    /// Runs the configured pipeline over a chip in place.
    pub fn route(&mut self, chip: &mut Chip) -> PipelineResult {
        let mut timing = PipelineTiming::default();

        let routing_start = Instant::now();
        let mut sequencer = self.build_sequencer();
        info!(strategy = sequencer.name(), "pipeline routing");
        sequencer.run(chip);
        timing.routing_time = routing_start.elapsed();

        let routed_cost = chip.total_cost();
        let fully_connected = chip.is_fully_connected();

        let optimization = if self.config.optimize && fully_connected {
            let optimization_start = Instant::now();
            let report = AStarOptimizer::new(self.config.optimizer.clone(), self.config.seed)
                .optimize(chip);
            timing.optimization_time = optimization_start.elapsed();
            Some(report)
        } else {
            None
        };

        let breakdown = chip.cost_breakdown();
        PipelineResult {
            routed_cost,
            final_cost: breakdown.total,
            breakdown,
            theoretical_minimum: chip.manhattan_sum(),
            fully_connected: chip.is_fully_connected(),
            optimization,
            timing,
        }
    }

    /// Times the pipeline over `iterations` fresh synthetic boards.
    pub fn benchmark(&mut self, pairs: usize, rows: i32, iterations: usize) -> BenchmarkResult {
        let total_start = Instant::now();
        let mut routing_total = Duration::ZERO;
        let mut optimize_total = Duration::ZERO;
        let mut best_cost = u64::MAX;
        let mut connected_runs = 0;

        for _ in 0..iterations {
            let mut chip = synthetic_board(pairs, rows);
            let result = self.route(&mut chip);
            routing_total += result.timing.routing_time;
            optimize_total += result.timing.optimization_time;
            if result.fully_connected {
                connected_runs += 1;
                best_cost = best_cost.min(result.final_cost);
            }
        }

        BenchmarkResult {
            iterations,
            connected_runs,
            best_cost: (connected_runs > 0).then_some(best_cost),
            total_time: total_start.elapsed(),
            avg_routing: routing_total / iterations.max(1) as u32,
            avg_optimize: optimize_total / iterations.max(1) as u32,
        }
    }
}

/// Result of a pipeline benchmark.
#[derive(Debug, Clone)]
pub struct BenchmarkResult {
    pub iterations: usize,
    pub connected_runs: usize,
    pub best_cost: Option<u64>,
    pub total_time: Duration,
    pub avg_routing: Duration,
    pub avg_optimize: Duration,
}

impl std::fmt::Display for BenchmarkResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Gridwire Benchmark ===")?;
        writeln!(f, "Iterations:   {}", self.iterations)?;
        writeln!(f, "Connected:    {}", self.connected_runs)?;
        match self.best_cost {
            Some(cost) => writeln!(f, "Best cost:    {cost}")?,
            None => writeln!(f, "Best cost:    n/a")?,
        }
        writeln!(f, "Total time:   {:.2?}", self.total_time)?;
        writeln!(f, "Avg routing:  {:.2?}", self.avg_routing)?;
        write!(f, "Avg optimize: {:.2?}", self.avg_optimize)
    }
}

/// A synthetic benchmark board: `pairs` gates along the bottom row wired
/// to mirrored gates along the top row, forcing plenty of crossings.
pub fn synthetic_board(pairs: usize, rows: i32) -> Chip {
    assert!(pairs >= 1, "a board needs at least one pair");
    assert!(rows >= 2, "a board needs at least two rows");

    let mut gates = Vec::with_capacity(pairs * 2);
    let mut netlist = Vec::with_capacity(pairs);
    for i in 0..pairs {
        let bottom = GateId((2 * i + 1) as u32);
        let top = GateId((2 * i + 2) as u32);
        gates.push((bottom, Coord::new(i as i32, 0, 0)));
        gates.push((top, Coord::new((pairs - 1 - i) as i32, rows - 1, 0)));
        netlist.push((bottom, top));
    }

    Chip::new(0, 1, gates, netlist, 1).expect("synthetic board is well formed")
}
