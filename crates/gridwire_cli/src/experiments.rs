//! Experiment drivers.
//!
//! Each driver fans independent chip instances across seeds with rayon
//! (the core stays single-threaded per chip; parallelism only ever spans
//! separate chips) and returns serializable results for JSON output.

use gridwire_core::prelude::*;
use gridwire_io::load_chip;
use gridwire_route::{Irra, PseudoRandom, Sequencer};
use rayon::prelude::*;
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

/// Where the experiment's chips come from.
#[derive(Debug, Clone)]
pub struct ExperimentContext {
    pub base_data_path: PathBuf,
    pub chip_id: u32,
    pub net_id: u32,
    pub padding: i32,
    /// Base seed; per-task seeds are derived from it.
    pub seed: u64,
}

impl ExperimentContext {
    fn fresh_chip(&self) -> Result<Chip> {
        load_chip(&self.base_data_path, self.chip_id, self.net_id, self.padding)
    }
}

/// One (T0, alpha) cell of the annealing parameter sweep.
#[derive(Debug, Clone, Serialize)]
pub struct AnnealingCell {
    pub start_temperature: f64,
    pub alpha: f64,
    pub costs: Vec<u64>,
    pub best_cost: u64,
    pub mean_cost: f64,
}

/// Grid sweep over annealing parameters for PR-input IRRA.
pub fn annealing_sweep(
    ctx: &ExperimentContext,
    start_temperatures: &[f64],
    alphas: &[f64],
    runs_per_cell: usize,
    iterations: usize,
) -> Result<Vec<AnnealingCell>> {
    let grid: Vec<(f64, f64)> = start_temperatures
        .iter()
        .flat_map(|&t0| alphas.iter().map(move |&alpha| (t0, alpha)))
        .collect();

    grid.par_iter()
        .enumerate()
        .map(|(cell_index, &(start_temperature, alpha))| {
            let costs: Vec<u64> = (0..runs_per_cell)
                .map(|run| -> Result<u64> {
                    let mut chip = ctx.fresh_chip()?;
                    let config = IrraConfig {
                        iterations,
                        routing: RoutingMode::SimulatedAnnealing,
                        annealing: AnnealingSchedule::new(start_temperature, alpha),
                        ..IrraConfig::default()
                    };
                    let seed = ctx.seed ^ ((cell_index as u64) << 32) ^ run as u64;
                    let mut irra = Irra::new(config, Some(seed));
                    irra.run(&mut chip);
                    Ok(chip.total_cost())
                })
                .collect::<Result<_>>()?;

            let best_cost = costs.iter().min().copied().unwrap_or(0);
            let mean_cost = costs.iter().sum::<u64>() as f64 / costs.len().max(1) as f64;
            info!(start_temperature, alpha, best_cost, "annealing cell done");

            Ok(AnnealingCell {
                start_temperature,
                alpha,
                costs,
                best_cost,
                mean_cost,
            })
        })
        .collect()
}

/// One rerouting-offset cell of the IRRA offset sweep.
#[derive(Debug, Clone, Serialize)]
pub struct OffsetCell {
    pub rerouting_offset: usize,
    pub costs: Vec<u64>,
    pub best_cost: u64,
    pub mean_cost: f64,
}

/// Sweep over the IRRA rerouting offset.
pub fn offset_sweep(
    ctx: &ExperimentContext,
    offsets: &[usize],
    runs_per_cell: usize,
    iterations: usize,
) -> Result<Vec<OffsetCell>> {
    offsets
        .par_iter()
        .enumerate()
        .map(|(cell_index, &rerouting_offset)| {
            let costs: Vec<u64> = (0..runs_per_cell)
                .map(|run| -> Result<u64> {
                    let mut chip = ctx.fresh_chip()?;
                    let config = IrraConfig {
                        iterations,
                        rerouting_offset,
                        ..IrraConfig::default()
                    };
                    let seed = ctx.seed ^ ((cell_index as u64) << 32) ^ run as u64;
                    Irra::new(config, Some(seed)).run(&mut chip);
                    Ok(chip.total_cost())
                })
                .collect::<Result<_>>()?;

            let best_cost = costs.iter().min().copied().unwrap_or(0);
            let mean_cost = costs.iter().sum::<u64>() as f64 / costs.len().max(1) as f64;
            info!(rerouting_offset, best_cost, "offset cell done");

            Ok(OffsetCell {
                rerouting_offset,
                costs,
                best_cost,
                mean_cost,
            })
        })
        .collect()
}

/// Five-number-style summary of a cost sample.
#[derive(Debug, Clone, Serialize)]
pub struct CostSummary {
    pub count: usize,
    pub min: u64,
    pub max: u64,
    pub mean: f64,
    pub std_dev: f64,
}

impl CostSummary {
    /// Summarizes a non-empty cost sample; `None` for an empty one.
    pub fn from_costs(costs: &[u64]) -> Option<Self> {
        if costs.is_empty() {
            return None;
        }
        let count = costs.len();
        let min = *costs.iter().min().expect("non-empty");
        let max = *costs.iter().max().expect("non-empty");
        let mean = costs.iter().sum::<u64>() as f64 / count as f64;
        let variance = costs
            .iter()
            .map(|&cost| {
                let d = cost as f64 - mean;
                d * d
            })
            .sum::<f64>()
            / count as f64;
        Some(Self {
            count,
            min,
            max,
            mean,
            std_dev: variance.sqrt(),
        })
    }
}

/// One routing flavour's results in the IRRA comparison.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonCell {
    pub label: String,
    pub summary: Option<CostSummary>,
    pub costs: Vec<u64>,
}

/// Compares the three IRRA rerouting flavours on the same chip.
pub fn routing_comparison(
    ctx: &ExperimentContext,
    runs_per_mode: usize,
    iterations: usize,
) -> Result<Vec<ComparisonCell>> {
    let modes: Vec<(&str, RoutingMode)> = vec![
        ("bfs", RoutingMode::Bfs),
        ("annealing", RoutingMode::SimulatedAnnealing),
        ("astar", RoutingMode::AStar),
    ];

    modes
        .par_iter()
        .enumerate()
        .map(|(mode_index, &(label, routing))| {
            let costs: Vec<u64> = (0..runs_per_mode)
                .map(|run| -> Result<u64> {
                    let mut chip = ctx.fresh_chip()?;
                    let config = IrraConfig {
                        iterations,
                        routing,
                        ..IrraConfig::default()
                    };
                    let seed = ctx.seed ^ ((mode_index as u64) << 32) ^ run as u64;
                    Irra::new(config, Some(seed)).run(&mut chip);
                    Ok(chip.total_cost())
                })
                .collect::<Result<_>>()?;

            info!(label, runs = costs.len(), "comparison mode done");
            Ok(ComparisonCell {
                label: label.to_string(),
                summary: CostSummary::from_costs(&costs),
                costs,
            })
        })
        .collect()
}

/// Cost distribution of the pseudo-random sequencer.
#[derive(Debug, Clone, Serialize)]
pub struct DistributionResult {
    pub samples: usize,
    pub connected: usize,
    pub costs: Vec<u64>,
    pub summary: Option<CostSummary>,
    pub theoretical_minimum: u64,
}

/// Samples the cost distribution of independent pseudo-random placements.
/// Disconnected samples are skipped but counted.
pub fn solution_distribution(
    ctx: &ExperimentContext,
    samples: usize,
    max_offset: usize,
) -> Result<DistributionResult> {
    let outcomes: Vec<Option<u64>> = (0..samples)
        .into_par_iter()
        .map(|sample| -> Result<Option<u64>> {
            let mut chip = ctx.fresh_chip()?;
            let mut seq =
                PseudoRandom::new(RandomConfig { max_offset }, Some(ctx.seed ^ sample as u64));
            seq.run(&mut chip);
            Ok(chip.is_fully_connected().then(|| chip.total_cost()))
        })
        .collect::<Result<_>>()?;

    let costs: Vec<u64> = outcomes.iter().flatten().copied().collect();
    let theoretical_minimum = ctx.fresh_chip()?.manhattan_sum();

    Ok(DistributionResult {
        samples,
        connected: costs.len(),
        summary: CostSummary::from_costs(&costs),
        costs,
        theoretical_minimum,
    })
}
