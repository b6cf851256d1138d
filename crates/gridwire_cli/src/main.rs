//! Gridwire CLI - chip wire routing from the command line
//!
//! Provides commands for:
//! - Routing a chip's netlist with any of the sequencer strategies
//! - Post-optimizing a saved solution with the A* optimizer
//! - Replaying and verifying saved solutions
//! - Running parameter-sweep experiments

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use gridwire_cli::experiments::{
    annealing_sweep, offset_sweep, routing_comparison, solution_distribution, ExperimentContext,
};
use gridwire_cli::pipeline::{PipelineConfig, RoutingSystem};
use gridwire_core::prelude::*;
use gridwire_io::{load_chip, load_solution, replay_solution, save_solution};
use gridwire_route::{
    run_random_orders, AStarOptimizer, AStarSequencer, Greedy, GreedyRandom, Irra, PseudoRandom,
    Sequencer, TrueRandom,
};

/// Gridwire - 3-D chip wire routing
///
/// Routes netlists on a bounded lattice, minimizing wire length plus
/// intersection and collision penalties.
#[derive(Parser)]
#[command(name = "gridwire")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (text, json)
    #[arg(short, long, global = true, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum Algorithm {
    Greedy,
    GreedyRandom,
    PseudoRandom,
    TrueRandom,
    Astar,
    IrraPr,
    IrraAstar,
}

#[derive(Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum Rerouting {
    Bfs,
    Annealing,
    Astar,
}

#[derive(Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum ExperimentKind {
    AnnealingSweep,
    OffsetSweep,
    Distribution,
    RoutingComparison,
}

#[derive(Subcommand)]
enum Commands {
    /// Route a chip's netlist
    Route {
        /// Base data directory containing chip_<id>/ folders
        #[arg(short, long, default_value = "data")]
        data: PathBuf,

        /// Chip id
        #[arg(short, long, default_value = "0")]
        chip: u32,

        /// Netlist id
        #[arg(short, long, default_value = "1")]
        net: u32,

        /// Grid padding around the gate bounding box
        #[arg(short, long, default_value = "1")]
        padding: i32,

        /// Routing algorithm
        #[arg(short, long, default_value = "greedy")]
        algorithm: Algorithm,

        /// RNG seed for randomized algorithms
        #[arg(short, long)]
        seed: Option<u64>,

        /// Maximum offset over the Manhattan distance
        #[arg(long)]
        max_offset: Option<usize>,

        /// Allow short circuits as a last resort (greedy variants)
        #[arg(long)]
        allow_short_circuit: bool,

        /// IRRA iterations
        #[arg(long, default_value = "100")]
        iterations: usize,

        /// IRRA rerouting flavour
        #[arg(long, default_value = "bfs")]
        rerouting: Rerouting,

        /// Annealing start temperature (0 disables)
        #[arg(long)]
        t0: Option<f64>,

        /// Annealing cooling rate
        #[arg(long)]
        alpha: Option<f64>,

        /// Wrap the sequencer in N random netlist orders, keeping the best
        #[arg(long)]
        random_orders: Option<usize>,

        /// Write the routed solution to this CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Optimize a saved solution with the A* optimizer
    Optimize {
        /// Base data directory
        #[arg(short, long, default_value = "data")]
        data: PathBuf,

        /// Saved solution CSV
        #[arg(value_name = "SOLUTION")]
        solution: PathBuf,

        /// Grid padding
        #[arg(short, long, default_value = "1")]
        padding: i32,

        /// Reroute tuples of up to K wires
        #[arg(short = 'k', long, default_value = "1")]
        reroute_n_wires: usize,

        /// Annealing start temperature (0 disables)
        #[arg(long, default_value = "0")]
        t0: f64,

        /// Annealing cooling rate
        #[arg(long, default_value = "0.99")]
        alpha: f64,

        /// Permutation limit before tuple sampling kicks in
        #[arg(long, default_value = "20000")]
        permutation_limit: u64,

        /// Sampled tuples per cycle above the limit
        #[arg(long, default_value = "5000")]
        random_iterations: usize,

        /// RNG seed
        #[arg(short, long)]
        seed: Option<u64>,

        /// Write the optimized solution to this CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Replay a saved solution and verify it
    Replay {
        /// Base data directory
        #[arg(short, long, default_value = "data")]
        data: PathBuf,

        /// Saved solution CSV
        #[arg(value_name = "SOLUTION")]
        solution: PathBuf,

        /// Grid padding
        #[arg(short, long, default_value = "1")]
        padding: i32,
    },

    /// Run a parameter experiment
    Experiment {
        /// Base data directory
        #[arg(short, long, default_value = "data")]
        data: PathBuf,

        /// Chip id
        #[arg(short, long, default_value = "0")]
        chip: u32,

        /// Netlist id
        #[arg(short, long, default_value = "1")]
        net: u32,

        /// Experiment kind
        #[arg(value_name = "KIND")]
        kind: ExperimentKind,

        /// Runs per parameter cell (or samples for distribution)
        #[arg(short, long, default_value = "10")]
        runs: usize,

        /// IRRA iterations per run
        #[arg(long, default_value = "10")]
        iterations: usize,

        /// Base RNG seed
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Write results to this JSON file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Benchmark the routing pipeline on synthetic boards
    Benchmark {
        /// Number of mirrored gate pairs
        #[arg(short = 'p', long, default_value = "5")]
        pairs: usize,

        /// Board height in rows
        #[arg(short = 'r', long, default_value = "8")]
        rows: i32,

        /// Number of iterations
        #[arg(short, long, default_value = "10")]
        iterations: usize,

        /// Skip the optimizer stage
        #[arg(long)]
        no_optimize: bool,

        /// RNG seed
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Show system information
    Info,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let _ = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .without_time()
        .try_init();

    match cli.command {
        Commands::Route {
            data,
            chip,
            net,
            padding,
            algorithm,
            seed,
            max_offset,
            allow_short_circuit,
            iterations,
            rerouting,
            t0,
            alpha,
            random_orders,
            output,
        } => cmd_route(RouteArgs {
            data,
            chip,
            net,
            padding,
            algorithm,
            seed,
            max_offset,
            allow_short_circuit,
            iterations,
            rerouting,
            t0,
            alpha,
            random_orders,
            output,
            format: cli.format,
        }),
        Commands::Optimize {
            data,
            solution,
            padding,
            reroute_n_wires,
            t0,
            alpha,
            permutation_limit,
            random_iterations,
            seed,
            output,
        } => cmd_optimize(
            &data,
            &solution,
            padding,
            OptimizerConfig {
                reroute_n_wires,
                annealing: AnnealingSchedule::new(t0, alpha),
                total_permutations_limit: permutation_limit,
                random_iterations,
            },
            seed,
            output.as_deref(),
            cli.format,
        ),
        Commands::Replay {
            data,
            solution,
            padding,
        } => cmd_replay(&data, &solution, padding, cli.format),
        Commands::Experiment {
            data,
            chip,
            net,
            kind,
            runs,
            iterations,
            seed,
            output,
        } => cmd_experiment(&data, chip, net, kind, runs, iterations, seed, output.as_deref(), cli.format),
        Commands::Benchmark {
            pairs,
            rows,
            iterations,
            no_optimize,
            seed,
        } => cmd_benchmark(pairs, rows, iterations, no_optimize, seed, cli.format),
        Commands::Info => cmd_info(cli.format),
    }
}

struct RouteArgs {
    data: PathBuf,
    chip: u32,
    net: u32,
    padding: i32,
    algorithm: Algorithm,
    seed: Option<u64>,
    max_offset: Option<usize>,
    allow_short_circuit: bool,
    iterations: usize,
    rerouting: Rerouting,
    t0: Option<f64>,
    alpha: Option<f64>,
    random_orders: Option<usize>,
    output: Option<PathBuf>,
    format: OutputFormat,
}

fn build_sequencer(args: &RouteArgs) -> Box<dyn Sequencer> {
    let greedy_config = GreedyConfig {
        max_offset: args.max_offset.unwrap_or(6),
        allow_short_circuit: args.allow_short_circuit,
    };
    let random_config = RandomConfig {
        max_offset: args.max_offset.unwrap_or(20),
    };

    match args.algorithm {
        Algorithm::Greedy => Box::new(Greedy::new(greedy_config)),
        Algorithm::GreedyRandom => Box::new(GreedyRandom::new(greedy_config, args.seed)),
        Algorithm::PseudoRandom => Box::new(PseudoRandom::new(random_config, args.seed)),
        Algorithm::TrueRandom => Box::new(TrueRandom::new(random_config, args.seed)),
        Algorithm::Astar => Box::new(AStarSequencer::new(WireOrder::Netlist, args.seed)),
        Algorithm::IrraPr | Algorithm::IrraAstar => {
            let input = match args.algorithm {
                Algorithm::IrraPr => IrraInput::PseudoRandom,
                _ => IrraInput::AStar,
            };
            let routing = match args.rerouting {
                Rerouting::Bfs => RoutingMode::Bfs,
                Rerouting::Annealing => RoutingMode::SimulatedAnnealing,
                Rerouting::Astar => RoutingMode::AStar,
            };
            // defaults tuned per input flavour
            let (default_t0, default_alpha) = match input {
                IrraInput::PseudoRandom => (2000.0, 0.9),
                IrraInput::AStar => (750.0, 0.99),
            };
            let config = IrraConfig {
                iterations: args.iterations,
                max_offset: args.max_offset.unwrap_or(58),
                rerouting_offset: args.max_offset.unwrap_or(58),
                routing,
                input,
                annealing: AnnealingSchedule::new(
                    args.t0.unwrap_or(default_t0),
                    args.alpha.unwrap_or(default_alpha),
                ),
                ..IrraConfig::default()
            };
            Box::new(Irra::new(config, args.seed))
        }
    }
}

fn cmd_route(args: RouteArgs) -> Result<()> {
    let start = Instant::now();

    let mut chip = load_chip(&args.data, args.chip, args.net, args.padding)
        .with_context(|| format!("failed to load chip {} net {}", args.chip, args.net))?;

    let mut sequencer = build_sequencer(&args);
    info!(algorithm = sequencer.name(), "routing");

    match args.random_orders {
        Some(orders) => {
            let best = run_random_orders(&mut chip, sequencer.as_mut(), orders);
            info!(?best, orders, "random order driver finished");
        }
        None => sequencer.run(&mut chip),
    }

    if let Some(path) = &args.output {
        save_solution(&chip, path).with_context(|| "failed to save solution")?;
    }

    let breakdown = chip.cost_breakdown();
    let result = RouteResult {
        chip_id: args.chip,
        net_id: args.net,
        algorithm: sequencer.name().to_string(),
        fully_connected: chip.is_fully_connected(),
        wire_length: breakdown.wire_length,
        intersections: breakdown.intersections,
        collisions: breakdown.collisions,
        total_cost: breakdown.total,
        theoretical_minimum: chip.manhattan_sum(),
        total_time_ms: start.elapsed().as_secs_f64() * 1000.0,
        output_file: args.output.as_ref().map(|p| p.display().to_string()),
    };

    match args.format {
        OutputFormat::Text => {
            println!("\n=== Gridwire Route Result ===");
            println!("Chip:            {}", result.chip_id);
            println!("Net:             {}", result.net_id);
            println!("Algorithm:       {}", result.algorithm);
            println!();
            println!("Connected:       {}", result.fully_connected);
            println!("Wire length:     {}", result.wire_length);
            println!("Intersections:   {}", result.intersections);
            println!("Collisions:      {}", result.collisions);
            println!("Total cost:      {}", result.total_cost);
            println!("Theoretical min: {}", result.theoretical_minimum);
            println!();
            println!("Time:            {:.2} ms", result.total_time_ms);
            if let Some(path) = &result.output_file {
                println!("Saved to:        {path}");
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
    }

    Ok(())
}

fn cmd_optimize(
    data: &std::path::Path,
    solution_path: &std::path::Path,
    padding: i32,
    config: OptimizerConfig,
    seed: Option<u64>,
    output: Option<&std::path::Path>,
    format: OutputFormat,
) -> Result<()> {
    let start = Instant::now();

    let solution = load_solution(solution_path)
        .with_context(|| format!("failed to load solution {}", solution_path.display()))?;
    let mut chip = replay_solution(data, &solution, padding)
        .with_context(|| "failed to replay solution")?;

    anyhow::ensure!(
        chip.is_fully_connected(),
        "solution is not fully connected; nothing to optimize"
    );

    let report = AStarOptimizer::new(config, seed).optimize(&mut chip);

    if let Some(path) = output {
        save_solution(&chip, path).with_context(|| "failed to save optimized solution")?;
    }

    match format {
        OutputFormat::Text => {
            println!("\n=== Gridwire Optimize Result ===");
            println!("Starting cost: {}", report.starting_cost);
            println!("Lowest cost:   {}", report.lowest_cost);
            println!("Cycles:        {}", report.cycles);
            println!("Tuples tried:  {}", report.tuples_tried);
            println!("Time:          {:.2} ms", start.elapsed().as_secs_f64() * 1000.0);
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(())
}

fn cmd_replay(
    data: &std::path::Path,
    solution_path: &std::path::Path,
    padding: i32,
    format: OutputFormat,
) -> Result<()> {
    let solution = load_solution(solution_path)
        .with_context(|| format!("failed to load solution {}", solution_path.display()))?;
    let chip = replay_solution(data, &solution, padding)
        .with_context(|| "failed to replay solution")?;

    let breakdown = chip.cost_breakdown();
    let verdict = ReplayResult {
        chip_id: chip.chip_id(),
        net_id: chip.net_id(),
        fully_connected: chip.is_fully_connected(),
        recorded_cost: solution.total_cost,
        recomputed_cost: breakdown.total,
        cost_matches: solution.total_cost == breakdown.total,
        intersections: breakdown.intersections,
        collisions: breakdown.collisions,
    };

    match format {
        OutputFormat::Text => {
            println!("\n=== Gridwire Replay ===");
            println!("Chip:          {}", verdict.chip_id);
            println!("Net:           {}", verdict.net_id);
            println!("Connected:     {}", verdict.fully_connected);
            println!("Recorded cost: {}", verdict.recorded_cost);
            println!("Recomputed:    {}", verdict.recomputed_cost);
            println!("Cost matches:  {}", verdict.cost_matches);
            println!("Intersections: {}", verdict.intersections);
            println!("Collisions:    {}", verdict.collisions);
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&verdict)?),
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_experiment(
    data: &std::path::Path,
    chip: u32,
    net: u32,
    kind: ExperimentKind,
    runs: usize,
    iterations: usize,
    seed: u64,
    output: Option<&std::path::Path>,
    format: OutputFormat,
) -> Result<()> {
    let ctx = ExperimentContext {
        base_data_path: data.to_path_buf(),
        chip_id: chip,
        net_id: net,
        padding: 1,
        seed,
    };

    let json = match kind {
        ExperimentKind::AnnealingSweep => {
            let cells = annealing_sweep(
                &ctx,
                &[500.0, 750.0, 1000.0, 2000.0],
                &[0.9, 0.95, 0.99],
                runs,
                iterations,
            )?;
            serde_json::to_string_pretty(&cells)?
        }
        ExperimentKind::OffsetSweep => {
            let cells = offset_sweep(&ctx, &[2, 6, 10, 20, 58], runs, iterations)?;
            serde_json::to_string_pretty(&cells)?
        }
        ExperimentKind::Distribution => {
            let result = solution_distribution(&ctx, runs, 20)?;
            serde_json::to_string_pretty(&result)?
        }
        ExperimentKind::RoutingComparison => {
            let cells = routing_comparison(&ctx, runs, iterations)?;
            serde_json::to_string_pretty(&cells)?
        }
    };

    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            std::fs::write(path, &json)?;
            info!(path = %path.display(), "experiment results written");
            if format == OutputFormat::Text {
                println!("Results written to {}", path.display());
            }
        }
        None => println!("{json}"),
    }

    Ok(())
}

fn cmd_benchmark(
    pairs: usize,
    rows: i32,
    iterations: usize,
    no_optimize: bool,
    seed: Option<u64>,
    format: OutputFormat,
) -> Result<()> {
    info!(pairs, rows, iterations, "running benchmark");

    let mut system = RoutingSystem::with_config(PipelineConfig {
        optimize: !no_optimize,
        seed,
        ..PipelineConfig::default()
    });
    let result = system.benchmark(pairs, rows, iterations);

    match format {
        OutputFormat::Text => println!("{result}"),
        OutputFormat::Json => {
            let json = BenchmarkJsonResult {
                iterations: result.iterations,
                connected_runs: result.connected_runs,
                best_cost: result.best_cost,
                total_time_ms: result.total_time.as_secs_f64() * 1000.0,
                avg_routing_ms: result.avg_routing.as_secs_f64() * 1000.0,
                avg_optimize_ms: result.avg_optimize.as_secs_f64() * 1000.0,
            };
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
    }

    Ok(())
}

fn cmd_info(format: OutputFormat) -> Result<()> {
    let info = SystemInfo {
        name: "Gridwire".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        rust_version: env!("CARGO_PKG_RUST_VERSION").to_string(),
        algorithms: vec![
            "greedy",
            "greedy-random",
            "pseudo-random",
            "true-random",
            "astar",
            "irra-pr",
            "irra-astar",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect(),
        cost_model: format!(
            "length + {INTERSECTION_COST}*intersections + {COLLISION_COST}*collisions"
        ),
    };

    match format {
        OutputFormat::Text => {
            println!("\n=== {} ===", info.name);
            println!("Version: {}", info.version);
            println!("Rust:    {}", info.rust_version);
            println!();
            println!("Algorithms:");
            for algorithm in &info.algorithms {
                println!("  - {algorithm}");
            }
            println!();
            println!("Cost model: {}", info.cost_model);
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&info)?),
    }

    Ok(())
}

// JSON output structures

#[derive(serde::Serialize)]
struct RouteResult {
    chip_id: u32,
    net_id: u32,
    algorithm: String,
    fully_connected: bool,
    wire_length: u64,
    intersections: u64,
    collisions: u64,
    total_cost: u64,
    theoretical_minimum: u64,
    total_time_ms: f64,
    output_file: Option<String>,
}

#[derive(serde::Serialize)]
struct BenchmarkJsonResult {
    iterations: usize,
    connected_runs: usize,
    best_cost: Option<u64>,
    total_time_ms: f64,
    avg_routing_ms: f64,
    avg_optimize_ms: f64,
}

#[derive(serde::Serialize)]
struct ReplayResult {
    chip_id: u32,
    net_id: u32,
    fully_connected: bool,
    recorded_cost: u64,
    recomputed_cost: u64,
    cost_matches: bool,
    intersections: u64,
    collisions: u64,
}

#[derive(serde::Serialize)]
struct SystemInfo {
    name: String,
    version: String,
    rust_version: String,
    algorithms: Vec<String>,
    cost_model: String,
}
