//! Configuration management for gridwire.

use serde::{Deserialize, Serialize};

/// Global configuration for a gridwire run.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GridwireConfig {
    /// Greedy sequencer configuration
    pub greedy: GreedyConfig,
    /// Randomized sequencer configuration
    pub random: RandomConfig,
    /// IRRA configuration
    pub irra: IrraConfig,
    /// A* optimizer configuration
    pub optimizer: OptimizerConfig,
}

/// How a sequencer iterates over the wire slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WireOrder {
    /// Netlist order: ascending Manhattan distance, stable among ties.
    Netlist,
    /// Explicit re-sort by ascending Manhattan distance per call.
    Sorted,
    /// Uniform random shuffle per call.
    Shuffled,
}

/// Rerouting flavour used inside IRRA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoutingMode {
    /// Bounded BFS rerouting.
    Bfs,
    /// Bounded BFS with a simulated-annealing acceptance stage.
    SimulatedAnnealing,
    /// A* rerouting with intersection-first acceptance.
    AStar,
}

/// Which sequencer produces IRRA's input solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IrraInput {
    PseudoRandom,
    AStar,
}

/// Exponential cooling schedule for simulated annealing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AnnealingSchedule {
    /// Temperature before the first attempt. Zero disables annealing.
    pub start_temperature: f64,
    /// Cooling rate in (0, 1).
    pub alpha: f64,
}

impl AnnealingSchedule {
    pub fn new(start_temperature: f64, alpha: f64) -> Self {
        Self {
            start_temperature,
            alpha,
        }
    }

    /// Disabled schedule: every acceptance question falls back to the
    /// deterministic rule.
    pub fn disabled() -> Self {
        Self::new(0.0, 1.0)
    }

    pub fn is_enabled(&self) -> bool {
        self.start_temperature > 0.0
    }

    /// Temperature after `attempts` cooling steps.
    pub fn temperature(&self, attempts: u32) -> f64 {
        self.start_temperature * self.alpha.powi(attempts as i32)
    }

    /// Metropolis-style acceptance probability with base-2 exponent:
    /// 1 for an improvement, `2^((current − candidate) / T)` otherwise.
    pub fn acceptance_probability(candidate_cost: u64, current_cost: u64, temperature: f64) -> f64 {
        if candidate_cost < current_cost {
            return 1.0;
        }
        let delta = current_cost as f64 - candidate_cost as f64;
        (delta / temperature).exp2()
    }
}

/// Configuration for the greedy sequencers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GreedyConfig {
    /// Largest extra length over the Manhattan distance tried by the
    /// offset sweep (even offsets only).
    pub max_offset: usize,
    /// When no short-circuit-free route exists, retry with intersections
    /// allowed.
    pub allow_short_circuit: bool,
}

/// Configuration for the pseudo-random and true-random sequencers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomConfig {
    /// Largest extra length over the Manhattan distance in the candidate
    /// length pool.
    pub max_offset: usize,
}

/// Configuration for the iterative random rerouting algorithm.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IrraConfig {
    /// Number of input solutions to generate and improve.
    pub iterations: usize,
    /// Input solutions with at least this many intersections are discarded
    /// and regenerated.
    pub acceptable_intersection: u64,
    /// Early stopping requires the intersection count to be at or below
    /// this limit.
    pub intersection_limit: u64,
    /// Early stopping requires this many consecutive iterations at the
    /// best cost.
    pub early_stopping_patience: usize,
    /// Max offset handed to the input sequencer.
    pub max_offset: usize,
    /// Offset used when relocating a wire away from an intersection.
    pub rerouting_offset: usize,
    /// Rerouting flavour.
    pub routing: RoutingMode,
    /// Input solution generator.
    pub input: IrraInput,
    /// Annealing schedule, used when `routing` is `SimulatedAnnealing`.
    pub annealing: AnnealingSchedule,
}

/// Configuration for the A* post-optimizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizerConfig {
    /// Reroute tuples of up to this many wires at a time.
    pub reroute_n_wires: usize,
    /// Annealing schedule; a zero start temperature selects the monotone
    /// acceptance rule.
    pub annealing: AnnealingSchedule,
    /// Enumerate all ordered k-tuples only while P(N,k) stays below this.
    pub total_permutations_limit: u64,
    /// Number of sampled tuples per cycle above the permutation limit.
    pub random_iterations: usize,
}

impl Default for GreedyConfig {
    fn default() -> Self {
        Self {
            max_offset: 6,
            allow_short_circuit: false,
        }
    }
}

impl Default for RandomConfig {
    fn default() -> Self {
        Self { max_offset: 20 }
    }
}

impl Default for IrraConfig {
    fn default() -> Self {
        Self {
            iterations: 100,
            acceptable_intersection: 3000,
            intersection_limit: 0,
            early_stopping_patience: 999_999,
            max_offset: 58,
            rerouting_offset: 58,
            routing: RoutingMode::Bfs,
            input: IrraInput::PseudoRandom,
            annealing: AnnealingSchedule::new(2000.0, 0.9),
        }
    }
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            reroute_n_wires: 1,
            annealing: AnnealingSchedule::disabled(),
            total_permutations_limit: 20_000,
            random_iterations: 5_000,
        }
    }
}

impl Default for AnnealingSchedule {
    fn default() -> Self {
        Self::disabled()
    }
}

impl GridwireConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a JSON string.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        serde_json::from_str(json).map_err(Into::into)
    }

    /// Serializes configuration to a JSON string.
    pub fn to_json(&self) -> crate::Result<String> {
        serde_json::to_string_pretty(self).map_err(Into::into)
    }
}
