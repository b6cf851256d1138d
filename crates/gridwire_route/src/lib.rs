//! # Gridwire Route
//!
//! The routing engine: single-wire path searches, multi-wire sequencing
//! strategies, the A* post-optimizer and the random-order driver.
//!
//! ## Example
//!
//! ```rust
//! use gridwire_core::prelude::*;
//! use gridwire_route::{Greedy, Sequencer};
//!
//! let mut chip = Chip::new(
//!     0,
//!     1,
//!     vec![(GateId(1), Coord::new(0, 0, 0)), (GateId(2), Coord::new(2, 0, 0))],
//!     vec![(GateId(1), GateId(2))],
//!     1,
//! )
//! .unwrap();
//!
//! Greedy::default().run(&mut chip);
//! assert!(chip.is_fully_connected());
//! assert_eq!(chip.total_cost(), 2);
//! ```

pub mod driver;
pub mod optimizer;
pub mod search;
pub mod sequencer;

pub use driver::run_random_orders;
pub use optimizer::{AStarOptimizer, OptimizeReport};
pub use search::{
    astar_route, bounded_bfs, exact_length_bfs, exact_length_bfs_unconstrained,
    DEFAULT_FRONTIER_CAP,
};
pub use sequencer::{
    AStarSequencer, Greedy, GreedyRandom, Irra, PseudoRandom, Sequencer, TrueRandom,
};
