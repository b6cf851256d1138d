//! # Gridwire IO
//!
//! On-disk formats for gridwire: print and netlist CSV inputs, and the
//! solution CSV written after routing. The core never touches the disk;
//! everything file-shaped lives here.

pub mod loader;
pub mod solution;

pub use loader::{load_chip, parse_netlist_csv, parse_print_csv};
pub use solution::{
    load_solution, parse_solution, replay_solution, save_solution, SavedSolution,
};
