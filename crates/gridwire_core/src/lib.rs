//! # Gridwire Core
//!
//! Core types for the gridwire chip router.
//!
//! This crate provides:
//! - `Coord` / `GridBounds`: the bounded 3-D routing lattice
//! - `Wire`: an ordered lattice path between two gate cells
//! - `Occupancy`: per-cell occupant tracking with stable wire handles
//! - `Chip`: gates, netlist, wires and occupancy with cost accounting
//! - `GridwireError`: unified error types
//! - Configuration types for the sequencers and the optimizer
//!
//! ## Example
//!
//! ```rust
//! use gridwire_core::prelude::*;
//!
//! let chip = Chip::new(
//!     0,
//!     1,
//!     vec![(GateId(1), Coord::new(0, 0, 0)), (GateId(2), Coord::new(2, 0, 0))],
//!     vec![(GateId(1), GateId(2))],
//!     1,
//! )
//! .unwrap();
//!
//! assert!(!chip.is_fully_connected());
//! assert_eq!(chip.manhattan_sum(), 2);
//! ```

pub mod chip;
pub mod config;
pub mod coord;
pub mod cost;
pub mod error;
pub mod occupancy;
pub mod prelude;
pub mod wire;

pub use chip::{Chip, GateId, NetEntry};
pub use coord::{Coord, GridBounds};
pub use error::{GridwireError, Result};
pub use occupancy::{Occupancy, Occupant, WireId};
pub use wire::Wire;
