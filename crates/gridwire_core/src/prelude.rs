//! Prelude module for convenient imports.
//!
//! # Usage
//!
//! ```rust
//! use gridwire_core::prelude::*;
//! ```

pub use crate::chip::{Chip, GateId, NetEntry};
pub use crate::config::{
    AnnealingSchedule, GreedyConfig, GridwireConfig, IrraConfig, IrraInput, OptimizerConfig,
    RandomConfig, RoutingMode, WireOrder,
};
pub use crate::coord::{Coord, GridBounds, NEIGHBOUR_OFFSETS, Z_RANGE};
pub use crate::cost::{cost_function, CostBreakdown, COLLISION_COST, INTERSECTION_COST};
pub use crate::error::{GridwireError, Result};
pub use crate::occupancy::{Occupancy, Occupant, WireId};
pub use crate::wire::Wire;
