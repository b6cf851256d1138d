//! The global cost model.

use serde::{Deserialize, Serialize};

/// Penalty for two wires sharing a non-gate cell.
pub const INTERSECTION_COST: u64 = 300;

/// Penalty for two wires traversing the same unit edge. The weight is high
/// enough that any colliding layout loses to any collision-free one.
pub const COLLISION_COST: u64 = 1_000_000;

/// Total cost of a layout.
pub fn cost_function(wire_length: u64, intersections: u64, collisions: u64) -> u64 {
    wire_length + INTERSECTION_COST * intersections + COLLISION_COST * collisions
}

/// Itemized cost of a chip layout, for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub wire_length: u64,
    pub intersections: u64,
    pub collisions: u64,
    pub total: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cost_function() {
        assert_eq!(cost_function(10, 0, 0), 10);
        assert_eq!(cost_function(10, 2, 0), 610);
        assert_eq!(cost_function(10, 2, 1), 1_000_610);
    }
}
