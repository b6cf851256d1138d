//! Error types for gridwire.

use thiserror::Error;

/// Unified error type for gridwire operations.
#[derive(Error, Debug)]
pub enum GridwireError {
    // ============ Chip construction ============
    /// Duplicate gate id in a print file
    #[error("Duplicate gate id {0}")]
    DuplicateGate(u32),

    /// A netlist row references a gate id that was never placed
    #[error("Netlist references unknown gate id {0}")]
    UnknownGate(u32),

    /// A netlist row connects a gate to itself
    #[error("Net connects gate {0} to itself")]
    SelfConnection(u32),

    /// Two gates were placed on the same cell
    #[error("Gates {0} and {1} share coordinate {2}")]
    OverlappingGates(u32, u32, String),

    // ============ Solution replay ============
    /// A replayed wire has endpoints that match no netlist entry
    #[error("No net with endpoints {0} and {1}")]
    NoMatchingNet(String, String),

    /// A replayed wire list was empty or had a single cell
    #[error("Wire path needs at least its two endpoints, got {0} cells")]
    TruncatedWire(usize),

    // ============ Parsing ============
    /// Malformed print/netlist/solution CSV
    #[error("Parse error in {file}: {detail}")]
    Parse { file: String, detail: String },

    // ============ Config ============
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    // ============ I/O ============
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for gridwire operations.
pub type Result<T> = std::result::Result<T, GridwireError>;

impl GridwireError {
    /// Creates a parse error for the given file.
    pub fn parse(file: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Parse {
            file: file.into(),
            detail: detail.into(),
        }
    }

    /// Creates a config error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
