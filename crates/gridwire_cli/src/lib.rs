//! # Gridwire CLI
//!
//! Command-line interface and experiment drivers for gridwire.
//!
//! ## Library usage
//!
//! ```no_run
//! use gridwire_cli::experiments::{solution_distribution, ExperimentContext};
//!
//! let ctx = ExperimentContext {
//!     base_data_path: "data".into(),
//!     chip_id: 0,
//!     net_id: 1,
//!     padding: 1,
//!     seed: 42,
//! };
//! let distribution = solution_distribution(&ctx, 100, 20).unwrap();
//! println!("{} of {} samples connected", distribution.connected, distribution.samples);
//! ```

pub mod experiments;
pub mod pipeline;

pub use pipeline::{
    synthetic_board, BenchmarkResult, PipelineConfig, PipelineResult, PipelineTiming,
    RoutingSystem, Strategy,
};
