//! Quantics Runner — orchestration on top of the core engine.
//!
//! Entry points (consumed by CLI/demo collaborators):
//! - [`runner::run`]: one strategy over one series → full report
//! - [`runner::compare`]: several named strategies → ranked table
//! - [`sweep::Sweep::optimize`]: grid search with per-combination
//!   failure isolation

pub mod metrics;
pub mod runner;
pub mod sweep;

pub use metrics::{MetricKey, PerformanceMetrics};
pub use runner::{compare, run, BacktestReport, ComparisonRow, RunConfig, RunError, RunId};
pub use sweep::{OptimizationRow, ParamGrid, Sweep, SweepReport};
