//! Error taxonomy for the core engine.
//!
//! Validation errors fail fast before a run starts. In-run broker rejections
//! are not errors at all — they are absorbed into `OrderStatus` transitions
//! and observable only through the order audit trail and logs.

use thiserror::Error;

/// Bar series violates an ordering or range invariant.
#[derive(Debug, Clone, Error)]
pub enum DataError {
    #[error("empty bar series")]
    Empty,
    #[error("bar {index}: date {date} does not strictly increase over {prev}")]
    NonIncreasingDate {
        index: usize,
        date: chrono::NaiveDate,
        prev: chrono::NaiveDate,
    },
    #[error("bar {index} ({date}): non-positive or non-finite price")]
    InvalidPrice {
        index: usize,
        date: chrono::NaiveDate,
    },
    #[error("bar {index} ({date}): high/low do not bound open/close")]
    InconsistentRange {
        index: usize,
        date: chrono::NaiveDate,
    },
}

/// Unrecognized or out-of-domain strategy configuration.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("unknown parameter '{name}' for strategy {strategy}")]
    UnknownParameter { name: String, strategy: String },
    #[error("parameter '{name}' = {value} is out of domain: {reason}")]
    OutOfDomain {
        name: String,
        value: f64,
        reason: String,
    },
    #[error("invalid engine config: {0}")]
    InvalidEngineConfig(String),
}
