//! Quantics Core — event-driven backtest engine.
//!
//! This crate contains the heart of the simulator:
//! - Domain types (bars, orders, positions, trades)
//! - Incremental technical indicators (SMA, EMA, RSI, Bollinger, MACD)
//! - A closed set of strategy variants dispatched through one `decide`
//! - Broker ledger with a synchronous order state machine
//! - The deterministic bar-by-bar engine loop
//!
//! Data acquisition, rendering, and CLI surfaces live outside this crate;
//! the engine consumes an already-validated in-memory [`domain::BarSeries`].

pub mod broker;
pub mod domain;
pub mod engine;
pub mod error;
pub mod indicators;
pub mod strategy;

pub use broker::Broker;
pub use domain::{Bar, BarSeries, Order, OrderSide, OrderStatus, Position, Trade};
pub use engine::{run_backtest, EngineConfig, EquityPoint, RunResult};
pub use error::{ConfigError, DataError};
pub use strategy::{AccountView, Signal, Strategy, StrategyKind, StrategyParams};
