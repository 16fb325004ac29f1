//! Incremental technical indicators.
//!
//! Every indicator is a small stateful struct with an `update` method called
//! exactly once per bar in timestamp order. An indicator returns `None`
//! until its lookback window is full — strategies treat that as "no signal".

pub mod bollinger;
pub mod crossover;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;

pub use bollinger::{Bollinger, BollingerBands};
pub use crossover::Crossover;
pub use ema::Ema;
pub use macd::{Macd, MacdValue};
pub use rsi::Rsi;
pub use sma::Sma;

#[cfg(test)]
pub(crate) const DEFAULT_EPSILON: f64 = 1e-9;

#[cfg(test)]
pub(crate) fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "expected {expected}, got {actual}"
    );
}

/// Feed a close series through an indicator, collecting one output per bar.
#[cfg(test)]
pub(crate) fn feed<T, F>(closes: &[f64], mut update: F) -> Vec<Option<T>>
where
    F: FnMut(f64) -> Option<T>,
{
    closes.iter().map(|&c| update(c)).collect()
}
