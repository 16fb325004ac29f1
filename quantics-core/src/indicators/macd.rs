//! MACD — Moving Average Convergence/Divergence.
//!
//! macd = EMA(close, fast) - EMA(close, slow)
//! signal = EMA(macd, signal_period), seeded once the macd line is defined.
//! The pair is undefined until the signal EMA has seeded.

use super::Ema;

/// MACD line and its signal line for a single bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdValue {
    pub macd: f64,
    pub signal: f64,
}

#[derive(Debug, Clone)]
pub struct Macd {
    fast: Ema,
    slow: Ema,
    signal: Ema,
}

impl Macd {
    pub fn new(fast_period: usize, slow_period: usize, signal_period: usize) -> Self {
        assert!(
            fast_period < slow_period,
            "MACD fast period must be < slow period"
        );
        Self {
            fast: Ema::new(fast_period),
            slow: Ema::new(slow_period),
            signal: Ema::new(signal_period),
        }
    }

    pub fn update(&mut self, close: f64) -> Option<MacdValue> {
        let fast = self.fast.update(close);
        let slow = self.slow.update(close);
        let macd = match (fast, slow) {
            (Some(f), Some(s)) => f - s,
            _ => return None,
        };
        let signal = self.signal.update(macd)?;
        Some(MacdValue { macd, signal })
    }
}
