//! Bollinger Bands — SMA +/- a standard deviation multiplier.
//!
//! mid = SMA(close, period); top/bottom = mid ± devfactor * stddev.
//! Uses population stddev (divide by N) over the same window.

use std::collections::VecDeque;

/// One full band triple for a single bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerBands {
    pub top: f64,
    pub mid: f64,
    pub bottom: f64,
}

#[derive(Debug, Clone)]
pub struct Bollinger {
    period: usize,
    devfactor: f64,
    window: VecDeque<f64>,
}

impl Bollinger {
    pub fn new(period: usize, devfactor: f64) -> Self {
        assert!(period >= 1, "Bollinger period must be >= 1");
        Self {
            period,
            devfactor,
            window: VecDeque::with_capacity(period),
        }
    }

    pub fn update(&mut self, close: f64) -> Option<BollingerBands> {
        self.window.push_back(close);
        if self.window.len() > self.period {
            self.window.pop_front();
        }
        if self.window.len() < self.period {
            return None;
        }

        let n = self.period as f64;
        let mean = self.window.iter().sum::<f64>() / n;
        let variance = self.window.iter().map(|c| (c - mean).powi(2)).sum::<f64>() / n;
        let dev = self.devfactor * variance.sqrt();

        Some(BollingerBands {
            top: mean + dev,
            mid: mean,
            bottom: mean - dev,
        })
    }
}
