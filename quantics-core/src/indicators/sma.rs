//! Simple Moving Average (SMA).
//!
//! Rolling arithmetic mean of the last `period` closes.
//! First valid value once `period` closes have been seen.

use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    window: VecDeque<f64>,
    sum: f64,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self {
            period,
            window: VecDeque::with_capacity(period),
            sum: 0.0,
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }

    pub fn update(&mut self, close: f64) -> Option<f64> {
        self.window.push_back(close);
        self.sum += close;
        if self.window.len() > self.period {
            if let Some(leaving) = self.window.pop_front() {
                self.sum -= leaving;
            }
        }
        if self.window.len() < self.period {
            return None;
        }
        Some(self.sum / self.period as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, feed, DEFAULT_EPSILON};

    #[test]
    fn sma_5_basic() {
        let mut sma = Sma::new(5);
        let result = feed(&[10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0], |c| sma.update(c));

        for (i, v) in result.iter().take(4).enumerate() {
            assert!(v.is_none(), "expected warm-up at index {i}");
        }
        // mean(10..14) = 12, rolls to 13, 14
        assert_approx(result[4].unwrap(), 12.0, DEFAULT_EPSILON);
        assert_approx(result[5].unwrap(), 13.0, DEFAULT_EPSILON);
        assert_approx(result[6].unwrap(), 14.0, DEFAULT_EPSILON);
    }

    #[test]
    fn sma_1_is_close() {
        let mut sma = Sma::new(1);
        assert_approx(sma.update(100.0).unwrap(), 100.0, DEFAULT_EPSILON);
        assert_approx(sma.update(200.0).unwrap(), 200.0, DEFAULT_EPSILON);
    }

    #[test]
    fn sma_too_few_bars() {
        let mut sma = Sma::new(5);
        assert!(sma.update(10.0).is_none());
        assert!(sma.update(11.0).is_none());
    }
}
