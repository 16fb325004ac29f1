//! Exponential Moving Average (EMA).
//!
//! Recursive: EMA[t] = alpha * close[t] + (1 - alpha) * EMA[t-1]
//! with alpha = 2 / (period + 1).
//! Seed: SMA of the first `period` inputs.

#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    alpha: f64,
    seed_sum: f64,
    seed_count: usize,
    value: Option<f64>,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "EMA period must be >= 1");
        Self {
            period,
            alpha: 2.0 / (period as f64 + 1.0),
            seed_sum: 0.0,
            seed_count: 0,
            value: None,
        }
    }

    pub fn update(&mut self, input: f64) -> Option<f64> {
        match self.value {
            Some(prev) => {
                let ema = self.alpha * input + (1.0 - self.alpha) * prev;
                self.value = Some(ema);
                Some(ema)
            }
            None => {
                self.seed_sum += input;
                self.seed_count += 1;
                if self.seed_count < self.period {
                    return None;
                }
                let seed = self.seed_sum / self.period as f64;
                self.value = Some(seed);
                Some(seed)
            }
        }
    }
}
