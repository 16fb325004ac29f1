//! Relative Strength Index (RSI).
//!
//! Wilder smoothing of average gains and average losses over `period`
//! changes. RSI = 100 - 100 / (1 + avg_gain / avg_loss), bounded [0, 100].
//! avg_loss == 0 → 100.

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    prev_close: Option<f64>,
    gain_sum: f64,
    loss_sum: f64,
    change_count: usize,
    averages: Option<(f64, f64)>,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            prev_close: None,
            gain_sum: 0.0,
            loss_sum: 0.0,
            change_count: 0,
            averages: None,
        }
    }

    pub fn update(&mut self, close: f64) -> Option<f64> {
        let prev = match self.prev_close.replace(close) {
            Some(p) => p,
            None => return None,
        };
        let change = close - prev;
        let gain = change.max(0.0);
        let loss = (-change).max(0.0);

        let (avg_gain, avg_loss) = match self.averages {
            Some((g, l)) => {
                // Wilder smoothing: alpha = 1 / period
                let alpha = 1.0 / self.period as f64;
                (alpha * gain + (1.0 - alpha) * g, alpha * loss + (1.0 - alpha) * l)
            }
            None => {
                self.gain_sum += gain;
                self.loss_sum += loss;
                self.change_count += 1;
                if self.change_count < self.period {
                    return None;
                }
                (
                    self.gain_sum / self.period as f64,
                    self.loss_sum / self.period as f64,
                )
            }
        };
        self.averages = Some((avg_gain, avg_loss));

        if avg_loss == 0.0 {
            Some(100.0)
        } else {
            Some(100.0 - 100.0 / (1.0 + avg_gain / avg_loss))
        }
    }
}
