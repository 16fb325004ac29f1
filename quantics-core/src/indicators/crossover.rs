//! Strict zero-cross detector over the difference of two series.
//!
//! Emits sign(current_diff) on the bar where current and previous diff
//! strictly differ in sign, else 0. A diff of exactly zero never counts
//! as a cross on its own bar.

#[derive(Debug, Clone, Default)]
pub struct Crossover {
    prev_diff: Option<f64>,
}

impl Crossover {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next `fast - slow` difference; returns +1 on an upward
    /// cross, -1 on a downward cross, 0 otherwise.
    pub fn update(&mut self, diff: f64) -> i8 {
        let prev = self.prev_diff.replace(diff);
        match prev {
            Some(p) if p < 0.0 && diff > 0.0 => 1,
            Some(p) if p > 0.0 && diff < 0.0 => -1,
            _ => 0,
        }
    }
}
