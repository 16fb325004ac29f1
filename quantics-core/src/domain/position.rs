use serde::{Deserialize, Serialize};

/// Long-only position: whole shares plus volume-weighted average cost.
///
/// Owned exclusively by the broker; strategies see a read-only view.
/// `size == 0` means flat (short selling is not modeled).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Position {
    pub size: u64,
    pub avg_cost: f64,
}

impl Position {
    pub fn is_flat(&self) -> bool {
        self.size == 0
    }

    pub fn market_value(&self, current_price: f64) -> f64 {
        self.size as f64 * current_price
    }

    pub fn unrealized_pnl(&self, current_price: f64) -> f64 {
        self.size as f64 * (current_price - self.avg_cost)
    }

    /// Fold a buy fill into the average cost.
    pub fn add(&mut self, size: u64, price: f64) {
        let total_cost = self.avg_cost * self.size as f64 + price * size as f64;
        self.size += size;
        if self.size > 0 {
            self.avg_cost = total_cost / self.size as f64;
        }
    }

    /// Remove shares on a sell fill. Average cost is untouched; a full
    /// close resets it to zero.
    pub fn reduce(&mut self, size: u64) {
        debug_assert!(size <= self.size, "cannot reduce below flat");
        self.size = self.size.saturating_sub(size);
        if self.size == 0 {
            self.avg_cost = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_flat() {
        let pos = Position::default();
        assert!(pos.is_flat());
        assert_eq!(pos.market_value(100.0), 0.0);
    }

    #[test]
    fn add_weights_average_cost() {
        let mut pos = Position::default();
        pos.add(100, 10.0);
        pos.add(100, 20.0);
        assert_eq!(pos.size, 200);
        assert!((pos.avg_cost - 15.0).abs() < 1e-12);
    }

    #[test]
    fn full_close_resets_cost() {
        let mut pos = Position::default();
        pos.add(50, 12.0);
        pos.reduce(50);
        assert!(pos.is_flat());
        assert_eq!(pos.avg_cost, 0.0);
    }

    #[test]
    fn unrealized_pnl() {
        let mut pos = Position::default();
        pos.add(10, 100.0);
        assert!((pos.unrealized_pnl(110.0) - 100.0).abs() < 1e-12);
    }
}
