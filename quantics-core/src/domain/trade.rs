//! Trade — a completed round trip (entry fill + exit fill).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A closed round-trip trade, appended to the ledger when a sell fill
/// fully closes the position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    pub entry_bar: usize,
    pub entry_date: NaiveDate,
    pub entry_price: f64,
    pub exit_bar: usize,
    pub exit_date: NaiveDate,
    pub exit_price: f64,
    pub size: u64,
    /// (exit − entry) × size, before commission.
    pub gross_pnl: f64,
    /// Entry plus exit commission.
    pub commission: f64,
    /// gross_pnl − commission.
    pub net_pnl: f64,
    pub bars_held: usize,
}

impl Trade {
    pub fn is_winner(&self) -> bool {
        self.net_pnl > 0.0
    }

    /// Return on the trade as a fraction of entry cost.
    pub fn return_pct(&self) -> f64 {
        if self.entry_price == 0.0 || self.size == 0 {
            return 0.0;
        }
        self.net_pnl / (self.entry_price * self.size as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_trade() -> Trade {
        Trade {
            entry_bar: 4,
            entry_date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            entry_price: 100.0,
            exit_bar: 9,
            exit_date: NaiveDate::from_ymd_opt(2024, 1, 12).unwrap(),
            exit_price: 110.0,
            size: 50,
            gross_pnl: 500.0,
            commission: 10.5,
            net_pnl: 489.5,
            bars_held: 5,
        }
    }

    #[test]
    fn winner_and_return() {
        let trade = sample_trade();
        assert!(trade.is_winner());
        let expected = 489.5 / 5000.0;
        assert!((trade.return_pct() - expected).abs() < 1e-12);
    }

    #[test]
    fn serialization_roundtrip() {
        let trade = sample_trade();
        let json = serde_json::to_string(&trade).unwrap();
        let deser: Trade = serde_json::from_str(&json).unwrap();
        assert_eq!(trade.entry_date, deser.entry_date);
        assert_eq!(trade.net_pnl, deser.net_pnl);
    }
}
