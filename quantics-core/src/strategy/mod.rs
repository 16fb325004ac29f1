//! Strategy variants — polymorphic signal generation over a closed enum.
//!
//! Each variant owns its indicator state and exposes two operations per bar:
//! `observe` advances the indicators (phase 1 of the engine loop), `decide`
//! turns the latest indicator state plus the account view into a trading
//! signal. Indicators that are still warming up read as "no signal".

pub mod params;

pub use params::{StrategyKind, StrategyParams};

use crate::domain::{Bar, Position};
use crate::indicators::{Bollinger, BollingerBands, Crossover, Macd, Rsi, Sma};

/// Trading intent produced by `Strategy::decide`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Buy(u64),
    Sell(u64),
    Hold,
}

/// Read-only account view handed to `decide`.
///
/// Sizing is uniform across variants: a buy takes
/// `floor(cash_fraction * cash / (close * (1 + commission_rate)))` whole
/// shares, a sell always unwinds the full position.
#[derive(Debug, Clone, Copy)]
pub struct AccountView<'a> {
    pub cash: f64,
    pub position: &'a Position,
    /// Fraction of available cash a buy may commit (sizing policy, 0 < f <= 1).
    pub cash_fraction: f64,
    pub commission_rate: f64,
}

impl AccountView<'_> {
    /// Largest whole-share buy the account can settle at `price`,
    /// commission included.
    pub fn affordable_size(&self, price: f64) -> u64 {
        if price <= 0.0 {
            return 0;
        }
        let budget = self.cash_fraction * self.cash;
        (budget / (price * (1.0 + self.commission_rate))).floor() as u64
    }
}

/// A strategy instance: validated parameters plus per-run indicator state.
///
/// One instance belongs to exactly one backtest run; the optimizer builds a
/// fresh instance per combination, so concurrent runs share nothing.
#[derive(Debug, Clone)]
pub enum Strategy {
    MaCross {
        fast: Sma,
        slow: Sma,
        cross: Crossover,
        last_cross: i8,
    },
    Rsi {
        rsi: Rsi,
        low: f64,
        high: f64,
        value: Option<f64>,
    },
    BollingerBands {
        boll: Bollinger,
        bands: Option<BollingerBands>,
    },
    Macd {
        macd: Macd,
        cross: Crossover,
        last_cross: i8,
    },
    BuyHold,
}

impl Strategy {
    pub fn new(params: &StrategyParams) -> Self {
        match *params {
            StrategyParams::MaCross {
                fast_period,
                slow_period,
            } => Strategy::MaCross {
                fast: Sma::new(fast_period),
                slow: Sma::new(slow_period),
                cross: Crossover::new(),
                last_cross: 0,
            },
            StrategyParams::Rsi {
                rsi_period,
                rsi_low,
                rsi_high,
            } => Strategy::Rsi {
                rsi: Rsi::new(rsi_period),
                low: rsi_low,
                high: rsi_high,
                value: None,
            },
            StrategyParams::BollingerBands { period, devfactor } => Strategy::BollingerBands {
                boll: Bollinger::new(period, devfactor),
                bands: None,
            },
            StrategyParams::Macd {
                fastperiod,
                slowperiod,
                signalperiod,
            } => Strategy::Macd {
                macd: Macd::new(fastperiod, slowperiod, signalperiod),
                cross: Crossover::new(),
                last_cross: 0,
            },
            StrategyParams::BuyHold => Strategy::BuyHold,
        }
    }

    /// Advance indicator state for the bar. Called exactly once per bar,
    /// before `decide`, regardless of whether an order is pending.
    pub fn observe(&mut self, bar: &Bar) {
        match self {
            Strategy::MaCross {
                fast,
                slow,
                cross,
                last_cross,
            } => {
                let f = fast.update(bar.close);
                let s = slow.update(bar.close);
                *last_cross = match (f, s) {
                    (Some(f), Some(s)) => cross.update(f - s),
                    _ => 0,
                };
            }
            Strategy::Rsi { rsi, value, .. } => {
                *value = rsi.update(bar.close);
            }
            Strategy::BollingerBands { boll, bands } => {
                *bands = boll.update(bar.close);
            }
            Strategy::Macd {
                macd,
                cross,
                last_cross,
            } => {
                *last_cross = match macd.update(bar.close) {
                    Some(v) => cross.update(v.macd - v.signal),
                    None => 0,
                };
            }
            Strategy::BuyHold => {}
        }
    }

    /// Produce a trading signal from the current indicator state.
    ///
    /// Pure with respect to engine-provided state: the decision at bar *i*
    /// sees only bars <= *i* (the indicators were fed in order).
    pub fn decide(&self, bar: &Bar, account: &AccountView<'_>) -> Signal {
        let flat = account.position.is_flat();
        match self {
            Strategy::MaCross { last_cross, .. } | Strategy::Macd { last_cross, .. } => {
                if flat && *last_cross > 0 {
                    buy_all(account, bar.close)
                } else if !flat && *last_cross < 0 {
                    Signal::Sell(account.position.size)
                } else {
                    Signal::Hold
                }
            }
            Strategy::Rsi {
                low, high, value, ..
            } => match value {
                Some(v) if flat && *v < *low => buy_all(account, bar.close),
                Some(v) if !flat && *v > *high => Signal::Sell(account.position.size),
                _ => Signal::Hold,
            },
            Strategy::BollingerBands { bands, .. } => match bands {
                Some(b) if flat && bar.close < b.bottom => buy_all(account, bar.close),
                Some(b) if !flat && bar.close > b.top => Signal::Sell(account.position.size),
                _ => Signal::Hold,
            },
            Strategy::BuyHold => {
                if flat {
                    buy_all(account, bar.close)
                } else {
                    Signal::Hold
                }
            }
        }
    }
}

fn buy_all(account: &AccountView<'_>, price: f64) -> Signal {
    match account.affordable_size(price) {
        0 => Signal::Hold,
        size => Signal::Buy(size),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bar(day: u32, close: f64) -> Bar {
        Bar {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Days::new(day as u64),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1_000,
        }
    }

    fn account<'a>(cash: f64, position: &'a Position) -> AccountView<'a> {
        AccountView {
            cash,
            position,
            cash_fraction: 1.0,
            commission_rate: 0.0,
        }
    }

    #[test]
    fn buy_hold_buys_when_flat_only() {
        let strategy = Strategy::new(&StrategyParams::BuyHold);
        let flat = Position::default();
        assert_eq!(
            strategy.decide(&bar(0, 100.0), &account(10_000.0, &flat)),
            Signal::Buy(100)
        );

        let mut long = Position::default();
        long.add(100, 100.0);
        assert_eq!(
            strategy.decide(&bar(1, 120.0), &account(0.0, &long)),
            Signal::Hold
        );
    }

    #[test]
    fn sizing_uses_whole_shares() {
        let flat = Position::default();
        let view = account(1_050.0, &flat);
        assert_eq!(view.affordable_size(100.0), 10);
    }

    #[test]
    fn sizing_accounts_for_commission() {
        let flat = Position::default();
        let view = AccountView {
            cash: 10_000.0,
            position: &flat,
            cash_fraction: 1.0,
            commission_rate: 0.001,
        };
        // 10_000 / (100 * 1.001) = 99.9 → 99 shares
        assert_eq!(view.affordable_size(100.0), 99);
    }

    #[test]
    fn cash_fraction_caps_the_budget() {
        let flat = Position::default();
        let view = AccountView {
            cash: 10_000.0,
            position: &flat,
            cash_fraction: 0.95,
            commission_rate: 0.0,
        };
        assert_eq!(view.affordable_size(100.0), 95);
    }

    #[test]
    fn ma_cross_holds_during_warmup() {
        let params = StrategyParams::MaCross {
            fast_period: 2,
            slow_period: 4,
        };
        let mut strategy = Strategy::new(&params);
        let flat = Position::default();
        for i in 0..4 {
            let b = bar(i, 100.0 + i as f64);
            strategy.observe(&b);
            assert_eq!(
                strategy.decide(&b, &account(10_000.0, &flat)),
                Signal::Hold,
                "no signal before the slow window fills and a cross occurs"
            );
        }
    }

    #[test]
    fn ma_cross_buys_on_upward_cross() {
        let params = StrategyParams::MaCross {
            fast_period: 2,
            slow_period: 3,
        };
        let mut strategy = Strategy::new(&params);
        let flat = Position::default();

        // Falling then sharply rising closes force fast SMA below, then
        // above, the slow SMA.
        let closes = [110.0, 105.0, 100.0, 96.0, 120.0, 140.0];
        let mut bought_at = None;
        for (i, &c) in closes.iter().enumerate() {
            let b = bar(i as u32, c);
            strategy.observe(&b);
            if let Signal::Buy(size) = strategy.decide(&b, &account(10_000.0, &flat)) {
                bought_at = Some((i, size));
                break;
            }
        }
        let (i, size) = bought_at.expect("expected an upward cross");
        assert!(i >= 3, "cross cannot fire before two diffs are defined");
        assert!(size > 0);
    }

    #[test]
    fn rsi_sells_above_high_threshold() {
        let params = StrategyParams::Rsi {
            rsi_period: 2,
            rsi_low: 30.0,
            rsi_high: 70.0,
        };
        let mut strategy = Strategy::new(&params);
        let mut long = Position::default();
        long.add(10, 100.0);

        for (i, &c) in [100.0, 101.0, 103.0, 106.0].iter().enumerate() {
            strategy.observe(&bar(i as u32, c));
        }
        // Monotone gains push RSI to 100 > 70.
        assert_eq!(
            strategy.decide(&bar(4, 106.0), &account(0.0, &long)),
            Signal::Sell(10)
        );
    }

    #[test]
    fn bollinger_buys_below_lower_band() {
        let params = StrategyParams::BollingerBands {
            period: 3,
            devfactor: 1.0,
        };
        let mut strategy = Strategy::new(&params);
        let flat = Position::default();

        for (i, &c) in [100.0, 101.0, 99.0].iter().enumerate() {
            strategy.observe(&bar(i as u32, c));
        }
        // A collapse far below the band triggers the mean-reversion buy.
        let crash = bar(3, 80.0);
        strategy.observe(&crash);
        assert!(matches!(
            strategy.decide(&crash, &account(10_000.0, &flat)),
            Signal::Buy(_)
        ));
    }
}
