//! Backtest engine — the deterministic bar-by-bar loop.
//!
//! Four phases per bar, in order:
//! 1. advance the strategy's indicators,
//! 2. if no order is pending, ask the strategy for a signal,
//! 3. hand any resulting order to the broker for same-bar settlement,
//! 4. record an equity point at the bar close.
//!
//! A run is strictly sequential: broker state is mutated causally from one
//! bar to the next, and the decision at bar *i* sees only bars <= *i*.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::broker::Broker;
use crate::domain::{BarSeries, Order, OrderSide, OrderStatus, Trade};
use crate::error::ConfigError;
use crate::strategy::{AccountView, Signal, Strategy, StrategyParams};

/// Configuration for a single backtest run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub initial_cash: f64,
    /// Commission as a fraction of notional, charged on entry and exit.
    pub commission_rate: f64,
    /// Fraction of available cash a buy may commit (sizing policy).
    pub cash_fraction: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            initial_cash: 100_000.0,
            commission_rate: 0.001,
            cash_fraction: 1.0,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.initial_cash.is_finite() || self.initial_cash <= 0.0 {
            return Err(ConfigError::InvalidEngineConfig(format!(
                "initial_cash must be positive, got {}",
                self.initial_cash
            )));
        }
        if !self.commission_rate.is_finite() || self.commission_rate < 0.0 {
            return Err(ConfigError::InvalidEngineConfig(format!(
                "commission_rate must be non-negative, got {}",
                self.commission_rate
            )));
        }
        if !self.cash_fraction.is_finite()
            || self.cash_fraction <= 0.0
            || self.cash_fraction > 1.0
        {
            return Err(ConfigError::InvalidEngineConfig(format!(
                "cash_fraction must lie in (0, 1], got {}",
                self.cash_fraction
            )));
        }
        Ok(())
    }
}

/// Account value sampled once per bar after order settlement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub date: NaiveDate,
    pub equity: f64,
}

/// Result of a complete backtest run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    pub final_equity: f64,
    /// One point per bar, in bar order.
    pub equity_curve: Vec<EquityPoint>,
    /// Completed round-trip trades.
    pub trades: Vec<Trade>,
    /// Audit trail of every order that reached a terminal state.
    pub orders: Vec<Order>,
    pub bar_count: usize,
}

/// Run one strategy over one bar series.
///
/// Deterministic: the same (params, series, config) triple always yields an
/// identical trade ledger and equity curve.
pub fn run_backtest(
    params: &StrategyParams,
    series: &BarSeries,
    config: &EngineConfig,
) -> Result<RunResult, ConfigError> {
    config.validate()?;

    let mut strategy = Strategy::new(params);
    let mut broker = Broker::new(config.initial_cash, config.commission_rate);
    let mut equity_curve = Vec::with_capacity(series.len());
    let mut orders = Vec::new();
    // Cleared as soon as the order reaches a terminal state; with same-bar
    // settlement that is the end of the same iteration, but the flag keeps
    // the one-outstanding-order contract explicit.
    let mut pending = false;

    info!(
        strategy = params.kind().name(),
        bars = series.len(),
        initial_cash = config.initial_cash,
        "starting backtest"
    );

    for (bar_index, bar) in series.bars().iter().enumerate() {
        strategy.observe(bar);

        if !pending {
            let account = AccountView {
                cash: broker.cash(),
                position: broker.position(),
                cash_fraction: config.cash_fraction,
                commission_rate: config.commission_rate,
            };
            let side_size = match strategy.decide(bar, &account) {
                Signal::Buy(size) => Some((OrderSide::Buy, size)),
                Signal::Sell(size) => Some((OrderSide::Sell, size)),
                Signal::Hold => None,
            };
            if let Some((side, size)) = side_size {
                pending = true;
                let order = Order::new(side, size, bar_index, bar.date);
                let order = broker.submit(order, bar, bar_index);
                debug_assert!(order.status.is_terminal());
                if order.status.is_terminal() {
                    pending = false;
                }
                orders.push(order);
            }
        }

        equity_curve.push(EquityPoint {
            date: bar.date,
            equity: broker.equity(bar.close),
        });
    }

    let final_equity = equity_curve.last().map(|p| p.equity).unwrap_or(0.0);
    info!(
        final_equity,
        trades = broker.trades().len(),
        "backtest complete"
    );

    Ok(RunResult {
        final_equity,
        equity_curve,
        orders,
        bar_count: series.len(),
        trades: broker.into_trades(),
    })
}

impl RunResult {
    /// Orders that actually filled, in submission order.
    pub fn fills(&self) -> impl Iterator<Item = &Order> {
        self.orders
            .iter()
            .filter(|o| o.status == OrderStatus::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Bar;
    use crate::strategy::StrategyKind;

    fn series(closes: &[f64]) -> BarSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar {
                date: start + chrono::Days::new(i as u64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1_000,
            })
            .collect();
        BarSeries::new(bars).unwrap()
    }

    #[test]
    fn config_validation_rejects_bad_values() {
        let mut config = EngineConfig::default();
        config.cash_fraction = 1.5;
        assert!(config.validate().is_err());
        config.cash_fraction = 1.0;
        config.initial_cash = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn equity_reconciles_every_bar() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + (i % 7) as f64).collect();
        let config = EngineConfig {
            initial_cash: 10_000.0,
            commission_rate: 0.001,
            cash_fraction: 1.0,
        };
        let params = StrategyParams::defaults(StrategyKind::BuyHold);
        let result = run_backtest(&params, &series(&closes), &config).unwrap();
        assert_eq!(result.equity_curve.len(), 30);
        assert_eq!(result.bar_count, 30);
    }

    #[test]
    fn buy_hold_fills_exactly_once() {
        let closes: Vec<f64> = (0..10).map(|i| 100.0 + i as f64).collect();
        let config = EngineConfig {
            initial_cash: 10_000.0,
            commission_rate: 0.0,
            cash_fraction: 1.0,
        };
        let params = StrategyParams::defaults(StrategyKind::BuyHold);
        let result = run_backtest(&params, &series(&closes), &config).unwrap();
        assert_eq!(result.fills().count(), 1);
        assert!(result.trades.is_empty()); // never sells
    }

    #[test]
    fn runs_are_deterministic() {
        let closes: Vec<f64> = (0..60)
            .map(|i| 100.0 + (i as f64 * 0.7).sin() * 10.0)
            .collect();
        let config = EngineConfig::default();
        let params = StrategyParams::MaCross {
            fast_period: 5,
            slow_period: 15,
        };
        let s = series(&closes);
        let a = run_backtest(&params, &s, &config).unwrap();
        let b = run_backtest(&params, &s, &config).unwrap();
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }
}
