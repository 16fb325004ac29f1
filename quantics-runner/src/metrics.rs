//! Performance metrics — pure functions over the equity curve and trade ledger.
//!
//! Every metric is a pure function: equity curve and/or trade list in,
//! scalar out. Sharpe is `Option` rather than zero when undefined (fewer
//! than two returns, or zero variance).

use serde::{Deserialize, Serialize};

use quantics_core::engine::{EquityPoint, RunResult};
use quantics_core::Trade;

/// Trading periods per year for daily bars.
pub const DEFAULT_PERIODS_PER_YEAR: f64 = 252.0;

/// Aggregate performance metrics for a single backtest run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub final_equity: f64,
    pub total_return_pct: f64,
    pub annual_return_pct: f64,
    /// Annualized Sharpe ratio; `None` when the return series has fewer
    /// than 2 points or zero variance.
    pub sharpe: Option<f64>,
    /// Peak-to-trough decline as a positive percentage in [0, 100].
    pub max_drawdown_pct: f64,
    pub trade_count: usize,
    pub won_trades: usize,
    pub win_rate: f64,
}

impl PerformanceMetrics {
    pub fn compute(result: &RunResult, initial_cash: f64, periods_per_year: f64) -> Self {
        let equity: Vec<f64> = result.equity_curve.iter().map(|p| p.equity).collect();
        Self {
            final_equity: result.final_equity,
            total_return_pct: total_return_pct(result.final_equity, initial_cash),
            annual_return_pct: annual_return_pct(
                result.final_equity,
                initial_cash,
                periods_per_year,
                equity.len(),
            ),
            sharpe: sharpe_ratio(&result.equity_curve, periods_per_year),
            max_drawdown_pct: max_drawdown_pct(&equity),
            trade_count: result.trades.len(),
            won_trades: won_trades(&result.trades),
            win_rate: win_rate(&result.trades),
        }
    }
}

// ─── Individual metric functions ────────────────────────────────────

/// Percentage change between consecutive equity points.
pub fn return_series(equity_curve: &[EquityPoint]) -> Vec<f64> {
    equity_curve
        .windows(2)
        .map(|w| {
            if w[0].equity == 0.0 {
                0.0
            } else {
                (w[1].equity - w[0].equity) / w[0].equity
            }
        })
        .collect()
}

/// Annualized Sharpe ratio: mean / stddev of per-bar returns, scaled by
/// sqrt(periods_per_year). Risk-free rate is taken as zero.
pub fn sharpe_ratio(equity_curve: &[EquityPoint], periods_per_year: f64) -> Option<f64> {
    let returns = return_series(equity_curve);
    if returns.len() < 2 {
        return None;
    }
    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let std = variance.sqrt();
    if std < 1e-15 {
        return None;
    }
    Some(mean / std * periods_per_year.sqrt())
}

/// Maximum drawdown as a positive percentage of the running peak, in [0, 100].
pub fn max_drawdown_pct(equity: &[f64]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut max_dd = 0.0_f64;
    for &eq in equity {
        if eq > peak {
            peak = eq;
        }
        if peak > 0.0 {
            let dd = (peak - eq) / peak * 100.0;
            if dd > max_dd {
                max_dd = dd;
            }
        }
    }
    max_dd
}

/// (final / initial)^(periods_per_year / num_periods) - 1, as a percentage.
pub fn annual_return_pct(
    final_equity: f64,
    initial_cash: f64,
    periods_per_year: f64,
    num_periods: usize,
) -> f64 {
    if initial_cash <= 0.0 || final_equity <= 0.0 || num_periods == 0 {
        return 0.0;
    }
    let exponent = periods_per_year / num_periods as f64;
    ((final_equity / initial_cash).powf(exponent) - 1.0) * 100.0
}

pub fn total_return_pct(final_equity: f64, initial_cash: f64) -> f64 {
    if initial_cash <= 0.0 {
        return 0.0;
    }
    (final_equity / initial_cash - 1.0) * 100.0
}

pub fn won_trades(trades: &[Trade]) -> usize {
    trades.iter().filter(|t| t.is_winner()).count()
}

/// Fraction of closed trades that were winners; 0 when there are no trades.
pub fn win_rate(trades: &[Trade]) -> f64 {
    if trades.is_empty() {
        return 0.0;
    }
    won_trades(trades) as f64 / trades.len() as f64
}

/// Which metric to rank `compare`/`optimize` results by.
///
/// `score_of` maps metrics onto a higher-is-better scale so every key can
/// be ranked descending; drawdown is negated for that reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetricKey {
    Sharpe,
    AnnualReturn,
    TotalReturn,
    MaxDrawdown,
    WinRate,
    FinalEquity,
}

impl MetricKey {
    pub fn score_of(&self, metrics: &PerformanceMetrics) -> Option<f64> {
        let score = match self {
            MetricKey::Sharpe => return metrics.sharpe,
            MetricKey::AnnualReturn => metrics.annual_return_pct,
            MetricKey::TotalReturn => metrics.total_return_pct,
            MetricKey::MaxDrawdown => -metrics.max_drawdown_pct,
            MetricKey::WinRate => metrics.win_rate,
            MetricKey::FinalEquity => metrics.final_equity,
        };
        score.is_finite().then_some(score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn curve(values: &[f64]) -> Vec<EquityPoint> {
        let base = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, &equity)| EquityPoint {
                date: base + chrono::Duration::days(i as i64),
                equity,
            })
            .collect()
    }

    #[test]
    fn return_series_is_pct_change() {
        let returns = return_series(&curve(&[100.0, 110.0, 99.0]));
        assert_eq!(returns.len(), 2);
        assert!((returns[0] - 0.1).abs() < 1e-12);
        assert!((returns[1] + 0.1).abs() < 1e-12);
    }

    #[test]
    fn sharpe_absent_for_constant_equity() {
        assert_eq!(sharpe_ratio(&curve(&[100.0; 10]), 252.0), None);
    }

    #[test]
    fn sharpe_absent_for_short_series() {
        assert_eq!(sharpe_ratio(&curve(&[100.0, 101.0]), 252.0), None);
    }

    #[test]
    fn sharpe_positive_for_steady_gains() {
        let values: Vec<f64> = (0..50).map(|i| 100.0 * 1.001_f64.powi(i)).collect();
        // Noise-free drift still has tiny variance from compounding.
        let sharpe = sharpe_ratio(&curve(&values), 252.0);
        assert!(sharpe.is_none() || sharpe.unwrap() > 0.0);
    }

    #[test]
    fn drawdown_known_curve() {
        // Peak 120, trough 90: 25% drawdown.
        let dd = max_drawdown_pct(&[100.0, 120.0, 90.0, 110.0]);
        assert!((dd - 25.0).abs() < 1e-9);
    }

    #[test]
    fn drawdown_zero_for_monotone_rise() {
        let dd = max_drawdown_pct(&[100.0, 101.0, 105.0, 110.0]);
        assert_eq!(dd, 0.0);
    }

    #[test]
    fn drawdown_stays_in_bounds() {
        let dd = max_drawdown_pct(&[100.0, 1.0, 200.0, 0.5]);
        assert!((0.0..=100.0).contains(&dd));
    }

    #[test]
    fn annual_return_doubles_in_a_year() {
        // Doubling over exactly one year of periods is 100% annualized.
        let ar = annual_return_pct(200.0, 100.0, 252.0, 252);
        assert!((ar - 100.0).abs() < 1e-9);
    }

    #[test]
    fn win_rate_zero_without_trades() {
        assert_eq!(win_rate(&[]), 0.0);
    }

    #[test]
    fn drawdown_score_is_negated() {
        let metrics = PerformanceMetrics {
            final_equity: 100.0,
            total_return_pct: 0.0,
            annual_return_pct: 0.0,
            sharpe: None,
            max_drawdown_pct: 12.5,
            trade_count: 0,
            won_trades: 0,
            win_rate: 0.0,
        };
        assert_eq!(MetricKey::MaxDrawdown.score_of(&metrics), Some(-12.5));
        assert_eq!(MetricKey::Sharpe.score_of(&metrics), None);
    }
}
