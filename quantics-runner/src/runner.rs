//! Backtest runner — wires together strategy config, engine, and metrics.
//!
//! Two entry points:
//! - `run()`: one strategy, one series → full report.
//! - `compare()`: several named strategies on the same series → ranked table.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use quantics_core::engine::{run_backtest, EngineConfig, EquityPoint};
use quantics_core::{BarSeries, ConfigError, StrategyKind, StrategyParams, Trade};

use crate::metrics::{MetricKey, PerformanceMetrics, DEFAULT_PERIODS_PER_YEAR};

/// Unique identifier for a run configuration (content-addressable hash).
pub type RunId = String;

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Runner-level configuration: engine settings plus the annualization basis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub engine: EngineConfig,
    /// Trading periods per year used to annualize Sharpe and returns.
    pub periods_per_year: f64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            periods_per_year: DEFAULT_PERIODS_PER_YEAR,
        }
    }
}

impl RunConfig {
    /// Deterministic hash ID for a (strategy, config) pair. Two identical
    /// setups always produce the same id, so reports are attributable and
    /// cacheable by the caller.
    pub fn run_id(&self, params: &StrategyParams) -> RunId {
        let payload =
            serde_json::to_string(&(self, params)).expect("run config serialization failed");
        blake3::hash(payload.as_bytes()).to_hex().to_string()
    }
}

/// Complete result of a single backtest run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestReport {
    pub run_id: RunId,
    pub kind: StrategyKind,
    pub params: StrategyParams,
    pub metrics: PerformanceMetrics,
    pub trades: Vec<Trade>,
    pub equity_curve: Vec<EquityPoint>,
    pub final_equity: f64,
}

/// Run one strategy variant over a validated bar series.
///
/// Parameter names are validated against the variant before the engine
/// starts; unknown names or out-of-domain values fail here, not mid-run.
pub fn run(
    kind: StrategyKind,
    overrides: &HashMap<String, f64>,
    series: &BarSeries,
    config: &RunConfig,
) -> Result<BacktestReport, RunError> {
    let params = StrategyParams::from_map(kind, overrides)?;
    run_with_params(&params, series, config)
}

/// Same as [`run`] but takes already-validated parameters.
pub fn run_with_params(
    params: &StrategyParams,
    series: &BarSeries,
    config: &RunConfig,
) -> Result<BacktestReport, RunError> {
    let result = run_backtest(params, series, &config.engine)?;
    let metrics =
        PerformanceMetrics::compute(&result, config.engine.initial_cash, config.periods_per_year);
    Ok(BacktestReport {
        run_id: config.run_id(params),
        kind: params.kind(),
        params: params.clone(),
        final_equity: result.final_equity,
        metrics,
        trades: result.trades,
        equity_curve: result.equity_curve,
    })
}

/// One row of a `compare` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub name: String,
    pub kind: StrategyKind,
    pub metrics: PerformanceMetrics,
    /// Ranking score under the chosen metric; `None` when undefined.
    pub score: Option<f64>,
}

/// Run several named strategies over the same series and rank them by the
/// chosen metric, descending. Rows with an undefined score sort last;
/// ties keep insertion order.
pub fn compare(
    entries: &[(String, StrategyKind, HashMap<String, f64>)],
    series: &BarSeries,
    config: &RunConfig,
    metric: MetricKey,
) -> Result<Vec<ComparisonRow>, RunError> {
    let mut rows = Vec::with_capacity(entries.len());
    for (name, kind, overrides) in entries {
        info!(strategy = %name, "running comparison entry");
        let report = run(*kind, overrides, series, config)?;
        let score = metric.score_of(&report.metrics);
        rows.push(ComparisonRow {
            name: name.clone(),
            kind: *kind,
            metrics: report.metrics,
            score,
        });
    }
    rank_rows(&mut rows, |row| row.score);
    Ok(rows)
}

/// Stable descending sort by an optional score; `None` sorts last.
pub(crate) fn rank_rows<T, F>(rows: &mut [T], score: F)
where
    F: Fn(&T) -> Option<f64>,
{
    rows.sort_by(|a, b| match (score(a), score(b)) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(std::cmp::Ordering::Equal),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
}
