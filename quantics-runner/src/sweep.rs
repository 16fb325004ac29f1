//! Parameter sweep — grid search over named parameter values.
//!
//! The grid is the Cartesian product of per-parameter candidate lists in
//! first-axis-major order. Every combination runs in isolation: a failing
//! run is recorded as an error row and never aborts its siblings.

use std::collections::HashMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use quantics_core::{BarSeries, StrategyKind};

use crate::metrics::{MetricKey, PerformanceMetrics};
use crate::runner::{rank_rows, run, RunConfig};

/// Parameter grid: name → candidate values, in insertion order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParamGrid {
    axes: Vec<(String, Vec<f64>)>,
}

impl ParamGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn axis(mut self, name: impl Into<String>, values: Vec<f64>) -> Self {
        self.axes.push((name.into(), values));
        self
    }

    /// Total number of combinations. Zero if any axis is empty.
    pub fn size(&self) -> usize {
        self.axes.iter().map(|(_, v)| v.len()).product()
    }

    /// All combinations, first axis varying slowest.
    pub fn combinations(&self) -> Vec<HashMap<String, f64>> {
        let mut combos = vec![HashMap::new()];
        for (name, values) in &self.axes {
            let mut next = Vec::with_capacity(combos.len() * values.len());
            for combo in &combos {
                for &value in values {
                    let mut c = combo.clone();
                    c.insert(name.clone(), value);
                    next.push(c);
                }
            }
            combos = next;
        }
        combos
    }
}

/// One row of a sweep: the attempted combination plus either metrics or an
/// error marker. Error rows are kept for attribution but never ranked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationRow {
    /// The parameter combination, as (name, value) pairs in grid-axis order.
    pub params: Vec<(String, f64)>,
    pub metrics: Option<PerformanceMetrics>,
    pub error: Option<String>,
    /// Ranking score under the sweep's metric; `None` for error rows and
    /// undefined metrics.
    pub score: Option<f64>,
}

impl OptimizationRow {
    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}

/// Result of a full sweep: ranked rows first, error rows appended in
/// first-seen order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepReport {
    pub rows: Vec<OptimizationRow>,
    pub attempted: usize,
    pub failed: usize,
}

impl SweepReport {
    pub fn best(&self) -> Option<&OptimizationRow> {
        self.rows.first().filter(|row| row.score.is_some())
    }
}

/// Sweep executor. Combinations are independent (each run owns its broker
/// and equity state), so the sweep is embarrassingly parallel; `parallel`
/// toggles rayon dispatch without changing the result.
#[derive(Debug, Clone)]
pub struct Sweep {
    config: RunConfig,
    parallel: bool,
}

impl Sweep {
    pub fn new(config: RunConfig) -> Self {
        Self {
            config,
            parallel: true,
        }
    }

    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Run the engine once per combination and rank the outcomes by
    /// `metric`, descending, insertion order breaking ties.
    pub fn optimize(
        &self,
        kind: StrategyKind,
        series: &BarSeries,
        grid: &ParamGrid,
        metric: MetricKey,
    ) -> SweepReport {
        let combos = grid.combinations();
        let attempted = combos.len();
        debug!(strategy = kind.name(), attempted, "starting parameter sweep");

        let run_one = |overrides: &HashMap<String, f64>| -> OptimizationRow {
            let params: Vec<(String, f64)> = grid
                .axes
                .iter()
                .filter_map(|(name, _)| overrides.get(name).map(|&v| (name.clone(), v)))
                .collect();
            match run(kind, overrides, series, &self.config) {
                Ok(report) => {
                    let score = metric.score_of(&report.metrics);
                    OptimizationRow {
                        params,
                        metrics: Some(report.metrics),
                        error: None,
                        score,
                    }
                }
                Err(err) => {
                    warn!(?params, %err, "sweep combination failed");
                    OptimizationRow {
                        params,
                        metrics: None,
                        error: Some(err.to_string()),
                        score: None,
                    }
                }
            }
        };

        // Combination index is carried through the parallel dispatch so the
        // rows come back in first-seen order before ranking.
        let mut indexed: Vec<(usize, OptimizationRow)> = if self.parallel {
            combos
                .par_iter()
                .enumerate()
                .map(|(i, c)| (i, run_one(c)))
                .collect()
        } else {
            combos.iter().enumerate().map(|(i, c)| (i, run_one(c))).collect()
        };
        indexed.sort_by_key(|(i, _)| *i);

        let (mut ranked, errored): (Vec<OptimizationRow>, Vec<OptimizationRow>) = indexed
            .into_iter()
            .map(|(_, row)| row)
            .partition(|row| !row.is_failure());
        rank_rows(&mut ranked, |row| row.score);

        let failed = errored.len();
        let mut rows = ranked;
        rows.extend(errored);

        SweepReport {
            rows,
            attempted,
            failed,
        }
    }
}
