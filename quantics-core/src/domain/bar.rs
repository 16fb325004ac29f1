//! Bar — the fundamental market data unit.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::DataError;

/// OHLCV bar for a single instrument on a single day.
///
/// Immutable once ingested into a [`BarSeries`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl Bar {
    /// Basic OHLCV sanity check: positive finite prices and
    /// high >= max(open, close, low), low <= min(open, close, high).
    pub fn is_sane(&self) -> bool {
        let prices = [self.open, self.high, self.low, self.close];
        if prices.iter().any(|p| !p.is_finite() || *p <= 0.0) {
            return false;
        }
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
    }
}

/// Validated, ordered OHLCV history — the only external data input.
///
/// Construction fails with [`DataError`] instead of attempting repair:
/// dates must strictly increase and every bar must pass [`Bar::is_sane`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BarSeries {
    bars: Vec<Bar>,
}

impl BarSeries {
    pub fn new(bars: Vec<Bar>) -> Result<Self, DataError> {
        if bars.is_empty() {
            return Err(DataError::Empty);
        }
        for (index, bar) in bars.iter().enumerate() {
            let prices = [bar.open, bar.high, bar.low, bar.close];
            if prices.iter().any(|p| !p.is_finite() || *p <= 0.0) {
                return Err(DataError::InvalidPrice {
                    index,
                    date: bar.date,
                });
            }
            if !bar.is_sane() {
                return Err(DataError::InconsistentRange {
                    index,
                    date: bar.date,
                });
            }
            if index > 0 {
                let prev = bars[index - 1].date;
                if bar.date <= prev {
                    return Err(DataError::NonIncreasingDate {
                        index,
                        date: bar.date,
                        prev,
                    });
                }
            }
        }
        Ok(Self { bars })
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}
