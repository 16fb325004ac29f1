//! Named-parameter configuration per strategy variant.
//!
//! Parameters arrive as a name → value map (the optimizer sweeps them by
//! name); unknown names and out-of-domain values are configuration errors,
//! caught before a run starts.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// The closed set of strategy variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrategyKind {
    MaCross,
    Rsi,
    BollingerBands,
    Macd,
    BuyHold,
}

impl StrategyKind {
    pub fn name(&self) -> &'static str {
        match self {
            StrategyKind::MaCross => "ma_cross",
            StrategyKind::Rsi => "rsi",
            StrategyKind::BollingerBands => "bollinger_bands",
            StrategyKind::Macd => "macd",
            StrategyKind::BuyHold => "buy_hold",
        }
    }
}

/// Validated, immutable strategy parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StrategyParams {
    /// `fast_period` (default 20), `slow_period` (default 50).
    MaCross { fast_period: usize, slow_period: usize },
    /// `rsi_period` (default 14), `rsi_low` (default 30), `rsi_high` (default 70).
    Rsi {
        rsi_period: usize,
        rsi_low: f64,
        rsi_high: f64,
    },
    /// `period` (default 20), `devfactor` (default 2.0).
    BollingerBands { period: usize, devfactor: f64 },
    /// `fastperiod` (default 12), `slowperiod` (default 26), `signalperiod` (default 9).
    Macd {
        fastperiod: usize,
        slowperiod: usize,
        signalperiod: usize,
    },
    /// No parameters.
    BuyHold,
}

impl StrategyParams {
    /// Documented defaults per variant.
    pub fn defaults(kind: StrategyKind) -> Self {
        match kind {
            StrategyKind::MaCross => StrategyParams::MaCross {
                fast_period: 20,
                slow_period: 50,
            },
            StrategyKind::Rsi => StrategyParams::Rsi {
                rsi_period: 14,
                rsi_low: 30.0,
                rsi_high: 70.0,
            },
            StrategyKind::BollingerBands => StrategyParams::BollingerBands {
                period: 20,
                devfactor: 2.0,
            },
            StrategyKind::Macd => StrategyParams::Macd {
                fastperiod: 12,
                slowperiod: 26,
                signalperiod: 9,
            },
            StrategyKind::BuyHold => StrategyParams::BuyHold,
        }
    }

    /// Build parameters from a named map, starting from the defaults.
    ///
    /// Fails fast on unknown names or out-of-domain values.
    pub fn from_map(
        kind: StrategyKind,
        overrides: &HashMap<String, f64>,
    ) -> Result<Self, ConfigError> {
        let mut params = Self::defaults(kind);
        for (name, &value) in overrides {
            params.set(name, value)?;
        }
        params.validate()?;
        Ok(params)
    }

    fn set(&mut self, name: &str, value: f64) -> Result<(), ConfigError> {
        let strategy = self.kind().name();
        let unknown = || ConfigError::UnknownParameter {
            name: name.to_string(),
            strategy: strategy.to_string(),
        };
        match self {
            StrategyParams::MaCross {
                fast_period,
                slow_period,
            } => match name {
                "fast_period" => *fast_period = as_period(name, value)?,
                "slow_period" => *slow_period = as_period(name, value)?,
                _ => return Err(unknown()),
            },
            StrategyParams::Rsi {
                rsi_period,
                rsi_low,
                rsi_high,
            } => match name {
                "rsi_period" => *rsi_period = as_period(name, value)?,
                "rsi_low" => *rsi_low = value,
                "rsi_high" => *rsi_high = value,
                _ => return Err(unknown()),
            },
            StrategyParams::BollingerBands { period, devfactor } => match name {
                "period" => *period = as_period(name, value)?,
                "devfactor" => *devfactor = value,
                _ => return Err(unknown()),
            },
            StrategyParams::Macd {
                fastperiod,
                slowperiod,
                signalperiod,
            } => match name {
                "fastperiod" => *fastperiod = as_period(name, value)?,
                "slowperiod" => *slowperiod = as_period(name, value)?,
                "signalperiod" => *signalperiod = as_period(name, value)?,
                _ => return Err(unknown()),
            },
            StrategyParams::BuyHold => return Err(unknown()),
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            StrategyParams::MaCross {
                fast_period,
                slow_period,
            } => {
                if fast_period >= slow_period {
                    return Err(ConfigError::OutOfDomain {
                        name: "fast_period".into(),
                        value: fast_period as f64,
                        reason: format!("must be < slow_period ({slow_period})"),
                    });
                }
            }
            StrategyParams::Rsi {
                rsi_low, rsi_high, ..
            } => {
                if !(0.0..=100.0).contains(&rsi_low) || !(0.0..=100.0).contains(&rsi_high) {
                    return Err(ConfigError::OutOfDomain {
                        name: "rsi_low/rsi_high".into(),
                        value: rsi_low,
                        reason: "thresholds must lie in [0, 100]".into(),
                    });
                }
                if rsi_low >= rsi_high {
                    return Err(ConfigError::OutOfDomain {
                        name: "rsi_low".into(),
                        value: rsi_low,
                        reason: format!("must be < rsi_high ({rsi_high})"),
                    });
                }
            }
            StrategyParams::BollingerBands { devfactor, .. } => {
                if !devfactor.is_finite() || devfactor <= 0.0 {
                    return Err(ConfigError::OutOfDomain {
                        name: "devfactor".into(),
                        value: devfactor,
                        reason: "must be positive and finite".into(),
                    });
                }
            }
            StrategyParams::Macd {
                fastperiod,
                slowperiod,
                ..
            } => {
                if fastperiod >= slowperiod {
                    return Err(ConfigError::OutOfDomain {
                        name: "fastperiod".into(),
                        value: fastperiod as f64,
                        reason: format!("must be < slowperiod ({slowperiod})"),
                    });
                }
            }
            StrategyParams::BuyHold => {}
        }
        Ok(())
    }

    pub fn kind(&self) -> StrategyKind {
        match self {
            StrategyParams::MaCross { .. } => StrategyKind::MaCross,
            StrategyParams::Rsi { .. } => StrategyKind::Rsi,
            StrategyParams::BollingerBands { .. } => StrategyKind::BollingerBands,
            StrategyParams::Macd { .. } => StrategyKind::Macd,
            StrategyParams::BuyHold => StrategyKind::BuyHold,
        }
    }

    /// The longest lookback any of the variant's indicators needs.
    pub fn max_lookback(&self) -> usize {
        match *self {
            StrategyParams::MaCross { slow_period, .. } => slow_period,
            StrategyParams::Rsi { rsi_period, .. } => rsi_period + 1,
            StrategyParams::BollingerBands { period, .. } => period,
            StrategyParams::Macd {
                slowperiod,
                signalperiod,
                ..
            } => slowperiod + signalperiod,
            StrategyParams::BuyHold => 0,
        }
    }
}

fn as_period(name: &str, value: f64) -> Result<usize, ConfigError> {
    if !value.is_finite() || value < 1.0 || value.fract() != 0.0 {
        return Err(ConfigError::OutOfDomain {
            name: name.to_string(),
            value,
            reason: "period must be a positive whole number".into(),
        });
    }
    Ok(value as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn defaults_match_documented_values() {
        assert_eq!(
            StrategyParams::defaults(StrategyKind::MaCross),
            StrategyParams::MaCross {
                fast_period: 20,
                slow_period: 50
            }
        );
        assert_eq!(
            StrategyParams::defaults(StrategyKind::Rsi),
            StrategyParams::Rsi {
                rsi_period: 14,
                rsi_low: 30.0,
                rsi_high: 70.0
            }
        );
    }

    #[test]
    fn overrides_apply() {
        let params = StrategyParams::from_map(
            StrategyKind::MaCross,
            &map(&[("fast_period", 10.0), ("slow_period", 40.0)]),
        )
        .unwrap();
        assert_eq!(
            params,
            StrategyParams::MaCross {
                fast_period: 10,
                slow_period: 40
            }
        );
    }

    #[test]
    fn unknown_name_is_an_error() {
        let err =
            StrategyParams::from_map(StrategyKind::Rsi, &map(&[("lookback", 10.0)])).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownParameter { .. }));
    }

    #[test]
    fn buy_hold_accepts_no_parameters() {
        let err = StrategyParams::from_map(StrategyKind::BuyHold, &map(&[("period", 5.0)]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownParameter { .. }));
        assert_eq!(
            StrategyParams::from_map(StrategyKind::BuyHold, &HashMap::new()).unwrap(),
            StrategyParams::BuyHold
        );
    }

    #[test]
    fn fast_must_be_below_slow() {
        let err = StrategyParams::from_map(
            StrategyKind::MaCross,
            &map(&[("fast_period", 50.0), ("slow_period", 20.0)]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::OutOfDomain { .. }));
    }

    #[test]
    fn fractional_period_rejected() {
        let err = StrategyParams::from_map(
            StrategyKind::BollingerBands,
            &map(&[("period", 2.5)]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::OutOfDomain { .. }));
    }

    #[test]
    fn rsi_threshold_ordering() {
        let err = StrategyParams::from_map(
            StrategyKind::Rsi,
            &map(&[("rsi_low", 80.0), ("rsi_high", 20.0)]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::OutOfDomain { .. }));
    }
}
