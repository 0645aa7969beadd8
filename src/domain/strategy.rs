//! Strategy parameters: which indicator drives the backtest and how it is tuned.

use crate::domain::error::BacktestError;
use crate::domain::indicator::{bollinger, macd, rsi, sma, IndicatorKind};
use crate::ports::config_port::ConfigPort;
use serde::Serialize;

pub const STRATEGY_SECTION: &str = "strategy";

/// SMA strategies need at least `long_window * 1.1` bars before running.
pub const SMA_MIN_DATA_FACTOR: f64 = 1.1;

/// Warmup multiplier for the level-triggered indicators.
const WARMUP_MULTIPLIER: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StrategyParams {
    Sma {
        short_window: usize,
        long_window: usize,
    },
    Rsi {
        rsi_period: usize,
        overbought: f64,
        oversold: f64,
    },
    Macd {
        fast_period: usize,
        slow_period: usize,
        signal_period: usize,
    },
    Bbands {
        window: usize,
        num_std_dev: f64,
    },
}

impl StrategyParams {
    pub fn default_for(kind: IndicatorKind) -> Self {
        match kind {
            IndicatorKind::Sma => StrategyParams::Sma {
                short_window: sma::DEFAULT_SHORT_WINDOW,
                long_window: sma::DEFAULT_LONG_WINDOW,
            },
            IndicatorKind::Rsi => StrategyParams::Rsi {
                rsi_period: rsi::DEFAULT_PERIOD,
                overbought: rsi::DEFAULT_OVERBOUGHT,
                oversold: rsi::DEFAULT_OVERSOLD,
            },
            IndicatorKind::Macd => StrategyParams::Macd {
                fast_period: macd::DEFAULT_FAST,
                slow_period: macd::DEFAULT_SLOW,
                signal_period: macd::DEFAULT_SIGNAL,
            },
            IndicatorKind::Bbands => StrategyParams::Bbands {
                window: bollinger::DEFAULT_WINDOW,
                num_std_dev: bollinger::DEFAULT_NUM_STD_DEV,
            },
        }
    }

    pub fn kind(&self) -> IndicatorKind {
        match self {
            StrategyParams::Sma { .. } => IndicatorKind::Sma,
            StrategyParams::Rsi { .. } => IndicatorKind::Rsi,
            StrategyParams::Macd { .. } => IndicatorKind::Macd,
            StrategyParams::Bbands { .. } => IndicatorKind::Bbands,
        }
    }

    /// Leading bars dropped before metrics and trades are computed.
    pub fn warmup_period(&self) -> usize {
        match *self {
            StrategyParams::Sma { long_window, .. } => long_window,
            StrategyParams::Rsi { rsi_period, .. } => rsi_period * WARMUP_MULTIPLIER,
            StrategyParams::Macd {
                fast_period,
                slow_period,
                signal_period,
            } => fast_period.max(slow_period).max(signal_period) * WARMUP_MULTIPLIER,
            StrategyParams::Bbands { window, .. } => window * WARMUP_MULTIPLIER,
        }
    }

    /// Fails with `InsufficientData` when an SMA strategy has fewer than
    /// `long_window * 1.1` bars. Other indicators have no minimum.
    pub fn check_min_bars(&self, available: usize) -> Result<(), BacktestError> {
        if let StrategyParams::Sma { long_window, .. } = *self {
            let min_required = long_window as f64 * SMA_MIN_DATA_FACTOR;
            if (available as f64) < min_required {
                return Err(BacktestError::InsufficientData {
                    required: min_required as usize,
                    available,
                });
            }
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), BacktestError> {
        match *self {
            StrategyParams::Sma {
                short_window,
                long_window,
            } => {
                require_positive("short_window", short_window)?;
                require_positive("long_window", long_window)?;
                if short_window >= long_window {
                    return Err(BacktestError::invalid_parameter(
                        "short_window",
                        format!(
                            "short_window ({short_window}) must be less than long_window ({long_window})"
                        ),
                    ));
                }
            }
            StrategyParams::Rsi {
                rsi_period,
                overbought,
                oversold,
            } => {
                require_positive("rsi_period", rsi_period)?;
                require_level("oversold", oversold)?;
                require_level("overbought", overbought)?;
                if overbought <= oversold {
                    return Err(BacktestError::invalid_parameter(
                        "overbought",
                        format!(
                            "overbought ({overbought}) must be greater than oversold ({oversold})"
                        ),
                    ));
                }
            }
            StrategyParams::Macd {
                fast_period,
                slow_period,
                signal_period,
            } => {
                require_positive("fast_period", fast_period)?;
                require_positive("slow_period", slow_period)?;
                require_positive("signal_period", signal_period)?;
            }
            StrategyParams::Bbands {
                window,
                num_std_dev,
            } => {
                require_positive("window", window)?;
                if !num_std_dev.is_finite() || num_std_dev <= 0.0 {
                    return Err(BacktestError::invalid_parameter(
                        "num_std_dev",
                        format!("must be a positive number, got {num_std_dev}"),
                    ));
                }
            }
        }
        Ok(())
    }

    pub fn short_window(&self) -> Option<usize> {
        match *self {
            StrategyParams::Sma { short_window, .. } => Some(short_window),
            _ => None,
        }
    }

    pub fn long_window(&self) -> Option<usize> {
        match *self {
            StrategyParams::Sma { long_window, .. } => Some(long_window),
            _ => None,
        }
    }

    /// Parameter names and values in declaration order.
    pub fn parameters(&self) -> Vec<(&'static str, f64)> {
        match *self {
            StrategyParams::Sma {
                short_window,
                long_window,
            } => vec![
                ("short_window", short_window as f64),
                ("long_window", long_window as f64),
            ],
            StrategyParams::Rsi {
                rsi_period,
                overbought,
                oversold,
            } => vec![
                ("rsi_period", rsi_period as f64),
                ("overbought", overbought),
                ("oversold", oversold),
            ],
            StrategyParams::Macd {
                fast_period,
                slow_period,
                signal_period,
            } => vec![
                ("fast_period", fast_period as f64),
                ("slow_period", slow_period as f64),
                ("signal_period", signal_period as f64),
            ],
            StrategyParams::Bbands {
                window,
                num_std_dev,
            } => vec![("window", window as f64), ("num_std_dev", num_std_dev)],
        }
    }

    /// Read the parameters for `kind` from the `[strategy]` section, falling
    /// back to the documented defaults for absent keys.
    pub fn from_config(
        kind: IndicatorKind,
        config: &dyn ConfigPort,
    ) -> Result<Self, BacktestError> {
        let params = match kind {
            IndicatorKind::Sma => StrategyParams::Sma {
                short_window: read_window(config, "short_window", sma::DEFAULT_SHORT_WINDOW)?,
                long_window: read_window(config, "long_window", sma::DEFAULT_LONG_WINDOW)?,
            },
            IndicatorKind::Rsi => StrategyParams::Rsi {
                rsi_period: read_window(config, "rsi_period", rsi::DEFAULT_PERIOD)?,
                overbought: read_number(config, "overbought", rsi::DEFAULT_OVERBOUGHT)?,
                oversold: read_number(config, "oversold", rsi::DEFAULT_OVERSOLD)?,
            },
            IndicatorKind::Macd => StrategyParams::Macd {
                fast_period: read_window(config, "fast_period", macd::DEFAULT_FAST)?,
                slow_period: read_window(config, "slow_period", macd::DEFAULT_SLOW)?,
                signal_period: read_window(config, "signal_period", macd::DEFAULT_SIGNAL)?,
            },
            IndicatorKind::Bbands => StrategyParams::Bbands {
                window: read_window(config, "window", bollinger::DEFAULT_WINDOW)?,
                num_std_dev: read_number(config, "num_std_dev", bollinger::DEFAULT_NUM_STD_DEV)?,
            },
        };
        params.validate()?;
        Ok(params)
    }
}

fn require_positive(name: &str, value: usize) -> Result<(), BacktestError> {
    if value == 0 {
        return Err(BacktestError::invalid_parameter(
            name,
            format!("must be a positive number of bars, got {value}"),
        ));
    }
    Ok(())
}

fn require_level(name: &str, value: f64) -> Result<(), BacktestError> {
    if !(0.0..=100.0).contains(&value) {
        return Err(BacktestError::invalid_parameter(
            name,
            format!("must be between 0 and 100, got {value}"),
        ));
    }
    Ok(())
}

fn read_window(config: &dyn ConfigPort, key: &str, default: usize) -> Result<usize, BacktestError> {
    let Some(raw) = config.get_string(STRATEGY_SECTION, key) else {
        return Ok(default);
    };
    let value: i64 = raw.trim().parse().map_err(|_| BacktestError::ConfigInvalid {
        section: STRATEGY_SECTION.to_string(),
        key: key.to_string(),
        reason: format!("expected an integer, got '{}'", raw.trim()),
    })?;
    if value <= 0 {
        return Err(BacktestError::invalid_parameter(
            key,
            format!("must be a positive number of bars, got {value}"),
        ));
    }
    Ok(value as usize)
}

fn read_number(config: &dyn ConfigPort, key: &str, default: f64) -> Result<f64, BacktestError> {
    let Some(raw) = config.get_string(STRATEGY_SECTION, key) else {
        return Ok(default);
    };
    raw.trim().parse().map_err(|_| BacktestError::ConfigInvalid {
        section: STRATEGY_SECTION.to_string(),
        key: key.to_string(),
        reason: format!("expected a number, got '{}'", raw.trim()),
    })
}
