//! Technical indicator implementations.
//!
//! - `IndicatorKind`: which indicator a strategy is built on
//! - `IndicatorValue`: the output shape of a single defined bar
//! - `IndicatorPoint`: one bar of an indicator series; `value` is `None`
//!   while the indicator's lookback is not yet filled
//! - `IndicatorSeries`: a series aligned 1:1 with the input bars

pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rolling;
pub mod rsi;
pub mod sma;

pub use bollinger::calculate_bollinger;
pub use ema::{calculate_ema, Ema};
pub use macd::calculate_macd;
pub use rolling::{RollingStats, RollingWindow};
pub use rsi::calculate_rsi;
pub use sma::calculate_sma_cross;

use crate::domain::error::BacktestError;
use crate::domain::ohlcv::PriceBar;
use crate::domain::strategy::StrategyParams;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum IndicatorKind {
    #[serde(rename = "SMA")]
    Sma,
    #[serde(rename = "RSI")]
    Rsi,
    #[serde(rename = "MACD")]
    Macd,
    #[serde(rename = "BBANDS")]
    Bbands,
}

impl IndicatorKind {
    pub const ALL: [IndicatorKind; 4] = [
        IndicatorKind::Sma,
        IndicatorKind::Rsi,
        IndicatorKind::Macd,
        IndicatorKind::Bbands,
    ];

    pub fn name(self) -> &'static str {
        match self {
            IndicatorKind::Sma => "SMA",
            IndicatorKind::Rsi => "RSI",
            IndicatorKind::Macd => "MACD",
            IndicatorKind::Bbands => "BBANDS",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            IndicatorKind::Sma => "golden cross / death cross of two simple moving averages",
            IndicatorKind::Rsi => "relative strength index oversold/overbought levels",
            IndicatorKind::Macd => "MACD line relative to its signal line",
            IndicatorKind::Bbands => "close outside Bollinger Bands",
        }
    }
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for IndicatorKind {
    type Err = BacktestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "SMA" => Ok(IndicatorKind::Sma),
            "RSI" => Ok(IndicatorKind::Rsi),
            "MACD" => Ok(IndicatorKind::Macd),
            "BBANDS" => Ok(IndicatorKind::Bbands),
            _ => Err(BacktestError::UnsupportedIndicator {
                name: s.trim().to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IndicatorValue {
    MovingAverages {
        short_ma: f64,
        long_ma: f64,
    },
    Rsi(f64),
    Macd {
        macd: f64,
        signal_line: f64,
    },
    Bands {
        upper_band: f64,
        middle: f64,
        lower_band: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorPoint {
    pub date: NaiveDate,
    pub value: Option<IndicatorValue>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    pub kind: IndicatorKind,
    pub values: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Index of the first bar whose value is defined.
    pub fn first_defined(&self) -> Option<usize> {
        self.values.iter().position(|p| p.value.is_some())
    }
}

/// Compute the indicator selected by `params` over `bars`.
pub fn compute_indicator(bars: &[PriceBar], params: &StrategyParams) -> IndicatorSeries {
    match *params {
        StrategyParams::Sma {
            short_window,
            long_window,
        } => calculate_sma_cross(bars, short_window, long_window),
        StrategyParams::Rsi { rsi_period, .. } => calculate_rsi(bars, rsi_period),
        StrategyParams::Macd {
            fast_period,
            slow_period,
            signal_period,
        } => calculate_macd(bars, fast_period, slow_period, signal_period),
        StrategyParams::Bbands {
            window,
            num_std_dev,
        } => calculate_bollinger(bars, window, num_std_dev),
    }
}
