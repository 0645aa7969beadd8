//! Raw per-bar trading signals derived from an indicator series.
//!
//! SMA is edge-triggered: it fires only on the bar where `short_ma - long_ma`
//! changes sign. RSI, MACD and BBANDS are level-triggered: they fire on every
//! bar the condition holds, and rely on the position resolver's forward fill
//! to avoid re-entering.

use crate::domain::indicator::{IndicatorSeries, IndicatorValue};
use crate::domain::ohlcv::PriceBar;
use crate::domain::strategy::StrategyParams;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    Buy,
    Sell,
    /// No new instruction this bar.
    Hold,
}

impl Signal {
    pub fn value(self) -> i8 {
        match self {
            Signal::Buy => 1,
            Signal::Sell => -1,
            Signal::Hold => 0,
        }
    }

    pub fn is_hold(self) -> bool {
        self == Signal::Hold
    }
}

/// One signal per bar of `series`. `bars` must be the bars the series was computed from.
pub fn generate_signals(
    bars: &[PriceBar],
    series: &IndicatorSeries,
    params: &StrategyParams,
) -> Vec<Signal> {
    match *params {
        StrategyParams::Sma { .. } => crossover_signals(series),
        StrategyParams::Rsi {
            overbought,
            oversold,
            ..
        } => series
            .values
            .iter()
            .map(|p| match p.value {
                Some(IndicatorValue::Rsi(rsi)) => threshold_signal(rsi, oversold, overbought),
                _ => Signal::Hold,
            })
            .collect(),
        StrategyParams::Macd { .. } => series
            .values
            .iter()
            .map(|p| match p.value {
                Some(IndicatorValue::Macd { macd, signal_line }) => {
                    if macd > signal_line {
                        Signal::Buy
                    } else if macd < signal_line {
                        Signal::Sell
                    } else {
                        Signal::Hold
                    }
                }
                _ => Signal::Hold,
            })
            .collect(),
        StrategyParams::Bbands { .. } => bars
            .iter()
            .zip(series.values.iter())
            .map(|(bar, p)| match p.value {
                Some(IndicatorValue::Bands {
                    upper_band,
                    lower_band,
                    ..
                }) => {
                    if bar.close < lower_band {
                        Signal::Buy
                    } else if bar.close > upper_band {
                        Signal::Sell
                    } else {
                        Signal::Hold
                    }
                }
                _ => Signal::Hold,
            })
            .collect(),
    }
}

fn threshold_signal(value: f64, oversold: f64, overbought: f64) -> Signal {
    if value < oversold {
        Signal::Buy
    } else if value > overbought {
        Signal::Sell
    } else {
        Signal::Hold
    }
}

fn ma_diff(value: Option<IndicatorValue>) -> Option<f64> {
    match value {
        Some(IndicatorValue::MovingAverages { short_ma, long_ma }) => Some(short_ma - long_ma),
        _ => None,
    }
}

fn crossover_signals(series: &IndicatorSeries) -> Vec<Signal> {
    let mut signals = Vec::with_capacity(series.len());
    let mut prev_diff: Option<f64> = None;

    for point in &series.values {
        let curr_diff = ma_diff(point.value);
        let signal = match (prev_diff, curr_diff) {
            (Some(prev), Some(curr)) if prev < 0.0 && curr > 0.0 => Signal::Buy,
            (Some(prev), Some(curr)) if prev > 0.0 && curr < 0.0 => Signal::Sell,
            _ => Signal::Hold,
        };
        signals.push(signal);
        prev_diff = curr_diff;
    }

    signals
}
