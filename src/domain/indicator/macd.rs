//! MACD (Moving Average Convergence Divergence) indicator.
//!
//! MACD Line = EMA(fast) - EMA(slow)
//! Signal Line = EMA(signal) of MACD Line
//!
//! All three averages use adjusted weighting (see [`super::ema`]), so every bar
//! is defined. Early values are unstable, which the warmup trimmer accounts for.
//!
//! Default parameters: fast=12, slow=26, signal=9

use crate::domain::indicator::{Ema, IndicatorKind, IndicatorPoint, IndicatorSeries, IndicatorValue};
use crate::domain::ohlcv::PriceBar;

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

pub fn calculate_macd(
    bars: &[PriceBar],
    fast: usize,
    slow: usize,
    signal_period: usize,
) -> IndicatorSeries {
    let mut ema_fast = Ema::with_span(fast);
    let mut ema_slow = Ema::with_span(slow);
    let mut ema_signal = Ema::with_span(signal_period);

    let values = bars
        .iter()
        .map(|bar| {
            let macd = ema_fast.push(bar.close) - ema_slow.push(bar.close);
            let signal_line = ema_signal.push(macd);
            IndicatorPoint {
                date: bar.date,
                value: Some(IndicatorValue::Macd { macd, signal_line }),
            }
        })
        .collect();

    IndicatorSeries {
        kind: IndicatorKind::Macd,
        values,
    }
}
