//! RSI (Relative Strength Index) indicator implementation.
//!
//! Uses simple rolling means of gains and losses:
//! - delta[i] = C[i] - C[i-1]; the first bar contributes a zero delta
//! - avg_gain = mean(max(delta, 0)) over n bars
//! - avg_loss = mean(max(-delta, 0)) over n bars
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0 and avg_gain > 0: RSI = 100 (saturated)
//! If avg_loss == 0 and avg_gain == 0: undefined
//!
//! Warmup: first (n-1) bars are undefined.

use crate::domain::indicator::{
    IndicatorKind, IndicatorPoint, IndicatorSeries, IndicatorValue, RollingWindow,
};
use crate::domain::ohlcv::PriceBar;

pub const DEFAULT_PERIOD: usize = 14;
pub const DEFAULT_OVERBOUGHT: f64 = 70.0;
pub const DEFAULT_OVERSOLD: f64 = 30.0;

pub fn calculate_rsi(bars: &[PriceBar], period: usize) -> IndicatorSeries {
    let mut gains = RollingWindow::new(period);
    let mut losses = RollingWindow::new(period);
    let mut prev_close: Option<f64> = None;

    let mut values = Vec::with_capacity(bars.len());
    for bar in bars {
        let delta = prev_close.map_or(0.0, |prev| bar.close - prev);
        prev_close = Some(bar.close);

        let gain = if delta > 0.0 { delta } else { 0.0 };
        let loss = if delta < 0.0 { -delta } else { 0.0 };

        let value = match (gains.push(gain), losses.push(loss)) {
            (Some(g), Some(l)) => rsi_from_averages(g.mean, l.mean).map(IndicatorValue::Rsi),
            _ => None,
        };

        values.push(IndicatorPoint {
            date: bar.date,
            value,
        });
    }

    IndicatorSeries {
        kind: IndicatorKind::Rsi,
        values,
    }
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    let avg_gain = avg_gain.max(0.0);
    let avg_loss = avg_loss.max(0.0);
    if avg_loss == 0.0 {
        return if avg_gain > 0.0 { Some(100.0) } else { None };
    }
    Some(100.0 - 100.0 / (1.0 + avg_gain / avg_loss))
}
