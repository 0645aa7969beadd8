//! Bollinger Bands indicator.
//!
//! Bollinger Bands consist of:
//! - Middle: Simple Moving Average (SMA) over n periods
//! - Upper: Middle + (multiplier × StdDev)
//! - Lower: Middle - (multiplier × StdDev)
//!
//! Where StdDev is the sample standard deviation (divides by N-1), so a
//! one-bar window never produces bands.
//!
//! Default parameters: window=20, multiplier=2.0
//! Warmup: first (window-1) bars are undefined.

use crate::domain::indicator::{
    IndicatorKind, IndicatorPoint, IndicatorSeries, IndicatorValue, RollingWindow,
};
use crate::domain::ohlcv::PriceBar;

pub const DEFAULT_WINDOW: usize = 20;
pub const DEFAULT_NUM_STD_DEV: f64 = 2.0;

pub fn calculate_bollinger(bars: &[PriceBar], window: usize, num_std_dev: f64) -> IndicatorSeries {
    let mut rolling = RollingWindow::new(window);

    let values = bars
        .iter()
        .map(|bar| {
            let value = rolling.push(bar.close).and_then(|stats| {
                stats.std_dev().map(|sd| IndicatorValue::Bands {
                    upper_band: stats.mean + num_std_dev * sd,
                    middle: stats.mean,
                    lower_band: stats.mean - num_std_dev * sd,
                })
            });
            IndicatorPoint {
                date: bar.date,
                value,
            }
        })
        .collect();

    IndicatorSeries {
        kind: IndicatorKind::Bbands,
        values,
    }
}
