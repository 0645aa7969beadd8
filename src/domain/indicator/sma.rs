//! Simple moving average pair for golden-cross strategies.
//!
//! short_ma = mean of the last `short_window` closes
//! long_ma  = mean of the last `long_window` closes
//!
//! A bar is defined only once both windows are full, i.e. from index
//! max(short_window, long_window) - 1.

use crate::domain::indicator::{
    IndicatorKind, IndicatorPoint, IndicatorSeries, IndicatorValue, RollingWindow,
};
use crate::domain::ohlcv::PriceBar;

pub const DEFAULT_SHORT_WINDOW: usize = 50;
pub const DEFAULT_LONG_WINDOW: usize = 200;

pub fn calculate_sma_cross(
    bars: &[PriceBar],
    short_window: usize,
    long_window: usize,
) -> IndicatorSeries {
    let mut short = RollingWindow::new(short_window);
    let mut long = RollingWindow::new(long_window);

    let values = bars
        .iter()
        .map(|bar| {
            let short_stats = short.push(bar.close);
            let long_stats = long.push(bar.close);
            let value = match (short_stats, long_stats) {
                (Some(s), Some(l)) => Some(IndicatorValue::MovingAverages {
                    short_ma: s.mean,
                    long_ma: l.mean,
                }),
                _ => None,
            };
            IndicatorPoint {
                date: bar.date,
                value,
            }
        })
        .collect();

    IndicatorSeries {
        kind: IndicatorKind::Sma,
        values,
    }
}
