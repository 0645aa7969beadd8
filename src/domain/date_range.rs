//! Requested backtest window, bounded by the last complete trading day.

use crate::domain::error::BacktestError;
use chrono::{Duration, NaiveDate};

/// Latest usable end date: `end`, but never later than the day before `today`.
pub fn clamp_end_date(end: NaiveDate, today: NaiveDate) -> NaiveDate {
    end.min(today - Duration::days(1))
}

/// Clamp `end` and check the window is not inverted.
pub fn resolve_window(
    start: NaiveDate,
    end: NaiveDate,
    today: NaiveDate,
) -> Result<(NaiveDate, NaiveDate), BacktestError> {
    let end = clamp_end_date(end, today);
    if start > end {
        return Err(BacktestError::invalid_parameter(
            "start_date",
            format!("start_date ({start}) must not be after end_date ({end})"),
        ));
    }
    Ok((start, end))
}
