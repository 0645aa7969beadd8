//! Price source port.

use crate::domain::error::BacktestError;
use crate::domain::ohlcv::PriceBar;
use chrono::NaiveDate;

/// Daily bars for one symbol.
///
/// Implementations return bars sorted ascending by date with unique dates.
/// The backtest core does not re-check this.
pub trait DataPort {
    fn fetch_bars(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceBar>, BacktestError>;

    /// First date, last date and bar count stored for `symbol`, or `None` if
    /// the source has no bars for it.
    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, BacktestError>;
}
