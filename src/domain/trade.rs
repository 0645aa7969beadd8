//! Round-trip trades read off a position timeline.

use super::ohlcv::PriceBar;
use super::portfolio::INITIAL_CAPITAL;
use super::position::Position;
use chrono::NaiveDate;
use log::debug;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trade {
    pub entry_date: NaiveDate,
    pub exit_date: NaiveDate,
    pub entry_price: f64,
    pub exit_price: f64,
    /// `Long` or `Short`, never `Flat`.
    pub position: Position,
    pub percent_pnl: f64,
    /// P&L of a position sized at `INITIAL_CAPITAL` on entry.
    pub dollar_pnl: f64,
}

impl Trade {
    fn close(entry: &OpenTrade, exit: &PriceBar) -> Self {
        let direction = f64::from(entry.position.value());
        let diff = exit.close - entry.price;
        let trade = Trade {
            entry_date: entry.date,
            exit_date: exit.date,
            entry_price: entry.price,
            exit_price: exit.close,
            position: entry.position,
            percent_pnl: direction * diff / entry.price * 100.0,
            dollar_pnl: diff * direction * (INITIAL_CAPITAL / entry.price),
        };
        debug!(
            "{:?} {} @ {:.2} -> {} @ {:.2}: {:+.2}%",
            trade.position,
            trade.entry_date,
            trade.entry_price,
            trade.exit_date,
            trade.exit_price,
            trade.percent_pnl
        );
        trade
    }

    pub fn is_winner(&self) -> bool {
        self.dollar_pnl > 0.0
    }

    pub fn holding_days(&self) -> i64 {
        (self.exit_date - self.entry_date).num_days()
    }
}

#[derive(Debug, Clone, Copy)]
struct OpenTrade {
    position: Position,
    price: f64,
    date: NaiveDate,
}

impl OpenTrade {
    fn at(position: Position, bar: &PriceBar) -> Self {
        OpenTrade {
            position,
            price: bar.close,
            date: bar.date,
        }
    }
}

/// Scan `bars` alongside `positions` and record every completed trade.
///
/// A change of position closes the open trade at that bar's close, and a flip
/// between long and short reopens on the same bar. Anything still open after
/// the last bar is closed at the last close.
pub fn extract_trades(bars: &[PriceBar], positions: &[Position]) -> Vec<Trade> {
    let len = bars.len().min(positions.len());
    let mut trades = Vec::new();
    let mut open: Option<OpenTrade> = None;

    for (i, (bar, &position)) in bars.iter().zip(positions).take(len).enumerate() {
        let last = i + 1 == len;

        match open {
            Some(current) if position != current.position || last => {
                trades.push(Trade::close(&current, bar));
                open = (!position.is_flat() && position != current.position)
                    .then(|| OpenTrade::at(position, bar));
            }
            None if !position.is_flat() => {
                open = Some(OpenTrade::at(position, bar));
            }
            _ => {}
        }
    }

    if let (Some(current), Some(bar)) = (open, bars[..len].last()) {
        trades.push(Trade::close(&current, bar));
    }

    trades
}
