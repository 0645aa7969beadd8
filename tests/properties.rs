//! Property tests for pipeline invariants.
//!
//! Uses proptest to verify:
//! 1. Positions are a step function of the signals
//! 2. Every non-flat run produces exactly one trade
//! 3. Trade P&L sign follows price direction and side
//! 4. Constant strategy returns give a Sharpe ratio of exactly zero
//! 5. Drawdown is never positive and max drawdown bounds every bar
//! 6. Backtests are deterministic

mod common;

use backtester::domain::backtest::{run_backtest, BacktestRequest};
use backtester::domain::metrics::{max_drawdown, Metrics};
use backtester::domain::portfolio::simulate;
use backtester::domain::position::{resolve_positions, Position};
use backtester::domain::signal::Signal;
use backtester::domain::strategy::StrategyParams;
use backtester::domain::trade::extract_trades;
use common::*;
use proptest::prelude::*;

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_price() -> impl Strategy<Value = f64> {
    (10.0..500.0_f64).prop_map(|p| (p * 100.0).round() / 100.0)
}

fn arb_signal() -> impl Strategy<Value = Signal> {
    prop_oneof![Just(Signal::Buy), Just(Signal::Sell), Just(Signal::Hold)]
}

fn arb_position() -> impl Strategy<Value = Position> {
    prop_oneof![
        Just(Position::Long),
        Just(Position::Flat),
        Just(Position::Short)
    ]
}

/// Closes and positions of equal length.
fn arb_timeline() -> impl Strategy<Value = (Vec<f64>, Vec<Position>)> {
    (1..120usize).prop_flat_map(|n| {
        (
            prop::collection::vec(arb_price(), n),
            prop::collection::vec(arb_position(), n),
        )
    })
}

fn arb_strategy() -> impl Strategy<Value = StrategyParams> {
    prop_oneof![
        Just(StrategyParams::Sma {
            short_window: 5,
            long_window: 20
        }),
        Just(StrategyParams::Rsi {
            rsi_period: 14,
            overbought: 70.0,
            oversold: 30.0
        }),
        Just(StrategyParams::Macd {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9
        }),
        Just(StrategyParams::Bbands {
            window: 20,
            num_std_dev: 2.0
        }),
    ]
}

/// Number of maximal runs of one non-flat position.
fn non_flat_runs(positions: &[Position]) -> usize {
    let mut previous = Position::Flat;
    let mut runs = 0;
    for &position in positions {
        if !position.is_flat() && position != previous {
            runs += 1;
        }
        previous = position;
    }
    runs
}

// ── 1. Step Function ─────────────────────────────────────────────────

proptest! {
    /// Each position is the latest non-hold signal, or flat before any.
    #[test]
    fn positions_follow_latest_signal(
        signals in prop::collection::vec(arb_signal(), 0..200),
    ) {
        let positions = resolve_positions(&signals, None);
        prop_assert_eq!(positions.len(), signals.len());

        let mut expected = Position::Flat;
        for (signal, position) in signals.iter().zip(&positions) {
            if let Some(next) = Position::from_signal(*signal) {
                expected = next;
            }
            prop_assert_eq!(*position, expected);
        }
    }
}

// ── 2. Trade Completeness ────────────────────────────────────────────

proptest! {
    /// One trade per non-flat run, each entered on or before its exit.
    #[test]
    fn one_trade_per_non_flat_run((closes, positions) in arb_timeline()) {
        let bars = bars_from_closes("2024-01-01", &closes);
        let trades = extract_trades(&bars, &positions);

        prop_assert_eq!(trades.len(), non_flat_runs(&positions));
        for trade in &trades {
            prop_assert!(trade.entry_date <= trade.exit_date);
            prop_assert!(!trade.position.is_flat());
        }
        for pair in trades.windows(2) {
            prop_assert!(pair[0].exit_date <= pair[1].entry_date);
        }

        let last_bar = bars.last().unwrap();
        if !positions.last().unwrap().is_flat() {
            prop_assert_eq!(trades.last().unwrap().exit_date, last_bar.date);
        }
    }
}

// ── 3. P&L Sign ──────────────────────────────────────────────────────

proptest! {
    /// Long trades win when price rises, short trades when it falls.
    #[test]
    fn pnl_sign_matches_direction((closes, positions) in arb_timeline()) {
        let bars = bars_from_closes("2024-01-01", &closes);

        for trade in extract_trades(&bars, &positions) {
            let move_in_favour = f64::from(trade.position.value())
                * (trade.exit_price - trade.entry_price);
            prop_assert_eq!(trade.percent_pnl > 0.0, move_in_favour > 0.0);
            prop_assert_eq!(trade.percent_pnl < 0.0, move_in_favour < 0.0);
            prop_assert_eq!(trade.dollar_pnl > 0.0, trade.percent_pnl > 0.0);
            prop_assert_eq!(trade.is_winner(), trade.dollar_pnl > 0.0);
        }
    }
}

// ── 4. Degenerate Sharpe ─────────────────────────────────────────────

proptest! {
    /// Flat prices earn nothing whatever the position.
    #[test]
    fn flat_price_sharpe_is_zero(
        price in arb_price(),
        positions in prop::collection::vec(arb_position(), 1..250),
    ) {
        let closes = vec![price; positions.len()];
        let metrics = Metrics::compute(&simulate(&closes, &positions));
        prop_assert_eq!(metrics.sharpe_ratio, 0.0);
    }

    /// Staying flat earns nothing whatever the prices.
    #[test]
    fn flat_position_sharpe_is_zero((closes, _) in arb_timeline()) {
        let positions = vec![Position::Flat; closes.len()];
        let metrics = Metrics::compute(&simulate(&closes, &positions));
        prop_assert_eq!(metrics.sharpe_ratio, 0.0);
    }
}

// ── 5. Drawdown Bound ────────────────────────────────────────────────

proptest! {
    /// Drawdown never exceeds zero and the maximum is the deepest bar.
    #[test]
    fn drawdown_bounded((closes, positions) in arb_timeline()) {
        let simulation = simulate(&closes, &positions);
        let deepest = max_drawdown(&simulation.drawdown);

        prop_assert!(deepest <= 0.0);
        for &dd in &simulation.drawdown {
            prop_assert!(dd <= 0.0);
            prop_assert!(deepest <= dd);
        }
    }
}

// ── 6. Determinism ───────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Same bars and parameters, same result.
    #[test]
    fn backtest_is_deterministic(
        closes in prop::collection::vec(arb_price(), 80..200),
        strategy in arb_strategy(),
    ) {
        let bars = bars_from_closes("2023-01-02", &closes);
        let request = BacktestRequest {
            start_date: bars[0].date,
            end_date: bars[bars.len() - 1].date,
            strategy,
        };

        let first = run_backtest(&bars, &request).unwrap();
        let second = run_backtest(&bars, &request).unwrap();
        prop_assert_eq!(first, second);
    }
}
