//! Portfolio simulation over a position timeline.
//!
//! The portfolio is fully invested at a unit of exposure: on each bar the
//! equity moves by the position held at the previous close times the bar's
//! price return. There are no fees and no position sizing.

use super::metrics::compute_drawdown;
use super::position::Position;

pub const INITIAL_CAPITAL: f64 = 10_000.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Simulation {
    pub initial_capital: f64,
    /// Bar-over-bar close returns; `returns[0] == 0`.
    pub returns: Vec<f64>,
    /// `position[i-1] * returns[i]`; `strategy_returns[0] == 0`.
    pub strategy_returns: Vec<f64>,
    pub equity_curve: Vec<f64>,
    /// `equity / running peak - 1`, always `<= 0`.
    pub drawdown: Vec<f64>,
}

impl Simulation {
    pub fn final_equity(&self) -> f64 {
        self.equity_curve
            .last()
            .copied()
            .unwrap_or(self.initial_capital)
    }
}

pub fn price_returns(closes: &[f64]) -> Vec<f64> {
    let mut returns = Vec::with_capacity(closes.len());
    if !closes.is_empty() {
        returns.push(0.0);
    }
    returns.extend(closes.windows(2).map(|w| w[1] / w[0] - 1.0));
    returns
}

/// Simulate equity for `positions` over `closes`. Both slices must have the
/// same length; extra elements of the longer one are ignored.
pub fn simulate(closes: &[f64], positions: &[Position]) -> Simulation {
    let len = closes.len().min(positions.len());
    let returns = price_returns(&closes[..len]);

    let strategy_returns: Vec<f64> = (0..len)
        .map(|i| {
            if i == 0 {
                0.0
            } else {
                f64::from(positions[i - 1].value()) * returns[i]
            }
        })
        .collect();

    let mut equity = INITIAL_CAPITAL;
    let equity_curve: Vec<f64> = strategy_returns
        .iter()
        .map(|r| {
            equity *= 1.0 + r;
            equity
        })
        .collect();

    let drawdown = compute_drawdown(&equity_curve);

    Simulation {
        initial_capital: INITIAL_CAPITAL,
        returns,
        strategy_returns,
        equity_curve,
        drawdown,
    }
}

/// Buy-and-hold: long on every bar.
pub fn simulate_buy_and_hold(closes: &[f64]) -> Simulation {
    simulate(closes, &vec![Position::Long; closes.len()])
}
