//! Performance metrics over a simulated equity curve.

use super::portfolio::Simulation;
use log::warn;

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    pub total_return: f64,
    /// Most negative drawdown, `<= 0`.
    pub max_drawdown: f64,
    pub sharpe_ratio: f64,
}

impl Metrics {
    pub fn compute(simulation: &Simulation) -> Self {
        Metrics {
            total_return: total_return(&simulation.equity_curve, simulation.initial_capital),
            max_drawdown: max_drawdown(&simulation.drawdown),
            sharpe_ratio: sharpe_ratio(&simulation.strategy_returns),
        }
    }
}

pub fn total_return(equity_curve: &[f64], initial_capital: f64) -> f64 {
    match equity_curve.last() {
        Some(&last) if initial_capital > 0.0 => last / initial_capital - 1.0,
        _ => 0.0,
    }
}

/// `equity[i] / max(equity[0..=i]) - 1` for every bar.
pub fn compute_drawdown(equity_curve: &[f64]) -> Vec<f64> {
    let mut peak = f64::NEG_INFINITY;
    equity_curve
        .iter()
        .map(|&equity| {
            peak = peak.max(equity);
            if peak > 0.0 { equity / peak - 1.0 } else { 0.0 }
        })
        .collect()
}

pub fn max_drawdown(drawdown: &[f64]) -> f64 {
    drawdown.iter().copied().fold(0.0, f64::min)
}

/// Annualised Sharpe ratio of daily returns with a zero risk-free rate,
/// using the sample standard deviation.
///
/// Returns exactly `0.0` when the ratio is not meaningful: fewer than two
/// returns, constant returns, or a zero or non-finite deviation.
pub fn sharpe_ratio(returns: &[f64]) -> f64 {
    if returns.len() < 2 {
        return 0.0;
    }
    if returns.iter().all(|&r| r == returns[0]) {
        return 0.0;
    }

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let stddev = variance.sqrt();

    if !stddev.is_finite() || stddev == 0.0 {
        warn!("return deviation is {stddev}; reporting a Sharpe ratio of 0");
        return 0.0;
    }

    let sharpe = TRADING_DAYS_PER_YEAR.sqrt() * mean / stddev;
    if sharpe.is_finite() {
        sharpe
    } else {
        warn!("Sharpe ratio is not finite; reporting 0");
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::portfolio::simulate;
    use crate::domain::position::Position;
    use approx::assert_abs_diff_eq;

    #[test]
    fn metrics_total_return_positive() {
        assert_abs_diff_eq!(total_return(&[10_000.0, 11_000.0], 10_000.0), 0.10, epsilon = 1e-12);
    }

    #[test]
    fn metrics_total_return_negative() {
        assert_abs_diff_eq!(total_return(&[10_000.0, 9_000.0], 10_000.0), -0.10, epsilon = 1e-12);
    }

    #[test]
    fn metrics_total_return_empty() {
        assert_eq!(total_return(&[], 10_000.0), 0.0);
    }

    #[test]
    fn metrics_drawdown_series() {
        let dd = compute_drawdown(&[100.0, 110.0, 90.0, 95.0, 80.0, 120.0]);
        assert_eq!(dd[0], 0.0);
        assert_eq!(dd[1], 0.0);
        assert_abs_diff_eq!(dd[2], 90.0 / 110.0 - 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(dd[4], 80.0 / 110.0 - 1.0, epsilon = 1e-12);
        assert_eq!(dd[5], 0.0);
    }

    #[test]
    fn metrics_max_drawdown() {
        let dd = compute_drawdown(&[100.0, 110.0, 90.0, 95.0, 80.0, 100.0]);
        assert_abs_diff_eq!(max_drawdown(&dd), -(110.0 - 80.0) / 110.0, epsilon = 1e-12);
    }

    #[test]
    fn metrics_max_drawdown_never_positive() {
        assert_eq!(max_drawdown(&[]), 0.0);
        assert_eq!(max_drawdown(&compute_drawdown(&[1.0, 2.0, 3.0])), 0.0);
    }

    #[test]
    fn metrics_sharpe_hand_computed() {
        // mean 0.01, sample std 0.01 -> sqrt(252)
        let returns = [0.0, 0.01, 0.02];
        assert_abs_diff_eq!(sharpe_ratio(&returns), 252f64.sqrt(), epsilon = 1e-9);
    }

    #[test]
    fn metrics_sharpe_negative_for_losses() {
        assert!(sharpe_ratio(&[0.0, -0.01, -0.03, 0.005]) < 0.0);
    }

    #[test]
    fn metrics_sharpe_degenerate_is_zero() {
        assert_eq!(sharpe_ratio(&[]), 0.0);
        assert_eq!(sharpe_ratio(&[0.05]), 0.0);
        assert_eq!(sharpe_ratio(&[0.0; 50]), 0.0);
        assert_eq!(sharpe_ratio(&[0.01; 30]), 0.0);
        assert_eq!(sharpe_ratio(&[0.0, f64::NAN, 0.01]), 0.0);
    }

    #[test]
    fn metrics_sharpe_flat_position_is_zero() {
        // prices move but nothing is held
        let closes = [100.0, 110.0, 99.0, 120.0, 118.0];
        let sim = simulate(&closes, &[Position::Flat; 5]);
        assert_eq!(Metrics::compute(&sim).sharpe_ratio, 0.0);
    }

    #[test]
    fn metrics_sharpe_counts_first_bar() {
        let sim = simulate(&[100.0, 110.0, 99.0, 120.0, 118.0], &[Position::Long; 5]);
        let returns = [0.0, 0.1, -0.1, 120.0 / 99.0 - 1.0, 118.0 / 120.0 - 1.0];
        let n = returns.len() as f64;
        let mean = returns.iter().sum::<f64>() / n;
        let std = (returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0)).sqrt();

        let sharpe = Metrics::compute(&sim).sharpe_ratio;
        assert_abs_diff_eq!(sharpe, 252f64.sqrt() * mean / std, epsilon = 1e-9);
        assert_abs_diff_eq!(sharpe, 5.169774369448442, epsilon = 1e-9);
    }

    #[test]
    fn metrics_compute_from_simulation() {
        let sim = simulate(&[100.0, 110.0, 99.0], &[Position::Long; 3]);
        let metrics = Metrics::compute(&sim);
        assert_abs_diff_eq!(metrics.total_return, -0.01, epsilon = 1e-12);
        assert_abs_diff_eq!(metrics.max_drawdown, -0.10, epsilon = 1e-12);
        assert!(metrics.sharpe_ratio.is_finite());
    }

    #[test]
    fn metrics_flat_simulation_all_zero() {
        let sim = simulate(&[100.0; 10], &[Position::Flat; 10]);
        let metrics = Metrics::compute(&sim);
        assert_eq!(
            metrics,
            Metrics {
                total_return: 0.0,
                max_drawdown: 0.0,
                sharpe_ratio: 0.0
            }
        );
    }
}
