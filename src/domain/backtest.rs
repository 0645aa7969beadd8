//! Backtest pipeline: indicator, signals, positions, warmup, simulation, trades.
//!
//! `run_backtest` is pure: it borrows an already-loaded price slice and
//! returns a write-once [`BacktestResult`]. Loading bars and writing results
//! is left to the adapters.

use chrono::NaiveDate;
use log::info;
use serde::Serialize;

use super::error::BacktestError;
use super::indicator::{compute_indicator, IndicatorKind};
use super::metrics::Metrics;
use super::ohlcv::{closes, PriceBar};
use super::portfolio::{simulate, simulate_buy_and_hold};
use super::position::{resolve_positions, sma_seed, Position};
use super::signal::generate_signals;
use super::strategy::StrategyParams;
use super::trade::{extract_trades, Trade};
use super::warmup::trim_warmup;

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub strategy: StrategyParams,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BacktestResult {
    pub indicator: IndicatorKind,
    pub parameters: StrategyParams,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_window: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_window: Option<usize>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_return: f64,
    pub max_drawdown: f64,
    pub sharpe_ratio: f64,
    pub equity_curve: Vec<f64>,
    /// Date of each equity curve point.
    pub trade_dates: Vec<NaiveDate>,
    pub trades: Vec<Trade>,
    /// The series was too short for the warmup period and was not trimmed.
    pub low_confidence: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkResult {
    pub symbol: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_return: f64,
    pub max_drawdown: f64,
    pub sharpe_ratio: f64,
    pub equity_curve: Vec<f64>,
    pub portfolio_dates: Vec<NaiveDate>,
}

/// Run a single-indicator backtest over `bars`, which must already be limited
/// to the request's date window and sorted ascending by date.
pub fn run_backtest(
    bars: &[PriceBar],
    request: &BacktestRequest,
) -> Result<BacktestResult, BacktestError> {
    if bars.is_empty() {
        return Err(BacktestError::EmptyPriceRange {
            start_date: request.start_date,
            end_date: request.end_date,
        });
    }

    let params = &request.strategy;
    params.validate()?;
    params.check_min_bars(bars.len())?;

    info!(
        "running {} backtest over {} bars ({} to {})",
        params.kind(),
        bars.len(),
        request.start_date,
        request.end_date
    );

    // Stage 1: indicator and raw signals over the full series
    let series = compute_indicator(bars, params);
    let signals = generate_signals(bars, &series, params);

    // Stage 2: forward-filled positions
    let seed = match params {
        StrategyParams::Sma { .. } => sma_seed(&series),
        _ => None,
    };
    let positions = resolve_positions(&signals, seed);

    // Stage 3: drop the warmup prefix
    let trim = trim_warmup(bars.len(), params.warmup_period())?;
    let bars = trim.apply(bars);
    let positions: &[Position] = trim.apply(&positions);

    // Stage 4: simulate and extract trades
    let simulation = simulate(&closes(bars), positions);
    let metrics = Metrics::compute(&simulation);
    let trades = extract_trades(bars, positions);

    info!(
        "{} backtest complete: {} bars, {} trades, final equity {:.2} ({:+.2}%)",
        params.kind(),
        bars.len(),
        trades.len(),
        simulation.final_equity(),
        metrics.total_return * 100.0
    );

    Ok(BacktestResult {
        indicator: params.kind(),
        parameters: *params,
        short_window: params.short_window(),
        long_window: params.long_window(),
        start_date: request.start_date,
        end_date: request.end_date,
        total_return: metrics.total_return,
        max_drawdown: metrics.max_drawdown,
        sharpe_ratio: metrics.sharpe_ratio,
        equity_curve: simulation.equity_curve,
        trade_dates: bars.iter().map(|b| b.date).collect(),
        trades,
        low_confidence: trim.low_confidence,
    })
}

/// Buy-and-hold performance of `symbol` over `bars`.
pub fn run_benchmark(
    symbol: &str,
    bars: &[PriceBar],
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<BenchmarkResult, BacktestError> {
    if bars.is_empty() {
        return Err(BacktestError::EmptyPriceRange {
            start_date,
            end_date,
        });
    }

    let simulation = simulate_buy_and_hold(&closes(bars));
    let metrics = Metrics::compute(&simulation);

    info!(
        "{} buy-and-hold over {} bars: total return {:.2}%",
        symbol,
        bars.len(),
        metrics.total_return * 100.0
    );

    Ok(BenchmarkResult {
        symbol: symbol.to_string(),
        start_date,
        end_date,
        total_return: metrics.total_return,
        max_drawdown: metrics.max_drawdown,
        sharpe_ratio: metrics.sharpe_ratio,
        equity_curve: simulation.equity_curve,
        portfolio_dates: bars.iter().map(|b| b.date).collect(),
    })
}
