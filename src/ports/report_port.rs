//! Result sink port trait.

use crate::domain::backtest::{BacktestResult, BenchmarkResult};
use crate::domain::error::BacktestError;

/// Port for writing finished backtest and benchmark results.
pub trait ReportPort {
    fn write_backtest(&self, result: &BacktestResult, output_path: &str)
    -> Result<(), BacktestError>;

    fn write_benchmark(
        &self,
        result: &BenchmarkResult,
        output_path: &str,
    ) -> Result<(), BacktestError>;
}
