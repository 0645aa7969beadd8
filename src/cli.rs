//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_report_adapter::{JsonReportAdapter, STDOUT_PATH};
use crate::domain::backtest::{
    run_backtest, run_benchmark, BacktestRequest, BacktestResult, BenchmarkResult,
};
use crate::domain::config_validation::{
    read_indicator, validate_backtest_config, validate_strategy_config, BacktestSettings,
};
use crate::domain::date_range::resolve_window;
use crate::domain::error::BacktestError;
use crate::domain::indicator::IndicatorKind;
use crate::domain::strategy::StrategyParams;
use crate::domain::trade::Trade;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "backtester", about = "Single-indicator strategy backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run an indicator backtest
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        /// Overrides [strategy] indicator
        #[arg(long)]
        indicator: Option<String>,
        /// Output JSON path, `-` for stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Buy-and-hold performance over the configured window
    Benchmark {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List supported indicators
    Indicators,
    /// Validate a configuration file without loading price data
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show the stored data range for a symbol
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            indicator,
            output,
        } => run_backtest_command(&config, indicator.as_deref(), output.as_deref()),
        Command::Benchmark {
            config,
            symbol,
            output,
        } => run_benchmark_command(&config, symbol.as_deref(), output.as_deref()),
        Command::Indicators => run_indicators(),
        Command::Validate { config } => run_validate(&config),
        Command::Info { config, symbol } => run_info(&config, symbol.as_deref()),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| fail(&e))
}

fn fail(err: &BacktestError) -> ExitCode {
    eprintln!("error: {err}");
    err.into()
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Strategy parameters from `[strategy]`, with an optional indicator name
/// taking precedence over the configured one.
pub fn resolve_strategy(
    config: &dyn ConfigPort,
    indicator_override: Option<&str>,
) -> Result<StrategyParams, BacktestError> {
    let kind = match indicator_override {
        Some(name) => name.parse::<IndicatorKind>()?,
        None => read_indicator(config)?,
    };
    StrategyParams::from_config(kind, config)
}

/// Clamp the window, load bars for `settings.symbol` and run the backtest.
pub fn run_backtest_pipeline(
    data_port: &dyn DataPort,
    settings: &BacktestSettings,
    strategy: StrategyParams,
    today: NaiveDate,
) -> Result<BacktestResult, BacktestError> {
    let (start_date, end_date) = resolve_window(settings.start_date, settings.end_date, today)?;
    let bars = data_port.fetch_bars(&settings.symbol, start_date, end_date)?;
    log::info!(
        "loaded {} bars for {} ({} to {})",
        bars.len(),
        settings.symbol,
        start_date,
        end_date
    );

    let request = BacktestRequest {
        start_date,
        end_date,
        strategy,
    };
    run_backtest(&bars, &request)
}

pub fn run_benchmark_pipeline(
    data_port: &dyn DataPort,
    symbol: &str,
    start_date: NaiveDate,
    end_date: NaiveDate,
    today: NaiveDate,
) -> Result<BenchmarkResult, BacktestError> {
    let (start_date, end_date) = resolve_window(start_date, end_date, today)?;
    let bars = data_port.fetch_bars(symbol, start_date, end_date)?;
    run_benchmark(symbol, &bars, start_date, end_date)
}

fn output_target(cli_output: Option<&Path>, configured: Option<&str>) -> String {
    match (cli_output, configured) {
        (Some(path), _) => path.to_string_lossy().into_owned(),
        (None, Some(path)) => path.to_string(),
        (None, None) => STDOUT_PATH.to_string(),
    }
}

fn run_backtest_command(
    config_path: &Path,
    indicator_override: Option<&str>,
    output_path: Option<&Path>,
) -> ExitCode {
    // Stage 1: Load config
    eprintln!("Loading config from {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    // Stage 2: Validate [backtest] and [strategy]
    let settings = match BacktestSettings::from_config(&config) {
        Ok(s) => s,
        Err(e) => return fail(&e),
    };
    let strategy = match resolve_strategy(&config, indicator_override) {
        Ok(s) => s,
        Err(e) => return fail(&e),
    };
    eprintln!("Strategy: {} {}", strategy.kind(), describe_params(&strategy));

    // Stage 3: Load bars and run
    let data_port = CsvAdapter::new(PathBuf::from(&settings.data_dir));
    let result = match run_backtest_pipeline(&data_port, &settings, strategy, today()) {
        Ok(r) => r,
        Err(e) => return fail(&e),
    };

    // Stage 4: Console summary
    print_backtest_summary(&settings.symbol, &result);

    // Stage 5: Write report
    let target = output_target(output_path, settings.output.as_deref());
    if let Err(e) = JsonReportAdapter::new(settings.pretty).write_backtest(&result, &target) {
        return fail(&e);
    }
    if target != STDOUT_PATH {
        eprintln!("\nReport written to {target}");
    }

    ExitCode::SUCCESS
}

fn run_benchmark_command(
    config_path: &Path,
    symbol_override: Option<&str>,
    output_path: Option<&Path>,
) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let settings = match BacktestSettings::from_config(&config) {
        Ok(s) => s,
        Err(e) => return fail(&e),
    };
    let symbol = symbol_override
        .map(str::to_uppercase)
        .unwrap_or_else(|| settings.symbol.clone());

    let data_port = CsvAdapter::new(PathBuf::from(&settings.data_dir));
    let result = match run_benchmark_pipeline(
        &data_port,
        &symbol,
        settings.start_date,
        settings.end_date,
        today(),
    ) {
        Ok(r) => r,
        Err(e) => return fail(&e),
    };

    eprintln!("\n=== Buy & Hold: {} ===", symbol);
    eprintln!("Period:           {} to {}", result.start_date, result.end_date);
    eprintln!("Total Return:     {:.2}%", result.total_return * 100.0);
    eprintln!("Sharpe Ratio:     {:.2}", result.sharpe_ratio);
    eprintln!("Max Drawdown:     {:.1}%", result.max_drawdown * 100.0);

    let target = output_target(output_path, settings.output.as_deref());
    if let Err(e) = JsonReportAdapter::new(settings.pretty).write_benchmark(&result, &target) {
        return fail(&e);
    }
    ExitCode::SUCCESS
}

fn run_indicators() -> ExitCode {
    for kind in IndicatorKind::ALL {
        let defaults = StrategyParams::default_for(kind);
        println!(
            "{:<8} {}  (defaults: {})",
            kind.name(),
            kind.description(),
            describe_params(&defaults)
        );
    }
    ExitCode::SUCCESS
}

fn run_validate(config_path: &Path) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    if let Err(e) = validate_backtest_config(&config) {
        return fail(&e);
    }
    let strategy = match validate_strategy_config(&config) {
        Ok(s) => s,
        Err(e) => return fail(&e),
    };

    eprintln!("\nIndicator:        {}", strategy.kind());
    eprintln!("Parameters:       {}", describe_params(&strategy));
    eprintln!("Warmup:           {} bars", strategy.warmup_period());
    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}

fn run_info(config_path: &Path, symbol_override: Option<&str>) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let data_dir = match config.get_string("backtest", "data_dir") {
        Some(d) if !d.trim().is_empty() => d,
        _ => {
            return fail(&BacktestError::ConfigMissing {
                section: "backtest".into(),
                key: "data_dir".into(),
            });
        }
    };
    let symbol = match symbol_override
        .map(str::to_string)
        .or_else(|| config.get_string("backtest", "symbol"))
    {
        Some(s) => s.trim().to_uppercase(),
        None => {
            eprintln!("error: symbol is required (use --symbol or set in config)");
            return ExitCode::from(2);
        }
    };

    let adapter = CsvAdapter::new(PathBuf::from(data_dir.trim()));
    match adapter.get_data_range(&symbol) {
        Ok(Some((first, last, count))) => {
            println!("{symbol}: {count} bars, {first} to {last}");
            ExitCode::SUCCESS
        }
        Ok(None) => {
            eprintln!("{symbol}: no data found");
            ExitCode::from(3)
        }
        Err(e) => fail(&e),
    }
}

fn describe_params(params: &StrategyParams) -> String {
    params
        .parameters()
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn average_holding_days(trades: &[Trade]) -> Option<f64> {
    if trades.is_empty() {
        return None;
    }
    let total: i64 = trades.iter().map(Trade::holding_days).sum();
    Some(total as f64 / trades.len() as f64)
}

pub fn print_backtest_summary(symbol: &str, result: &BacktestResult) {
    eprintln!("\n=== {} {} Backtest ===", symbol, result.indicator);
    eprintln!("Period:           {} to {}", result.start_date, result.end_date);
    if let (Some(first), Some(last)) = (result.trade_dates.first(), result.trade_dates.last()) {
        eprintln!(
            "Evaluated:        {} to {} ({} bars)",
            first,
            last,
            result.trade_dates.len()
        );
    }
    eprintln!("Total Return:     {:.2}%", result.total_return * 100.0);
    eprintln!("Sharpe Ratio:     {:.2}", result.sharpe_ratio);
    eprintln!("Max Drawdown:     {:.1}%", result.max_drawdown * 100.0);
    eprintln!("Total Trades:     {}", result.trades.len());

    if !result.trades.is_empty() {
        let winners = result.trades.iter().filter(|t| t.is_winner()).count();
        eprintln!(
            "Win Rate:         {:.1}%",
            winners as f64 / result.trades.len() as f64 * 100.0
        );
    }
    if let Some(days) = average_holding_days(&result.trades) {
        eprintln!("Avg Holding:      {days:.1} days");
    }
    if result.low_confidence {
        eprintln!("\nwarning: fewer bars than the warmup period; results are low confidence");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::position::Position;

    fn make_config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    #[test]
    fn cli_parses_backtest() {
        let cli = Cli::try_parse_from([
            "backtester",
            "backtest",
            "-c",
            "run.ini",
            "--indicator",
            "rsi",
            "-o",
            "out.json",
        ])
        .unwrap();
        match cli.command {
            Command::Backtest {
                config,
                indicator,
                output,
            } => {
                assert_eq!(config, PathBuf::from("run.ini"));
                assert_eq!(indicator.as_deref(), Some("rsi"));
                assert_eq!(output, Some(PathBuf::from("out.json")));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn cli_parses_indicators() {
        let cli = Cli::try_parse_from(["backtester", "indicators"]).unwrap();
        assert!(matches!(cli.command, Command::Indicators));
    }

    #[test]
    fn cli_requires_config_for_backtest() {
        assert!(Cli::try_parse_from(["backtester", "backtest"]).is_err());
    }

    #[test]
    fn resolve_strategy_uses_override() {
        let config = make_config("[strategy]\nindicator = SMA\nwindow = 10\n");
        let params = resolve_strategy(&config, Some("bbands")).unwrap();
        assert_eq!(
            params,
            StrategyParams::Bbands {
                window: 10,
                num_std_dev: 2.0
            }
        );
    }

    #[test]
    fn resolve_strategy_rejects_unknown_override() {
        let config = make_config("[strategy]\nindicator = SMA\n");
        let err = resolve_strategy(&config, Some("ADX")).unwrap_err();
        assert!(matches!(err, BacktestError::UnsupportedIndicator { .. }));
    }

    #[test]
    fn output_target_precedence() {
        assert_eq!(output_target(Some(Path::new("a.json")), Some("b.json")), "a.json");
        assert_eq!(output_target(None, Some("b.json")), "b.json");
        assert_eq!(output_target(None, None), STDOUT_PATH);
    }

    #[test]
    fn average_holding_days_over_trades() {
        let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
        let trade = |entry, exit| Trade {
            entry_date: day(entry),
            exit_date: day(exit),
            entry_price: 100.0,
            exit_price: 101.0,
            position: Position::Long,
            percent_pnl: 1.0,
            dollar_pnl: 100.0,
        };
        assert_eq!(average_holding_days(&[]), None);
        assert_eq!(average_holding_days(&[trade(1, 4), trade(10, 10)]), Some(1.5));
    }

    #[test]
    fn describe_params_lists_values() {
        let text = describe_params(&StrategyParams::default_for(IndicatorKind::Sma));
        assert_eq!(text, "short_window=50, long_window=200");
    }
}
